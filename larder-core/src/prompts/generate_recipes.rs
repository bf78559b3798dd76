//! Prompt asking the model for three recipes built from the user's ingredients.

/// Prompt name, used in logs.
pub const GENERATE_RECIPES_PROMPT_NAME: &str = "generate_recipes";

/// Render the recipe generation prompt for the given ingredient names.
pub fn render_generate_recipes_prompt(ingredients: &[String]) -> String {
    let ingredient_list = ingredients.join(", ");

    format!(
        r#"Create 3 different simple recipes using only the following ingredients: {ingredient_list}.
Each recipe should be easy to prepare with common kitchen tools and take no more than 30 minutes.
Provide variety in cooking methods (e.g., one could be a salad, one cooked, one baked, etc.).

For each recipe, provide:
- A concise recipe name
- List of ingredients used (only from the provided list)
- Step-by-step instructions (3-5 steps)
- Basic cooking time estimate
- Difficulty level (Easy/Medium/Hard)
- Cooking method (Raw/Stovetop/Oven/etc.)

If the ingredients can't make complete dishes, suggest simple additions that would complete each meal.

Please format your response as JSON with this structure:
{{
  "recipes": [
    {{
      "id": 1,
      "name": "Recipe Name 1",
      "ingredients": ["ingredient1", "ingredient2"],
      "instructions": ["Step 1", "Step 2", "Step 3"],
      "cookingTime": "15-20 minutes",
      "difficulty": "Easy",
      "method": "Stovetop",
      "suggestions": "Optional suggestions for additional ingredients"
    }},
    {{
      "id": 2,
      "name": "Recipe Name 2",
      "ingredients": ["ingredient1", "ingredient3"],
      "instructions": ["Step 1", "Step 2", "Step 3"],
      "cookingTime": "10-15 minutes",
      "difficulty": "Easy",
      "method": "Raw",
      "suggestions": "Optional suggestions for additional ingredients"
    }},
    {{
      "id": 3,
      "name": "Recipe Name 3",
      "ingredients": ["ingredient2", "ingredient3"],
      "instructions": ["Step 1", "Step 2", "Step 3"],
      "cookingTime": "20-25 minutes",
      "difficulty": "Medium",
      "method": "Oven",
      "suggestions": "Optional suggestions for additional ingredients"
    }}
  ]
}}"#,
        ingredient_list = ingredient_list
    )
}
