use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Number of recipe candidates returned by every successful generation.
pub const RECIPES_PER_BATCH: usize = 3;

/// Difficulty labels the model is asked to use. Not enforced on replies.
pub mod difficulty {
    pub const EASY: &str = "Easy";
    pub const MEDIUM: &str = "Medium";
    pub const HARD: &str = "Hard";
}

/// An ingredient the user has on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    /// Locally generated, unique per add (two "egg" entries get two ids).
    pub id: String,
    pub name: String,
}

/// One recipe candidate, in the camelCase shape the browser UI consumes.
///
/// Deserialization is lenient so that a model reply missing a field, or using a
/// number where a string was expected, still yields a usable recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// 1-based position in the batch. Zero means the model omitted it.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cooking_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub method: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub suggestions: Option<String>,
}

/// Body of `POST /api/generate-recipe`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GenerateRecipesRequest {
    /// Ingredient names. A missing field is treated as an empty list.
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Successful reply of `POST /api/generate-recipe`: always three recipes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateRecipesResponse {
    pub recipes: Vec<Recipe>,
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let id = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(id.unwrap_or(0))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

/// Accepts a list of scalars, or a single string (one entry).
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let list = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    };
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_serializes_camel_case() {
        let recipe = Recipe {
            id: 1,
            name: "Omelette".to_string(),
            cooking_time: "10 minutes".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["cookingTime"], "10 minutes");
        assert!(value.get("suggestions").is_none());
    }

    #[test]
    fn test_recipe_tolerates_loose_fields() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": "2",
            "name": "Fried Rice",
            "ingredients": "rice",
            "instructions": ["Cook rice", 2],
            "cookingTime": 20,
            "suggestions": null
        }))
        .unwrap();

        assert_eq!(recipe.id, 2);
        assert_eq!(recipe.ingredients, vec!["rice"]);
        assert_eq!(recipe.instructions, vec!["Cook rice", "2"]);
        assert_eq!(recipe.cooking_time, "20");
        assert_eq!(recipe.difficulty, "");
        assert_eq!(recipe.suggestions, None);
    }

    #[test]
    fn test_recipe_missing_id_is_zero() {
        let recipe: Recipe = serde_json::from_value(json!({"name": "Toast"})).unwrap();
        assert_eq!(recipe.id, 0);
        assert_eq!(recipe.name, "Toast");
    }
}
