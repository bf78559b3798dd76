//! Turning a model reply into exactly three recipes.
//!
//! Replies are free text that usually, but not always, contains the JSON we
//! asked for. Recovery is tiered:
//!
//! 1. [`parse_structured`]: a fenced JSON block, else the outermost `{...}`
//!    span, else the whole reply, parsed as JSON.
//! 2. [`parse_sections`]: split on heading-like markers and build a recipe
//!    from the first lines of each section.
//! 3. [`pad_recipes`]: generic filler until there are three, then truncate.
//!
//! [`normalize_response`] composes the tiers and never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::types::{difficulty, Recipe, RECIPES_PER_BATCH};

/// Fenced code block, with or without a `json` tag.
static FENCED_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json|JSON)?[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```")
        .expect("Invalid fenced block regex")
});

/// Markers the model uses to start a recipe in prose replies.
static SECTION_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Recipe \d+:|##|\*\*").expect("Invalid section marker regex"));

/// Sections this short are headings or separators, not recipes.
const MIN_SECTION_LEN: usize = 20;

const MAX_SECTION_STEPS: usize = 5;

const FILLER_STEPS: [&str; 5] = [
    "Prepare your ingredients",
    "Combine ingredients as desired",
    "Cook or serve as appropriate",
    "Season to taste",
    "Enjoy your meal!",
];

/// Which tier produced the recipes before padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeTier {
    Structured,
    Sections,
    Filler,
}

impl NormalizeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizeTier::Structured => "structured",
            NormalizeTier::Sections => "sections",
            NormalizeTier::Filler => "filler",
        }
    }
}

/// Text spans worth trying as JSON, most specific first.
fn json_candidates(text: &str) -> Vec<&str> {
    let mut candidates = Vec::with_capacity(3);

    if let Some(block) = FENCED_BLOCK_REGEX.captures(text).and_then(|c| c.get(1)) {
        candidates.push(block.as_str());
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            candidates.push(&text[start..=end]);
        }
    }
    candidates.push(text);

    candidates
}

/// Keys that mark a bare object as a recipe rather than some other wrapper.
const RECIPE_KEYS: [&str; 3] = ["name", "ingredients", "instructions"];

/// The recipe list inside a parsed reply: its `recipes` array, the value
/// itself when it is already an array, or a lone recipe object.
fn recipe_list(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("recipes") {
            Some(Value::Array(items)) => Some(items),
            Some(_) => None,
            None if RECIPE_KEYS.iter().any(|key| map.contains_key(*key)) => {
                Some(vec![Value::Object(map)])
            }
            None => None,
        },
        _ => None,
    }
}

/// Tier 1: recover recipes from JSON somewhere in the reply.
///
/// Returns `None` when no candidate span parses into a recipe list. A parsed
/// but empty list is `Some(vec![])`. Recipes without an id are numbered by
/// position.
pub fn parse_structured(text: &str) -> Option<Vec<Recipe>> {
    let items = json_candidates(text).into_iter().find_map(|candidate| {
        serde_json::from_str::<Value>(candidate.trim())
            .ok()
            .and_then(recipe_list)
    })?;

    let recipes = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value::<Recipe>(item).ok())
        .enumerate()
        .map(|(index, mut recipe)| {
            if recipe.id == 0 {
                recipe.id = index as u32 + 1;
            }
            recipe
        })
        .collect();

    Some(recipes)
}

/// Tier 2: split a prose reply on heading-like markers.
///
/// Only applies when the reply contains at least one marker; otherwise (or
/// when every section is too short) returns an empty list. Builds at most
/// three recipes with generic metadata.
pub fn parse_sections(text: &str, ingredients: &[String]) -> Vec<Recipe> {
    if !SECTION_MARKER_REGEX.is_match(text) {
        return Vec::new();
    }

    SECTION_MARKER_REGEX
        .split(text)
        .filter(|section| section.trim().len() > MIN_SECTION_LEN)
        .take(RECIPES_PER_BATCH)
        .enumerate()
        .map(|(index, section)| Recipe {
            id: index as u32 + 1,
            name: format!("Recipe Option {}", index + 1),
            ingredients: ingredients.to_vec(),
            instructions: section
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .take(MAX_SECTION_STEPS)
                .map(str::to_string)
                .collect(),
            cooking_time: "15-30 minutes".to_string(),
            difficulty: difficulty::EASY.to_string(),
            method: "Stovetop".to_string(),
            suggestions: Some("Check the full response for additional suggestions".to_string()),
        })
        .collect()
}

/// Tier 3: pad with generic recipes up to three, then truncate to three.
pub fn pad_recipes(mut recipes: Vec<Recipe>, ingredients: &[String]) -> Vec<Recipe> {
    while recipes.len() < RECIPES_PER_BATCH {
        let id = recipes.len() as u32 + 1;
        recipes.push(Recipe {
            id,
            name: format!("Simple Recipe {id}"),
            ingredients: ingredients.to_vec(),
            instructions: FILLER_STEPS.iter().map(|s| s.to_string()).collect(),
            cooking_time: "15-20 minutes".to_string(),
            difficulty: difficulty::EASY.to_string(),
            method: "Stovetop".to_string(),
            suggestions: Some("Add salt, pepper, and oil as needed".to_string()),
        });
    }

    recipes.truncate(RECIPES_PER_BATCH);
    recipes
}

/// Normalize a model reply, also reporting which tier produced the recipes.
pub fn normalize_response_with_tier(
    text: &str,
    ingredients: &[String],
) -> (Vec<Recipe>, NormalizeTier) {
    let (recipes, tier) = match parse_structured(text) {
        Some(recipes) => (recipes, NormalizeTier::Structured),
        None => {
            let recipes = parse_sections(text, ingredients);
            if recipes.is_empty() {
                (recipes, NormalizeTier::Filler)
            } else {
                (recipes, NormalizeTier::Sections)
            }
        }
    };

    let recovered = recipes.len();
    let recipes = pad_recipes(recipes, ingredients);

    tracing::info!(
        tier = tier.as_str(),
        recovered,
        padded = RECIPES_PER_BATCH.saturating_sub(recovered),
        "Normalized model reply"
    );

    (recipes, tier)
}

/// Normalize a model reply into exactly three recipes.
pub fn normalize_response(text: &str, ingredients: &[String]) -> Vec<Recipe> {
    normalize_response_with_tier(text, ingredients).0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ingredients: &[&str]) -> Vec<String> {
        ingredients.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fenced_block_preferred_over_braces() {
        let text = "Here you go {not json}\n```json\n{\"recipes\": [{\"name\": \"A\"}]}\n```\nEnjoy {!}";
        let recipes = parse_structured(text).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "A");
        assert_eq!(recipes[0].id, 1);
    }

    #[test]
    fn test_untagged_fence() {
        let text = "```\n[{\"name\": \"A\"}, {\"name\": \"B\"}]\n```";
        let recipes = parse_structured(text).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[1].id, 2);
    }

    #[test]
    fn test_brace_span_inside_prose() {
        let text = "Sure! {\"recipes\": [{\"id\": 7, \"name\": \"Soup\"}]} Hope that helps.";
        let recipes = parse_structured(text).unwrap();
        assert_eq!(recipes[0].id, 7);
        assert_eq!(recipes[0].name, "Soup");
    }

    #[test]
    fn test_empty_recipes_array_is_structured() {
        assert_eq!(parse_structured("{\"recipes\": []}"), Some(vec![]));
    }

    #[test]
    fn test_object_without_recipes_is_not_structured() {
        assert_eq!(parse_structured("{\"dishes\": []}"), None);
    }

    #[test]
    fn test_lone_recipe_object_is_structured() {
        let recipes = parse_structured(
            "{\"name\": \"Omelette\", \"ingredients\": [\"eggs\"], \"instructions\": [\"Whisk\", \"Fold\"]}",
        )
        .unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Omelette");
        assert_eq!(recipes[0].id, 1);
    }

    #[test]
    fn test_non_object_entries_dropped() {
        let recipes = parse_structured("{\"recipes\": [\"oops\", {\"name\": \"Real\"}]}").unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Real");
    }

    #[test]
    fn test_sections_require_marker() {
        let text = "Just cook everything together in one pan until done.";
        assert!(parse_sections(text, &names(&["eggs"])).is_empty());
    }

    #[test]
    fn test_sections_skip_short_fragments() {
        let text = "Recipe 1: Hi\nRecipe 2: Scrambled eggs\nWhisk the eggs well\nCook gently in butter";
        let recipes = parse_sections(text, &names(&["eggs", "butter"]));

        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Recipe Option 1");
        assert_eq!(
            recipes[0].instructions,
            vec!["Scrambled eggs", "Whisk the eggs well", "Cook gently in butter"]
        );
        assert_eq!(recipes[0].ingredients, names(&["eggs", "butter"]));
        assert_eq!(recipes[0].method, "Stovetop");
    }

    #[test]
    fn test_sections_limit_steps_and_count() {
        let section = "Step one here\nStep two\nStep three\nStep four\nStep five\nStep six";
        let text = format!("## {section}\n## {section}\n## {section}\n## {section}");
        let recipes = parse_sections(&text, &names(&["rice"]));

        assert_eq!(recipes.len(), 3);
        assert!(recipes.iter().all(|r| r.instructions.len() == 5));
        assert_eq!(recipes[2].id, 3);
    }

    #[test]
    fn test_pad_numbers_fillers_after_existing() {
        let existing = Recipe {
            id: 1,
            name: "Kept".to_string(),
            ..Default::default()
        };
        let recipes = pad_recipes(vec![existing], &names(&["eggs"]));

        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0].name, "Kept");
        assert_eq!(recipes[1].name, "Simple Recipe 2");
        assert_eq!(recipes[2].id, 3);
        assert_eq!(recipes[2].instructions.len(), 5);
    }

    #[test]
    fn test_pad_truncates() {
        let many = (1..=5)
            .map(|id| Recipe {
                id,
                ..Default::default()
            })
            .collect();
        let recipes = pad_recipes(many, &[]);
        assert_eq!(recipes.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_tier_reporting() {
        let ingredients = names(&["eggs"]);
        let (_, tier) = normalize_response_with_tier("{\"recipes\": []}", &ingredients);
        assert_eq!(tier, NormalizeTier::Structured);

        let (_, tier) = normalize_response_with_tier(
            "**Egg fried rice** with plenty of soy sauce",
            &ingredients,
        );
        assert_eq!(tier, NormalizeTier::Sections);

        let (recipes, tier) = normalize_response_with_tier("no idea", &ingredients);
        assert_eq!(tier, NormalizeTier::Filler);
        assert_eq!(recipes.len(), 3);
    }
}
