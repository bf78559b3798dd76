//! Recipe generation: ingredients in, three recipe candidates out.

use crate::error::GenerateError;
use crate::llm::LlmProvider;
use crate::normalize::normalize_response;
use crate::prompts::{render_generate_recipes_prompt, GENERATE_RECIPES_PROMPT_NAME};
use crate::types::Recipe;

/// Ask the model for recipes using only `ingredients`.
///
/// Names are trimmed and blank entries dropped. An empty list fails with
/// [`GenerateError::InvalidInput`] before any upstream call. On success the
/// result always holds exactly three recipes, however many the model wrote.
pub async fn generate_recipes(
    provider: &dyn LlmProvider,
    ingredients: &[String],
) -> Result<Vec<Recipe>, GenerateError> {
    let ingredients: Vec<String> = ingredients
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if ingredients.is_empty() {
        return Err(GenerateError::InvalidInput);
    }

    tracing::info!(
        ingredients = ?ingredients,
        provider = provider.provider_name(),
        model = provider.model_name(),
        "Generating recipes"
    );

    let prompt = render_generate_recipes_prompt(&ingredients);

    let reply = provider.complete(&prompt).await.map_err(|e| {
        tracing::error!(
            prompt_name = GENERATE_RECIPES_PROMPT_NAME,
            error = %e,
            details = ?e,
            "Upstream model call failed"
        );
        GenerateError::classify(&e)
    })?;

    Ok(normalize_response(&reply, &ingredients))
}
