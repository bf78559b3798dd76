//! Client for the recipe generation endpoint.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::{GenerateRecipesRequest, Recipe};

/// Path of the generation endpoint, relative to the server root.
pub const GENERATE_RECIPE_PATH: &str = "/api/generate-recipe";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a failure status. The message is the server's
    /// `error` text when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response from server")]
    InvalidResponse,
}

/// Anything that can turn ingredient names into recipes for the client.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn generate_recipes(&self, ingredients: &[String]) -> Result<Vec<Recipe>, ApiError>;
}

/// [`RecipeApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRecipeApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRecipeApi {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_RECIPE_PATH)
    }
}

/// Interpret the endpoint's status and body.
fn interpret_response(status: u16, body: &str) -> Result<Vec<Recipe>, ApiError> {
    let parsed = serde_json::from_str::<Value>(body).ok();

    if !(200..300).contains(&status) {
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to generate recipes ({status})"));
        return Err(ApiError::Server { status, message });
    }

    match parsed {
        Some(Value::Object(mut map)) => match map.remove("recipes") {
            Some(recipes @ Value::Array(_)) => {
                serde_json::from_value(recipes).map_err(|_| ApiError::InvalidResponse)
            }
            _ => Err(ApiError::InvalidResponse),
        },
        _ => Err(ApiError::InvalidResponse),
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn generate_recipes(&self, ingredients: &[String]) -> Result<Vec<Recipe>, ApiError> {
        let request = GenerateRecipesRequest {
            ingredients: ingredients.to_vec(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        interpret_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let api = HttpRecipeApi::new("http://localhost:3000/");
        assert_eq!(api.endpoint(), "http://localhost:3000/api/generate-recipe");
    }

    #[test]
    fn test_success() {
        let recipes = interpret_response(
            200,
            r#"{"recipes":[{"id":1,"name":"A","ingredients":[],"instructions":[],"cookingTime":"5","difficulty":"Easy","method":"Raw"}]}"#,
        )
        .unwrap();
        assert_eq!(recipes[0].name, "A");
    }

    #[test]
    fn test_server_error_message_passed_through() {
        let err = interpret_response(429, r#"{"error":"API quota exceeded. Please try again later."}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 429, .. }));
        assert_eq!(err.to_string(), "API quota exceeded. Please try again later.");
    }

    #[test]
    fn test_server_error_without_body() {
        let err = interpret_response(502, "Bad Gateway").unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate recipes (502)");
    }

    #[test]
    fn test_missing_recipes_is_invalid() {
        assert!(matches!(
            interpret_response(200, r#"{"result":[]}"#),
            Err(ApiError::InvalidResponse)
        ));
        assert!(matches!(
            interpret_response(200, "not json"),
            Err(ApiError::InvalidResponse)
        ));
    }
}
