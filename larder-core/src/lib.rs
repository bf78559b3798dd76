pub mod client;
pub mod error;
pub mod generate;
pub mod llm;
pub mod normalize;
pub mod prompts;
pub mod types;

pub use error::GenerateError;
pub use generate::generate_recipes;
pub use llm::{create_provider, LlmConfig, LlmError, LlmProvider};
pub use normalize::{normalize_response, normalize_response_with_tier, NormalizeTier};
pub use types::{
    GenerateRecipesRequest, GenerateRecipesResponse, Ingredient, Recipe, RECIPES_PER_BATCH,
};
