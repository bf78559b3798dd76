pub mod generate;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use larder_core::{GenerateRecipesRequest, GenerateRecipesResponse, Recipe};
use utoipa::OpenApi;

/// Returns the router for recipe endpoints (mounted at /api)
pub fn router() -> Router<AppState> {
    Router::new().route("/generate-recipe", post(generate::generate_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(generate::generate_recipe),
    components(schemas(GenerateRecipesRequest, GenerateRecipesResponse, Recipe))
)]
pub struct ApiDoc;
