use crate::api::ErrorResponse;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use larder_core::{generate_recipes, GenerateError, GenerateRecipesRequest, GenerateRecipesResponse};

fn status_for(error: &GenerateError) -> StatusCode {
    match error {
        GenerateError::InvalidInput => StatusCode::BAD_REQUEST,
        GenerateError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        GenerateError::Configuration(_) | GenerateError::Failed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Suggest three recipes from a list of ingredients
///
/// Asks the upstream model for recipes that use only the given ingredients.
/// A successful response always holds exactly three recipes: replies that
/// cannot be parsed are recovered heuristically and padded with generic ones.
#[utoipa::path(
    post,
    path = "/api/generate-recipe",
    tag = "recipes",
    request_body = GenerateRecipesRequest,
    responses(
        (status = 200, description = "Three recipe candidates", body = GenerateRecipesResponse),
        (status = 400, description = "No ingredients provided", body = ErrorResponse),
        (status = 429, description = "Upstream quota exhausted", body = ErrorResponse),
        (status = 500, description = "Upstream misconfigured or generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_recipe(
    State(provider): State<AppState>,
    payload: Result<Json<GenerateRecipesRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected generate-recipe body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                ))),
            )
                .into_response();
        }
    };

    tracing::Span::current().record("ingredients", request.ingredients.len());

    match generate_recipes(provider.as_ref(), &request.ingredients).await {
        Ok(recipes) => (StatusCode::OK, Json(GenerateRecipesResponse { recipes })).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                tracing::error!(status = %status.as_u16(), error = %e, "Recipe generation failed");
            }
            (status, Json(ErrorResponse::new(e.user_message()))).into_response()
        }
    }
}
