pub mod recipes;

use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Error body shared by all endpoints. Only a short message; details are logged.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "larder", description = "Recipe suggestions from what is in your fridge"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![recipes::ApiDoc::openapi()];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_generate_endpoint() {
        let spec = openapi();
        assert!(spec.paths.paths.contains_key("/api/generate-recipe"));

        let schemas = &spec.components.unwrap().schemas;
        assert!(schemas.contains_key("ErrorResponse"));
        assert!(schemas.contains_key("Recipe"));
    }
}
