use thiserror::Error;

use crate::llm::LlmError;

/// Why a recipe generation request failed.
///
/// Malformed model replies are not here: they are always recovered by
/// normalization.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("No ingredients provided")]
    InvalidInput,

    #[error("Upstream configuration error: {0}")]
    Configuration(String),

    #[error("Upstream quota exhausted: {0}")]
    RateLimited(String),

    #[error("Recipe generation failed: {0}")]
    Failed(String),
}

impl GenerateError {
    /// Classify an upstream failure by the wording of its message.
    ///
    /// Vendors do not expose a stable error taxonomy we can rely on, so this
    /// matches "API key" (credential problems) and "quota" (rate limiting).
    /// Anything else is a generic failure.
    pub fn classify(error: &LlmError) -> Self {
        let message = error.to_string();

        if message.contains("API key") {
            GenerateError::Configuration(message)
        } else if message.contains("quota") {
            GenerateError::RateLimited(message)
        } else {
            GenerateError::Failed(message)
        }
    }

    /// Short text safe to show to the end user. Details stay in server logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerateError::InvalidInput => "No ingredients provided",
            GenerateError::Configuration(_) => {
                "API key is not configured correctly. Please check your GEMINI_API_KEY setting."
            }
            GenerateError::RateLimited(_) => "API quota exceeded. Please try again later.",
            GenerateError::Failed(_) => "Failed to generate recipes. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_api_key() {
        let err = LlmError::ApiError {
            status: 400,
            message: "API key not valid. Please pass a valid API key.".to_string(),
        };
        assert!(matches!(
            GenerateError::classify(&err),
            GenerateError::Configuration(_)
        ));
    }

    #[test]
    fn test_classify_quota() {
        let err = LlmError::RequestFailed("You exceeded your current quota".to_string());
        assert!(matches!(
            GenerateError::classify(&err),
            GenerateError::RateLimited(_)
        ));

        let err = LlmError::QuotaExceeded {
            message: "Resource has been exhausted".to_string(),
        };
        assert!(matches!(
            GenerateError::classify(&err),
            GenerateError::RateLimited(_)
        ));
    }

    #[test]
    fn test_api_key_wins_over_quota() {
        let err = LlmError::RequestFailed("API key has no quota left".to_string());
        assert!(matches!(
            GenerateError::classify(&err),
            GenerateError::Configuration(_)
        ));
    }

    #[test]
    fn test_classify_other() {
        let err = LlmError::RequestFailed("connection reset by peer".to_string());
        let classified = GenerateError::classify(&err);
        assert!(matches!(classified, GenerateError::Failed(_)));
        assert_eq!(
            classified.user_message(),
            "Failed to generate recipes. Please try again."
        );
    }

    #[test]
    fn test_keyword_match_is_case_sensitive() {
        let err = LlmError::RequestFailed("api KEY invalid".to_string());
        assert!(matches!(
            GenerateError::classify(&err),
            GenerateError::Failed(_)
        ));
    }
}
