//! Upstream text-generation provider abstraction.
//!
//! Recipes are generated by a hosted model (Gemini by default). The provider
//! trait lets the server swap in the fake provider for local runs and tests,
//! and optionally wrap the real one in a disk cache.

mod caching;
mod config;
mod fake;
mod gemini;

pub use caching::{CacheStats, CachingProvider};
pub use config::{ConfigError, LlmConfig, ProviderKind};
pub use fake::FakeProvider;
pub use gemini::GeminiProvider;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error type for upstream model calls.
///
/// Messages carry the vendor's wording where there is one, since callers
/// classify failures by keyword.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("API quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

/// Trait for text-generation providers.
///
/// Implementations are shared across request handlers, so they must be
/// thread-safe. A call is a single attempt: no retries, no timeout.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a prompt to the model and get its raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider name (e.g. "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    /// Model name (e.g. "gemini-1.5-flash").
    fn model_name(&self) -> &str;
}

/// Build the provider described by `config`, wrapped in the disk cache when
/// a cache directory is configured.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let inner: Box<dyn LlmProvider> = match config.provider {
        ProviderKind::Fake => Box::new(FakeProvider::default()),
        ProviderKind::Gemini => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                LlmError::NotConfigured("API key missing, set GEMINI_API_KEY".to_string())
            })?;
            Box::new(GeminiProvider::new(
                api_key,
                config.model.clone(),
                config.base_url.clone(),
                config.max_tokens,
            ))
        }
    };

    match &config.cache_dir {
        Some(dir) => Ok(Arc::new(CachingProvider::new(inner, dir.clone()))),
        None => Ok(Arc::from(inner)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: ProviderKind, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: api_key.map(str::to_string),
            model: "gemini-1.5-flash".to_string(),
            base_url: "http://localhost:9".to_string(),
            max_tokens: 256,
            cache_dir: None,
        }
    }

    #[test]
    fn test_create_gemini_provider() {
        let provider = create_provider(&config(ProviderKind::Gemini, Some("abcd1234"))).unwrap();
        assert_eq!(provider.provider_name(), "gemini");
        assert_eq!(provider.model_name(), "gemini-1.5-flash");
    }

    #[test]
    fn test_gemini_without_key_mentions_api_key() {
        let err = create_provider(&config(ProviderKind::Gemini, None)).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_create_cached_fake_provider() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = config(ProviderKind::Fake, None);
        config.cache_dir = Some(temp_dir.path().to_path_buf());

        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.provider_name(), "fake");
    }

    #[test]
    fn test_quota_error_mentions_quota() {
        let err = LlmError::QuotaExceeded {
            message: "Resource has been exhausted".to_string(),
        };
        assert!(err.to_string().contains("quota"));
    }
}
