//! Upstream model configuration from environment variables.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

/// Which provider backs recipe generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    /// Canned replies, no network. For local development.
    Fake,
}

/// Upstream model configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Required for Gemini.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    /// When set, replies are cached on disk under this directory.
    pub cache_dir: Option<PathBuf>,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GEMINI_API_KEY`: API key (unless the provider is `fake`)
    ///
    /// Optional:
    /// - `LARDER_LLM_PROVIDER`: `gemini` or `fake` (default: `gemini`)
    /// - `LARDER_LLM_MODEL`: Model name (default: "gemini-1.5-flash")
    /// - `LARDER_LLM_BASE_URL`: API base URL
    /// - `LARDER_LLM_MAX_TOKENS`: Output token cap (default: 2048)
    /// - `LARDER_LLM_CACHE_DIR`: Enables the disk cache
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("LARDER_LLM_PROVIDER").as_deref() {
            None | Some("gemini") => ProviderKind::Gemini,
            Some("fake") => ProviderKind::Fake,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LARDER_LLM_PROVIDER".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        if provider == ProviderKind::Gemini && api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()));
        }

        let model = lookup("LARDER_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup("LARDER_LLM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let max_tokens = match lookup("LARDER_LLM_MAX_TOKENS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "LARDER_LLM_MAX_TOKENS".to_string(),
                value,
            })?,
            None => DEFAULT_MAX_TOKENS,
        };

        let cache_dir = lookup("LARDER_LLM_CACHE_DIR").map(PathBuf::from);

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            max_tokens,
            cache_dir,
        })
    }

    /// First four characters of the API key, for startup diagnostics.
    pub fn redacted_key(&self) -> Option<String> {
        self.api_key
            .as_ref()
            .map(|key| format!("{}...", key.chars().take(4).collect::<String>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LlmConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "AIzaSecret")])).unwrap();
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let err = LlmConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "GEMINI_API_KEY"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let err = LlmConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_fake_provider_needs_no_key() {
        let config = LlmConfig::from_lookup(lookup(&[("LARDER_LLM_PROVIDER", "fake")])).unwrap();
        assert_eq!(config.provider, ProviderKind::Fake);
        assert!(config.redacted_key().is_none());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = LlmConfig::from_lookup(lookup(&[("LARDER_LLM_PROVIDER", "openai")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_bad_max_tokens_rejected() {
        let err = LlmConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "AIzaSecret"),
            ("LARDER_LLM_MAX_TOKENS", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LARDER_LLM_MAX_TOKENS"));
    }

    #[test]
    fn test_redacted_key() {
        let config = LlmConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "AIzaSecret"),
            ("LARDER_LLM_BASE_URL", "http://localhost:8080/"),
        ]))
        .unwrap();
        assert_eq!(config.redacted_key().as_deref(), Some("AIza..."));
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
