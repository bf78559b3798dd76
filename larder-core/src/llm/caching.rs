//! Disk cache in front of a provider.
//!
//! Useful while iterating on the prompt or the UI: the same ingredient list
//! sent to the same model returns the stored reply instead of spending quota.
//! Errors are never cached.

use super::{LlmError, LlmProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// Where and when a reply was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub provider: String,
    pub model: String,
    pub prompt_hash: String,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedReply {
    metadata: CacheMetadata,
    reply: String,
}

/// Cache statistics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub cached_replies: usize,
}

/// Wraps any provider, storing replies under
/// `{cache_dir}/{provider}/{model}/{prompt_hash}.json`.
#[derive(Debug)]
pub struct CachingProvider {
    inner: Box<dyn LlmProvider>,
    cache_dir: PathBuf,
}

impl CachingProvider {
    pub fn new(inner: Box<dyn LlmProvider>, cache_dir: PathBuf) -> Self {
        Self { inner, cache_dir }
    }

    /// First 16 bytes of the prompt's SHA-256, hex encoded.
    fn prompt_hash(prompt: &str) -> String {
        let digest = Sha256::digest(prompt.as_bytes());
        hex::encode(&digest[..16])
    }

    fn model_dir(&self) -> PathBuf {
        self.cache_dir
            .join(self.inner.provider_name())
            .join(self.inner.model_name().replace(['/', ':'], "_"))
    }

    fn entry_path(&self, prompt_hash: &str) -> PathBuf {
        self.model_dir().join(format!("{prompt_hash}.json"))
    }

    fn load(&self, prompt_hash: &str) -> Option<String> {
        let content = fs::read_to_string(self.entry_path(prompt_hash)).ok()?;
        let cached: CachedReply = serde_json::from_str(&content).ok()?;
        Some(cached.reply)
    }

    fn store(&self, prompt_hash: &str, reply: &str) -> Result<(), LlmError> {
        fs::create_dir_all(self.model_dir()).map_err(|e| LlmError::CacheError(e.to_string()))?;

        let cached = CachedReply {
            metadata: CacheMetadata {
                provider: self.inner.provider_name().to_string(),
                model: self.inner.model_name().to_string(),
                prompt_hash: prompt_hash.to_string(),
                cached_at: Utc::now(),
            },
            reply: reply.to_string(),
        };
        let json = serde_json::to_string_pretty(&cached)
            .map_err(|e| LlmError::CacheError(e.to_string()))?;

        fs::write(self.entry_path(prompt_hash), json)
            .map_err(|e| LlmError::CacheError(e.to_string()))
    }

    /// Count the replies stored for the wrapped provider and model.
    pub fn cache_stats(&self) -> CacheStats {
        let cached_replies = fs::read_dir(self.model_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                    .count()
            })
            .unwrap_or(0);

        CacheStats { cached_replies }
    }
}

#[async_trait]
impl LlmProvider for CachingProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let prompt_hash = Self::prompt_hash(prompt);

        if let Some(reply) = self.load(&prompt_hash) {
            tracing::debug!(
                provider = self.inner.provider_name(),
                model = self.inner.model_name(),
                prompt_hash = %prompt_hash,
                "LLM cache hit"
            );
            return Ok(reply);
        }

        let reply = self.inner.complete(prompt).await?;

        if let Err(e) = self.store(&prompt_hash, &reply) {
            tracing::warn!(error = %e, "Failed to cache LLM reply");
        }

        Ok(reply)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeProvider;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_second_call_served_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let provider = CachingProvider::new(
            Box::new(FakeProvider::with_response("eggs", "omelette")),
            temp_dir.path().to_path_buf(),
        );

        assert_eq!(provider.complete("eggs, milk").await.unwrap(), "omelette");
        assert_eq!(provider.complete("eggs, milk").await.unwrap(), "omelette");
        assert_eq!(provider.cache_stats().cached_replies, 1);

        let path = temp_dir
            .path()
            .join("fake")
            .join("fake-model")
            .join(format!("{}.json", CachingProvider::prompt_hash("eggs, milk")));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let provider = CachingProvider::new(
            Box::new(FakeProvider::failing("API key not valid")),
            temp_dir.path().to_path_buf(),
        );

        assert!(provider.complete("eggs").await.is_err());
        assert_eq!(provider.cache_stats().cached_replies, 0);
    }

    #[tokio::test]
    async fn test_distinct_prompts_distinct_entries() {
        let temp_dir = TempDir::new().unwrap();
        let fake = FakeProvider::new().with_default_response("{}");
        let provider = CachingProvider::new(Box::new(fake), temp_dir.path().to_path_buf());

        provider.complete("eggs").await.unwrap();
        provider.complete("rice").await.unwrap();
        assert_eq!(provider.cache_stats().cached_replies, 2);
    }
}
