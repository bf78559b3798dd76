//! Fake provider for tests and offline development.
//!
//! Replies are picked by prompt substring, so tests run without network
//! access or API costs.

use super::{LlmError, LlmProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Reply used by `FakeProvider::default()`: three well-formed recipes.
const SAMPLE_REPLY: &str = r#"```json
{
  "recipes": [
    {
      "id": 1,
      "name": "Fridge Frittata",
      "ingredients": ["eggs", "cheese"],
      "instructions": ["Whisk the eggs", "Pour into a hot pan", "Add cheese and fold"],
      "cookingTime": "10-15 minutes",
      "difficulty": "Easy",
      "method": "Stovetop",
      "suggestions": "A handful of herbs works well"
    },
    {
      "id": 2,
      "name": "Quick Garden Salad",
      "ingredients": ["lettuce", "tomato"],
      "instructions": ["Wash the greens", "Slice the tomato", "Toss together"],
      "cookingTime": "5-10 minutes",
      "difficulty": "Easy",
      "method": "Raw"
    },
    {
      "id": 3,
      "name": "Cheesy Baked Toast",
      "ingredients": ["bread", "cheese"],
      "instructions": ["Heat the oven", "Top bread with cheese", "Bake until bubbling"],
      "cookingTime": "15-20 minutes",
      "difficulty": "Medium",
      "method": "Oven"
    }
  ]
}
```"#;

/// A fake provider for testing.
///
/// Replies are matched by checking whether the prompt contains a registered
/// substring (case-insensitive). Every call is counted, including failing ones.
#[derive(Debug)]
pub struct FakeProvider {
    /// Prompt substring -> reply, checked in insertion order.
    responses: RwLock<Vec<(String, String)>>,
    /// Reply if nothing matches.
    default_response: Option<String>,
    /// When set, every call fails with this message.
    error: Option<String>,
    calls: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            responses: RwLock::new(Vec::new()),
            default_response: Some(SAMPLE_REPLY.to_string()),
            error: None,
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    /// Create a provider with no registered replies and no default.
    pub fn new() -> Self {
        Self {
            default_response: None,
            ..Self::default()
        }
    }

    /// Create a provider that replies with `response` for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    /// Create a provider whose every call fails with the given upstream message.
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Register a reply for prompts containing a substring.
    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        self.responses
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((prompt_contains.to_lowercase(), response.to_string()));
    }

    /// Set the reply used when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Number of times `complete` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.error {
            return Err(LlmError::RequestFailed(message.clone()));
        }

        let prompt_lower = prompt.to_lowercase();
        let responses = self.responses.read().unwrap_or_else(|e| e.into_inner());
        if let Some((_, response)) = responses
            .iter()
            .find(|(pattern, _)| prompt_lower.contains(pattern.as_str()))
        {
            return Ok(response.clone());
        }

        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: no response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
