//! The "What can I make?" action.

use super::api::RecipeApi;
use super::store::{Notification, RecipeStore};

/// What a call to [`generate`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// No ingredients, or a request was already in flight.
    Skipped,
    /// The batch was replaced with this many recipes.
    Completed(usize),
    /// The request failed; the message was shown as a notification.
    Failed(String),
}

/// Clears the busy flag when dropped, so a cancelled request can't wedge the store.
struct BusyGuard<'a>(&'a RecipeStore);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set_loading(false);
    }
}

/// Send the store's ingredients to `api` and record the outcome in the store.
///
/// Sets the busy flag and clears the old batch first. On failure the batch
/// stays empty and an error notification is raised. The busy flag is cleared
/// in every case, including when the returned future is dropped mid-request.
pub async fn generate(store: &RecipeStore, api: &dyn RecipeApi) -> Generation {
    let Some(ingredients) = store.begin_generation() else {
        return Generation::Skipped;
    };
    let _busy = BusyGuard(store);

    tracing::debug!(ingredients = ?ingredients, "Requesting recipes");

    match api.generate_recipes(&ingredients).await {
        Ok(recipes) => {
            let count = recipes.len();
            store.set_recipes(recipes);
            Generation::Completed(count)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Recipe generation failed");
            let message = e.to_string();
            store.notify(Notification::error(message.clone()));
            Generation::Failed(message)
        }
    }
}
