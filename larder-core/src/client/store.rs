//! Client-side ingredient and recipe state.
//!
//! `RecipeStore` is an explicit container: views hold a clone, mutate through
//! its methods, and redraw when the receiver from [`RecipeStore::subscribe`]
//! reports a change. Nothing is persisted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;

use crate::types::{Ingredient, Recipe};

/// How long an error notification should stay on screen.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// A transient message for the user (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub description: Option<String>,
    pub duration: Duration,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: Some("Check the server logs for more details".to_string()),
            duration: NOTIFICATION_DURATION,
        }
    }
}

/// Everything the views render from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub ingredients: Vec<Ingredient>,
    /// Latest batch: empty, or exactly three after a successful generation.
    pub recipes: Vec<Recipe>,
    /// Recipe open in the detail view, if any.
    pub selected_recipe: Option<Recipe>,
    /// A generation request is in flight.
    pub is_loading: bool,
    pub fridge_open: bool,
    pub notification: Option<Notification>,
}

/// Shared, observable client state. Clones refer to the same state.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    state: Arc<watch::Sender<StoreState>>,
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// A receiver that sees every change made through this store.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Current ingredient names, in insertion order.
    pub fn ingredient_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .ingredients
            .iter()
            .map(|i| i.name.clone())
            .collect()
    }

    /// Add an ingredient under a fresh id. Surrounding whitespace is trimmed;
    /// blank names are ignored and return `None`.
    pub fn add_ingredient(&self, name: &str) -> Option<Ingredient> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let ingredient = Ingredient {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.state
            .send_modify(|s| s.ingredients.push(ingredient.clone()));
        Some(ingredient)
    }

    /// Remove the ingredient with `id`. Returns whether one was removed.
    pub fn remove_ingredient(&self, id: &str) -> bool {
        self.state.send_if_modified(|s| {
            let before = s.ingredients.len();
            s.ingredients.retain(|i| i.id != id);
            s.ingredients.len() != before
        })
    }

    /// Empty the fridge. Also drops the recipe batch and the selection.
    pub fn clear_ingredients(&self) {
        self.state.send_modify(|s| {
            s.ingredients.clear();
            s.recipes.clear();
            s.selected_recipe = None;
        });
    }

    /// Replace the recipe batch, closing any open recipe.
    pub fn set_recipes(&self, recipes: Vec<Recipe>) {
        self.state.send_modify(|s| {
            s.recipes = recipes;
            s.selected_recipe = None;
        });
    }

    pub fn clear_recipes(&self) {
        self.set_recipes(Vec::new());
    }

    /// Open a recipe in the detail view, or close it with `None`.
    pub fn select_recipe(&self, recipe: Option<Recipe>) {
        self.state.send_modify(|s| s.selected_recipe = recipe);
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.is_loading != loading;
            s.is_loading = loading;
            changed
        });
    }

    pub fn toggle_fridge(&self) {
        self.state.send_modify(|s| s.fridge_open = !s.fridge_open);
    }

    pub fn set_fridge_open(&self, open: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.fridge_open != open;
            s.fridge_open = open;
            changed
        });
    }

    pub fn notify(&self, notification: Notification) {
        self.state
            .send_modify(|s| s.notification = Some(notification));
    }

    pub fn dismiss_notification(&self) {
        self.state.send_if_modified(|s| s.notification.take().is_some());
    }

    /// Atomically mark a generation as started: sets the busy flag and clears
    /// the previous batch. Returns the ingredient names to send, or `None`
    /// when there is nothing to send or a generation is already running.
    pub(crate) fn begin_generation(&self) -> Option<Vec<String>> {
        let mut names = None;
        self.state.send_if_modified(|s| {
            if s.is_loading || s.ingredients.is_empty() {
                return false;
            }
            s.is_loading = true;
            s.recipes.clear();
            s.selected_recipe = None;
            names = Some(s.ingredients.iter().map(|i| i.name.clone()).collect());
            true
        });
        names
    }
}
