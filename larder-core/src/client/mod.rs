//! Client-side state and the generation trigger.
//!
//! State lives in an explicit [`RecipeStore`] handed to whatever renders it.
//! [`generate`] drives one request against a [`RecipeApi`].

mod api;
mod generator;
mod store;

pub use api::{ApiError, HttpRecipeApi, RecipeApi, GENERATE_RECIPE_PATH};
pub use generator::{generate, Generation};
pub use store::{Notification, RecipeStore, StoreState, NOTIFICATION_DURATION};
