//! Recipe records and client-side filtering.

mod filter;
mod model;

pub use filter::{MatchMode, filter_recipes};
pub use model::{ImageUpload, Recipe, RecipeDraft};
