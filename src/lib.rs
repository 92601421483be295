//! Core of the TastyBite recipe-sharing app.
//!
//! Recipes, profiles and favourites are stored through the seams in
//! [`backend`]; [`repository`] wraps those seams in the handful of operations
//! the app needs. Title search runs client-side over the recipe list, and the
//! incremental search box is driven by a
//! [`SuggestionCoordinator`](tastybite_suggest::SuggestionCoordinator) fed by
//! [`RecipeSuggestionSource`].

pub mod app;
pub mod app_dirs;
pub mod backend;
pub mod cache;
pub mod catalog;
pub mod logging;
pub mod recipes;
pub mod repository;
pub mod suggestions;

pub use app::App;
pub use cache::KeyedCache;
pub use recipes::{MatchMode, Recipe, RecipeDraft, filter_recipes};
pub use suggestions::{DEFAULT_SUGGESTION_LIMIT, RecipeSuggestionSource};

pub use tastybite_suggest::{
	CoordinatorOptions, LookupError, LookupStatus, ResultSet, SequenceToken, Suggestion,
	SuggestionCoordinator, SuggestionSnapshot, SuggestionSource,
};
