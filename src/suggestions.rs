//! Recipe titles as a [`SuggestionSource`].

use tastybite_suggest::{LookupError, Suggestion, SuggestionSource};
use tracing::debug;

use crate::recipes::MatchMode;
use crate::repository::RecipeRepository;

/// Suggestions returned per lookup unless configured otherwise.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Looks partial queries up against the recipe catalog.
#[derive(Clone)]
pub struct RecipeSuggestionSource {
	recipes: RecipeRepository,
	mode: MatchMode,
	limit: usize,
}

impl RecipeSuggestionSource {
	#[must_use]
	pub fn new(recipes: RecipeRepository) -> Self {
		Self {
			recipes,
			mode: MatchMode::default(),
			limit: DEFAULT_SUGGESTION_LIMIT,
		}
	}

	#[must_use]
	pub fn with_mode(mut self, mode: MatchMode) -> Self {
		self.mode = mode;
		self
	}

	#[must_use]
	pub fn with_limit(mut self, limit: usize) -> Self {
		self.limit = limit;
		self
	}
}

impl SuggestionSource for RecipeSuggestionSource {
	fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
		let recipes = self
			.recipes
			.search(query, self.mode)
			.map_err(LookupError::backend)?;

		let suggestions = recipes
			.into_iter()
			.take(self.limit)
			.map(|recipe| {
				// A missing image should not cost the user the suggestion.
				let image = self.recipes.image_url(&recipe).unwrap_or_else(|err| {
					debug!(recipe_id = %recipe.id, error = %err, "image url unavailable");
					None
				});
				let suggestion = Suggestion::new(recipe.id, recipe.title);
				match image {
					Some(url) => suggestion.with_image_ref(url),
					None => suggestion,
				}
			})
			.collect();
		Ok(suggestions)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::backend::MemoryBackend;
	use crate::cache::KeyedCache;
	use crate::recipes::{ImageUpload, Recipe, RecipeDraft};
	use crate::repository::{AuthRepository, BackendHandles};

	fn repository(backend: Arc<MemoryBackend>) -> RecipeRepository {
		RecipeRepository::new(BackendHandles::memory(backend), Arc::new(KeyedCache::new()))
	}

	fn titled(id: &str, title: &str) -> Recipe {
		Recipe {
			id: id.to_string(),
			title: title.to_string(),
			description: String::new(),
			ingredients: Vec::new(),
			steps: Vec::new(),
			category: None,
			image_ref: None,
			author_id: None,
			created_at: 0,
		}
	}

	#[test]
	fn lookups_are_truncated_to_the_limit() {
		let backend = Arc::new(MemoryBackend::new());
		let recipes = repository(backend);
		recipes
			.import(&[titled("1", "Pasta"), titled("2", "Pastry"), titled("3", "Pastel de nata")])
			.expect("import");

		let source = RecipeSuggestionSource::new(recipes).with_limit(2);
		assert_eq!(source.lookup("past").expect("lookup").len(), 2);
	}

	#[test]
	fn suggestions_carry_image_urls() {
		let backend = Arc::new(MemoryBackend::new());
		let recipes = repository(backend.clone());
		AuthRepository::new(BackendHandles::memory(backend))
			.register("cook@example.com", "pw", None)
			.expect("register");
		let published = recipes
			.create(
				RecipeDraft::new("Churros"),
				Some(ImageUpload {
					file_name: "churros.png".to_string(),
					content_type: "image/png".to_string(),
					bytes: vec![1, 2],
				}),
			)
			.expect("publish");

		let suggestions = RecipeSuggestionSource::new(recipes)
			.lookup("chu")
			.expect("lookup");
		assert_eq!(suggestions.len(), 1);
		assert_eq!(suggestions[0].id, published.id);
		assert_eq!(suggestions[0].display_name, "Churros");
		assert!(
			suggestions[0]
				.image_ref
				.as_deref()
				.is_some_and(|url| url.ends_with("churros.png?size=2"))
		);
	}

	#[test]
	fn backend_outages_become_lookup_errors() {
		let backend = Arc::new(MemoryBackend::new());
		backend.fail_next(1);
		let source = RecipeSuggestionSource::new(repository(backend));
		assert!(matches!(source.lookup("soup"), Err(LookupError::Backend(_))));
	}
}
