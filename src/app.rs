//! Wiring of repositories, caches and the suggestion pipeline.

use std::io;
use std::sync::Arc;

use tastybite_suggest::{CoordinatorOptions, SuggestionCoordinator};

use crate::backend::MemoryBackend;
use crate::cache::KeyedCache;
use crate::recipes::MatchMode;
use crate::repository::{AuthRepository, BackendHandles, ProfileRepository, RecipeRepository};
use crate::suggestions::RecipeSuggestionSource;

/// Owns the caches and hands out repositories sharing them.
///
/// The caches live exactly as long as the `App`.
pub struct App {
	display_names: Arc<KeyedCache<String, String>>,
	image_urls: Arc<KeyedCache<String, String>>,
	auth: AuthRepository,
	profiles: ProfileRepository,
	recipes: RecipeRepository,
}

impl App {
	#[must_use]
	pub fn new(backend: BackendHandles) -> Self {
		let display_names = Arc::new(KeyedCache::new());
		let image_urls = Arc::new(KeyedCache::new());
		Self {
			auth: AuthRepository::new(backend.clone()),
			profiles: ProfileRepository::new(backend.clone(), Arc::clone(&display_names)),
			recipes: RecipeRepository::new(backend, Arc::clone(&image_urls)),
			display_names,
			image_urls,
		}
	}

	/// An app backed by a fresh [`MemoryBackend`].
	#[must_use]
	pub fn in_memory() -> Self {
		Self::new(BackendHandles::memory(Arc::new(MemoryBackend::new())))
	}

	#[must_use]
	pub fn auth(&self) -> &AuthRepository {
		&self.auth
	}

	#[must_use]
	pub fn profiles(&self) -> &ProfileRepository {
		&self.profiles
	}

	#[must_use]
	pub fn recipes(&self) -> &RecipeRepository {
		&self.recipes
	}

	/// Start a suggestion coordinator looking recipes up by title.
	pub fn suggestions(
		&self,
		options: CoordinatorOptions,
		mode: MatchMode,
		limit: usize,
	) -> io::Result<SuggestionCoordinator> {
		let source = RecipeSuggestionSource::new(self.recipes.clone())
			.with_mode(mode)
			.with_limit(limit);
		SuggestionCoordinator::new(source, options)
	}

	/// Forget every cached display name and image URL.
	pub fn clear_caches(&self) {
		self.display_names.clear();
		self.image_urls.clear();
	}
}
