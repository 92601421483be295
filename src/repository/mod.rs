//! Thin repositories over the backend seams.
//!
//! Each repository is cheap to clone and shares its backend handles and
//! caches with its clones.

mod auth;
mod profiles;
mod recipes;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{BlobStore, DocumentStore, IdentityProvider, MemoryBackend};

pub use auth::AuthRepository;
pub use profiles::ProfileRepository;
pub use recipes::RecipeRepository;

pub(crate) const RECIPES: &str = "recipes";
pub(crate) const PROFILES: &str = "profiles";

/// The three backend seams a repository may need.
#[derive(Clone)]
pub struct BackendHandles {
	pub documents: Arc<dyn DocumentStore>,
	pub blobs: Arc<dyn BlobStore>,
	pub identity: Arc<dyn IdentityProvider>,
}

impl BackendHandles {
	/// Route every seam to one in-memory backend.
	#[must_use]
	pub fn memory(backend: Arc<MemoryBackend>) -> Self {
		Self {
			documents: backend.clone(),
			blobs: backend.clone(),
			identity: backend,
		}
	}
}

/// Per-user document in the `profiles` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	pub display_name: String,
	pub email: String,
	#[serde(default)]
	pub favorites: Vec<String>,
}
