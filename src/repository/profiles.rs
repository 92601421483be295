use std::sync::Arc;

use serde_json::Value;

use super::{BackendHandles, PROFILES, Profile};
use crate::backend::{BackendError, BackendResult};
use crate::cache::KeyedCache;

/// Read and edit profile documents.
///
/// Display names are looked up constantly when rendering recipe cards, so
/// they go through a [`KeyedCache`] keyed by user id.
#[derive(Clone)]
pub struct ProfileRepository {
	backend: BackendHandles,
	names: Arc<KeyedCache<String, String>>,
}

impl ProfileRepository {
	#[must_use]
	pub fn new(backend: BackendHandles, names: Arc<KeyedCache<String, String>>) -> Self {
		Self { backend, names }
	}

	pub fn profile(&self, user_id: &str) -> BackendResult<Profile> {
		let document = self
			.backend
			.documents
			.get(PROFILES, user_id)?
			.ok_or_else(|| BackendError::not_found(PROFILES, user_id))?;
		Ok(serde_json::from_value(document)?)
	}

	pub fn display_name(&self, user_id: &str) -> BackendResult<String> {
		self.names
			.get_or_try_insert_with(user_id.to_string(), || {
				self.profile(user_id).map(|profile| profile.display_name)
			})
	}

	/// Write a new display name and drop the cached one.
	pub fn set_display_name(&self, user_id: &str, display_name: &str) -> BackendResult<()> {
		let display_name = display_name.trim();
		if display_name.is_empty() {
			return Err(BackendError::InvalidInput("display name must not be empty".to_string()));
		}
		self.backend.documents.update_field(
			PROFILES,
			user_id,
			"display_name",
			Value::String(display_name.to_string()),
		)?;
		self.names.invalidate(&user_id.to_string());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::backend::{DocumentStore, MemoryBackend};
	use crate::repository::AuthRepository;

	#[test]
	fn display_names_are_cached_until_renamed() {
		let backend = Arc::new(MemoryBackend::new());
		let handles = BackendHandles::memory(backend.clone());
		let names = Arc::new(KeyedCache::new());
		let profiles = ProfileRepository::new(handles.clone(), names.clone());
		let identity = AuthRepository::new(handles)
			.register("ottolenghi@example.com", "sumac", Some("Yotam"))
			.expect("register");

		assert_eq!(profiles.display_name(&identity.user_id).expect("name"), "Yotam");
		assert_eq!(names.len(), 1);

		// Served from the cache even while the backend is down.
		backend.fail_next(1);
		assert_eq!(profiles.display_name(&identity.user_id).expect("cached"), "Yotam");
		assert!(backend.list("profiles").is_err(), "the simulated failure is still pending");

		profiles
			.set_display_name(&identity.user_id, "Chef Yotam")
			.expect("rename");
		assert!(names.is_empty());
		assert_eq!(profiles.display_name(&identity.user_id).expect("name"), "Chef Yotam");
	}

	#[test]
	fn unknown_users_are_not_found() {
		let handles = BackendHandles::memory(Arc::new(MemoryBackend::new()));
		let profiles = ProfileRepository::new(handles, Arc::new(KeyedCache::new()));
		assert!(matches!(
			profiles.display_name("nobody"),
			Err(BackendError::NotFound { .. })
		));
	}

	#[test]
	fn blank_display_names_are_rejected() {
		let handles = BackendHandles::memory(Arc::new(MemoryBackend::new()));
		let profiles = ProfileRepository::new(handles, Arc::new(KeyedCache::new()));
		assert!(matches!(
			profiles.set_display_name("u1", "   "),
			Err(BackendError::InvalidInput(_))
		));
	}
}
