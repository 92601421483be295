use tracing::info;

use super::{BackendHandles, PROFILES, Profile};
use crate::backend::{BackendError, BackendResult, Identity};

/// Registration and session handling.
#[derive(Clone)]
pub struct AuthRepository {
	backend: BackendHandles,
}

impl AuthRepository {
	#[must_use]
	pub fn new(backend: BackendHandles) -> Self {
		Self { backend }
	}

	/// Create an account, sign it in, and write its profile document.
	///
	/// Without an explicit display name the local part of the email is used.
	pub fn register(
		&self,
		email: &str,
		password: &str,
		display_name: Option<&str>,
	) -> BackendResult<Identity> {
		let identity = self.backend.identity.register(email, password)?;
		let display_name = display_name
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.map_or_else(|| name_from_email(&identity.email), str::to_string);

		let profile = Profile {
			display_name,
			email: identity.email.clone(),
			favorites: Vec::new(),
		};
		self.backend
			.documents
			.set(PROFILES, &identity.user_id, serde_json::to_value(&profile)?)?;
		info!(user_id = %identity.user_id, "created profile");
		Ok(identity)
	}

	pub fn sign_in(&self, email: &str, password: &str) -> BackendResult<Identity> {
		self.backend.identity.sign_in(email, password)
	}

	pub fn sign_out(&self) {
		self.backend.identity.sign_out();
	}

	#[must_use]
	pub fn current_identity(&self) -> Option<Identity> {
		self.backend.identity.current_identity()
	}

	/// The signed-in identity, or [`BackendError::NotSignedIn`].
	pub fn require_identity(&self) -> BackendResult<Identity> {
		self.current_identity().ok_or(BackendError::NotSignedIn)
	}
}

fn name_from_email(email: &str) -> String {
	let local = email
		.split('@')
		.next()
		.filter(|value| !value.trim().is_empty())
		.unwrap_or("cook");
	local.to_owned()
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::backend::MemoryBackend;

	fn repository() -> (AuthRepository, BackendHandles) {
		let handles = BackendHandles::memory(Arc::new(MemoryBackend::new()));
		(AuthRepository::new(handles.clone()), handles)
	}

	#[test]
	fn registration_writes_a_profile() {
		let (auth, handles) = repository();
		let identity = auth
			.register("julia@example.com", "butter", None)
			.expect("register");

		let profile = handles
			.documents
			.get(PROFILES, &identity.user_id)
			.expect("get profile")
			.expect("profile exists");
		assert_eq!(profile["display_name"], "julia");
		assert_eq!(profile["favorites"], serde_json::json!([]));
		assert_eq!(auth.current_identity(), Some(identity));
	}

	#[test]
	fn explicit_display_name_wins() {
		let (auth, handles) = repository();
		let identity = auth
			.register("m@example.com", "pw", Some("  Marcella "))
			.expect("register");
		let profile = handles
			.documents
			.get(PROFILES, &identity.user_id)
			.expect("get profile")
			.expect("profile exists");
		assert_eq!(profile["display_name"], "Marcella");
	}

	#[test]
	fn require_identity_after_sign_out() {
		let (auth, _) = repository();
		auth.register("a@b.c", "pw", None).expect("register");
		auth.sign_out();
		assert!(matches!(auth.require_identity(), Err(BackendError::NotSignedIn)));
		auth.sign_in("a@b.c", "pw").expect("sign in");
		assert!(auth.require_identity().is_ok());
	}
}
