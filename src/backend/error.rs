use thiserror::Error;

/// Failures reported by the storage and identity collaborators.
#[derive(Debug, Error)]
pub enum BackendError {
	#[error("{collection}/{key} does not exist")]
	NotFound { collection: String, key: String },

	#[error("{0} already exists")]
	AlreadyExists(String),

	#[error("invalid email or password")]
	InvalidCredentials,

	#[error("no user is signed in")]
	NotSignedIn,

	#[error("not permitted: {0}")]
	Forbidden(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("failed to encode or decode a document: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("backend unavailable: {0}")]
	Unavailable(String),
}

impl BackendError {
	pub fn not_found(collection: &str, key: &str) -> Self {
		Self::NotFound {
			collection: collection.to_string(),
			key: key.to_string(),
		}
	}
}
