//! Seams to the managed backend: documents, blobs and identities.
//!
//! The application only ever talks to these traits. [`MemoryBackend`]
//! implements all three in-process for the CLI and for tests.

mod error;
mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::BackendError;
pub use memory::MemoryBackend;

pub type BackendResult<T> = Result<T, BackendError>;

/// Reference to an uploaded blob, as returned by [`BlobStore::upload`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(String);

impl BlobRef {
	pub fn new(path: impl Into<String>) -> Self {
		Self(path.into())
	}

	#[must_use]
	pub fn path(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for BlobRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Signed-in account as seen by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	pub user_id: String,
	pub email: String,
}

/// Keyed JSON documents grouped into collections.
pub trait DocumentStore: Send + Sync {
	/// Fetch a document. Returns `None` if it does not exist.
	fn get(&self, collection: &str, key: &str) -> BackendResult<Option<Value>>;

	/// Create or replace a document. Documents must be JSON objects.
	fn set(&self, collection: &str, key: &str, document: Value) -> BackendResult<()>;

	/// Overwrite a single top-level field of an existing document.
	fn update_field(
		&self,
		collection: &str,
		key: &str,
		field: &str,
		value: Value,
	) -> BackendResult<()>;

	/// Delete a document. Returns true if it existed.
	fn delete(&self, collection: &str, key: &str) -> BackendResult<bool>;

	/// Every document in a collection, keyed, in key order.
	fn list(&self, collection: &str) -> BackendResult<Vec<(String, Value)>>;
}

/// Binary objects addressed by path.
pub trait BlobStore: Send + Sync {
	fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> BackendResult<BlobRef>;

	/// Resolve a downloadable URL for an uploaded blob.
	fn url(&self, blob: &BlobRef) -> BackendResult<String>;

	/// Remove a blob. Returns true if it existed.
	fn remove(&self, blob: &BlobRef) -> BackendResult<bool>;
}

/// Account registration and the current session.
pub trait IdentityProvider: Send + Sync {
	fn register(&self, email: &str, password: &str) -> BackendResult<Identity>;

	fn sign_in(&self, email: &str, password: &str) -> BackendResult<Identity>;

	fn sign_out(&self);

	fn current_identity(&self) -> Option<Identity>;
}
