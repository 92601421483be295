use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::Duration;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
	BackendError, BackendResult, BlobRef, BlobStore, DocumentStore, Identity, IdentityProvider,
};

const DEFAULT_BASE_URL: &str = "memory://tastybite";

struct StoredBlob {
	bytes: Vec<u8>,
	content_type: String,
}

struct Account {
	identity: Identity,
	salt: String,
	digest: String,
}

/// In-process stand-in for the managed backend.
///
/// Document reads and writes can be slowed down with [`with_latency`] and
/// made to fail with [`fail_next`], which is how the suggestion pipeline is
/// exercised against a misbehaving remote.
///
/// [`with_latency`]: MemoryBackend::with_latency
/// [`fail_next`]: MemoryBackend::fail_next
pub struct MemoryBackend {
	documents: RwLock<HashMap<String, BTreeMap<String, Value>>>,
	blobs: RwLock<HashMap<String, StoredBlob>>,
	accounts: RwLock<HashMap<String, Account>>,
	session: RwLock<Option<Identity>>,
	latency: Duration,
	pending_failures: AtomicUsize,
	base_url: String,
}

impl Default for MemoryBackend {
	fn default() -> Self {
		Self {
			documents: RwLock::default(),
			blobs: RwLock::default(),
			accounts: RwLock::default(),
			session: RwLock::default(),
			latency: Duration::ZERO,
			pending_failures: AtomicUsize::new(0),
			base_url: DEFAULT_BASE_URL.to_string(),
		}
	}
}

impl MemoryBackend {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Delay every document operation by `latency`.
	#[must_use]
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = latency;
		self
	}

	/// Prefix used when resolving blob URLs.
	#[must_use]
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	/// Make the next `count` document operations fail with
	/// [`BackendError::Unavailable`].
	pub fn fail_next(&self, count: usize) {
		self.pending_failures.fetch_add(count, Ordering::SeqCst);
	}

	/// Number of stored blobs.
	#[must_use]
	pub fn blob_count(&self) -> usize {
		read(&self.blobs).len()
	}

	/// Content type recorded for an uploaded blob.
	#[must_use]
	pub fn blob_content_type(&self, blob: &BlobRef) -> Option<String> {
		read(&self.blobs)
			.get(blob.path())
			.map(|stored| stored.content_type.clone())
	}

	fn simulate_remote(&self) -> BackendResult<()> {
		if !self.latency.is_zero() {
			thread::sleep(self.latency);
		}
		let consumed = self
			.pending_failures
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
		if consumed.is_ok() {
			return Err(BackendError::Unavailable("simulated outage".to_string()));
		}
		Ok(())
	}
}

impl DocumentStore for MemoryBackend {
	fn get(&self, collection: &str, key: &str) -> BackendResult<Option<Value>> {
		self.simulate_remote()?;
		Ok(read(&self.documents)
			.get(collection)
			.and_then(|documents| documents.get(key))
			.cloned())
	}

	fn set(&self, collection: &str, key: &str, document: Value) -> BackendResult<()> {
		self.simulate_remote()?;
		if !document.is_object() {
			return Err(BackendError::InvalidInput(format!(
				"document {collection}/{key} must be a JSON object"
			)));
		}
		write(&self.documents)
			.entry(collection.to_string())
			.or_default()
			.insert(key.to_string(), document);
		Ok(())
	}

	fn update_field(
		&self,
		collection: &str,
		key: &str,
		field: &str,
		value: Value,
	) -> BackendResult<()> {
		self.simulate_remote()?;
		let mut documents = write(&self.documents);
		let fields = documents
			.get_mut(collection)
			.and_then(|documents| documents.get_mut(key))
			.and_then(Value::as_object_mut)
			.ok_or_else(|| BackendError::not_found(collection, key))?;
		fields.insert(field.to_string(), value);
		Ok(())
	}

	fn delete(&self, collection: &str, key: &str) -> BackendResult<bool> {
		self.simulate_remote()?;
		Ok(write(&self.documents)
			.get_mut(collection)
			.and_then(|documents| documents.remove(key))
			.is_some())
	}

	fn list(&self, collection: &str) -> BackendResult<Vec<(String, Value)>> {
		self.simulate_remote()?;
		Ok(read(&self.documents)
			.get(collection)
			.map(|documents| {
				documents
					.iter()
					.map(|(key, document)| (key.clone(), document.clone()))
					.collect()
			})
			.unwrap_or_default())
	}
}

impl BlobStore for MemoryBackend {
	fn upload(&self, path: &str, bytes: &[u8], content_type: &str) -> BackendResult<BlobRef> {
		let path = path.trim_matches('/');
		if path.is_empty() {
			return Err(BackendError::InvalidInput("blob path is empty".to_string()));
		}
		write(&self.blobs).insert(
			path.to_string(),
			StoredBlob {
				bytes: bytes.to_vec(),
				content_type: content_type.to_string(),
			},
		);
		debug!(path, size = bytes.len(), "stored blob");
		Ok(BlobRef::new(path))
	}

	fn url(&self, blob: &BlobRef) -> BackendResult<String> {
		let blobs = read(&self.blobs);
		let stored = blobs
			.get(blob.path())
			.ok_or_else(|| BackendError::not_found("blobs", blob.path()))?;
		Ok(format!("{}/{}?size={}", self.base_url, blob.path(), stored.bytes.len()))
	}

	fn remove(&self, blob: &BlobRef) -> BackendResult<bool> {
		Ok(write(&self.blobs).remove(blob.path()).is_some())
	}
}

impl IdentityProvider for MemoryBackend {
	fn register(&self, email: &str, password: &str) -> BackendResult<Identity> {
		let email = normalize_email(email).ok_or_else(|| {
			BackendError::InvalidInput(format!("'{email}' is not an email address"))
		})?;
		if password.is_empty() {
			return Err(BackendError::InvalidInput("password must not be empty".to_string()));
		}

		let mut accounts = write(&self.accounts);
		if accounts.contains_key(&email) {
			return Err(BackendError::AlreadyExists(format!("account for {email}")));
		}

		let identity = Identity {
			user_id: Uuid::new_v4().to_string(),
			email: email.clone(),
		};
		let salt = Uuid::new_v4().simple().to_string();
		let digest = hash_password(&salt, password);
		accounts.insert(
			email,
			Account {
				identity: identity.clone(),
				salt,
				digest,
			},
		);
		drop(accounts);

		*write(&self.session) = Some(identity.clone());
		info!(user_id = %identity.user_id, "registered account");
		Ok(identity)
	}

	fn sign_in(&self, email: &str, password: &str) -> BackendResult<Identity> {
		let email = normalize_email(email).ok_or(BackendError::InvalidCredentials)?;
		let identity = {
			let accounts = read(&self.accounts);
			let account = accounts.get(&email).ok_or(BackendError::InvalidCredentials)?;
			if hash_password(&account.salt, password) != account.digest {
				return Err(BackendError::InvalidCredentials);
			}
			account.identity.clone()
		};

		*write(&self.session) = Some(identity.clone());
		info!(user_id = %identity.user_id, "signed in");
		Ok(identity)
	}

	fn sign_out(&self) {
		if let Some(identity) = write(&self.session).take() {
			info!(user_id = %identity.user_id, "signed out");
		}
	}

	fn current_identity(&self) -> Option<Identity> {
		read(&self.session).clone()
	}
}

fn normalize_email(email: &str) -> Option<String> {
	let email = email.trim().to_ascii_lowercase();
	let (local, domain) = email.split_once('@')?;
	if local.is_empty() || domain.is_empty() || domain.contains('@') {
		return None;
	}
	Some(email)
}

fn hash_password(salt: &str, password: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(salt.as_bytes());
	hasher.update(password.as_bytes());
	let bytes = hasher.finalize();
	bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
	lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
	lock.write().unwrap_or_else(PoisonError::into_inner)
}
