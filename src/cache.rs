//! Process-scoped keyed caches.
//!
//! A [`KeyedCache`] belongs to whichever service builds it and is handed to
//! consumers explicitly. There are no global instances.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe map with explicit invalidation.
#[derive(Debug)]
pub struct KeyedCache<K, V> {
	entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for KeyedCache<K, V> {
	fn default() -> Self {
		Self {
			entries: Mutex::new(HashMap::new()),
		}
	}
}

impl<K, V> KeyedCache<K, V>
where
	K: Eq + Hash,
	V: Clone,
{
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn get(&self, key: &K) -> Option<V> {
		self.lock().get(key).cloned()
	}

	/// Store `value`, returning whatever was cached under `key` before.
	pub fn insert(&self, key: K, value: V) -> Option<V> {
		self.lock().insert(key, value)
	}

	/// Return the cached value or compute, store and return a new one.
	///
	/// The lock is not held while `load` runs, so two racing callers may both
	/// compute; the later insert wins. A failed `load` caches nothing.
	pub fn get_or_try_insert_with<E>(
		&self,
		key: K,
		load: impl FnOnce() -> Result<V, E>,
	) -> Result<V, E> {
		if let Some(value) = self.get(&key) {
			return Ok(value);
		}
		let value = load()?;
		self.insert(key, value.clone());
		Ok(value)
	}

	/// Drop the entry for `key`. Returns whether one existed.
	pub fn invalidate(&self, key: &K) -> bool {
		self.lock().remove(key).is_some()
	}

	pub fn clear(&self) {
		self.lock().clear();
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.lock().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn lock(&self) -> MutexGuard<'_, HashMap<K, V>> {
		// Entries are plain values, so a panic elsewhere cannot leave the map
		// half-updated.
		self.entries.lock().unwrap_or_else(PoisonError::into_inner)
	}
}
