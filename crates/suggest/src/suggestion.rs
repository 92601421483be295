use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Candidate returned by a [`SuggestionSource`](crate::SuggestionSource) for a
/// partial query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
	/// Stable identifier of the underlying item.
	pub id: String,
	/// Label shown to the user.
	pub display_name: String,
	/// Optional reference to an image representing the item.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_ref: Option<String>,
}

impl Suggestion {
	#[must_use]
	pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			display_name: display_name.into(),
			image_ref: None,
		}
	}

	#[must_use]
	pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
		self.image_ref = Some(image_ref.into());
		self
	}
}

/// Ordered suggestions accepted for a single query.
///
/// A result set is never edited after construction. The coordinator swaps the
/// whole value when a fresher response is accepted, so clones handed to the
/// presentation layer stay valid and cheap to keep around.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
	items: Arc<[Suggestion]>,
}

impl ResultSet {
	/// An empty result set.
	#[must_use]
	pub fn empty() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Borrow the suggestions in order.
	#[must_use]
	pub fn as_slice(&self) -> &[Suggestion] {
		&self.items
	}

	/// Copy the suggestions into an owned vector.
	#[must_use]
	pub fn to_vec(&self) -> Vec<Suggestion> {
		self.items.to_vec()
	}
}

impl From<Vec<Suggestion>> for ResultSet {
	fn from(items: Vec<Suggestion>) -> Self {
		Self {
			items: items.into(),
		}
	}
}

impl Deref for ResultSet {
	type Target = [Suggestion];

	fn deref(&self) -> &Self::Target {
		&self.items
	}
}

impl fmt::Debug for ResultSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.items.iter()).finish()
	}
}

impl Serialize for ResultSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		self.as_slice().serialize(serializer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clones_share_the_same_items() {
		let set = ResultSet::from(vec![Suggestion::new("1", "pasta")]);
		let copy = set.clone();
		assert!(std::ptr::eq(set.as_slice(), copy.as_slice()));
	}

	#[test]
	fn serializes_as_a_plain_list() {
		let set = ResultSet::from(vec![
			Suggestion::new("2", "pastry").with_image_ref("recipes/2/cover.jpg"),
			Suggestion::new("3", "pesto"),
		]);
		let value = serde_json::to_value(&set).expect("serialize");
		assert_eq!(value[0]["display_name"], "pastry");
		assert_eq!(value[0]["image_ref"], "recipes/2/cover.jpg");
		assert!(value[1].get("image_ref").is_none());
	}
}
