use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, BlobRef};

/// A published recipe as stored in the `recipes` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
	pub id: String,
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub ingredients: Vec<String>,
	#[serde(default)]
	pub steps: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_ref: Option<BlobRef>,
	/// Seeded catalog entries have no author.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub author_id: Option<String>,
	/// Seconds since the Unix epoch.
	#[serde(default)]
	pub created_at: u64,
}

/// User-supplied fields of a new recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub ingredients: Vec<String>,
	#[serde(default)]
	pub steps: Vec<String>,
	#[serde(default)]
	pub category: Option<String>,
}

impl RecipeDraft {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ingredients = ingredients.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	/// Trim text fields and drop blank list entries; a blank title is an error.
	pub(crate) fn normalized(self) -> Result<Self, BackendError> {
		let title = self.title.trim().to_string();
		if title.is_empty() {
			return Err(BackendError::InvalidInput("recipe title must not be empty".to_string()));
		}
		Ok(Self {
			title,
			description: self.description.trim().to_string(),
			ingredients: clean_lines(self.ingredients),
			steps: clean_lines(self.steps),
			category: self
				.category
				.map(|category| category.trim().to_string())
				.filter(|category| !category.is_empty()),
		})
	}
}

/// Image attached to a recipe at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
	pub file_name: String,
	pub content_type: String,
	pub bytes: Vec<u8>,
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
	lines
		.into_iter()
		.map(|line| line.trim().to_string())
		.filter(|line| !line.is_empty())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalizing_trims_and_drops_blanks() {
		let draft = RecipeDraft {
			title: "  Pho  ".to_string(),
			description: String::new(),
			ingredients: vec![" rice noodles ".into(), "   ".into(), "star anise".into()],
			steps: vec![String::new()],
			category: Some("  ".into()),
		};
		let normalized = draft.normalized().expect("valid draft");
		assert_eq!(normalized.title, "Pho");
		assert_eq!(normalized.ingredients, vec!["rice noodles", "star anise"]);
		assert!(normalized.steps.is_empty());
		assert_eq!(normalized.category, None);
	}

	#[test]
	fn blank_titles_are_rejected() {
		assert!(RecipeDraft::new(" \t").normalized().is_err());
	}

	#[test]
	fn catalog_records_need_only_id_and_title() {
		let recipe: Recipe =
			serde_json::from_str(r#"{ "id": "r9", "title": "Dal" }"#).expect("parse recipe");
		assert_eq!(recipe.title, "Dal");
		assert!(recipe.ingredients.is_empty());
		assert_eq!(recipe.author_id, None);
	}
}
