//! Recipe catalogs read from JSON files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::recipes::Recipe;

const SAMPLE_CATALOG: &str = include_str!("../assets/sample_recipes.json");

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("failed to read recipe catalog {}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse recipe catalog {origin}")]
	Parse {
		origin: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("recipe id '{0}' appears more than once")]
	DuplicateId(String),

	#[error("recipe '{0}' has an empty title")]
	MissingTitle(String),
}

/// Load and validate a catalog file holding a JSON array of recipes.
pub fn load_catalog(path: &Path) -> Result<Vec<Recipe>, CatalogError> {
	let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	parse_catalog(&text, &path.display().to_string())
}

/// The catalog bundled with the binary.
pub fn sample_catalog() -> Result<Vec<Recipe>, CatalogError> {
	parse_catalog(SAMPLE_CATALOG, "(built-in sample)")
}

fn parse_catalog(text: &str, origin: &str) -> Result<Vec<Recipe>, CatalogError> {
	let recipes: Vec<Recipe> = serde_json::from_str(text).map_err(|source| CatalogError::Parse {
		origin: origin.to_string(),
		source,
	})?;

	let mut seen = HashSet::new();
	for recipe in &recipes {
		if recipe.title.trim().is_empty() {
			return Err(CatalogError::MissingTitle(recipe.id.clone()));
		}
		if !seen.insert(recipe.id.as_str()) {
			return Err(CatalogError::DuplicateId(recipe.id.clone()));
		}
	}
	Ok(recipes)
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use tempfile::NamedTempFile;

	use super::*;

	#[test]
	fn sample_catalog_is_valid() {
		let recipes = sample_catalog().expect("bundled catalog parses");
		assert!(recipes.len() >= 5);
		assert!(recipes.iter().any(|recipe| recipe.title == "Tiramisu"));
	}

	#[test]
	fn loads_catalog_from_disk() {
		let mut file = NamedTempFile::new().expect("temp file");
		write!(file, r#"[{{ "id": "r1", "title": "Gazpacho", "category": "Spanish" }}]"#)
			.expect("write catalog");

		let recipes = load_catalog(file.path()).expect("load catalog");
		assert_eq!(recipes.len(), 1);
		assert_eq!(recipes[0].category.as_deref(), Some("Spanish"));
	}

	#[test]
	fn rejects_duplicates_and_blank_titles() {
		let duplicate = r#"[{ "id": "a", "title": "One" }, { "id": "a", "title": "Two" }]"#;
		assert!(matches!(
			parse_catalog(duplicate, "test"),
			Err(CatalogError::DuplicateId(id)) if id == "a"
		));

		let blank = r#"[{ "id": "b", "title": "  " }]"#;
		assert!(matches!(parse_catalog(blank, "test"), Err(CatalogError::MissingTitle(_))));
	}

	#[test]
	fn missing_files_report_their_path() {
		let err = load_catalog(Path::new("/definitely/not/here.json")).expect_err("missing file");
		assert!(err.to_string().contains("/definitely/not/here.json"));
	}
}
