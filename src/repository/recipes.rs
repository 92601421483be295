use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BackendHandles, PROFILES, Profile, RECIPES};
use crate::backend::{BackendError, BackendResult, BlobRef, Identity};
use crate::cache::KeyedCache;
use crate::recipes::{ImageUpload, MatchMode, Recipe, RecipeDraft, filter_recipes};

/// Fields an author may change after publishing.
const EDITABLE_FIELDS: &[&str] = &["title", "description", "ingredients", "steps", "category"];

/// Recipe documents, their images and per-user favourites.
#[derive(Clone)]
pub struct RecipeRepository {
	backend: BackendHandles,
	image_urls: Arc<KeyedCache<String, String>>,
}

impl RecipeRepository {
	#[must_use]
	pub fn new(backend: BackendHandles, image_urls: Arc<KeyedCache<String, String>>) -> Self {
		Self { backend, image_urls }
	}

	/// Publish a recipe for the signed-in user.
	///
	/// The image, if any, is uploaded before the document is written so a
	/// stored recipe never points at a missing blob. If the write fails the
	/// uploaded image is removed again.
	pub fn create(&self, draft: RecipeDraft, image: Option<ImageUpload>) -> BackendResult<Recipe> {
		let author = self.require_identity()?;
		let draft = draft.normalized()?;
		let id = Uuid::new_v4().to_string();

		let image_ref = match image {
			Some(image) => {
				let file_name = image.file_name.trim().trim_start_matches('/');
				if file_name.is_empty() {
					return Err(BackendError::InvalidInput(
						"image file name must not be empty".to_string(),
					));
				}
				let path = format!("{RECIPES}/{id}/{file_name}");
				Some(self.backend.blobs.upload(&path, &image.bytes, &image.content_type)?)
			}
			None => None,
		};

		let recipe = Recipe {
			id,
			title: draft.title,
			description: draft.description,
			ingredients: draft.ingredients,
			steps: draft.steps,
			category: draft.category,
			image_ref,
			author_id: Some(author.user_id),
			created_at: unix_now(),
		};
		if let Err(err) = self.write(&recipe) {
			if let Some(image) = &recipe.image_ref {
				self.discard_image(image);
			}
			return Err(err);
		}
		info!(recipe_id = %recipe.id, title = %recipe.title, "published recipe");
		Ok(recipe)
	}

	pub fn get(&self, id: &str) -> BackendResult<Option<Recipe>> {
		self.backend
			.documents
			.get(RECIPES, id)?
			.map(serde_json::from_value)
			.transpose()
			.map_err(BackendError::from)
	}

	/// Every recipe, newest first.
	pub fn list(&self) -> BackendResult<Vec<Recipe>> {
		let mut recipes = self
			.backend
			.documents
			.list(RECIPES)?
			.into_iter()
			.map(|(_, document)| serde_json::from_value::<Recipe>(document))
			.collect::<Result<Vec<_>, _>>()?;
		recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
		Ok(recipes)
	}

	/// Client-side search over the full list.
	pub fn search(&self, query: &str, mode: MatchMode) -> BackendResult<Vec<Recipe>> {
		let recipes = self.list()?;
		let matches = filter_recipes(&recipes, query, mode)
			.into_iter()
			.cloned()
			.collect::<Vec<_>>();
		debug!(query, mode = %mode, matches = matches.len(), "searched recipes");
		Ok(matches)
	}

	/// Change one editable field of a recipe owned by the signed-in user.
	pub fn update_field(&self, id: &str, field: &str, value: Value) -> BackendResult<()> {
		if !EDITABLE_FIELDS.contains(&field) {
			return Err(BackendError::InvalidInput(format!("field '{field}' cannot be edited")));
		}
		let recipe = self.get(id)?.ok_or_else(|| BackendError::not_found(RECIPES, id))?;
		self.require_author(&recipe)?;

		// Edits go through the same cleanup as new recipes, and the stored
		// document is only touched once the result is valid.
		let mut document = serde_json::to_value(&recipe)?;
		document[field] = value;
		let edited: Recipe = serde_json::from_value(document)?;
		let draft = RecipeDraft {
			title: edited.title,
			description: edited.description,
			ingredients: edited.ingredients,
			steps: edited.steps,
			category: edited.category,
		}
		.normalized()?;
		let value = serde_json::to_value(&draft)?
			.get(field)
			.cloned()
			.unwrap_or(Value::Null);

		self.backend.documents.update_field(RECIPES, id, field, value)
	}

	/// Delete a recipe owned by the signed-in user along with its image.
	///
	/// Returns `false` when no such recipe exists.
	pub fn delete(&self, id: &str) -> BackendResult<bool> {
		let Some(recipe) = self.get(id)? else {
			return Ok(false);
		};
		self.require_author(&recipe)?;

		let existed = self.backend.documents.delete(RECIPES, id)?;
		if let Some(image) = &recipe.image_ref {
			self.image_urls.invalidate(&image.path().to_string());
			self.backend.blobs.remove(image)?;
		}
		info!(recipe_id = %id, "deleted recipe");
		Ok(existed)
	}

	/// Downloadable URL of the recipe's image, if it has one.
	pub fn image_url(&self, recipe: &Recipe) -> BackendResult<Option<String>> {
		let Some(image) = &recipe.image_ref else {
			return Ok(None);
		};
		self.image_urls
			.get_or_try_insert_with(image.path().to_string(), || self.backend.blobs.url(image))
			.map(Some)
	}

	/// Flip the favourite flag of a recipe for the signed-in user and return
	/// the new state.
	pub fn toggle_favorite(&self, recipe_id: &str) -> BackendResult<bool> {
		let identity = self.require_identity()?;
		if self.get(recipe_id)?.is_none() {
			return Err(BackendError::not_found(RECIPES, recipe_id));
		}

		let mut favorites = self.profile(&identity)?.favorites;
		let now_favorite = match favorites.iter().position(|id| id == recipe_id) {
			Some(index) => {
				favorites.remove(index);
				false
			}
			None => {
				favorites.push(recipe_id.to_string());
				true
			}
		};
		self.backend.documents.update_field(
			PROFILES,
			&identity.user_id,
			"favorites",
			serde_json::to_value(&favorites)?,
		)?;
		Ok(now_favorite)
	}

	/// Favourite recipes of the signed-in user, in the order they were added.
	///
	/// Favourites whose recipe has since been deleted are skipped.
	pub fn favorites(&self) -> BackendResult<Vec<Recipe>> {
		let identity = self.require_identity()?;
		let mut recipes = Vec::new();
		for id in self.profile(&identity)?.favorites {
			if let Some(recipe) = self.get(&id)? {
				recipes.push(recipe);
			}
		}
		Ok(recipes)
	}

	/// Store catalog recipes as-is, replacing any with the same id.
	pub fn import(&self, recipes: &[Recipe]) -> BackendResult<usize> {
		for recipe in recipes {
			self.write(recipe)?;
		}
		info!(count = recipes.len(), "imported recipes");
		Ok(recipes.len())
	}

	fn discard_image(&self, image: &BlobRef) {
		match self.backend.blobs.remove(image) {
			Ok(_) => debug!(path = %image, "removed image of unpublished recipe"),
			Err(err) => warn!(path = %image, error = %err, "failed to remove orphaned image"),
		}
	}

	fn write(&self, recipe: &Recipe) -> BackendResult<()> {
		self.backend
			.documents
			.set(RECIPES, &recipe.id, serde_json::to_value(recipe)?)
	}

	fn profile(&self, identity: &Identity) -> BackendResult<Profile> {
		let document = self
			.backend
			.documents
			.get(PROFILES, &identity.user_id)?
			.ok_or_else(|| BackendError::not_found(PROFILES, &identity.user_id))?;
		Ok(serde_json::from_value(document)?)
	}

	fn require_identity(&self) -> BackendResult<Identity> {
		self.backend
			.identity
			.current_identity()
			.ok_or(BackendError::NotSignedIn)
	}

	fn require_author(&self, recipe: &Recipe) -> BackendResult<Identity> {
		let identity = self.require_identity()?;
		if recipe.author_id.as_deref() != Some(identity.user_id.as_str()) {
			return Err(BackendError::Forbidden(format!(
				"recipe {} belongs to another cook",
				recipe.id
			)));
		}
		Ok(identity)
	}
}

fn unix_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}
