use anyhow::{Context, Result};
use tastybite::catalog::{load_catalog, sample_catalog};
use tastybite::{App, MatchMode, Recipe, SuggestionSnapshot};
use tracing::info;

use crate::settings::ResolvedConfig;

/// What a run produced, ready to be printed.
pub(crate) enum Outcome {
	Suggestions(SuggestOutcome),
	Search(SearchOutcome),
}

/// State of the search box once the last typed query settled.
pub(crate) struct SuggestOutcome {
	pub(crate) queries: Vec<String>,
	pub(crate) snapshot: SuggestionSnapshot,
}

pub(crate) struct SearchOutcome {
	pub(crate) query: String,
	pub(crate) mode: MatchMode,
	pub(crate) recipes: Vec<Recipe>,
}

/// What the user asked the binary to do with the catalog.
pub(crate) enum Request {
	/// Feed each query to the search box in order.
	Type(Vec<String>),
	/// Run one direct title search.
	Search(String),
}

impl Request {
	/// Expand typed text into every prefix the search box would see.
	pub(crate) fn typed(text: &str) -> Self {
		let queries = text
			.char_indices()
			.map(|(offset, ch)| text[..offset + ch.len_utf8()].to_string())
			.collect();
		Self::Type(queries)
	}
}

/// Loads the catalog into an in-memory app and drives one request against it.
pub(crate) struct SuggestWorkflow {
	app: App,
	config: ResolvedConfig,
}

impl SuggestWorkflow {
	pub(crate) fn from_config(config: ResolvedConfig) -> Result<Self> {
		let recipes = match &config.recipes {
			Some(path) => load_catalog(path)?,
			None => sample_catalog()?,
		};

		let app = App::in_memory();
		let imported = app
			.recipes()
			.import(&recipes)
			.context("failed to import the recipe catalog")?;
		info!(imported, "recipe catalog loaded");

		Ok(Self { app, config })
	}

	pub(crate) fn run(self, request: Request) -> Result<Outcome> {
		match request {
			Request::Search(query) => self.search(query),
			Request::Type(queries) => self.suggest(queries),
		}
	}

	fn search(self, query: String) -> Result<Outcome> {
		let mode = self.config.mode;
		let recipes = self
			.app
			.recipes()
			.search(&query, mode)
			.with_context(|| format!("search for '{query}' failed"))?;
		Ok(Outcome::Search(SearchOutcome { query, mode, recipes }))
	}

	fn suggest(self, queries: Vec<String>) -> Result<Outcome> {
		let mut coordinator = self
			.app
			.suggestions(self.config.coordinator, self.config.mode, self.config.limit)
			.context("failed to start suggestion workers")?;

		for query in &queries {
			coordinator.submit(query.as_str());
		}

		if !coordinator.settle(self.config.settle_timeout) {
			info!(
				timeout_ms = self.config.settle_timeout.as_millis() as u64,
				"latest lookup did not settle in time"
			);
		}

		let snapshot = coordinator.snapshot();
		Ok(Outcome::Suggestions(SuggestOutcome { queries, snapshot }))
	}
}
