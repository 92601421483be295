use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, ensure};
use config::{Config, ConfigError, File};
use serde::Deserialize;

use tastybite::app_dirs;
use tastybite::logging::LogLevel;
use tastybite::{CoordinatorOptions, DEFAULT_SUGGESTION_LIMIT, MatchMode};

use crate::cli::CliArgs;

const DEFAULT_TIMEOUT_MS: u64 = 2_000;
const DATA_DIR_CATALOG: &str = "recipes.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
	catalog: CatalogSection,
	suggest: SuggestSection,
	logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CatalogSection {
	recipes: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SuggestSection {
	min_query_len: Option<usize>,
	workers: Option<usize>,
	limit: Option<usize>,
	match_mode: Option<String>,
	timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LoggingSection {
	level: Option<String>,
}

/// Configuration after every source and CLI override has been applied.
pub struct ResolvedConfig {
	/// Catalog to load; `None` means the built-in sample.
	pub recipes: Option<PathBuf>,
	pub coordinator: CoordinatorOptions,
	pub limit: usize,
	pub mode: MatchMode,
	pub settle_timeout: Duration,
	pub log_level: LogLevel,
}

impl ResolvedConfig {
	pub fn print_summary(&self) {
		println!("Effective configuration:");
		match &self.recipes {
			Some(path) => println!("  Recipe catalog: {}", path.display()),
			None => println!("  Recipe catalog: (built-in sample)"),
		}
		println!("  Match mode: {}", self.mode);
		println!("  Suggestion limit: {}", self.limit);
		println!("  Minimum query length: {}", self.coordinator.min_query_len);
		println!("  Lookup workers: {}", self.coordinator.workers);
		println!("  Settle timeout: {} ms", self.settle_timeout.as_millis());
		println!("  Log level: {}", self.log_level);
	}
}

pub fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	let builder = build_config(cli)?;
	let mut raw: RawConfig = builder
		.try_deserialize()
		.map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
	raw.apply_cli_overrides(cli);
	raw.resolve(cli.verbose)
}

fn build_config(cli: &CliArgs) -> Result<Config> {
	let mut builder = Config::builder();

	if !cli.no_config {
		for path in default_config_files() {
			builder = builder.add_source(File::from(path).required(false));
		}
	}

	for path in &cli.config {
		builder = builder.add_source(File::from(path.clone()).required(true));
	}

	builder = builder.add_source(
		config::Environment::with_prefix("tastybite")
			.separator("__")
			.try_parsing(true),
	);

	builder.build().map_err(|err| match err {
		ConfigError::Frozen => anyhow!("configuration builder is frozen"),
		other => other.into(),
	})
}

fn default_config_files() -> Vec<PathBuf> {
	let mut files = Vec::new();

	if let Ok(dir) = app_dirs::get_config_dir() {
		files.push(dir.join("config.toml"));
	}

	if let Ok(current_dir) = env::current_dir() {
		files.push(current_dir.join(".tastybite.toml"));
		files.push(current_dir.join("tastybite.toml"));
	}

	files
}

/// Catalog in the data directory, when one has been put there.
fn data_dir_catalog() -> Option<PathBuf> {
	let path = app_dirs::get_data_dir().ok()?.join(DATA_DIR_CATALOG);
	path.is_file().then_some(path)
}

impl RawConfig {
	fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(path) = cli.recipes.clone() {
			self.catalog.recipes = Some(path);
		}
		if let Some(mode) = cli.mode {
			self.suggest.match_mode = Some(mode.as_str().to_string());
		}
		if let Some(value) = cli.limit {
			self.suggest.limit = Some(value);
		}
		if let Some(value) = cli.min_query_len {
			self.suggest.min_query_len = Some(value);
		}
		if let Some(value) = cli.workers {
			self.suggest.workers = Some(value);
		}
		if let Some(value) = cli.timeout_ms {
			self.suggest.timeout_ms = Some(value);
		}
	}

	fn resolve(self, verbosity: u8) -> Result<ResolvedConfig> {
		let recipes = match self.catalog.recipes {
			Some(path) if path.is_relative() => Some(
				env::current_dir()
					.context("failed to resolve current directory for the recipe catalog")?
					.join(path),
			),
			Some(path) => Some(path),
			None => data_dir_catalog(),
		};

		let defaults = CoordinatorOptions::default();
		let coordinator = CoordinatorOptions {
			min_query_len: self.suggest.min_query_len.unwrap_or(defaults.min_query_len),
			workers: self.suggest.workers.unwrap_or(defaults.workers),
		};
		ensure!(coordinator.workers > 0, "suggest.workers must be at least 1");

		let limit = self.suggest.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
		ensure!(limit > 0, "suggest.limit must be at least 1");

		let mode = match self.suggest.match_mode {
			Some(mode) => mode.parse::<MatchMode>().map_err(|err| anyhow!(err))?,
			None => MatchMode::default(),
		};

		let timeout_ms = self.suggest.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
		ensure!(timeout_ms > 0, "suggest.timeout_ms must be positive");

		let log_level = match self.logging.level {
			Some(level) => level.parse::<LogLevel>().map_err(|err| anyhow!(err))?,
			None => LogLevel::default(),
		};

		Ok(ResolvedConfig {
			recipes,
			coordinator,
			limit,
			mode,
			settle_timeout: Duration::from_millis(timeout_ms),
			log_level: log_level.raised_by(verbosity),
		})
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use clap::Parser;
	use tempfile::tempdir;

	use super::*;

	fn cli(args: &[&str]) -> CliArgs {
		let mut argv = vec!["tastybite", "--no-config"];
		argv.extend_from_slice(args);
		CliArgs::try_parse_from(argv).expect("valid arguments")
	}

	#[test]
	fn defaults_without_any_source() {
		let resolved = RawConfig::default().resolve(0).expect("resolve defaults");
		assert_eq!(resolved.coordinator, CoordinatorOptions::default());
		assert_eq!(resolved.limit, DEFAULT_SUGGESTION_LIMIT);
		assert_eq!(resolved.mode, MatchMode::Substring);
		assert_eq!(resolved.settle_timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
		assert_eq!(resolved.log_level, LogLevel::Warn);
	}

	#[test]
	fn cli_flags_override_config_files() {
		let dir = tempdir().expect("temp dir");
		let file = dir.path().join("tastybite.toml");
		fs::write(
			&file,
			concat!(
				"[suggest]\nlimit = 3\nmatch_mode = \"fuzzy\"\nworkers = 2\n",
				"\n[logging]\nlevel = \"info\"\n",
			),
		)
		.expect("write config");
		let file = file.to_string_lossy().into_owned();

		let resolved = load(&cli(&["--config", &file, "--limit", "5", "-v"])).expect("load");
		assert_eq!(resolved.limit, 5);
		assert_eq!(resolved.mode, MatchMode::Fuzzy);
		assert_eq!(resolved.coordinator.workers, 2);
		assert_eq!(resolved.log_level, LogLevel::Debug);
	}

	#[test]
	fn explicit_config_files_are_required() {
		let dir = tempdir().expect("temp dir");
		let missing = dir.path().join("missing.toml");
		let missing = missing.to_string_lossy().into_owned();
		assert!(load(&cli(&["--config", &missing])).is_err());
	}

	#[test]
	fn invalid_values_are_rejected() {
		let mut raw = RawConfig::default();
		raw.suggest.match_mode = Some("telepathic".to_string());
		assert!(raw.resolve(0).is_err());

		let mut raw = RawConfig::default();
		raw.suggest.limit = Some(0);
		assert!(raw.resolve(0).is_err());

		let mut raw = RawConfig::default();
		raw.suggest.workers = Some(0);
		assert!(raw.resolve(0).is_err());
	}

	#[test]
	fn relative_catalog_paths_resolve_against_the_working_directory() {
		let resolved = load(&cli(&["--recipes", "catalog.json"])).expect("load");
		let expected = env::current_dir().expect("cwd").join("catalog.json");
		assert_eq!(resolved.recipes, Some(expected));
	}
}
