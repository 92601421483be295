//! Where TastyBite keeps `config.toml` and its default recipe catalog.
//!
//! `TASTYBITE_CONFIG_DIR` and `TASTYBITE_DATA_DIR` take precedence over the
//! platform locations.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const CONFIG_DIR_ENV: &str = "TASTYBITE_CONFIG_DIR";
const DATA_DIR_ENV: &str = "TASTYBITE_DATA_DIR";

pub fn get_config_dir() -> Result<PathBuf> {
	resolve(CONFIG_DIR_ENV, ProjectDirs::config_local_dir)
}

pub fn get_data_dir() -> Result<PathBuf> {
	resolve(DATA_DIR_ENV, ProjectDirs::data_local_dir)
}

fn resolve(variable: &str, platform: fn(&ProjectDirs) -> &Path) -> Result<PathBuf> {
	if let Some(dir) = non_empty(env::var_os(variable)) {
		return Ok(dir);
	}
	let dirs = ProjectDirs::from("app", "tastybite", "tastybite")
		.ok_or_else(|| anyhow!("no home directory to place tastybite files under"))?;
	Ok(platform(&dirs).to_path_buf())
}

/// `TASTYBITE_DATA_DIR=` with nothing after it means "not set".
fn non_empty(value: Option<OsString>) -> Option<PathBuf> {
	value.filter(|value| !value.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_overrides_are_ignored() {
		assert_eq!(non_empty(None), None);
		assert_eq!(non_empty(Some(OsString::new())), None);
		assert_eq!(
			non_empty(Some(OsString::from("/srv/recipes"))),
			Some(PathBuf::from("/srv/recipes"))
		);
	}
}
