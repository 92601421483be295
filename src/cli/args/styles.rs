use std::fmt::Write;

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use tastybite::app_dirs;

/// `--version` output, extended with the directories a config file or a
/// `recipes.json` catalog is picked up from.
pub(super) fn long_version() -> &'static str {
	let mut banner = format!("tastybite {}\n", env!("CARGO_PKG_VERSION"));
	for (label, dir) in [
		("config directory", app_dirs::get_config_dir()),
		("data directory", app_dirs::get_data_dir()),
	] {
		let _ = match dir {
			Ok(path) => writeln!(banner, "{label}: {}", path.display()),
			Err(err) => writeln!(banner, "{label}: unavailable ({err})"),
		};
	}

	// clap wants a `'static` string; built once per process.
	Box::leak(banner.into_boxed_str())
}

pub(super) fn cli_styles() -> Styles {
	let heading = AnsiColor::Green.on_default().effects(Effects::BOLD);
	Styles::styled()
		.header(heading)
		.usage(heading)
		.literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
		.placeholder(AnsiColor::Cyan.on_default())
}
