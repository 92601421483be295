use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser};

use super::options::{ModeArg, OutputFormat};
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `tastybite` binary.
#[derive(Parser, Debug)]
#[command(
	name = "tastybite",
	version,
	long_version = long_version(),
	about = "Search a recipe catalog the way the TastyBite search box does",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		value_name = "QUERY",
		help = "Successive contents of the search box, oldest first (default: none)"
	)]
	pub(crate) queries: Vec<String>,
	#[arg(
		short = 'T',
		long = "type",
		value_name = "TEXT",
		conflicts_with = "queries",
		help = "Type TEXT into the search box one character at a time (default: none)"
	)]
	pub(crate) type_text: Option<String>,
	#[arg(
		short = 's',
		long = "search",
		value_name = "QUERY",
		conflicts_with_all = ["queries", "type_text"],
		help = "Filter the catalog once, bypassing the suggestion pipeline (default: none)"
	)]
	pub(crate) search: Option<String>,
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "TASTYBITE_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'r',
		long = "recipes",
		value_name = "FILE",
		help = "JSON recipe catalog to load (default: data directory or built-in sample)"
	)]
	pub(crate) recipes: Option<PathBuf>,
	#[arg(
		short = 'm',
		long = "mode",
		value_enum,
		help = "How queries are matched against recipes (default: substring)"
	)]
	pub(crate) mode: Option<ModeArg>,
	#[arg(
		short = 'l',
		long = "limit",
		value_name = "NUM",
		help = "Maximum suggestions per lookup (default: 8)"
	)]
	pub(crate) limit: Option<usize>,
	#[arg(
		long = "min-query-len",
		value_name = "NUM",
		help = "Shortest query, in characters, that triggers a lookup (default: 2)"
	)]
	pub(crate) min_query_len: Option<usize>,
	#[arg(
		short = 'j',
		long = "workers",
		value_name = "NUM",
		help = "Number of lookups allowed in flight at once (default: 4)"
	)]
	pub(crate) workers: Option<usize>,
	#[arg(
		long = "timeout-ms",
		value_name = "MILLIS",
		help = "How long to wait for the last lookup to settle (default: 2000)"
	)]
	pub(crate) timeout_ms: Option<u64>,
	#[arg(
		short = 'v',
		long = "verbose",
		action = ArgAction::Count,
		help = "Raise the log level once per occurrence (default: configured level)"
	)]
	pub(crate) verbose: u8,
	#[arg(
		short = 'p',
		long = "print-config",
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(
		short = 'o',
		long = "output",
		value_enum,
		default_value_t = OutputFormat::Plain,
		help = "Choose how to print the result"
	)]
	pub(crate) output: OutputFormat,
}
