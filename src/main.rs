mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{CliArgs, OutputFormat, parse_cli, print_json, print_plain};
use settings::ResolvedConfig;
use tastybite::logging;
use workflow::{Request, SuggestWorkflow};

fn main() -> Result<()> {
	let cli = parse_cli();
	let resolved = settings::load(&cli)?;
	logging::initialize(resolved.log_level);

	if cli.print_config {
		resolved.print_summary();
	}

	run(&cli, resolved)
}

/// Execute the requested workflow and print output in the chosen format.
fn run(cli: &CliArgs, settings: ResolvedConfig) -> Result<()> {
	let request = match (&cli.search, &cli.type_text) {
		(Some(query), _) => Request::Search(query.clone()),
		(None, Some(text)) => Request::typed(text),
		(None, None) => Request::Type(cli.queries.clone()),
	};

	let outcome = SuggestWorkflow::from_config(settings)?.run(request)?;

	match cli.output {
		OutputFormat::Plain => print_plain(&outcome),
		OutputFormat::Json => print_json(&outcome)?,
	}

	Ok(())
}
