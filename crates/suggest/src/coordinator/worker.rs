use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::{debug, trace};

use super::commands::{LookupCommand, LookupResponse};
use crate::{LookupError, SuggestionSource, TokenCounter};

/// Launches `workers` lookup threads sharing one job queue and returns the
/// communication channels.
///
/// Each worker takes the next job, runs it to completion and reports back, so
/// up to `workers` lookups are in flight at once and may finish in any order.
pub(crate) fn spawn<S: SuggestionSource>(
	source: S,
	tokens: Arc<TokenCounter>,
	workers: usize,
) -> io::Result<(Sender<LookupCommand>, Receiver<LookupResponse>)> {
	let (command_tx, command_rx) = mpsc::channel();
	let (response_tx, response_rx) = mpsc::channel();
	let source = Arc::new(source);
	let jobs = Arc::new(Mutex::new(command_rx));

	for index in 0..workers.max(1) {
		let source = Arc::clone(&source);
		let tokens = Arc::clone(&tokens);
		let jobs = Arc::clone(&jobs);
		let responses = response_tx.clone();
		thread::Builder::new()
			.name(format!("suggest-lookup-{index}"))
			.spawn(move || worker_loop(source.as_ref(), &tokens, &jobs, &responses))?;
	}

	Ok((command_tx, response_rx))
}

fn worker_loop<S: SuggestionSource>(
	source: &S,
	tokens: &TokenCounter,
	jobs: &Mutex<Receiver<LookupCommand>>,
	responses: &Sender<LookupResponse>,
) {
	loop {
		// The guard is dropped before the lookup runs so other workers can
		// pick up jobs meanwhile.
		let command = match jobs.lock() {
			Ok(queue) => queue.recv(),
			Err(_) => break,
		};
		let keep_running = match command {
			Ok(LookupCommand::Lookup { token, query }) => {
				run_lookup(source, tokens, responses, token, query)
			}
			Ok(LookupCommand::Shutdown) | Err(_) => false,
		};
		if !keep_running {
			break;
		}
	}
	trace!("suggestion worker stopped");
}

fn run_lookup<S: SuggestionSource>(
	source: &S,
	tokens: &TokenCounter,
	responses: &Sender<LookupResponse>,
	token: crate::SequenceToken,
	query: String,
) -> bool {
	if !tokens.is_latest(token) {
		debug!(%token, query = %query, "skipping superseded suggestion lookup");
		return true;
	}

	let outcome = panic::catch_unwind(AssertUnwindSafe(|| source.lookup(&query)))
		.unwrap_or_else(|payload| Err(LookupError::Panicked(panic_message(payload.as_ref()))));

	responses
		.send(LookupResponse {
			token,
			query,
			outcome,
		})
		.is_ok()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic payload".to_string()
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;
	use crate::{FnSource, Suggestion};

	#[test]
	fn shutdown_command_stops_worker() {
		let source = FnSource::new(|_: &str| Ok(Vec::new()));
		let (tx, _rx) = spawn(source, Arc::new(TokenCounter::new()), 1).expect("spawn workers");
		tx.send(LookupCommand::Shutdown).expect("send shutdown");
	}

	#[test]
	fn lookup_results_are_forwarded() {
		let source =
			FnSource::new(|query: &str| Ok(vec![Suggestion::new("1", query.to_uppercase())]));
		let tokens = Arc::new(TokenCounter::new());
		let (tx, rx) = spawn(source, Arc::clone(&tokens), 2).expect("spawn workers");

		let token = tokens.issue();
		tx.send(LookupCommand::Lookup {
			token,
			query: "tart".to_string(),
		})
		.expect("send lookup");

		let response = rx
			.recv_timeout(Duration::from_secs(1))
			.expect("receive lookup response");
		assert_eq!(response.token, token);
		assert_eq!(response.query, "tart");
		assert_eq!(
			response.outcome.expect("lookup succeeds")[0].display_name,
			"TART"
		);
	}

	#[test]
	fn panicking_lookup_is_reported_as_failure() {
		let source = FnSource::new(|_: &str| -> Result<Vec<Suggestion>, LookupError> {
			panic!("oven on fire")
		});
		let tokens = Arc::new(TokenCounter::new());
		let (tx, rx) = spawn(source, Arc::clone(&tokens), 1).expect("spawn workers");

		tx.send(LookupCommand::Lookup {
			token: tokens.issue(),
			query: "flambé".to_string(),
		})
		.expect("send lookup");

		let response = rx
			.recv_timeout(Duration::from_secs(1))
			.expect("receive lookup response");
		assert_eq!(
			response.outcome,
			Err(LookupError::Panicked("oven on fire".to_string()))
		);
	}
}
