//! The staleness-guarded query coordinator.
//!
//! Every accepted `submit` is tagged with a fresh [`SequenceToken`] and handed
//! to the worker pool. Responses come back on a channel and are applied by
//! the owning thread in [`SuggestionCoordinator::pump`] (or one of the
//! waiting variants). Because that thread is the only writer, the token
//! comparison and the state replacement cannot be interleaved with another
//! submit or response.

mod commands;
mod worker;


use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use self::commands::{LookupCommand, LookupResponse};
use crate::{LookupError, ResultSet, SequenceToken, Suggestion, SuggestionSource, TokenCounter};

/// Queries shorter than this many characters never reach the source.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Number of lookups allowed to run at the same time.
pub const DEFAULT_WORKERS: usize = 4;

/// Tuning knobs for a [`SuggestionCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
	/// Minimum query length, in characters, before a lookup is issued.
	pub min_query_len: usize,
	/// Size of the lookup worker pool. Zero is treated as one.
	pub workers: usize,
}

impl Default for CoordinatorOptions {
	fn default() -> Self {
		Self {
			min_query_len: DEFAULT_MIN_QUERY_LEN,
			workers: DEFAULT_WORKERS,
		}
	}
}

/// How the most recent lookup settled.
///
/// A failed lookup still leaves an empty [`ResultSet`] behind; this status is
/// what lets a caller tell "no matches" apart from "lookup failed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LookupStatus {
	/// Nothing requested, or the last request was cleared.
	#[default]
	Idle,
	/// Waiting on the lookup tagged with this token.
	Pending(SequenceToken),
	/// The latest lookup succeeded.
	Ready,
	/// The latest lookup failed.
	Failed(LookupError),
}

/// Point-in-time view of the coordinator for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionSnapshot {
	pub query: String,
	pub results: ResultSet,
	pub loading: bool,
	pub status: LookupStatus,
	pub latest_token: Option<SequenceToken>,
}

/// Issues one lookup per qualifying query and keeps only the freshest answer.
pub struct SuggestionCoordinator {
	commands: Sender<LookupCommand>,
	responses: Receiver<LookupResponse>,
	tokens: Arc<TokenCounter>,
	workers: usize,
	min_query_len: usize,
	/// Token whose response may still be accepted. Cleared by `clear`, short
	/// queries and acceptance.
	awaiting: Option<SequenceToken>,
	query: String,
	results: ResultSet,
	loading: bool,
	status: LookupStatus,
}

impl SuggestionCoordinator {
	/// Start the worker pool and return an idle coordinator.
	pub fn new<S: SuggestionSource>(source: S, options: CoordinatorOptions) -> io::Result<Self> {
		let tokens = Arc::new(TokenCounter::new());
		let workers = options.workers.max(1);
		let (commands, responses) = worker::spawn(source, Arc::clone(&tokens), workers)?;
		Ok(Self {
			commands,
			responses,
			tokens,
			workers,
			min_query_len: options.min_query_len,
			awaiting: None,
			query: String::new(),
			results: ResultSet::empty(),
			loading: false,
			status: LookupStatus::Idle,
		})
	}

	/// Record the latest query and, when it is long enough, look it up.
	///
	/// Returns immediately. Earlier lookups keep running; their responses are
	/// discarded when they arrive.
	pub fn submit(&mut self, query: impl Into<String>) {
		self.query = query.into();

		if self.query.chars().count() < self.min_query_len {
			debug!(query = %self.query, "query below minimum length; clearing suggestions");
			self.reset();
			return;
		}

		let token = self.tokens.issue();
		self.awaiting = Some(token);
		self.loading = true;
		self.status = LookupStatus::Pending(token);
		debug!(%token, query = %self.query, "issuing suggestion lookup");

		let command = LookupCommand::Lookup {
			token,
			query: self.query.clone(),
		};
		if self.commands.send(command).is_err() {
			self.apply_outcome(token, Err(LookupError::Disconnected));
		}
	}

	/// Drop the visible suggestions and stop waiting on any in-flight lookup.
	///
	/// The token counter is left untouched.
	pub fn clear(&mut self) {
		self.reset();
	}

	/// Apply every response that has already arrived.
	///
	/// Returns `true` when the visible state changed.
	pub fn pump(&mut self) -> bool {
		let mut changed = false;
		loop {
			match self.responses.try_recv() {
				Ok(response) => changed |= self.handle_response(response),
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
			}
		}
		changed
	}

	/// Block for up to `timeout` until one response arrives, apply it, then
	/// drain whatever else is waiting.
	///
	/// Returns `true` when the visible state changed.
	pub fn wait_for_response(&mut self, timeout: Duration) -> bool {
		let changed = match self.responses.recv_timeout(timeout) {
			Ok(response) => self.handle_response(response),
			Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
		};
		self.pump() || changed
	}

	/// Wait until the latest lookup has settled or `timeout` elapses.
	///
	/// Returns `true` when the coordinator is no longer loading.
	pub fn settle(&mut self, timeout: Duration) -> bool {
		let deadline = Instant::now() + timeout;
		while self.loading {
			let remaining = deadline.saturating_duration_since(Instant::now());
			if remaining.is_zero() {
				break;
			}
			match self.responses.recv_timeout(remaining) {
				Ok(response) => {
					self.handle_response(response);
				}
				Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
			}
		}
		self.pump();
		!self.loading
	}

	/// Suggestions for the freshest accepted query.
	#[must_use]
	pub fn results(&self) -> &ResultSet {
		&self.results
	}

	/// Whether a lookup for the latest query is still outstanding.
	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	#[must_use]
	pub fn status(&self) -> &LookupStatus {
		&self.status
	}

	/// Text passed to the most recent `submit`.
	#[must_use]
	pub fn query(&self) -> &str {
		&self.query
	}

	/// The most recently issued token, if any lookup was ever issued.
	#[must_use]
	pub fn latest_token(&self) -> Option<SequenceToken> {
		self.tokens.latest()
	}

	#[must_use]
	pub fn snapshot(&self) -> SuggestionSnapshot {
		SuggestionSnapshot {
			query: self.query.clone(),
			results: self.results.clone(),
			loading: self.loading,
			status: self.status.clone(),
			latest_token: self.tokens.latest(),
		}
	}

	fn reset(&mut self) {
		self.awaiting = None;
		self.results = ResultSet::empty();
		self.loading = false;
		self.status = LookupStatus::Idle;
	}

	/// Accept `response` only when it answers the newest issued request.
	fn handle_response(&mut self, response: LookupResponse) -> bool {
		let LookupResponse {
			token,
			query,
			outcome,
		} = response;

		if self.awaiting != Some(token) || !self.tokens.is_latest(token) {
			debug!(%token, query = %query, "discarding stale suggestion response");
			return false;
		}

		self.apply_outcome(token, outcome);
		true
	}

	fn apply_outcome(
		&mut self,
		token: SequenceToken,
		outcome: Result<Vec<Suggestion>, LookupError>,
	) {
		self.awaiting = None;
		self.loading = false;
		match outcome {
			Ok(suggestions) => {
				debug!(%token, count = suggestions.len(), "accepted suggestion response");
				self.results = ResultSet::from(suggestions);
				self.status = LookupStatus::Ready;
			}
			Err(err) => {
				warn!(%token, error = %err, "suggestion lookup failed; showing no suggestions");
				self.results = ResultSet::empty();
				self.status = LookupStatus::Failed(err);
			}
		}
	}
}

impl Drop for SuggestionCoordinator {
	fn drop(&mut self) {
		for _ in 0..self.workers {
			let _ = self.commands.send(LookupCommand::Shutdown);
		}
	}
}
