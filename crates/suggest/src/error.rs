use thiserror::Error;

/// Any failure of a [`SuggestionSource`](crate::SuggestionSource) lookup.
///
/// The coordinator never propagates this to callers of
/// [`submit`](crate::SuggestionCoordinator::submit); it only records the most
/// recent one in [`LookupStatus::Failed`](crate::LookupStatus::Failed).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
	/// The remote side could not be reached.
	#[error("suggestion lookup could not reach its backend: {0}")]
	Network(String),

	/// The remote side answered with something that could not be interpreted.
	#[error("suggestion lookup returned a malformed response: {0}")]
	Malformed(String),

	/// The remote side answered with a non-success status.
	#[error("suggestion lookup failed with status {code}")]
	Status { code: u16 },

	/// A storage or identity backend reported an error.
	#[error("suggestion backend error: {0}")]
	Backend(String),

	/// The lookup workers are no longer running.
	#[error("suggestion lookup workers have shut down")]
	Disconnected,

	/// The lookup panicked on its worker thread.
	#[error("suggestion lookup panicked: {0}")]
	Panicked(String),
}

impl LookupError {
	pub fn backend(err: impl std::fmt::Display) -> Self {
		Self::Backend(err.to_string())
	}
}
