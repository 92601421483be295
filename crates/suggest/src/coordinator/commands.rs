use crate::{LookupError, SequenceToken, Suggestion};

/// Commands understood by the lookup workers.
#[derive(Debug)]
pub(crate) enum LookupCommand {
	/// Run one lookup for the provided query.
	Lookup {
		/// Token the coordinator allocated for this request.
		token: SequenceToken,
		/// Query text exactly as submitted.
		query: String,
	},
	/// Stop the receiving worker thread.
	Shutdown,
}

/// Outcome of a single lookup, sent back to the coordinator.
#[derive(Debug)]
pub(crate) struct LookupResponse {
	pub token: SequenceToken,
	pub query: String,
	pub outcome: Result<Vec<Suggestion>, LookupError>,
}
