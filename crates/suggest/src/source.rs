use std::sync::Arc;

use crate::{LookupError, Suggestion};

/// Remote lookup consulted by the [`SuggestionCoordinator`](crate::SuggestionCoordinator).
///
/// Lookups run on the coordinator's worker threads and may block for as long
/// as they need. Nothing is assumed about latency or completion order.
pub trait SuggestionSource: Send + Sync + 'static {
	/// Return candidates for a partial query.
	fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError>;
}

impl<S: SuggestionSource + ?Sized> SuggestionSource for Arc<S> {
	fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
		(**self).lookup(query)
	}
}

impl<S: SuggestionSource + ?Sized> SuggestionSource for Box<S> {
	fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
		(**self).lookup(query)
	}
}

/// Adapter turning a closure into a [`SuggestionSource`].
pub struct FnSource<F>(F);

impl<F> FnSource<F>
where
	F: Fn(&str) -> Result<Vec<Suggestion>, LookupError> + Send + Sync + 'static,
{
	pub fn new(lookup: F) -> Self {
		Self(lookup)
	}
}

impl<F> SuggestionSource for FnSource<F>
where
	F: Fn(&str) -> Result<Vec<Suggestion>, LookupError> + Send + Sync + 'static,
{
	fn lookup(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
		(self.0)(query)
	}
}
