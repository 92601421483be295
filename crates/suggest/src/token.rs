use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Recency marker attached to every issued lookup.
///
/// Tokens are allocated from a [`TokenCounter`] and only ever compared. The
/// zero value is reserved for "nothing issued yet".
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceToken(u64);

impl SequenceToken {
	/// Raw counter value.
	#[must_use]
	pub fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for SequenceToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Monotonic source of [`SequenceToken`]s shared between the coordinator and
/// its lookup workers.
///
/// The coordinator is the only caller of [`TokenCounter::issue`]; workers
/// merely read [`TokenCounter::latest`] to notice that their job has been
/// superseded.
#[derive(Debug, Default)]
pub struct TokenCounter {
	latest: AtomicU64,
}

impl TokenCounter {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocate a token strictly greater than every token issued before.
	pub fn issue(&self) -> SequenceToken {
		let previous = self.latest.fetch_add(1, AtomicOrdering::AcqRel);
		SequenceToken(previous + 1)
	}

	/// The most recently issued token, if any.
	#[must_use]
	pub fn latest(&self) -> Option<SequenceToken> {
		match self.latest.load(AtomicOrdering::Acquire) {
			0 => None,
			value => Some(SequenceToken(value)),
		}
	}

	/// Whether `token` is still the newest one issued.
	#[must_use]
	pub fn is_latest(&self, token: SequenceToken) -> bool {
		self.latest.load(AtomicOrdering::Acquire) == token.0
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::thread;

	use super::*;

	#[test]
	fn tokens_strictly_increase() {
		let counter = TokenCounter::new();
		assert_eq!(counter.latest(), None);

		let first = counter.issue();
		let second = counter.issue();
		assert!(second > first);
		assert_eq!(counter.latest(), Some(second));
		assert!(!counter.is_latest(first));
		assert!(counter.is_latest(second));
	}

	#[test]
	fn concurrent_issuers_never_share_a_token() {
		let counter = Arc::new(TokenCounter::new());
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let counter = Arc::clone(&counter);
				thread::spawn(move || (0..250).map(|_| counter.issue()).collect::<Vec<_>>())
			})
			.collect();

		let mut all: Vec<SequenceToken> = handles
			.into_iter()
			.flat_map(|handle| handle.join().expect("issuer thread"))
			.collect();
		all.sort();
		all.dedup();
		assert_eq!(all.len(), 1_000);
		assert_eq!(counter.latest().map(SequenceToken::get), Some(1_000));
	}
}
