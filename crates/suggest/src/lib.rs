//! Incremental suggestion lookups guarded against stale responses.
//!
//! A [`SuggestionCoordinator`] receives one query per keystroke. Queries that
//! are long enough are tagged with a fresh [`SequenceToken`] and looked up on
//! a small worker pool through a [`SuggestionSource`]. Lookups are never
//! cancelled; when a response comes back its token is compared with the
//! newest one issued, and anything older is dropped on the floor. The visible
//! [`ResultSet`] therefore always belongs to the most recent request,
//! whatever order the lookups finish in.
//!
//! ```
//! use std::time::Duration;
//!
//! use tastybite_suggest::{CoordinatorOptions, FnSource, Suggestion, SuggestionCoordinator};
//!
//! let source =
//!     FnSource::new(|query: &str| Ok(vec![Suggestion::new("1", format!("{query}ta"))]));
//! let options = CoordinatorOptions::default();
//! let mut coordinator = SuggestionCoordinator::new(source, options).unwrap();
//!
//! coordinator.submit("p");
//! assert!(coordinator.results().is_empty());
//!
//! coordinator.submit("pas");
//! assert!(coordinator.settle(Duration::from_secs(1)));
//! assert_eq!(coordinator.results()[0].display_name, "pasta");
//! ```
//!
//! Lookup failures never escape the coordinator: they leave an empty result
//! set behind and are reported through [`LookupStatus::Failed`].

mod coordinator;
mod error;
mod source;
mod suggestion;
mod token;

pub use coordinator::{
	CoordinatorOptions, DEFAULT_MIN_QUERY_LEN, DEFAULT_WORKERS, LookupStatus, SuggestionCoordinator,
	SuggestionSnapshot,
};
pub use error::LookupError;
pub use source::{FnSource, SuggestionSource};
pub use suggestion::{ResultSet, Suggestion};
pub use token::{SequenceToken, TokenCounter};
