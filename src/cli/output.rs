use anyhow::Result;
use serde_json::{Value, json};
use tastybite::{LookupStatus, SuggestionSnapshot};

use crate::workflow::{Outcome, SearchOutcome, SuggestOutcome};

/// Print a plain-text representation of the outcome.
pub(crate) fn print_plain(outcome: &Outcome) {
	print!("{}", format_plain(outcome));
}

/// Print the JSON representation of the outcome.
pub(crate) fn print_json(outcome: &Outcome) -> Result<()> {
	println!("{}", format_outcome_json(outcome)?);
	Ok(())
}

fn format_plain(outcome: &Outcome) -> String {
	match outcome {
		Outcome::Suggestions(outcome) => format_suggestions_plain(outcome),
		Outcome::Search(outcome) => format_search_plain(outcome),
	}
}

fn format_suggestions_plain(outcome: &SuggestOutcome) -> String {
	let snapshot = &outcome.snapshot;
	let mut text = format!("query: '{}'\n", snapshot.query);
	text.push_str(&format!("status: {}\n", status_line(snapshot)));
	if snapshot.results.is_empty() {
		text.push_str("no suggestions\n");
	}
	for suggestion in snapshot.results.iter() {
		text.push_str(&format!("  {} ({})\n", suggestion.display_name, suggestion.id));
	}
	text
}

fn format_search_plain(outcome: &SearchOutcome) -> String {
	let mut text = format!(
		"{} recipe(s) match '{}' ({})\n",
		outcome.recipes.len(),
		outcome.query,
		outcome.mode
	);
	for recipe in &outcome.recipes {
		match &recipe.category {
			Some(category) => text.push_str(&format!("  {} [{category}]\n", recipe.title)),
			None => text.push_str(&format!("  {}\n", recipe.title)),
		}
	}
	text
}

fn status_line(snapshot: &SuggestionSnapshot) -> String {
	match &snapshot.status {
		LookupStatus::Idle => "idle".to_string(),
		LookupStatus::Pending(token) => format!("still waiting on lookup {token}"),
		LookupStatus::Ready => "ready".to_string(),
		LookupStatus::Failed(err) => format!("lookup failed ({err})"),
	}
}

/// Format the outcome as a JSON string.
pub(crate) fn format_outcome_json(outcome: &Outcome) -> Result<String> {
	let payload = match outcome {
		Outcome::Suggestions(outcome) => suggestions_json(outcome),
		Outcome::Search(outcome) => json!({
			"query": outcome.query,
			"mode": outcome.mode,
			"recipes": outcome.recipes,
		}),
	};
	Ok(serde_json::to_string_pretty(&payload)?)
}

fn suggestions_json(outcome: &SuggestOutcome) -> Value {
	let snapshot = &outcome.snapshot;
	let (status, error) = match &snapshot.status {
		LookupStatus::Idle => ("idle", Value::Null),
		LookupStatus::Pending(_) => ("pending", Value::Null),
		LookupStatus::Ready => ("ready", Value::Null),
		LookupStatus::Failed(err) => ("failed", Value::String(err.to_string())),
	};
	json!({
		"submitted": outcome.queries,
		"query": snapshot.query,
		"loading": snapshot.loading,
		"status": status,
		"error": error,
		"latest_token": snapshot.latest_token.map(|token| token.get()),
		"suggestions": snapshot.results,
	})
}

#[cfg(test)]
mod tests {
	use tastybite::{LookupError, MatchMode, Recipe, ResultSet, SequenceToken, Suggestion};

	use super::*;

	fn snapshot(status: LookupStatus, results: Vec<Suggestion>) -> SuggestionSnapshot {
		SuggestionSnapshot {
			query: "pas".to_string(),
			results: ResultSet::from(results),
			loading: false,
			status,
			latest_token: None::<SequenceToken>,
		}
	}

	#[test]
	fn json_includes_suggestions_and_status() {
		let outcome = Outcome::Suggestions(SuggestOutcome {
			queries: vec!["pa".into(), "pas".into()],
			snapshot: snapshot(LookupStatus::Ready, vec![Suggestion::new("2", "pastry")]),
		});

		let json = format_outcome_json(&outcome).expect("json");
		let value: Value = serde_json::from_str(&json).expect("parse");
		assert_eq!(value["status"], "ready");
		assert_eq!(value["submitted"][1], "pas");
		assert_eq!(value["suggestions"][0]["display_name"], "pastry");
		assert!(value["error"].is_null());
	}

	#[test]
	fn failures_are_distinguishable_from_no_matches() {
		let failed = Outcome::Suggestions(SuggestOutcome {
			queries: vec!["eg".into()],
			snapshot: snapshot(LookupStatus::Failed(LookupError::Status { code: 500 }), Vec::new()),
		});
		let value: Value =
			serde_json::from_str(&format_outcome_json(&failed).expect("json")).expect("parse");
		assert_eq!(value["status"], "failed");
		assert_eq!(value["suggestions"], json!([]));
		assert!(format_plain(&failed).contains("lookup failed"));
	}

	#[test]
	fn plain_search_lists_titles_with_categories() {
		let recipe: Recipe = serde_json::from_value(json!({
			"id": "r1",
			"title": "Tiramisu",
			"category": "Dessert",
		}))
		.expect("recipe");
		let outcome = Outcome::Search(SearchOutcome {
			query: "tira".into(),
			mode: MatchMode::Substring,
			recipes: vec![recipe],
		});
		let text = format_plain(&outcome);
		assert!(text.starts_with("1 recipe(s) match 'tira' (substring)"));
		assert!(text.contains("  Tiramisu [Dessert]"));
	}
}
