use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use frizbee::{Config, match_list};
use serde::{Deserialize, Serialize};

use super::Recipe;

/// How a query is matched against recipes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
	/// Case-insensitive containment in title, category or any ingredient.
	#[default]
	Substring,
	/// Typo-tolerant ranking on the title.
	Fuzzy,
}

impl MatchMode {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Substring => "substring",
			Self::Fuzzy => "fuzzy",
		}
	}
}

impl fmt::Display for MatchMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MatchMode {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"substring" | "contains" => Ok(Self::Substring),
			"fuzzy" => Ok(Self::Fuzzy),
			other => Err(format!("unknown match mode '{other}'")),
		}
	}
}

/// Filter `recipes` by `query`.
///
/// A blank query keeps every recipe in input order. Substring matching keeps
/// input order too; fuzzy matching orders by score, ties by input order.
#[must_use]
pub fn filter_recipes<'a>(recipes: &'a [Recipe], query: &str, mode: MatchMode) -> Vec<&'a Recipe> {
	let trimmed = query.trim();
	if trimmed.is_empty() {
		return recipes.iter().collect();
	}

	match mode {
		MatchMode::Substring => substring_matches(recipes, trimmed),
		MatchMode::Fuzzy => fuzzy_matches(recipes, trimmed),
	}
}

fn substring_matches<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
	let needle = query.to_lowercase();
	let contains = |text: &str| text.to_lowercase().contains(&needle);
	recipes
		.iter()
		.filter(|recipe| {
			contains(recipe.title.as_str())
				|| recipe.category.as_deref().is_some_and(contains)
				|| recipe.ingredients.iter().any(|ingredient| contains(ingredient.as_str()))
		})
		.collect()
}

fn fuzzy_matches<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
	let haystacks: Vec<&str> = recipes.iter().map(|recipe| recipe.title.as_str()).collect();
	let config = config_for_query(query);

	let mut ranked: Vec<(u16, usize)> = match_list(query, &haystacks, &config)
		.into_iter()
		.filter(|entry| entry.score > 0)
		.map(|entry| (entry.score, entry.index as usize))
		.collect();
	ranked.sort_by_key(|&(score, index)| (Reverse(score), index));
	ranked.into_iter().map(|(_, index)| &recipes[index]).collect()
}

/// Matching options scaled to the query length: longer queries tolerate
/// more typos.
fn config_for_query(query: &str) -> Config {
	let length = query.chars().count();
	let mut allowed_typos: u16 = match length {
		0..=1 => 0,
		2..=4 => 1,
		5..=7 => 2,
		_ => 3,
	};
	if let Ok(max_reasonable) = u16::try_from(length.saturating_sub(1)) {
		allowed_typos = allowed_typos.min(max_reasonable);
	}

	Config {
		prefilter: true,
		max_typos: Some(allowed_typos),
		sort: false,
		..Config::default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recipe(id: &str, title: &str, category: Option<&str>, ingredients: &[&str]) -> Recipe {
		Recipe {
			id: id.to_string(),
			title: title.to_string(),
			description: String::new(),
			ingredients: ingredients.iter().map(|item| (*item).to_string()).collect(),
			steps: Vec::new(),
			category: category.map(str::to_string),
			image_ref: None,
			author_id: None,
			created_at: 0,
		}
	}

	fn catalog() -> Vec<Recipe> {
		vec![
			recipe("1", "Pasta al pomodoro", Some("Italian"), &["spaghetti", "tomato"]),
			recipe("2", "Apple pie", Some("Dessert"), &["pastry", "apples"]),
			recipe("3", "Miso soup", Some("Japanese"), &["miso", "tofu"]),
			recipe("4", "Tiramisu", Some("Dessert"), &["mascarpone", "espresso"]),
		]
	}

	fn ids(recipes: &[&Recipe]) -> Vec<String> {
		recipes.iter().map(|recipe| recipe.id.clone()).collect()
	}

	#[test]
	fn blank_query_keeps_everything() {
		let recipes = catalog();
		assert_eq!(filter_recipes(&recipes, "   ", MatchMode::Substring).len(), 4);
		assert_eq!(filter_recipes(&recipes, "", MatchMode::Fuzzy).len(), 4);
	}

	#[test]
	fn substring_matches_title_category_and_ingredients() {
		let recipes = catalog();
		assert_eq!(ids(&filter_recipes(&recipes, "PAST", MatchMode::Substring)), ["1", "2"]);
		assert_eq!(ids(&filter_recipes(&recipes, "dessert", MatchMode::Substring)), ["2", "4"]);
		assert_eq!(ids(&filter_recipes(&recipes, " tofu ", MatchMode::Substring)), ["3"]);
		assert!(filter_recipes(&recipes, "lasagne", MatchMode::Substring).is_empty());
	}

	#[test]
	fn fuzzy_ranks_the_closest_title_first() {
		let recipes = catalog();
		let matches = filter_recipes(&recipes, "tiramisu", MatchMode::Fuzzy);
		assert_eq!(matches.first().map(|recipe| recipe.id.as_str()), Some("4"));
	}

	#[test]
	fn fuzzy_ties_keep_input_order() {
		let recipes = vec![
			recipe("b", "Pavlova", None, &[]),
			recipe("x", "Tiramisu", None, &[]),
			recipe("a", "Pavlova", None, &[]),
		];
		assert_eq!(ids(&filter_recipes(&recipes, "pavlova", MatchMode::Fuzzy)), ["b", "a"]);
	}

	#[test]
	fn fuzzy_without_any_match_is_empty() {
		let recipes = catalog();
		assert!(filter_recipes(&recipes, "zzzz", MatchMode::Fuzzy).is_empty());
	}

	#[test]
	fn typo_budget_grows_with_query_length() {
		assert_eq!(config_for_query("a").max_typos, Some(0));
		assert_eq!(config_for_query("pie").max_typos, Some(1));
		assert_eq!(config_for_query("tiramisu").max_typos, Some(3));
	}

	#[test]
	fn match_mode_parses_from_text() {
		assert_eq!("Fuzzy".parse::<MatchMode>(), Ok(MatchMode::Fuzzy));
		assert_eq!("contains".parse::<MatchMode>(), Ok(MatchMode::Substring));
		assert!("regex".parse::<MatchMode>().is_err());
	}
}
