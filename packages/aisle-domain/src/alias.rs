use std::collections::{BTreeMap, HashSet};

use crate::{SemanticIndex, normalize};

/// Rewrites query terms into canonical theme and category terms using the alias tables carried in
/// the index. Keys and values are folded once on construction.
#[derive(Debug, Clone, Default)]
pub struct AliasExpander {
	themes: Vec<(String, Vec<String>)>,
	categories: Vec<(String, String)>,
}
impl AliasExpander {
	pub fn new(
		theme_aliases: &BTreeMap<String, Vec<String>>,
		category_aliases: &BTreeMap<String, String>,
	) -> Self {
		let themes = theme_aliases
			.iter()
			.filter_map(|(alias, terms)| {
				let alias = normalize::normalize(alias);
				let terms: Vec<String> = terms
					.iter()
					.map(|term| normalize::normalize(term))
					.filter(|term| !term.is_empty())
					.collect();

				(!alias.is_empty()).then_some((alias, terms))
			})
			.collect();
		let categories = category_aliases
			.iter()
			.filter_map(|(alias, canonical)| {
				let alias = normalize::normalize(alias);
				let canonical = normalize::normalize(canonical);

				(!alias.is_empty() && !canonical.is_empty()).then_some((alias, canonical))
			})
			.collect();

		Self { themes, categories }
	}

	pub fn from_index(index: &SemanticIndex) -> Self {
		Self::new(&index.theme_aliases, &index.category_aliases)
	}

	/// Returns the input terms followed by every canonical term an alias maps them to. Output is
	/// deduplicated and keeps first-seen order.
	pub fn expand(&self, terms: &[String]) -> Vec<String> {
		let mut out = Vec::with_capacity(terms.len());
		let mut seen = HashSet::new();

		for term in terms {
			push_term(&mut out, &mut seen, term);
		}

		for term in terms {
			let folded = normalize::normalize(term);

			self.push_hits(&mut out, &mut seen, |alias| alias == folded);
		}

		out
	}

	/// Like [`Self::expand`], and also applies multi-word aliases ("latin vibes") that occur as
	/// a phrase in the folded query.
	pub fn expand_query(&self, folded_query: &str, terms: &[String]) -> Vec<String> {
		let mut out = self.expand(terms);
		let mut seen: HashSet<String> = out.iter().cloned().collect();

		self.push_hits(&mut out, &mut seen, |alias| {
			alias.contains(' ') && normalize::contains_phrase(folded_query, alias)
		});

		out
	}

	fn push_hits<F>(&self, out: &mut Vec<String>, seen: &mut HashSet<String>, matches: F)
	where
		F: Fn(&str) -> bool,
	{
		for (alias, terms) in &self.themes {
			if matches(alias.as_str()) {
				for term in terms {
					push_term(out, seen, term);
				}
			}
		}
		for (alias, canonical) in &self.categories {
			if matches(alias.as_str()) {
				push_term(out, seen, canonical);
			}
		}
	}
}

fn push_term(out: &mut Vec<String>, seen: &mut HashSet<String>, term: &str) {
	if term.is_empty() {
		return;
	}
	if seen.insert(term.to_string()) {
		out.push(term.to_string());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn expander() -> AliasExpander {
		let themes = BTreeMap::from([
			("Fiesta".to_string(), vec!["latin".to_string(), "Celebration".to_string()]),
			("latin vibes".to_string(), vec!["latin-mediterranean".to_string()]),
		]);
		let categories = BTreeMap::from([("Hoodie".to_string(), "hoodies".to_string())]);

		AliasExpander::new(&themes, &categories)
	}

	fn terms(values: &[&str]) -> Vec<String> {
		values.iter().map(|value| value.to_string()).collect()
	}

	#[test]
	fn theme_alias_adds_every_canonical_term() {
		let expanded = expander().expand(&terms(&["fiesta"]));

		assert_eq!(expanded, vec!["fiesta", "latin", "celebration"]);
	}

	#[test]
	fn category_alias_adds_single_term() {
		let expanded = expander().expand(&terms(&["hoodie", "owl"]));

		assert_eq!(expanded, vec!["hoodie", "owl", "hoodies"]);
	}

	#[test]
	fn matching_is_case_and_diacritic_insensitive() {
		let themes = BTreeMap::from([("fiésta".to_string(), vec!["latin".to_string()])]);
		let expander = AliasExpander::new(&themes, &BTreeMap::new());

		assert!(expander.expand(&terms(&["FIESTA"])).contains(&"latin".to_string()));
	}

	#[test]
	fn expansion_never_drops_input_terms() {
		let input = terms(&["mug", "owl"]);

		assert_eq!(expander().expand(&input), input);
		assert!(expander().expand(&[]).is_empty());
	}

	#[test]
	fn multi_word_alias_matches_as_phrase() {
		let query = "latin vibes tote";
		let expanded = expander().expand_query(query, &terms(&["latin", "vibes", "tote"]));

		assert_eq!(expanded, vec!["latin", "vibes", "tote", "latin-mediterranean"]);

		let expanded = expander().expand_query("vibes only", &terms(&["vibes"]));

		assert_eq!(expanded, vec!["vibes"]);
	}
}
