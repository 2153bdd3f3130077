//! Locale-insensitive text folding for matching queries against catalog text.

use std::{collections::HashSet, sync::LazyLock};

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

// Stored already folded. Covers articles, pronouns and politeness words for English, Greek,
// Spanish and Italian.
const STOPWORDS: &[&str] = &[
	// en
	"a", "an", "the", "i", "me", "my", "you", "your", "we", "us", "our", "it", "its", "is", "are",
	"am", "be", "do", "does", "have", "has", "any", "some", "to", "of", "for", "in", "on", "and",
	"or", "with", "please", "pls", "thanks", "thank", "hi", "hello", "hey", "show", "want",
	"looking", "need", "can", "could", "would", "like",
	// el
	"ο", "η", "το", "οι", "τα", "τον", "την", "του", "της", "των", "ενα", "ενας", "μια", "εγω",
	"μου", "με", "εσυ", "σου", "εμεις", "μας", "θελω", "εχετε", "παρακαλω", "ευχαριστω", "γεια",
	"και", "για", "σε",
	// es
	"el", "la", "los", "las", "un", "una", "unos", "unas", "yo", "mi", "tu", "te", "nos", "por",
	"favor", "gracias", "hola", "quiero", "de", "y", "con", "para",
	// it
	"il", "lo", "gli", "le", "uno", "io", "per", "favore", "grazie", "ciao", "voglio", "di", "e",
	"da",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
	LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Lowercases, strips diacritics, trims and collapses inner whitespace.
pub fn normalize(text: &str) -> String {
	let folded: String = text.to_lowercase().nfkd().filter(|ch| !is_combining_mark(*ch)).collect();

	folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits on whitespace and comma runs, folds each token and drops stopwords. Punctuation at
/// token edges is removed; inner hyphens survive ("t-shirt").
pub fn tokenize(text: &str) -> Vec<String> {
	let mut out = Vec::new();

	for raw in text.split(|ch: char| ch.is_whitespace() || ch == ',') {
		let trimmed = raw.trim_matches(|ch: char| !ch.is_alphanumeric());

		if trimmed.is_empty() {
			continue;
		}

		let token = normalize(trimmed);

		if token.is_empty() || is_stopword(&token) {
			continue;
		}

		out.push(token);
	}

	out
}

pub fn is_stopword(token: &str) -> bool {
	STOPWORD_SET.contains(token)
}

/// Whether `phrase` occurs in `haystack` on word boundaries. Both sides must already be folded.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
	if phrase.is_empty() {
		return false;
	}

	haystack.match_indices(phrase).any(|(start, _)| {
		let end = start + phrase.len();
		let before = haystack[..start].chars().next_back();
		let after = haystack[end..].chars().next();

		before.map(|ch| !ch.is_alphanumeric()).unwrap_or(true)
			&& after.map(|ch| !ch.is_alphanumeric()).unwrap_or(true)
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn folds_case_and_diacritics() {
		assert_eq!(normalize("CAFÉ"), normalize("cafe"));
		assert_eq!(normalize("  Ελληνικά  Μπλουζάκια "), "ελληνικα μπλουζακια");
		assert_eq!(normalize("Niño"), "nino");
	}

	#[test]
	fn tokenize_drops_stopwords_and_keeps_order() {
		assert_eq!(tokenize("Show me the hoodies, please!"), vec!["hoodies"]);
		assert_eq!(tokenize("owl   t-shirt,,mug"), vec!["owl", "t-shirt", "mug"]);
		assert_eq!(tokenize("Θέλω μια κούπα"), vec!["κουπα"]);
		assert_eq!(tokenize("Quiero una sudadera por favor"), vec!["sudadera"]);
	}

	#[test]
	fn stopwords_are_folded_and_unique() {
		assert_eq!(STOPWORD_SET.len(), STOPWORDS.len());
		assert!(STOPWORDS.iter().all(|word| normalize(word) == *word));
	}

	#[test]
	fn blank_input_yields_nothing() {
		assert!(tokenize("").is_empty());
		assert!(tokenize("   , ,  ").is_empty());
		assert!(tokenize("?!").is_empty());
	}

	#[test]
	fn phrase_matching_respects_word_boundaries() {
		assert!(contains_phrase("i love latin vibes today", "latin vibes"));
		assert!(!contains_phrase("latinvibes", "latin vibes"));
		assert!(!contains_phrase("sealion", "seal"));
		assert!(contains_phrase("seal", "seal"));
	}
}
