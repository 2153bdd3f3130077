use std::{cmp::Ordering, collections::HashSet};

use aisle_domain::{CatalogEntry, normalize};

#[derive(Clone, Copy, Debug)]
pub struct Scored<'a> {
	pub entry: &'a CatalogEntry,
	pub score: f32,
}

/// Preference for flagship collections over legacy ones sharing their vocabulary.
#[derive(Clone, Copy, Debug)]
pub struct CollectionBoost<'a> {
	pub prefixes: &'a [String],
	pub amount: f32,
}
impl CollectionBoost<'_> {
	pub fn applies(&self, entry: &CatalogEntry) -> bool {
		let Some(collection) = entry.collection.as_deref() else {
			return false;
		};
		let collection = normalize::normalize(collection);

		self.prefixes.iter().any(|prefix| collection.starts_with(prefix.as_str()))
	}
}

/// Boosts, orders by descending score, keeps the best entry per handle and truncates.
///
/// The sort is stable, so equal scores keep their input order.
pub fn rank<'a>(
	scored: Vec<Scored<'a>>,
	limit: usize,
	boost: &CollectionBoost<'_>,
) -> Vec<Scored<'a>> {
	let mut boosted: Vec<Scored<'a>> = scored
		.into_iter()
		.map(|hit| {
			if boost.applies(hit.entry) {
				Scored { score: hit.score + boost.amount, ..hit }
			} else {
				hit
			}
		})
		.collect();

	boosted.sort_by(|lhs, rhs| cmp_f32_desc(lhs.score, rhs.score));

	let mut seen = HashSet::new();

	boosted.retain(|hit| seen.insert(hit.entry.handle.as_str()));
	boosted.truncate(limit);

	boosted
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn product(handle: &str, collection: &str) -> CatalogEntry {
		CatalogEntry {
			key: format!("{collection}-product-{handle}"),
			handle: handle.to_string(),
			collection: Some(collection.to_string()),
			..Default::default()
		}
	}

	#[test]
	fn primary_collection_wins_ties() {
		let legacy = product("meander", "legacy-greek");
		let flagship = product("owl", "Greekify-Classics");
		let prefixes = vec!["greekify".to_string()];
		let boost = CollectionBoost { prefixes: &prefixes, amount: 3.0 };
		let out = rank(
			vec![Scored { entry: &legacy, score: 6.0 }, Scored { entry: &flagship, score: 6.0 }],
			3,
			&boost,
		);

		assert_eq!(out[0].entry.handle, "owl");
		assert_eq!(out[0].score, 9.0);
		assert_eq!(out[1].score, 6.0);
	}

	#[test]
	fn dedupes_by_handle_keeping_best_boosted_score() {
		let legacy = product("owl", "legacy-greek");
		let flagship = product("owl", "greekify");
		let other = product("tote", "spanishify");
		let prefixes = vec!["greekify".to_string()];
		let boost = CollectionBoost { prefixes: &prefixes, amount: 3.0 };
		let out = rank(
			vec![
				Scored { entry: &legacy, score: 8.0 },
				Scored { entry: &other, score: 7.0 },
				Scored { entry: &flagship, score: 6.0 },
			],
			3,
			&boost,
		);
		let handles: Vec<&str> = out.iter().map(|hit| hit.entry.handle.as_str()).collect();

		assert_eq!(handles, vec!["owl", "tote"]);
		assert_eq!(out[0].entry.collection.as_deref(), Some("greekify"));
		assert_eq!(out[0].score, 9.0);
	}

	#[test]
	fn output_is_bounded_and_descending() {
		let entries: Vec<CatalogEntry> =
			(0..10).map(|i| product(&format!("p{i}"), "misc")).collect();
		let scored = entries
			.iter()
			.enumerate()
			.map(|(i, entry)| Scored { entry, score: (i % 4) as f32 })
			.collect();
		let boost = CollectionBoost { prefixes: &[], amount: 3.0 };
		let out = rank(scored, 4, &boost);

		assert_eq!(out.len(), 4);
		assert!(out.windows(2).all(|pair| pair[0].score >= pair[1].score));
		// Stable: among the score-3 entries, p3 precedes p7.
		assert_eq!(out[0].entry.handle, "p3");
		assert_eq!(out[1].entry.handle, "p7");
	}

	#[test]
	fn nan_scores_sink() {
		let a = product("a", "misc");
		let b = product("b", "misc");
		let boost = CollectionBoost { prefixes: &[], amount: 0.0 };
		let scored = vec![Scored { entry: &a, score: f32::NAN }, Scored { entry: &b, score: 1.0 }];
		let out = rank(scored, 2, &boost);

		assert_eq!(out[0].entry.handle, "b");
	}
}
