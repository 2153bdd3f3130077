use aisle_domain::{CatalogEntry, normalize};

pub const COLLECTION_WEIGHT: f32 = 7.0;
pub const THEME_WEIGHT: f32 = 6.0;
pub const CATEGORY_WEIGHT: f32 = 5.0;
pub const SYNONYM_WEIGHT: f32 = 4.0;
pub const TITLE_WEIGHT: f32 = 3.0;
pub const IDENTIFIER_WEIGHT: f32 = 3.0;
pub const DESCRIPTION_WEIGHT: f32 = 2.0;
pub const PREFIX_WEIGHT: f32 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score {
	pub value: f32,
	/// Set when a collection, theme, category, synonym, keyword or tag field matched.
	pub strong: bool,
}
impl Score {
	/// Only confident entries are eligible for ranking. Loose title or description hits alone
	/// never qualify.
	pub fn is_confident(&self) -> bool {
		self.value > 0.0 && self.strong
	}
}

/// Folded copies of the scored fields, built once per entry per query.
struct Fields {
	identifier: String,
	title: String,
	collection: String,
	category: String,
	description: String,
	themes: Vec<String>,
	signals: Vec<String>,
}
impl Fields {
	fn new(entry: &CatalogEntry) -> Self {
		let fold_all = |values: &[String]| -> Vec<String> {
			values.iter().map(|value| normalize::normalize(value)).collect()
		};
		let mut signals = fold_all(&entry.synonyms);

		signals.extend(fold_all(&entry.keywords));
		signals.extend(fold_all(&entry.tags));

		Self {
			identifier: normalize::normalize(&entry.key),
			title: normalize::normalize(&entry.title),
			collection: entry.collection.as_deref().map(normalize::normalize).unwrap_or_default(),
			category: normalize::normalize(&entry.category),
			description: normalize::normalize(&entry.description),
			themes: fold_all(&entry.themes),
			signals,
		}
	}
}

/// Accumulates weighted field hits for every folded term. A term may score on several fields.
pub fn score(entry: &CatalogEntry, terms: &[String]) -> Score {
	let mut out = Score::default();

	if terms.is_empty() {
		return out;
	}

	let fields = Fields::new(entry);

	for term in terms.iter().map(String::as_str).filter(|term| !term.is_empty()) {
		let mut strong_hit = |hit: bool, weight: f32| {
			if hit {
				out.value += weight;
				out.strong = true;
			}
		};

		strong_hit(fields.collection.contains(term), COLLECTION_WEIGHT);
		strong_hit(fields.themes.iter().any(|theme| theme.contains(term)), THEME_WEIGHT);
		strong_hit(fields.category.contains(term), CATEGORY_WEIGHT);
		strong_hit(fields.signals.iter().any(|signal| signal.contains(term)), SYNONYM_WEIGHT);

		if fields.title.contains(term) {
			out.value += TITLE_WEIGHT;
		}
		if fields.identifier.contains(term) {
			out.value += IDENTIFIER_WEIGHT;
		}
		if fields.description.contains(term) {
			out.value += DESCRIPTION_WEIGHT;
		}
		if [&fields.title, &fields.collection, &fields.category, &fields.identifier]
			.into_iter()
			.any(|field| field.starts_with(term))
		{
			out.value += PREFIX_WEIGHT;
		}
	}

	out
}
