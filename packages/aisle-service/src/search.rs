mod rank;
mod score;

pub use rank::{CollectionBoost, Scored, cmp_f32_desc, rank};
pub use score::{
	CATEGORY_WEIGHT, COLLECTION_WEIGHT, DESCRIPTION_WEIGHT, IDENTIFIER_WEIGHT, PREFIX_WEIGHT,
	SYNONYM_WEIGHT, Score, THEME_WEIGHT, TITLE_WEIGHT, score,
};

use serde::Serialize;

use aisle_config::Ranking;
use aisle_domain::{AliasExpander, SemanticIndex, normalize};

use crate::AssistantService;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductHit {
	pub handle: String,
	pub title: String,
	pub url: String,
	pub image: Option<String>,
	pub collection: Option<String>,
	pub category: String,
	pub themes: Vec<String>,
	pub score: f32,
}
impl From<Scored<'_>> for ProductHit {
	fn from(hit: Scored<'_>) -> Self {
		let entry = hit.entry;

		Self {
			handle: entry.handle.clone(),
			title: entry.title.clone(),
			url: entry.url.clone(),
			image: entry.image.clone(),
			collection: entry.collection.clone(),
			category: entry.category.clone(),
			themes: entry.themes.clone(),
			score: hit.score,
		}
	}
}

/// Folded query terms after stopword removal and alias expansion. Empty for blank queries.
pub fn query_terms(index: &SemanticIndex, query: &str) -> Vec<String> {
	let terms = normalize::tokenize(query);

	if terms.is_empty() {
		return terms;
	}

	AliasExpander::from_index(index).expand_query(&normalize::normalize(query), &terms)
}

/// Scores every product, keeps confident matches and ranks them.
pub fn resolve_products(index: &SemanticIndex, query: &str, ranking: &Ranking) -> Vec<ProductHit> {
	let terms = query_terms(index, query);

	if terms.is_empty() {
		return Vec::new();
	}

	let scored: Vec<Scored<'_>> = index
		.products
		.values()
		.filter_map(|entry| {
			let score = score::score(entry, &terms);

			score.is_confident().then_some(Scored { entry, score: score.value })
		})
		.collect();
	let boost = CollectionBoost {
		prefixes: &ranking.primary_collection_prefixes,
		amount: ranking.collection_boost,
	};
	let hits: Vec<ProductHit> = rank::rank(scored, ranking.product_limit as usize, &boost)
		.into_iter()
		.map(Into::into)
		.collect();

	tracing::debug!(?terms, hits = hits.len(), "Resolved products.");

	hits
}

impl AssistantService {
	pub async fn resolve_products(&self, query: &str) -> Vec<ProductHit> {
		let index = self.cache.load().await;

		resolve_products(&index, query, &self.cfg.ranking)
	}
}
