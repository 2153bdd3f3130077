use serde::Serialize;

use crate::{AssistantService, PageHit, ProductHit, VectorHit, pages, search};

/// Everything the reply generator is grounded on for one query.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Retrieval {
	pub products: Vec<ProductHit>,
	pub pages: Vec<PageHit>,
	pub related: Vec<VectorHit>,
}

impl AssistantService {
	/// Lexical products and help pages from one index snapshot. Falls back to embedded records
	/// only when no product matched confidently.
	pub async fn retrieve(&self, query: &str) -> Retrieval {
		if query.trim().is_empty() {
			return Retrieval::default();
		}

		let index = self.cache.load().await;
		let ranking = &self.cfg.ranking;
		let products = search::resolve_products(&index, query, ranking);
		let pages = pages::resolve_pages(&index, query, ranking.page_limit as usize);
		let related = if products.is_empty() && self.cfg.providers.embedding.enabled {
			match self.search_text(query, ranking.vector_top_k as usize).await {
				Ok(hits) => hits,
				Err(err) => {
					tracing::warn!(error = %err, "Vector fallback failed; no related records.");

					Vec::new()
				},
			}
		} else {
			Vec::new()
		};

		Retrieval { products, pages, related }
	}
}
