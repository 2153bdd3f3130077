use serde::Serialize;

use aisle_domain::{SemanticIndex, normalize};

use crate::AssistantService;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageHit {
	pub id: String,
	pub title: String,
	pub url: String,
	#[serde(rename = "type")]
	pub page_type: String,
}

/// Help pages whose folded keywords occur anywhere in the folded query, in index order.
pub fn resolve_pages(index: &SemanticIndex, query: &str, limit: usize) -> Vec<PageHit> {
	let query = normalize::normalize(query);

	if query.is_empty() {
		return Vec::new();
	}

	index
		.pages
		.iter()
		.filter(|(_, page)| {
			page.keywords
				.iter()
				.map(|keyword| normalize::normalize(keyword))
				.any(|keyword| !keyword.is_empty() && query.contains(keyword.as_str()))
		})
		.take(limit)
		.map(|(key, page)| PageHit {
			id: key.clone(),
			title: page.title.clone(),
			url: page.url.clone(),
			page_type: page.page_type.clone(),
		})
		.collect()
}

impl AssistantService {
	pub async fn resolve_pages(&self, query: &str) -> Vec<PageHit> {
		let index = self.cache.load().await;

		resolve_pages(&index, query, self.cfg.ranking.page_limit as usize)
	}
}
