use std::sync::Arc;

use serde::Serialize;

use aisle_domain::EmbeddedRecord;

use crate::{AssistantService, Error, Result, search::cmp_f32_desc};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VectorHit {
	pub record: EmbeddedRecord,
	pub score: f32,
}

/// Cosine similarity clamped to [-1, 1]. Zero-norm or mismatched vectors compare as 0.
pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> f32 {
	if lhs.is_empty() || lhs.len() != rhs.len() {
		return 0.0;
	}

	let mut dot = 0.0_f32;
	let mut lhs_norm = 0.0_f32;
	let mut rhs_norm = 0.0_f32;

	for (l, r) in lhs.iter().zip(rhs.iter()) {
		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm <= f32::EPSILON || rhs_norm <= f32::EPSILON {
		return 0.0;
	}

	let similarity = dot / (lhs_norm.sqrt() * rhs_norm.sqrt());

	if similarity.is_finite() { similarity.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Top `top_k` records by descending similarity. Equal scores keep store order.
pub fn search(records: &[Arc<EmbeddedRecord>], query: &[f32], top_k: usize) -> Vec<VectorHit> {
	let mut scored: Vec<(&Arc<EmbeddedRecord>, f32)> = records
		.iter()
		.map(|record| (record, cosine_similarity(query, &record.embedding)))
		.collect();

	scored.sort_by(|lhs, rhs| cmp_f32_desc(lhs.1, rhs.1));
	scored.truncate(top_k);

	scored
		.into_iter()
		.map(|(record, score)| VectorHit { record: EmbeddedRecord::clone(record), score })
		.collect()
}

impl AssistantService {
	pub fn vector_search(&self, query: &[f32], top_k: usize) -> Vec<VectorHit> {
		search(&self.records.snapshot(), query, top_k)
	}

	/// Embeds `query` and searches the record store with it.
	pub async fn search_text(&self, query: &str, top_k: usize) -> Result<Vec<VectorHit>> {
		let vector = self.embed_one(query).await?;

		Ok(self.vector_search(&vector, top_k))
	}

	pub(crate) async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;

		if !cfg.enabled {
			return Err(Error::InvalidRequest {
				message: "Embedding provider is disabled.".to_string(),
			});
		}
		if text.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "Text must be non-empty.".to_string() });
		}

		let vectors = self.providers.embedding.embed(cfg, &[text.to_string()]).await?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != cfg.dimensions as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vector)
	}
}
