use serde::Serialize;
use time::OffsetDateTime;

use aisle_domain::{RawIndex, time_serde};

use crate::{AssistantService, Error, Result, merge};

#[derive(Clone, Debug, Serialize)]
pub struct SyncReport {
	pub products: usize,
	pub collections: usize,
	pub path: String,
	pub url: String,
}

impl AssistantService {
	/// Pulls a fresh base snapshot, merges the overlay onto it, persists the result and drops the
	/// cached index. Failures are returned, unlike on the query path.
	pub async fn sync_catalog(&self) -> Result<SyncReport> {
		let synced_at = time_serde::to_millis(OffsetDateTime::now_utc());
		let document = self.providers.catalog.fetch_snapshot(&self.cfg.catalog, synced_at).await?;
		let base = RawIndex::from_value(document);

		if base.products.is_empty() && base.collections.is_empty() {
			return Err(Error::UpstreamUnavailable {
				message: "Catalog returned an empty snapshot.".to_string(),
			});
		}

		let enrichment = self.cache.fetch_enrichment().await?;
		let merged = merge::merge(&base, &enrichment);
		let content = serde_json::to_vec_pretty(&merged)?;
		let entry = self.blobs.put(&self.cfg.storage.index_path, content).await?;

		self.cache.invalidate();

		tracing::info!(
			products = merged.products.len(),
			collections = merged.collections.len(),
			url = %entry.url,
			"Catalog synced."
		);

		Ok(SyncReport {
			products: merged.products.len(),
			collections: merged.collections.len(),
			path: entry.path,
			url: entry.url,
		})
	}
}
