use std::{
	sync::{
		Arc, RwLock,
		atomic::{AtomicU64, Ordering},
	},
	time::{Duration, Instant},
};

use aisle_domain::{RawIndex, SemanticIndex};

use crate::{Result, SnapshotSource, merge};

struct CachedIndex {
	index: Arc<SemanticIndex>,
	refreshed_at: Instant,
}

/// Process-wide merged index with a time-to-live.
///
/// Readers clone an `Arc` under a short lock. A refresh fetches and merges without holding any
/// lock, then swaps the new index in, so concurrent `load` calls never wait on one another. Two
/// callers that both observe an expired entry may refresh redundantly.
///
/// A refresh that overlaps `invalidate` still answers its own caller but is not cached.
pub struct IndexCache {
	base: Arc<dyn SnapshotSource>,
	enrichment: Arc<dyn SnapshotSource>,
	ttl: Duration,
	state: RwLock<Option<CachedIndex>>,
	generation: AtomicU64,
}
impl IndexCache {
	pub fn new(
		base: Arc<dyn SnapshotSource>,
		enrichment: Arc<dyn SnapshotSource>,
		ttl: Duration,
	) -> Self {
		Self { base, enrichment, ttl, state: RwLock::new(None), generation: AtomicU64::new(0) }
	}

	/// Never fails. Falls back to the last good index, then to an empty one.
	pub async fn load(&self) -> Arc<SemanticIndex> {
		if let Some(index) = self.fresh() {
			tracing::debug!("Semantic index cache hit.");

			return index;
		}

		match self.refresh().await {
			Ok(index) => index,
			Err(err) => match self.stale() {
				Some(index) => {
					tracing::warn!(error = %err, "Index refresh failed; serving stale index.");

					index
				},
				None => {
					tracing::warn!(error = %err, "Index refresh failed; serving empty index.");

					Arc::new(SemanticIndex::empty())
				},
			},
		}
	}

	pub fn invalidate(&self) {
		let mut state = self.state.write().unwrap_or_else(|err| err.into_inner());

		self.generation.fetch_add(1, Ordering::SeqCst);

		*state = None;
	}

	pub(crate) async fn fetch_enrichment(&self) -> Result<RawIndex> {
		self.enrichment.fetch().await
	}

	/// Only a base failure fails the refresh. A broken overlay degrades to no overlay.
	async fn refresh(&self) -> Result<Arc<SemanticIndex>> {
		let generation = self.generation.load(Ordering::SeqCst);
		let (base, enrichment) = tokio::join!(self.base.fetch(), self.enrichment.fetch());
		let base = base?;
		let enrichment = enrichment.unwrap_or_else(|err| {
			tracing::warn!(error = %err, "Enrichment overlay unavailable; merging without it.");

			RawIndex::default()
		});
		let index = Arc::new(merge::merge(&base, &enrichment));

		tracing::info!(
			products = index.products.len(),
			collections = index.collections.len(),
			pages = index.pages.len(),
			"Semantic index refreshed."
		);

		let mut state = self.state.write().unwrap_or_else(|err| err.into_inner());

		if self.generation.load(Ordering::SeqCst) == generation {
			*state = Some(CachedIndex { index: index.clone(), refreshed_at: Instant::now() });
		} else {
			tracing::debug!("Index invalidated during refresh; result not cached.");
		}

		Ok(index)
	}

	fn fresh(&self) -> Option<Arc<SemanticIndex>> {
		let state = self.state.read().unwrap_or_else(|err| err.into_inner());

		state
			.as_ref()
			.filter(|cached| cached.refreshed_at.elapsed() < self.ttl)
			.map(|cached| cached.index.clone())
	}

	fn stale(&self) -> Option<Arc<SemanticIndex>> {
		let state = self.state.read().unwrap_or_else(|err| err.into_inner());

		state.as_ref().map(|cached| cached.index.clone())
	}
}
