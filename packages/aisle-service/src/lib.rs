pub mod cache;
pub mod merge;
pub mod pages;
pub mod records;
pub mod retrieve;
pub mod search;
pub mod source;
pub mod sync;
pub mod vector;

mod error;

pub use cache::IndexCache;
pub use error::{Error, Result};
pub use merge::merge;
pub use pages::PageHit;
pub use records::{IndexTextResponse, RecordStore};
pub use retrieve::Retrieval;
pub use search::ProductHit;
pub use source::{BlobSnapshotSource, CatalogSnapshotSource, FileSnapshotSource};
pub use sync::SyncReport;
pub use vector::VectorHit;

use std::{sync::Arc, time::Duration};

use serde_json::Value;

use aisle_config::{Catalog, Config, EmbeddingProviderConfig};
use aisle_domain::RawIndex;
use aisle_providers::{catalog, embedding};
use aisle_storage::BlobStore;

pub use aisle_storage::BoxFuture;

/// Produces one raw snapshot document per call. Implementations must not cache.
pub trait SnapshotSource
where
	Self: Send + Sync,
{
	fn fetch(&self) -> BoxFuture<'_, Result<RawIndex>>;
}

pub trait CatalogProvider
where
	Self: Send + Sync,
{
	fn fetch_snapshot<'a>(
		&'a self,
		cfg: &'a Catalog,
		synced_at_ms: i64,
	) -> BoxFuture<'a, Result<Value>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub catalog: Arc<dyn CatalogProvider>,
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(catalog: Arc<dyn CatalogProvider>, embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { catalog, embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { catalog: provider.clone(), embedding: provider }
	}
}

pub struct AssistantService {
	pub cfg: Config,
	pub cache: IndexCache,
	pub records: RecordStore,
	pub blobs: Arc<dyn BlobStore>,
	pub providers: Providers,
}
impl AssistantService {
	pub fn new(cfg: Config, blobs: Arc<dyn BlobStore>) -> Self {
		Self::with_providers(cfg, blobs, Providers::default())
	}

	/// Wires the index cache from config: the base snapshot comes from the blob store or the
	/// upstream catalog, the overlay from `enrichment.path`.
	pub fn with_providers(cfg: Config, blobs: Arc<dyn BlobStore>, providers: Providers) -> Self {
		let base: Arc<dyn SnapshotSource> = match cfg.index.source.as_str() {
			"catalog" => Arc::new(CatalogSnapshotSource::new(
				providers.catalog.clone(),
				cfg.catalog.clone(),
			)),
			_ => Arc::new(BlobSnapshotSource::new(blobs.clone(), cfg.storage.index_path.clone())),
		};
		let enrichment = Arc::new(FileSnapshotSource::new(cfg.enrichment.path.clone()));
		let cache = IndexCache::new(base, enrichment, Duration::from_secs(cfg.index.ttl_secs));

		Self::with_cache(cfg, blobs, providers, cache)
	}

	pub fn with_cache(
		cfg: Config,
		blobs: Arc<dyn BlobStore>,
		providers: Providers,
		cache: IndexCache,
	) -> Self {
		Self { cfg, cache, records: RecordStore::new(), blobs, providers }
	}
}

struct DefaultProviders;
impl CatalogProvider for DefaultProviders {
	fn fetch_snapshot<'a>(
		&'a self,
		cfg: &'a Catalog,
		synced_at_ms: i64,
	) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			catalog::fetch_snapshot(cfg, synced_at_ms)
				.await
				.map_err(|err| Error::UpstreamUnavailable { message: err.to_string() })
		})
	}
}
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}
