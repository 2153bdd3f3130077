//! Where base snapshots and enrichment overlays come from.

use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use aisle_config::Catalog;
use aisle_domain::{RawIndex, time_serde};
use aisle_storage::BlobStore;
use time::OffsetDateTime;

use crate::{BoxFuture, CatalogProvider, Error, Result, SnapshotSource};

/// Reads the most recently uploaded index document at `path`. A store with no such document
/// yields an empty snapshot.
pub struct BlobSnapshotSource {
	blobs: Arc<dyn BlobStore>,
	path: String,
}
impl BlobSnapshotSource {
	pub fn new(blobs: Arc<dyn BlobStore>, path: impl Into<String>) -> Self {
		Self { blobs, path: path.into() }
	}

	async fn fetch_inner(&self) -> Result<RawIndex> {
		let entries = self.blobs.list().await.map_err(upstream)?;
		let Some(entry) = aisle_storage::latest(&entries, &self.path) else {
			tracing::warn!(path = %self.path, "No persisted index found; using an empty snapshot.");

			return Ok(RawIndex::default());
		};
		let Some(content) = self.blobs.get(&entry.path).await.map_err(upstream)? else {
			return Ok(RawIndex::default());
		};

		Ok(RawIndex::from_slice(&content))
	}
}
impl SnapshotSource for BlobSnapshotSource {
	fn fetch(&self) -> BoxFuture<'_, Result<RawIndex>> {
		Box::pin(self.fetch_inner())
	}
}

/// Fetches the base snapshot straight from the upstream catalog.
pub struct CatalogSnapshotSource {
	catalog: Arc<dyn CatalogProvider>,
	cfg: Catalog,
}
impl CatalogSnapshotSource {
	pub fn new(catalog: Arc<dyn CatalogProvider>, cfg: Catalog) -> Self {
		Self { catalog, cfg }
	}
}
impl SnapshotSource for CatalogSnapshotSource {
	fn fetch(&self) -> BoxFuture<'_, Result<RawIndex>> {
		Box::pin(async move {
			let synced_at = time_serde::to_millis(OffsetDateTime::now_utc());
			let document = self.catalog.fetch_snapshot(&self.cfg, synced_at).await?;

			Ok(RawIndex::from_value(document))
		})
	}
}

/// The curated overlay on local disk. No path means no overlay.
pub struct FileSnapshotSource {
	path: Option<PathBuf>,
}
impl FileSnapshotSource {
	pub fn new(path: Option<PathBuf>) -> Self {
		Self { path }
	}

	async fn fetch_inner(&self) -> Result<RawIndex> {
		let Some(path) = &self.path else {
			return Ok(RawIndex::default());
		};

		match tokio::fs::read(path).await {
			Ok(content) => Ok(RawIndex::from_slice(&content)),
			Err(err) if err.kind() == ErrorKind::NotFound => Err(Error::UpstreamUnavailable {
				message: format!("Enrichment overlay {} does not exist.", path.display()),
			}),
			Err(err) => Err(Error::UpstreamUnavailable {
				message: format!("Failed to read {}: {err}.", path.display()),
			}),
		}
	}
}
impl SnapshotSource for FileSnapshotSource {
	fn fetch(&self) -> BoxFuture<'_, Result<RawIndex>> {
		Box::pin(self.fetch_inner())
	}
}

fn upstream(err: aisle_storage::Error) -> Error {
	Error::UpstreamUnavailable { message: err.to_string() }
}
