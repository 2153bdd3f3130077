use std::{future::Future, pin::Pin};

use time::OffsetDateTime;

use crate::{Error, Result};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
	pub path: String,
	pub url: String,
	pub uploaded_at: OffsetDateTime,
}

/// Durable key-value blobs addressed by path. A store may keep several versions of one path;
/// reads always resolve to the most recently uploaded one.
pub trait BlobStore
where
	Self: Send + Sync,
{
	fn put<'a>(&'a self, path: &'a str, content: Vec<u8>) -> BoxFuture<'a, Result<BlobEntry>>;

	fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>>>;

	fn list(&self) -> BoxFuture<'_, Result<Vec<BlobEntry>>>;
}

/// Most recently uploaded entry stored under `path`.
pub fn latest<'a>(entries: &'a [BlobEntry], path: &str) -> Option<&'a BlobEntry> {
	entries.iter().filter(|entry| entry.path == path).max_by_key(|entry| entry.uploaded_at)
}

pub(crate) fn validate_path(path: &str) -> Result<()> {
	let trimmed = path.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidPath("path must be non-empty".to_string()));
	}
	if trimmed != path {
		return Err(Error::InvalidPath(format!("{path:?} has surrounding whitespace")));
	}
	if path.starts_with('/') || path.contains('\\') {
		return Err(Error::InvalidPath(format!("{path:?} must be relative and use '/'")));
	}
	if path.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
		return Err(Error::InvalidPath(format!("{path:?} has an empty or relative segment")));
	}

	Ok(())
}
