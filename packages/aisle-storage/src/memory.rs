use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

use crate::{
	Result,
	blob::{self, BlobEntry, BlobStore, BoxFuture},
};

struct StoredBlob {
	entry: BlobEntry,
	content: Vec<u8>,
}

/// Process-local store that keeps every uploaded version.
#[derive(Default)]
pub struct MemoryBlobStore {
	blobs: Mutex<Vec<StoredBlob>>,
}
impl MemoryBlobStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn put_sync(&self, path: &str, content: Vec<u8>) -> Result<BlobEntry> {
		blob::validate_path(path)?;

		let mut blobs = self.blobs.lock().unwrap_or_else(|err| err.into_inner());
		let newest = blobs.iter().map(|stored| stored.entry.uploaded_at).max();
		let now = OffsetDateTime::now_utc();
		// Keep upload times strictly increasing so "most recent" is unambiguous.
		let uploaded_at = match newest {
			Some(newest) if newest >= now => newest + Duration::nanoseconds(1),
			_ => now,
		};
		let url = format!("memory://{path}");
		let entry = BlobEntry { path: path.to_string(), url, uploaded_at };

		blobs.push(StoredBlob { entry: entry.clone(), content });

		Ok(entry)
	}

	fn get_sync(&self, path: &str) -> Option<Vec<u8>> {
		let blobs = self.blobs.lock().unwrap_or_else(|err| err.into_inner());

		blobs
			.iter()
			.filter(|stored| stored.entry.path == path)
			.max_by_key(|stored| stored.entry.uploaded_at)
			.map(|stored| stored.content.clone())
	}

	fn list_sync(&self) -> Vec<BlobEntry> {
		let blobs = self.blobs.lock().unwrap_or_else(|err| err.into_inner());

		blobs.iter().map(|stored| stored.entry.clone()).collect()
	}
}
impl BlobStore for MemoryBlobStore {
	fn put<'a>(&'a self, path: &'a str, content: Vec<u8>) -> BoxFuture<'a, Result<BlobEntry>> {
		Box::pin(async move { self.put_sync(path, content) })
	}

	fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>>> {
		Box::pin(async move { Ok(self.get_sync(path)) })
	}

	fn list(&self) -> BoxFuture<'_, Result<Vec<BlobEntry>>> {
		Box::pin(async move { Ok(self.list_sync()) })
	}
}
