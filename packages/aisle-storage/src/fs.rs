use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
};

use time::OffsetDateTime;
use tokio::{fs, io::AsyncWriteExt};

use crate::{
	Result,
	blob::{self, BlobEntry, BlobStore, BoxFuture},
};

const TEMP_SUFFIX: &str = ".tmp";

/// Directory-backed store. Each path holds one version; `uploaded_at` is the file's modification
/// time. Writes go through a synced temp file and a rename, so readers never see partial content.
pub struct FsBlobStore {
	root: PathBuf,
	temp_counter: AtomicU64,
}
impl FsBlobStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into(), temp_counter: AtomicU64::new(0) }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	async fn put_inner(&self, path: &str, content: Vec<u8>) -> Result<BlobEntry> {
		blob::validate_path(path)?;

		let target = self.root.join(path);

		if let Some(parent) = target.parent() {
			fs::create_dir_all(parent).await?;
		}

		let temp = target.with_file_name(format!(
			".{}.{}.{}{TEMP_SUFFIX}",
			target.file_name().and_then(|name| name.to_str()).unwrap_or("blob"),
			std::process::id(),
			self.temp_counter.fetch_add(1, Ordering::Relaxed),
		));
		let mut file = fs::File::create(&temp).await?;

		file.write_all(&content).await?;
		file.sync_all().await?;

		drop(file);

		if let Err(err) = fs::rename(&temp, &target).await {
			let _ = fs::remove_file(&temp).await;

			return Err(err.into());
		}

		self.entry_for(path.to_string(), &target).await
	}

	async fn get_inner(&self, path: &str) -> Result<Option<Vec<u8>>> {
		blob::validate_path(path)?;

		match fs::read(self.root.join(path)).await {
			Ok(content) => Ok(Some(content)),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err.into()),
		}
	}

	async fn list_inner(&self) -> Result<Vec<BlobEntry>> {
		let mut out = Vec::new();
		let mut pending = vec![(self.root.clone(), String::new())];

		while let Some((dir, prefix)) = pending.pop() {
			let mut reader = match fs::read_dir(&dir).await {
				Ok(reader) => reader,
				Err(err) if err.kind() == ErrorKind::NotFound => continue,
				Err(err) => return Err(err.into()),
			};

			while let Some(item) = reader.next_entry().await? {
				let Some(name) = item.file_name().to_str().map(str::to_string) else {
					continue;
				};
				let relative =
					if prefix.is_empty() { name.clone() } else { format!("{prefix}/{name}") };
				let file_type = item.file_type().await?;

				if file_type.is_dir() {
					pending.push((item.path(), relative));
				} else if file_type.is_file() && !name.ends_with(TEMP_SUFFIX) {
					out.push(self.entry_for(relative, &item.path()).await?);
				}
			}
		}

		out.sort_by(|lhs, rhs| lhs.path.cmp(&rhs.path));

		Ok(out)
	}

	async fn entry_for(&self, path: String, file: &Path) -> Result<BlobEntry> {
		let metadata = fs::metadata(file).await?;
		let uploaded_at = OffsetDateTime::from(metadata.modified()?);
		let absolute = fs::canonicalize(file).await.unwrap_or_else(|_| file.to_path_buf());

		Ok(BlobEntry { path, url: format!("file://{}", absolute.display()), uploaded_at })
	}
}
impl BlobStore for FsBlobStore {
	fn put<'a>(&'a self, path: &'a str, content: Vec<u8>) -> BoxFuture<'a, Result<BlobEntry>> {
		Box::pin(self.put_inner(path, content))
	}

	fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Vec<u8>>>> {
		Box::pin(self.get_inner(path))
	}

	fn list(&self) -> BoxFuture<'_, Result<Vec<BlobEntry>>> {
		Box::pin(self.list_inner())
	}
}
