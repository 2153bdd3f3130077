use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::Mutex;

use aisle_domain::EmbeddedRecord;
use aisle_storage::BlobEntry;

use crate::{AssistantService, Error, Result};

/// Append-only in-memory list of embedded records. Readers take an `Arc` snapshot of each record
/// under a short lock.
#[derive(Default)]
pub struct RecordStore {
	records: RwLock<Vec<Arc<EmbeddedRecord>>>,
	// Serializes persistence so the last write always contains every appended record.
	persist: Mutex<()>,
}
impl RecordStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn snapshot(&self) -> Vec<Arc<EmbeddedRecord>> {
		self.records.read().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn len(&self) -> usize {
		self.records.read().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn append(&self, record: Arc<EmbeddedRecord>) -> usize {
		let mut records = self.records.write().unwrap_or_else(|err| err.into_inner());

		records.push(record);

		records.len()
	}

	/// Drops exactly this record, leaving equal-looking duplicates in place.
	pub fn remove(&self, record: &Arc<EmbeddedRecord>) -> bool {
		let mut records = self.records.write().unwrap_or_else(|err| err.into_inner());
		let Some(position) = records.iter().rposition(|stored| Arc::ptr_eq(stored, record)) else {
			return false;
		};

		records.remove(position);

		true
	}

	pub fn replace(&self, records: Vec<EmbeddedRecord>) {
		*self.records.write().unwrap_or_else(|err| err.into_inner()) =
			records.into_iter().map(Arc::new).collect();
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct IndexTextResponse {
	pub id: String,
	pub dimensions: usize,
	pub records: usize,
	pub url: String,
}

impl AssistantService {
	/// Embeds `text`, appends it to the record store and persists the whole store. A failed
	/// write takes the record back out, so callers never see a record that was not persisted.
	pub async fn index_text(&self, id: &str, text: &str) -> Result<IndexTextResponse> {
		if id.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "id must be non-empty.".to_string() });
		}
		if text.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "text must be non-empty.".to_string() });
		}

		let embedding = self.embed_one(text).await?;
		let dimensions = embedding.len();

		let record =
			Arc::new(EmbeddedRecord { id: id.to_string(), text: text.to_string(), embedding });

		self.records.append(record.clone());

		let entry = match self.persist_records().await {
			Ok(entry) => entry,
			Err(err) => {
				self.records.remove(&record);

				tracing::warn!(id, error = %err, "Failed to persist record; append rolled back.");

				return Err(err);
			},
		};

		tracing::info!(id, dimensions, "Indexed text.");

		Ok(IndexTextResponse {
			id: id.to_string(),
			dimensions,
			records: self.records.len(),
			url: entry.url,
		})
	}

	/// Replaces the in-memory records with the persisted registry. A missing registry loads
	/// nothing.
	pub async fn load_records(&self) -> Result<usize> {
		let path = &self.cfg.storage.registry_path;
		let Some(content) = self.blobs.get(path).await? else {
			tracing::info!(path = %path, "No record registry found.");

			self.records.replace(Vec::new());

			return Ok(0);
		};
		let records: Vec<EmbeddedRecord> = serde_json::from_slice(&content)?;
		let count = records.len();

		self.records.replace(records);

		tracing::info!(path = %path, records = count, "Loaded record registry.");

		Ok(count)
	}

	pub async fn persist_records(&self) -> Result<BlobEntry> {
		let _guard = self.records.persist.lock().await;
		let records = self.records.snapshot();
		let plain: Vec<&EmbeddedRecord> = records.iter().map(Arc::as_ref).collect();
		let content = serde_json::to_vec_pretty(&plain)?;

		Ok(self.blobs.put(&self.cfg.storage.registry_path, content).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(id: &str) -> Arc<EmbeddedRecord> {
		Arc::new(EmbeddedRecord { id: id.to_string(), text: id.to_string(), embedding: vec![1.0] })
	}

	#[test]
	fn append_keeps_duplicates_in_order() {
		let store = RecordStore::new();

		store.append(record("a"));
		store.append(record("a"));

		assert_eq!(store.append(record("b")), 3);

		let ids: Vec<String> = store.snapshot().iter().map(|r| r.id.clone()).collect();

		assert_eq!(ids, vec!["a", "a", "b"]);
	}

	#[test]
	fn remove_drops_only_the_given_record() {
		let store = RecordStore::new();
		let first = record("a");
		let second = record("a");

		store.append(first.clone());
		store.append(second.clone());

		assert!(store.remove(&second));
		assert!(!store.remove(&second));
		assert_eq!(store.len(), 1);
		assert!(Arc::ptr_eq(&store.snapshot()[0], &first));
	}

	#[test]
	fn replace_swaps_contents() {
		let store = RecordStore::new();

		store.append(record("old"));
		store.replace(vec![EmbeddedRecord {
			id: "new".to_string(),
			text: "new".to_string(),
			embedding: vec![1.0],
		}]);

		assert_eq!(store.len(), 1);
		assert_eq!(store.snapshot()[0].id, "new");
	}
}
