use aisle_storage::{BlobStore, FsBlobStore, latest};
use aisle_testkit::TempBlobDir;

#[tokio::test]
async fn put_then_get_round_trips_nested_paths() {
	let dir = TempBlobDir::new().expect("Failed to create temp dir.");
	let store = FsBlobStore::new(dir.path());
	let entry = store
		.put("indexes/semantic-index.json", br#"{"products":{}}"#.to_vec())
		.await
		.expect("put failed");
	let content = store.get("indexes/semantic-index.json").await.expect("get failed");

	assert_eq!(entry.path, "indexes/semantic-index.json");
	assert!(entry.url.starts_with("file://"));
	assert_eq!(content.as_deref(), Some(&br#"{"products":{}}"#[..]));
}

#[tokio::test]
async fn overwrite_keeps_single_latest_version() {
	let dir = TempBlobDir::new().expect("Failed to create temp dir.");
	let store = FsBlobStore::new(dir.path());

	store.put("registry.json", b"[]".to_vec()).await.expect("put failed");
	store.put("registry.json", b"[1]".to_vec()).await.expect("put failed");

	let entries = store.list().await.expect("list failed");
	let newest = latest(&entries, "registry.json").expect("entry must exist");

	assert_eq!(entries.len(), 1);
	assert_eq!(newest.path, "registry.json");
	assert_eq!(store.get("registry.json").await.expect("get failed").as_deref(), Some(&b"[1]"[..]));
}

#[tokio::test]
async fn list_skips_temp_files_and_sorts_by_path() {
	let dir = TempBlobDir::new().expect("Failed to create temp dir.");
	let store = FsBlobStore::new(dir.path());

	store.put("b.json", b"{}".to_vec()).await.expect("put failed");
	store.put("a/c.json", b"{}".to_vec()).await.expect("put failed");
	std::fs::write(dir.path().join(".a.json.1.0.tmp"), b"partial").expect("write failed");

	let paths: Vec<String> =
		store.list().await.expect("list failed").into_iter().map(|entry| entry.path).collect();

	assert_eq!(paths, vec!["a/c.json".to_string(), "b.json".to_string()]);
}

#[tokio::test]
async fn missing_root_lists_nothing_and_reads_none() {
	let dir = TempBlobDir::new().expect("Failed to create temp dir.");
	let store = FsBlobStore::new(dir.path().join("never-created"));

	assert!(store.list().await.expect("list failed").is_empty());
	assert!(store.get("semantic-index.json").await.expect("get failed").is_none());
}

#[tokio::test]
async fn rejects_paths_escaping_root() {
	let dir = TempBlobDir::new().expect("Failed to create temp dir.");
	let store = FsBlobStore::new(dir.path());

	assert!(store.put("../outside.json", b"{}".to_vec()).await.is_err());
	assert!(store.get("/etc/hosts").await.is_err());
}
