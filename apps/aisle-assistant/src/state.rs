use std::sync::Arc;

use aisle_service::AssistantService;
use aisle_storage::FsBlobStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AssistantService>,
}
impl AppState {
	/// Opens the blob store under `storage.root` and restores persisted embedded records. A
	/// registry that cannot be read is fatal, since indexing would overwrite it.
	pub async fn new(config: aisle_config::Config) -> color_eyre::Result<Self> {
		let blobs = Arc::new(FsBlobStore::new(config.storage.root.clone()));
		let service = AssistantService::new(config, blobs);

		service.load_records().await?;

		Ok(Self { service: Arc::new(service) })
	}
}
