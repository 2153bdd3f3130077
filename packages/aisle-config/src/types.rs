use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub catalog: Catalog,
	#[serde(default)]
	pub enrichment: Enrichment,
	pub storage: Storage,
	pub index: Index,
	pub ranking: Ranking,
	pub providers: Providers,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
	pub endpoint: String,
	/// Opaque upstream token. Sent verbatim in `token_header`.
	pub token: Option<String>,
	#[serde(default = "default_token_header")]
	pub token_header: String,
	/// Either "snapshot" (a ready JSON index document) or "storefront" (a GraphQL catalog).
	pub format: String,
	/// Prefix used to build product URLs when the storefront does not publish one.
	pub product_url_base: String,
	pub timeout_ms: u64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Enrichment {
	/// Optional. Curated overlay document merged onto every base snapshot.
	pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub root: PathBuf,
	pub index_path: String,
	pub registry_path: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Index {
	pub ttl_secs: u64,
	/// Where the cache reads its base snapshot from: "blob" or "catalog".
	pub source: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Ranking {
	pub product_limit: u32,
	pub page_limit: u32,
	pub vector_top_k: u32,
	pub collection_boost: f32,
	pub primary_collection_prefixes: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub enabled: bool,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

fn default_token_header() -> String {
	"X-Storefront-Access-Token".to_string()
}
