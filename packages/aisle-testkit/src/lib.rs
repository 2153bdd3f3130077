mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
};

use serde_json::Value;
use uuid::Uuid;

use aisle_config::Config;

const SAMPLE_CONFIG_TOML: &str = r#"
[service]
log_level = "debug"

[catalog]
endpoint         = "http://127.0.0.1:9/api/semantic-index"
token            = "test-token"
format           = "snapshot"
product_url_base = "https://store.example.com/products/"
timeout_ms       = 1000

[storage]
root          = "./blobs"
index_path    = "semantic-index.json"
registry_path = "registry.json"

[index]
ttl_secs = 300
source   = "blob"

[ranking]
product_limit               = 3
page_limit                  = 3
vector_top_k                = 3
collection_boost            = 3.0
primary_collection_prefixes = ["greekify", "spanishify"]

[providers.embedding]
enabled    = true
api_base   = "http://127.0.0.1:9"
api_key    = "test-key"
path       = "/v1/embeddings"
model      = "test-embedding"
dimensions = 3
timeout_ms = 1000
"#;

/// A validated config pointing at unroutable endpoints. Tests swap in stub providers.
pub fn sample_config() -> Result<Config> {
	Ok(aisle_config::parse(SAMPLE_CONFIG_TOML)?)
}

pub fn sample_config_toml() -> &'static str {
	SAMPLE_CONFIG_TOML
}

/// Base catalog snapshot in the shape a storefront sync produces. `owl-hoodie` is listed under
/// both a flagship and a legacy collection.
pub fn base_snapshot() -> Value {
	serde_json::json!({
		"collections": {
			"greekify": {
				"id": "gid://shop/Collection/1",
				"handle": "greekify",
				"title": "Greekify",
				"url": "https://store.example.com/collections/greekify",
				"image": "https://cdn.example.com/greekify.jpg",
				"productCount": 1,
				"text": "Greek inspired prints."
			},
			"legacy-greek": {
				"id": "gid://shop/Collection/2",
				"title": "Legacy Greek",
				"productCount": 2
			},
			"spanishify": {
				"id": "gid://shop/Collection/3",
				"title": "Spanishify",
				"productCount": 1
			}
		},
		"products": {
			"greekify-product-owl-hoodie": {
				"id": "gid://shop/Product/10",
				"handle": "owl-hoodie",
				"title": "Owl of Athena Hoodie",
				"url": "https://store.example.com/products/owl-hoodie",
				"image": "https://cdn.example.com/owl-hoodie.jpg",
				"collection": "greekify",
				"productType": "Hoodie",
				"category": "hoodies",
				"tags": ["owl", "athena"],
				"text": "Heavyweight hoodie with a hand-drawn owl."
			},
			"legacy-greek-product-owl-hoodie": {
				"id": "gid://shop/Product/10",
				"handle": "owl-hoodie",
				"title": "Owl of Athena Hoodie",
				"url": "https://store.example.com/products/owl-hoodie",
				"collection": "legacy-greek",
				"productType": "Hoodie",
				"category": "hoodies",
				"tags": ["owl", "athena"]
			},
			"legacy-greek-product-meander-hoodie": {
				"id": "gid://shop/Product/11",
				"handle": "meander-hoodie",
				"title": "Meander Hoodie",
				"url": "https://store.example.com/products/meander-hoodie",
				"collection": "legacy-greek",
				"productType": "Hoodie",
				"category": "hoodies",
				"tags": ["meander"]
			},
			"spanishify-product-sol-tote": {
				"id": "gid://shop/Product/12",
				"handle": "sol-tote",
				"title": "Sol Tote Bag",
				"onlineStoreUrl": "https://store.example.com/products/sol-tote",
				"featuredImage": "https://cdn.example.com/sol-tote.jpg",
				"collection": "spanishify",
				"productType": "Tote Bag",
				"category": "tote-bags",
				"tags": ["sun"],
				"description": "Canvas tote from the base catalog."
			}
		},
		"lastUpdate": 1_690_000_000_000_i64
	})
}

/// Curated overlay: descriptive fields, aliases and help pages. `ghost-product` has no base
/// counterpart and must never surface.
pub fn enrichment_overlay() -> Value {
	serde_json::json!({
		"collections": {
			"greekify": {
				"title": "Overlay Title Must Lose",
				"text": "Ancient Greek symbols on everyday wear.",
				"themes": ["greek", "mythology"],
				"keywords": ["athena", "owl"]
			}
		},
		"products": {
			"spanishify-product-sol-tote": {
				"title": "Overlay Title Must Lose",
				"themes": ["latin", "sun"],
				"synonyms": ["beach bag"],
				"text": "Sun-washed canvas tote."
			},
			"ghost-product": {
				"handle": "ghost-product",
				"title": "Ghost Hoodie",
				"category": "hoodies",
				"themes": ["latin"]
			}
		},
		"themeAliases": {
			"fiesta": ["latin", "celebration"],
			"mythology": ["greek"]
		},
		"categoryAliases": {
			"hoodie": "hoodies",
			"sudadera": "hoodies"
		},
		"pages": {
			"shipping": {
				"title": "Shipping Policy",
				"url": "https://store.example.com/policies/shipping-policy",
				"type": "policy",
				"keywords": ["shipping", "delivery", "αποστολή", "envío"]
			},
			"size-guide": {
				"title": "Size Guide",
				"url": "https://store.example.com/pages/size-guide",
				"keywords": ["size", "μέγεθος"]
			}
		},
		"lastUpdate": 1_700_000_000_000_i64
	})
}

/// A uniquely named directory under the system temp dir, removed on drop.
pub struct TempBlobDir {
	path: PathBuf,
	cleaned: bool,
}
impl TempBlobDir {
	pub fn new() -> Result<Self> {
		let path = env::temp_dir().join(format!("aisle_blobs_{}", Uuid::new_v4().simple()));

		fs::create_dir_all(&path)?;

		Ok(Self { path, cleaned: false })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner()
	}

	fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		fs::remove_dir_all(&self.path).map_err(|err| {
			Error::Message(format!("Failed to remove {}: {err}.", self.path.display()))
		})?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TempBlobDir {
	fn drop(&mut self) {
		if let Err(err) = self.cleanup_inner() {
			eprintln!("Temp blob dir cleanup failed: {err}");
		}
	}
}
