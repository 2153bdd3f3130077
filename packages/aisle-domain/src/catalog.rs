use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A product or collection after merging. Identity fields come from the base catalog snapshot,
/// descriptive fields from the enrichment overlay when it has them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
	/// Key of the entry inside its mapping. Storefront syncs key products per collection, so
	/// several keys may share one `handle`.
	#[serde(skip)]
	pub key: String,
	pub id: String,
	pub handle: String,
	pub title: String,
	pub url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub collection: Option<String>,
	pub category: String,
	pub product_type: String,
	pub product_count: u64,
	pub tags: Vec<String>,
	pub description: String,
	pub themes: Vec<String>,
	pub synonyms: Vec<String>,
	pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpPage {
	pub id: String,
	pub title: String,
	pub url: String,
	#[serde(rename = "type")]
	pub page_type: String,
	pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticIndex {
	pub collections: BTreeMap<String, CatalogEntry>,
	pub products: BTreeMap<String, CatalogEntry>,
	pub pages: BTreeMap<String, HelpPage>,
	pub theme_aliases: BTreeMap<String, Vec<String>>,
	pub category_aliases: BTreeMap<String, String>,
	#[serde(with = "crate::time_serde")]
	pub last_update: OffsetDateTime,
}
impl SemanticIndex {
	pub fn empty() -> Self {
		Self {
			collections: BTreeMap::new(),
			products: BTreeMap::new(),
			pages: BTreeMap::new(),
			theme_aliases: BTreeMap::new(),
			category_aliases: BTreeMap::new(),
			last_update: OffsetDateTime::now_utc(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.collections.is_empty() && self.products.is_empty() && self.pages.is_empty()
	}
}

/// A text snippet with its embedding, searched by cosine similarity only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedRecord {
	pub id: String,
	pub text: String,
	pub embedding: Vec<f32>,
}
