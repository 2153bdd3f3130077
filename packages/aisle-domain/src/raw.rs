//! Tolerant readers for snapshot documents.
//!
//! Base snapshots and enrichment overlays come from different producers and disagree on field
//! names. Everything here is optional, and a section or entry with the wrong shape is dropped with
//! a warning instead of failing the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};
use time::OffsetDateTime;

const WRAPPER_KEY: &str = "semanticIndex";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawIndex {
	pub collections: BTreeMap<String, RawEntry>,
	pub products: BTreeMap<String, RawEntry>,
	pub pages: BTreeMap<String, RawPage>,
	pub theme_aliases: BTreeMap<String, Vec<String>>,
	pub category_aliases: BTreeMap<String, String>,
	pub last_update: Option<OffsetDateTime>,
}
impl RawIndex {
	pub fn from_value(value: Value) -> Self {
		let mut value = value;

		while let Value::Object(ref mut object) = value {
			match object.remove(WRAPPER_KEY) {
				Some(inner) if inner.is_object() => value = inner,
				Some(other) => {
					object.insert(WRAPPER_KEY.to_string(), other);

					break;
				},
				None => break,
			}
		}

		let Value::Object(object) = value else {
			if !value.is_null() {
				tracing::warn!("Snapshot document is not an object; treating it as empty.");
			}

			return Self::default();
		};
		let theme_aliases = section::<AliasValue>(&object, "themeAliases")
			.into_iter()
			.map(|(key, value)| (key, value.into_list()))
			.collect();
		let category_aliases = section::<AliasValue>(&object, "categoryAliases")
			.into_iter()
			.filter_map(|(key, value)| value.into_first().map(|value| (key, value)))
			.collect();

		Self {
			collections: section(&object, "collections"),
			products: section(&object, "products"),
			pages: section(&object, "pages"),
			theme_aliases,
			category_aliases,
			last_update: last_update(&object),
		}
	}

	pub fn from_slice(bytes: &[u8]) -> Self {
		match serde_json::from_slice::<Value>(bytes) {
			Ok(value) => Self::from_value(value),
			Err(err) => {
				tracing::warn!(error = %err, "Snapshot document is not valid JSON; treating it as empty.");

				Self::default()
			},
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEntry {
	pub id: Option<String>,
	pub handle: Option<String>,
	pub title: Option<String>,
	pub url: Option<String>,
	pub online_store_url: Option<String>,
	pub image: Option<String>,
	pub featured_image: Option<String>,
	pub collection: Option<String>,
	#[serde(deserialize_with = "string_list")]
	pub collections: Option<Vec<String>>,
	pub category: Option<String>,
	pub product_type: Option<String>,
	pub product_count: Option<u64>,
	#[serde(deserialize_with = "string_list")]
	pub tags: Option<Vec<String>>,
	pub text: Option<String>,
	pub semantic: Option<String>,
	pub description: Option<String>,
	#[serde(deserialize_with = "string_list")]
	pub themes: Option<Vec<String>>,
	#[serde(deserialize_with = "string_list")]
	pub synonyms: Option<Vec<String>>,
	#[serde(deserialize_with = "string_list")]
	pub keywords: Option<Vec<String>>,
}
impl RawEntry {
	/// The free-text body under whichever name the producer used.
	pub fn body(&self) -> Option<&str> {
		first_text([&self.text, &self.semantic, &self.description])
	}

	pub fn primary_collection(&self) -> Option<&str> {
		first_text([&self.collection]).or_else(|| {
			self.collections.as_ref().and_then(|list| {
				list.iter().map(|value| value.trim()).find(|value| !value.is_empty())
			})
		})
	}
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawPage {
	pub id: Option<String>,
	pub title: Option<String>,
	pub url: Option<String>,
	#[serde(rename = "type")]
	pub page_type: Option<String>,
	#[serde(deserialize_with = "string_list")]
	pub keywords: Option<Vec<String>>,
}

/// First value that is present and not blank.
pub fn first_text<'a, const N: usize>(candidates: [&'a Option<String>; N]) -> Option<&'a str> {
	candidates
		.into_iter()
		.filter_map(|value| value.as_deref())
		.find(|value| !value.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AliasValue {
	One(String),
	Many(Vec<String>),
}
impl AliasValue {
	fn into_list(self) -> Vec<String> {
		match self {
			Self::One(value) => vec![value],
			Self::Many(values) => values,
		}
	}

	fn into_first(self) -> Option<String> {
		self.into_list().into_iter().find(|value| !value.trim().is_empty())
	}
}
impl Default for AliasValue {
	fn default() -> Self {
		Self::Many(Vec::new())
	}
}

#[derive(Deserialize)]
struct Stamp(#[serde(with = "crate::time_serde::option")] Option<OffsetDateTime>);

fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<AliasValue>::deserialize(deserializer)?;

	Ok(raw.map(AliasValue::into_list))
}

fn section<T>(object: &Map<String, Value>, name: &str) -> BTreeMap<String, T>
where
	T: DeserializeOwned + Default,
{
	let mut out = BTreeMap::new();
	let Some(value) = object.get(name) else { return out };
	let Some(entries) = value.as_object() else {
		if !value.is_null() {
			tracing::warn!(section = name, "Snapshot section is not a mapping; treating it as empty.");
		}

		return out;
	};

	for (key, entry) in entries {
		if entry.is_null() {
			out.insert(key.clone(), T::default());

			continue;
		}

		match serde_json::from_value::<T>(entry.clone()) {
			Ok(parsed) => {
				out.insert(key.clone(), parsed);
			},
			Err(err) => {
				tracing::warn!(section = name, key = %key, error = %err, "Skipping malformed snapshot entry.");
			},
		}
	}

	out
}

fn last_update(object: &Map<String, Value>) -> Option<OffsetDateTime> {
	for name in ["lastUpdate", "syncedAt"] {
		let Some(value) = object.get(name) else { continue };

		match serde_json::from_value::<Stamp>(value.clone()) {
			Ok(Stamp(Some(stamp))) => return Some(stamp),
			Ok(Stamp(None)) => continue,
			Err(err) => {
				tracing::warn!(field = name, error = %err, "Ignoring unreadable snapshot timestamp.");
			},
		}
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unwraps_nested_wrappers() {
		let raw = RawIndex::from_value(serde_json::json!({
			"semanticIndex": { "semanticIndex": { "products": { "mug": { "title": "Mug" } } } }
		}));

		assert_eq!(raw.products["mug"].title.as_deref(), Some("Mug"));
	}

	#[test]
	fn malformed_sections_become_empty() {
		let raw = RawIndex::from_value(serde_json::json!({
			"products": ["not", "a", "mapping"],
			"collections": { "greekify": { "title": "Greekify" } },
			"pages": 7
		}));

		assert!(raw.products.is_empty());
		assert!(raw.pages.is_empty());
		assert_eq!(raw.collections.len(), 1);
	}

	#[test]
	fn malformed_entries_are_skipped_and_nulls_kept() {
		let raw = RawIndex::from_value(serde_json::json!({
			"products": {
				"good": { "title": "Good", "tags": "single-tag" },
				"bad": { "productCount": "many" },
				"empty": null
			}
		}));

		assert_eq!(raw.products.len(), 2);
		assert_eq!(raw.products["good"].tags, Some(vec!["single-tag".to_string()]));
		assert_eq!(raw.products["empty"], RawEntry::default());
	}

	#[test]
	fn alias_values_accept_strings_and_lists() {
		let raw = RawIndex::from_value(serde_json::json!({
			"themeAliases": { "fiesta": ["latin", "celebration"], "sea": "nautical" },
			"categoryAliases": { "hoodie": "hoodies", "tee": ["t-shirts", "ignored"] }
		}));

		assert_eq!(raw.theme_aliases["fiesta"], vec!["latin", "celebration"]);
		assert_eq!(raw.theme_aliases["sea"], vec!["nautical"]);
		assert_eq!(raw.category_aliases["hoodie"], "hoodies");
		assert_eq!(raw.category_aliases["tee"], "t-shirts");
	}

	#[test]
	fn body_prefers_text_then_semantic_then_description() {
		let entry = RawEntry {
			text: Some("  ".to_string()),
			semantic: Some("semantic body".to_string()),
			description: Some("description body".to_string()),
			..Default::default()
		};

		assert_eq!(entry.body(), Some("semantic body"));
	}

	#[test]
	fn reads_either_timestamp_field() {
		let raw = RawIndex::from_value(serde_json::json!({ "syncedAt": "2024-01-02T03:04:05Z" }));

		assert_eq!(raw.last_update.map(|stamp| stamp.year()), Some(2024));
	}

	#[test]
	fn invalid_json_is_empty() {
		assert_eq!(RawIndex::from_slice(b"{not json"), RawIndex::default());
	}
}
