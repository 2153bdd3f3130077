//! Base catalog snapshot client.
//!
//! `snapshot` upstreams publish a ready JSON index document. `storefront` upstreams expose a
//! GraphQL catalog whose collections→products tree is flattened here into the same shape.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};

use crate::{Error, Result};

pub const STOREFRONT_QUERY: &str = r#"{
  collections(first: 50) {
    edges {
      node {
        id
        handle
        title
        description
        products(first: 200) {
          edges {
            node {
              id
              handle
              title
              description
              onlineStoreUrl
              productType
              tags
              featuredImage { url }
            }
          }
        }
      }
    }
  }
}"#;

/// Fetches the base snapshot as a JSON document in snapshot shape. `synced_at_ms` stamps
/// storefront results, which carry no timestamp of their own.
pub async fn fetch_snapshot(cfg: &aisle_config::Catalog, synced_at_ms: i64) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let headers = crate::token_headers(&cfg.token_header, cfg.token.as_deref())?;

	match cfg.format.as_str() {
		"snapshot" => {
			let res = client.get(&cfg.endpoint).headers(headers).send().await?;
			let json: Value = res.error_for_status()?.json().await?;

			Ok(json)
		},
		"storefront" => {
			let res = client
				.post(&cfg.endpoint)
				.headers(headers)
				.json(&serde_json::json!({ "query": STOREFRONT_QUERY, "variables": {} }))
				.send()
				.await?;
			let json: Value = res.error_for_status()?.json().await?;
			let Some(data) = json.get("data").filter(|data| !data.is_null()) else {
				let detail = json.get("errors").map(Value::to_string).unwrap_or_default();

				let message = format!("Storefront returned no data. {detail}");

				return Err(Error::InvalidResponse { message: message.trim_end().to_string() });
			};

			normalize_storefront(data, &cfg.product_url_base, synced_at_ms)
		},
		other =>
			Err(Error::InvalidConfig { message: format!("Unknown catalog format {other:?}.") }),
	}
}

/// Flattens a storefront `collections` tree. Products are keyed `{collection}-product-{handle}`,
/// so a product listed in two collections yields two entries sharing one handle.
pub fn normalize_storefront(
	data: &Value,
	product_url_base: &str,
	synced_at_ms: i64,
) -> Result<Value> {
	let Some(edges) = data.pointer("/collections/edges").and_then(Value::as_array) else {
		return Err(Error::InvalidResponse {
			message: "Storefront response has no collections.".to_string(),
		});
	};
	let mut collections = Map::new();
	let mut products = Map::new();

	for edge in edges {
		let node = &edge["node"];
		let Some(collection_handle) = non_blank(node, "handle") else {
			tracing::warn!("Skipping storefront collection without a handle.");

			continue;
		};
		let product_nodes: Vec<&Value> = node
			.pointer("/products/edges")
			.and_then(Value::as_array)
			.map(|edges| edges.iter().map(|edge| &edge["node"]).collect())
			.unwrap_or_default();

		let mut listed = 0_usize;

		for product in product_nodes {
			let Some(handle) = non_blank(product, "handle") else {
				continue;
			};
			let key = format!("{collection_handle}-product-{handle}");
			let url = non_blank(product, "onlineStoreUrl")
				.map(str::to_string)
				.unwrap_or_else(|| format!("{product_url_base}{handle}"));
			let tags: Vec<&str> = product["tags"]
				.as_array()
				.map(|tags| tags.iter().filter_map(Value::as_str).collect())
				.unwrap_or_default();
			let mut entry = serde_json::json!({
				"id": non_blank(product, "id").unwrap_or(&key),
				"handle": handle,
				"title": product["title"].as_str().unwrap_or_default(),
				"url": url,
				"collection": collection_handle,
				"productType": product["productType"].as_str().unwrap_or_default(),
				"tags": tags,
				"text": product["description"].as_str().unwrap_or_default(),
			});

			if let Some(image) = product.pointer("/featuredImage/url").and_then(Value::as_str) {
				entry["image"] = Value::from(image);
			}

			products.insert(key, entry);

			listed += 1;
		}

		collections.insert(
			collection_handle.to_string(),
			serde_json::json!({
				"id": non_blank(node, "id").unwrap_or(collection_handle),
				"handle": collection_handle,
				"title": node["title"].as_str().unwrap_or_default(),
				"text": node["description"].as_str().unwrap_or_default(),
				"productCount": listed,
			}),
		);
	}

	Ok(serde_json::json!({
		"collections": collections,
		"products": products,
		"lastUpdate": synced_at_ms,
	}))
}

fn non_blank<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
	value.get(field).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn storefront_data() -> Value {
		serde_json::json!({
			"collections": { "edges": [
				{ "node": {
					"id": "gid://shop/Collection/1",
					"handle": "greekify",
					"title": "Greekify",
					"description": "Greek prints.",
					"products": { "edges": [
						{ "node": {
							"id": "gid://shop/Product/10",
							"handle": "owl-hoodie",
							"title": "Owl Hoodie",
							"description": "Warm.",
							"onlineStoreUrl": null,
							"productType": "Hoodie",
							"tags": ["owl"],
							"featuredImage": { "url": "https://cdn.example.com/owl.jpg" }
						}},
						{ "node": { "title": "No handle" }}
					]}
				}},
				{ "node": {
					"handle": "legacy-greek",
					"title": "Legacy Greek",
					"products": { "edges": [
						{ "node": {
							"id": "gid://shop/Product/10",
							"handle": "owl-hoodie",
							"title": "Owl Hoodie",
							"onlineStoreUrl": "https://store.example.com/products/owl-hoodie",
							"tags": null,
							"featuredImage": null
						}}
					]}
				}},
				{ "node": { "title": "Handleless collection" }}
			]}
		})
	}

	#[test]
	fn flattens_collections_and_keys_products_per_collection() {
		let base = "https://store.example.com/products/";
		let out = normalize_storefront(&storefront_data(), base, 42).expect("normalize failed");
		let flagship = &out["products"]["greekify-product-owl-hoodie"];
		let legacy = &out["products"]["legacy-greek-product-owl-hoodie"];

		assert_eq!(out["collections"].as_object().map(Map::len), Some(2));
		assert_eq!(out["products"].as_object().map(Map::len), Some(2));
		// The handle-less product node is skipped and not counted.
		assert_eq!(out["collections"]["greekify"]["productCount"], 1);
		assert_eq!(out["collections"]["legacy-greek"]["productCount"], 1);
		assert_eq!(out["collections"]["legacy-greek"]["id"], "legacy-greek");
		assert_eq!(flagship["handle"], "owl-hoodie");
		assert_eq!(flagship["collection"], "greekify");
		assert_eq!(flagship["url"], "https://store.example.com/products/owl-hoodie");
		assert_eq!(flagship["image"], "https://cdn.example.com/owl.jpg");
		assert_eq!(flagship["tags"], serde_json::json!(["owl"]));
		assert_eq!(legacy["handle"], "owl-hoodie");
		assert!(legacy.get("image").is_none());
		assert_eq!(legacy["tags"], serde_json::json!([]));
		assert_eq!(out["lastUpdate"], 42);
	}

	#[test]
	fn missing_collections_is_an_invalid_response() {
		let err = normalize_storefront(&serde_json::json!({ "shop": {} }), "", 0)
			.expect_err("must fail");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}
}
