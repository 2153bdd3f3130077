pub mod catalog;
pub mod embedding;

mod error;

pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = extra_headers(default_headers)?;

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	Ok(headers)
}

/// Headers for an upstream that authenticates with a raw token in a named header.
pub fn token_headers(header: &str, token: Option<&str>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(token) = token {
		headers.insert(HeaderName::from_bytes(header.as_bytes())?, token.parse()?);
	}

	Ok(headers)
}

fn extra_headers(default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key:?} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn auth_headers_keep_bearer_over_defaults() {
		let mut defaults = Map::new();

		defaults.insert("authorization".to_string(), Value::from("Basic nope"));
		defaults.insert("x-team".to_string(), Value::from("retail"));

		let headers = auth_headers("secret", &defaults).expect("headers failed");

		assert_eq!(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()), Some("Bearer secret"));
		assert_eq!(headers.get("x-team").and_then(|v| v.to_str().ok()), Some("retail"));
	}

	#[test]
	fn rejects_non_string_default_header() {
		let mut defaults = Map::new();

		defaults.insert("x-retries".to_string(), Value::from(3));

		assert!(matches!(auth_headers("secret", &defaults), Err(Error::InvalidConfig { .. })));
	}

	#[test]
	fn token_headers_skip_missing_token() {
		let header = "X-Storefront-Access-Token";

		assert!(token_headers(header, None).expect("headers failed").is_empty());

		let headers = token_headers(header, Some("tok")).expect("headers failed");

		assert_eq!(
			headers.get("x-storefront-access-token").and_then(|v| v.to_str().ok()),
			Some("tok")
		);
	}
}
