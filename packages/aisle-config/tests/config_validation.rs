use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
};

use toml::Value;

use aisle_config::Error;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn expect_validation(raw: &str, needle: &str) {
	match aisle_config::parse(raw) {
		Err(Error::Validation { message }) => {
			assert!(message.contains(needle), "Unexpected validation message: {message}");
		},
		Err(other) => panic!("Expected a validation error, got {other:?}."),
		Ok(_) => panic!("Expected a validation error for {needle}."),
	}
}

fn write_temp_config(payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let mut path = env::temp_dir();

	path.push(format!(
		"aisle_config_test_{}_{}.toml",
		std::process::id(),
		COUNTER.fetch_add(1, Ordering::SeqCst)
	));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

#[test]
fn sample_config_loads_from_disk() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML);
	let cfg = aisle_config::load(&path).expect("Sample config must load.");

	fs::remove_file(&path).expect("Failed to remove test config.");

	assert_eq!(cfg.index.ttl_secs, 300);
	assert_eq!(cfg.catalog.token.as_deref(), Some("storefront-token"));
	assert_eq!(cfg.enrichment.path, Some(PathBuf::from("data/semantic-enrich.json")));
}

#[test]
fn primary_prefixes_are_trimmed_lowercased_and_deduplicated() {
	let cfg = aisle_config::parse(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Sample config must parse.");

	assert_eq!(cfg.ranking.primary_collection_prefixes, vec!["greekify", "spanishify"]);
}

#[test]
fn blank_token_and_enrichment_path_become_none() {
	let raw = sample_toml_with("catalog", "token", Value::String("   ".to_string()));
	let raw = {
		let mut root: Value = toml::from_str(&raw).expect("Failed to parse config.");
		let enrichment = root
			.get_mut("enrichment")
			.and_then(Value::as_table_mut)
			.expect("Template config must include [enrichment].");

		enrichment.insert("path".to_string(), Value::String(" ".to_string()));

		toml::to_string(&root).expect("Failed to render config.")
	};
	let cfg = aisle_config::parse(&raw).expect("Config must parse.");

	assert!(cfg.catalog.token.is_none());
	assert!(cfg.enrichment.path.is_none());
}

#[test]
fn missing_enrichment_section_defaults_to_no_overlay() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");

	root.as_table_mut().expect("Template config must be a table.").remove("enrichment");

	let raw = toml::to_string(&root).expect("Failed to render config.");
	let cfg = aisle_config::parse(&raw).expect("Config must parse.");

	assert!(cfg.enrichment.path.is_none());
}

#[test]
fn rejects_unknown_catalog_format() {
	let raw = sample_toml_with("catalog", "format", Value::String("graphql".to_string()));

	expect_validation(&raw, "catalog.format");
}

#[test]
fn rejects_unknown_index_source() {
	let raw = sample_toml_with("index", "source", Value::String("s3".to_string()));

	expect_validation(&raw, "index.source");
}

#[test]
fn rejects_zero_ttl() {
	let raw = sample_toml_with("index", "ttl_secs", Value::Integer(0));

	expect_validation(&raw, "index.ttl_secs");
}

#[test]
fn rejects_zero_limits() {
	for key in ["product_limit", "page_limit", "vector_top_k"] {
		let raw = sample_toml_with("ranking", key, Value::Integer(0));

		expect_validation(&raw, key);
	}
}

#[test]
fn rejects_negative_collection_boost() {
	let raw = sample_toml_with("ranking", "collection_boost", Value::Float(-1.0));

	expect_validation(&raw, "ranking.collection_boost");
}

#[test]
fn rejects_shared_blob_paths() {
	let shared = Value::String("semantic-index.json".to_string());
	let raw = sample_toml_with("storage", "registry_path", shared);

	expect_validation(&raw, "must differ");
}

#[test]
fn embedding_key_is_required_only_when_enabled() {
	let raw = sample_toml_with("providers.embedding", "api_key", Value::String(" ".to_string()));

	expect_validation(&raw, "providers.embedding.api_key");

	let mut root: Value = toml::from_str(&raw).expect("Failed to parse config.");
	let embedding = root
		.get_mut("providers")
		.and_then(|providers| providers.get_mut("embedding"))
		.and_then(Value::as_table_mut)
		.expect("Template config must include [providers.embedding].");

	embedding.insert("enabled".to_string(), Value::Boolean(false));

	let raw = toml::to_string(&root).expect("Failed to render config.");

	assert!(aisle_config::parse(&raw).is_ok());
}

#[test]
fn load_reports_the_offending_path() {
	let path = PathBuf::from("/nonexistent/aisle/config.toml");

	match aisle_config::load(&path) {
		Err(Error::ReadConfig { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("Expected ReadConfig, got {other:?}."),
	}
}
