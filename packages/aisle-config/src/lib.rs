mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Catalog, Config, EmbeddingProviderConfig, Enrichment, Index, Providers, Ranking, Service,
	Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes and validates a config document that is already in memory.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if !matches!(cfg.catalog.format.as_str(), "snapshot" | "storefront") {
		return Err(Error::Validation {
			message: "catalog.format must be one of snapshot or storefront.".to_string(),
		});
	}
	if cfg.catalog.endpoint.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.endpoint must be non-empty.".to_string(),
		});
	}
	if cfg.catalog.token.is_some() && cfg.catalog.token_header.trim().is_empty() {
		return Err(Error::Validation {
			message: "catalog.token_header must be non-empty when catalog.token is set."
				.to_string(),
		});
	}
	if cfg.catalog.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "catalog.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("storage.index_path", &cfg.storage.index_path),
		("storage.registry_path", &cfg.storage.registry_path),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.index_path == cfg.storage.registry_path {
		return Err(Error::Validation {
			message: "storage.index_path and storage.registry_path must differ.".to_string(),
		});
	}
	if cfg.index.ttl_secs == 0 {
		return Err(Error::Validation {
			message: "index.ttl_secs must be greater than zero.".to_string(),
		});
	}
	if !matches!(cfg.index.source.as_str(), "blob" | "catalog") {
		return Err(Error::Validation {
			message: "index.source must be one of blob or catalog.".to_string(),
		});
	}

	for (label, value) in [
		("ranking.product_limit", cfg.ranking.product_limit),
		("ranking.page_limit", cfg.ranking.page_limit),
		("ranking.vector_top_k", cfg.ranking.vector_top_k),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if !cfg.ranking.collection_boost.is_finite() {
		return Err(Error::Validation {
			message: "ranking.collection_boost must be a finite number.".to_string(),
		});
	}
	if cfg.ranking.collection_boost < 0.0 {
		return Err(Error::Validation {
			message: "ranking.collection_boost must be zero or greater.".to_string(),
		});
	}

	let embedding = &cfg.providers.embedding;

	if embedding.enabled {
		if embedding.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: "providers.embedding.api_key must be non-empty when enabled.".to_string(),
			});
		}
		if embedding.dimensions == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.dimensions must be greater than zero.".to_string(),
			});
		}
		if embedding.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.catalog.token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
		cfg.catalog.token = None;
	}
	if cfg
		.enrichment
		.path
		.as_deref()
		.map(|path| path.as_os_str().to_string_lossy().trim().is_empty())
		.unwrap_or(false)
	{
		cfg.enrichment.path = None;
	}

	let mut prefixes = Vec::with_capacity(cfg.ranking.primary_collection_prefixes.len());

	for prefix in cfg.ranking.primary_collection_prefixes.drain(..) {
		let prefix = prefix.trim().to_lowercase();

		if !prefix.is_empty() && !prefixes.contains(&prefix) {
			prefixes.push(prefix);
		}
	}

	cfg.ranking.primary_collection_prefixes = prefixes;
}
