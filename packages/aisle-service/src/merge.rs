//! Reconciles the authoritative catalog snapshot with the curated enrichment overlay.
//!
//! The base snapshot decides which products and collections exist and owns their identity
//! fields. The overlay may only add or replace descriptive fields on entries the base already has.
//! Pages and alias tables come from either side, with the overlay winning on key collisions.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use aisle_domain::{
	CatalogEntry, HelpPage, RawEntry, RawIndex, RawPage, SemanticIndex, raw::first_text,
};

const DEFAULT_PAGE_TYPE: &str = "help";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
	Collection,
	Product,
}

pub fn merge(base: &RawIndex, enrich: &RawIndex) -> SemanticIndex {
	let mut pages = BTreeMap::new();
	let mut theme_aliases = base.theme_aliases.clone();
	let mut category_aliases = base.category_aliases.clone();

	for (key, page) in base.pages.iter().chain(enrich.pages.iter()) {
		pages.insert(key.clone(), help_page(key, page));
	}

	theme_aliases.extend(enrich.theme_aliases.iter().map(|(k, v)| (k.clone(), v.clone())));
	category_aliases.extend(enrich.category_aliases.iter().map(|(k, v)| (k.clone(), v.clone())));

	SemanticIndex {
		collections: merge_section(&base.collections, &enrich.collections, Kind::Collection),
		products: merge_section(&base.products, &enrich.products, Kind::Product),
		pages,
		theme_aliases,
		category_aliases,
		last_update: enrich
			.last_update
			.or(base.last_update)
			.unwrap_or_else(OffsetDateTime::now_utc),
	}
}

fn merge_section(
	base: &BTreeMap<String, RawEntry>,
	enrich: &BTreeMap<String, RawEntry>,
	kind: Kind,
) -> BTreeMap<String, CatalogEntry> {
	base.iter()
		.map(|(key, entry)| (key.clone(), merge_entry(key, entry, enrich.get(key), kind)))
		.collect()
}

fn merge_entry(key: &str, base: &RawEntry, enrich: Option<&RawEntry>, kind: Kind) -> CatalogEntry {
	let empty = RawEntry::default();
	let enrich = enrich.unwrap_or(&empty);
	let handle = first_text([&base.handle, &enrich.handle]).unwrap_or(key).to_string();
	let category = match kind {
		Kind::Product => first_text([
			&enrich.category,
			&base.category,
			&base.product_type,
			&enrich.product_type,
		]),
		Kind::Collection => first_text([&base.category, &enrich.category]),
	};

	CatalogEntry {
		key: key.to_string(),
		id: first_text([&base.id, &enrich.id]).unwrap_or(key).to_string(),
		title: first_text([&base.title, &enrich.title]).unwrap_or(&handle).to_string(),
		url: first_text([&base.url, &base.online_store_url, &enrich.url, &enrich.online_store_url])
			.unwrap_or_default()
			.to_string(),
		image: first_text([
			&base.image,
			&base.featured_image,
			&enrich.image,
			&enrich.featured_image,
		])
		.map(str::to_string),
		collection: base
			.primary_collection()
			.or_else(|| enrich.primary_collection())
			.map(str::to_string),
		category: category.unwrap_or_default().to_string(),
		product_type: first_text([&base.product_type, &enrich.product_type])
			.unwrap_or_default()
			.to_string(),
		product_count: base.product_count.or(enrich.product_count).unwrap_or(0),
		tags: clean_list(base.tags.as_ref().or(enrich.tags.as_ref())),
		description: enrich.body().or_else(|| base.body()).unwrap_or_default().to_string(),
		themes: clean_list(enrich.themes.as_ref().or(base.themes.as_ref())),
		synonyms: clean_list(enrich.synonyms.as_ref().or(base.synonyms.as_ref())),
		keywords: clean_list(enrich.keywords.as_ref().or(base.keywords.as_ref())),
		handle,
	}
}

fn help_page(key: &str, page: &RawPage) -> HelpPage {
	HelpPage {
		id: first_text([&page.id]).unwrap_or(key).to_string(),
		title: first_text([&page.title]).unwrap_or(key).to_string(),
		url: first_text([&page.url]).unwrap_or_default().to_string(),
		page_type: first_text([&page.page_type]).unwrap_or(DEFAULT_PAGE_TYPE).to_string(),
		keywords: clean_list(page.keywords.as_ref()),
	}
}

fn clean_list(values: Option<&Vec<String>>) -> Vec<String> {
	values
		.map(|values| {
			values
				.iter()
				.map(|value| value.trim())
				.filter(|value| !value.is_empty())
				.map(str::to_string)
				.collect()
		})
		.unwrap_or_default()
}
