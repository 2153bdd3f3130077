//! Catalog data model and the text primitives shared by indexing and querying.

pub mod alias;
pub mod catalog;
pub mod normalize;
pub mod raw;
pub mod time_serde;

pub use alias::AliasExpander;
pub use catalog::{CatalogEntry, EmbeddedRecord, HelpPage, SemanticIndex};
pub use raw::{RawEntry, RawIndex, RawPage};
