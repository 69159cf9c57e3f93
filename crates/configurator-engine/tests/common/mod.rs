#![allow(dead_code)]

use configurator_catalog::{CatalogSource, catalog_root, load};
use configurator_model::{Catalog, EntryId};

pub fn id(value: &str) -> EntryId {
    EntryId::new(value).unwrap()
}

/// The sample catalog shipped in `catalog/` at the workspace root.
pub fn sample_catalog() -> Catalog {
    load(&CatalogSource::Directory(catalog_root()))
        .expect("sample catalog loads")
        .catalog
}

pub fn ids(entries: &[configurator_model::CatalogEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.id.as_str()).collect()
}
