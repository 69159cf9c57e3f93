#![deny(unsafe_code)]

use std::collections::BTreeMap;

use configurator_model::{Catalog, CatalogDomain};

use crate::loader::{LoadedCatalog, LoadedFile};

/// Health summary of a loaded catalog.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorReport {
    pub schema: String,
    pub schema_version: u32,
    pub source: Option<String>,
    pub files: Vec<LoadedFile>,
    pub counts: BTreeMap<String, usize>,
    pub duplicates: Vec<DuplicateEntry>,
    /// Openings whose size class can be neither read nor derived from the id.
    pub unsized_openings: Vec<String>,
}

/// An id listed more than once for the same kind and wall depth. Only the
/// first occurrence is ever offered. The same id under different wall depths
/// (a 2400 height for both 200 and 250 mm walls) is not a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DuplicateEntry {
    pub kind: String,
    pub id: String,
    pub wall_depth: String,
    pub occurrences: usize,
}

impl DoctorReport {
    pub fn from_loaded(loaded: &LoadedCatalog) -> Self {
        Self::from_catalog(&loaded.catalog, loaded.files.clone())
    }

    pub fn from_catalog(catalog: &Catalog, files: Vec<LoadedFile>) -> Self {
        let counts = catalog
            .counts()
            .into_iter()
            .map(|(kind, count)| (kind.as_str().to_string(), count))
            .collect();

        let mut occurrences: BTreeMap<(&str, &str, &str), usize> = BTreeMap::new();
        for domain in CatalogDomain::ALL {
            for entry in catalog.get(domain) {
                let key = (entry.kind.as_str(), entry.id.as_str(), entry.wall_depth.as_str());
                *occurrences.entry(key).or_insert(0) += 1;
            }
        }
        let duplicates = occurrences
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|((kind, id, wall_depth), occurrences)| DuplicateEntry {
                kind: kind.to_string(),
                id: id.to_string(),
                wall_depth: wall_depth.to_string(),
                occurrences,
            })
            .collect();

        let mut unsized_openings: Vec<String> = catalog
            .get(CatalogDomain::Openings)
            .iter()
            .filter(|entry| entry.derived_size_class().is_none())
            .map(|entry| entry.id.to_string())
            .collect();
        unsized_openings.sort();
        unsized_openings.dedup();

        Self {
            schema: "configurator.catalog-doctor".to_string(),
            schema_version: 1,
            source: catalog.source.clone(),
            files,
            counts,
            duplicates,
            unsized_openings,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.duplicates.is_empty() && self.unsized_openings.is_empty()
    }
}
