//! The Catalog Store.
//!
//! A [`Catalog`] is populated once (by `configurator-catalog`) and is
//! read-only afterwards; a reload builds a fresh value that replaces the old
//! one wholesale. An empty catalog, or an empty domain list, is a valid
//! degraded state rather than an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::CatalogEntry;
use crate::enums::{CatalogDomain, EntryKind};

/// A structural defect found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MisplacedEntry {
    pub id: String,
    pub kind: EntryKind,
    pub found_in: CatalogDomain,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Where the catalog came from (directory, inline label), for reporting.
    pub source: Option<String>,
    dimensions: Vec<CatalogEntry>,
    openings: Vec<CatalogEntry>,
    materials: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog (degraded mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from pre-sorted domain lists.
    ///
    /// Entries are stored as given; [`Catalog::validate`] reports entries that
    /// were placed in the wrong list.
    pub fn from_parts(
        dimensions: Vec<CatalogEntry>,
        openings: Vec<CatalogEntry>,
        materials: Vec<CatalogEntry>,
    ) -> Self {
        Self {
            source: None,
            dimensions,
            openings,
            materials,
        }
    }

    /// Build a catalog by routing each entry to the list of its domain.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            match entry.kind.domain() {
                CatalogDomain::Dimensions => catalog.dimensions.push(entry),
                CatalogDomain::Openings => catalog.openings.push(entry),
                CatalogDomain::Materials => catalog.materials.push(entry),
            }
        }
        catalog
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// All entries of one domain, in load order.
    pub fn get(&self, domain: CatalogDomain) -> &[CatalogEntry] {
        match domain {
            CatalogDomain::Dimensions => &self.dimensions,
            CatalogDomain::Openings => &self.openings,
            CatalogDomain::Materials => &self.materials,
        }
    }

    /// Entries of a single kind, in load order.
    pub fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &CatalogEntry> {
        self.get(kind.domain())
            .iter()
            .filter(move |entry| entry.kind == kind)
    }

    /// First entry of `kind` with the given id.
    pub fn find(&self, kind: EntryKind, id: &str) -> Option<&CatalogEntry> {
        self.entries_of(kind).find(|entry| entry.id.as_str() == id)
    }

    pub fn contains_id(&self, kind: EntryKind, id: &str) -> bool {
        self.find(kind, id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.openings.is_empty() && self.materials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dimensions.len() + self.openings.len() + self.materials.len()
    }

    /// Entry counts per kind.
    pub fn counts(&self) -> BTreeMap<EntryKind, usize> {
        let mut counts = BTreeMap::new();
        for domain in CatalogDomain::ALL {
            for entry in self.get(domain) {
                *counts.entry(entry.kind).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Check that every entry sits in the list of its own domain.
    pub fn validate(&self) -> Result<(), MisplacedEntry> {
        for domain in CatalogDomain::ALL {
            if let Some(entry) = self.get(domain).iter().find(|e| e.kind.domain() != domain) {
                return Err(MisplacedEntry {
                    id: entry.id.to_string(),
                    kind: entry.kind,
                    found_in: domain,
                });
            }
        }
        Ok(())
    }
}
