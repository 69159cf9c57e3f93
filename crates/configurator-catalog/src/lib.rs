#![deny(unsafe_code)]

//! Catalog Store loading: the three catalog CSV files, the optional
//! `catalog.toml` manifest with sha256 pins, and ordered fallback sources.

pub mod csv;
pub mod doctor;
pub mod error;
pub mod hash;
pub mod loader;
pub mod manifest;
pub mod paths;

pub use crate::doctor::{DoctorReport, DuplicateEntry};
pub use crate::error::{LoadError, Result};
pub use crate::loader::{
    CatalogSource, InlineCatalog, LoadedCatalog, LoadedFile, load, load_with_fallback,
};
pub use crate::manifest::{FileRole, Manifest};
pub use crate::paths::{CATALOG_ENV_VAR, catalog_root};
