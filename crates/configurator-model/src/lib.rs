//! Typed data model for the building configurator.
//!
//! Catalog entries, driver values and dependent selections. Loading lives in
//! `configurator-catalog`; the resolver and cascade live in
//! `configurator-engine`.

pub mod catalog;
pub mod drivers;
pub mod entry;
pub mod enums;
pub mod error;
pub mod ids;
pub mod selection;

pub use catalog::{Catalog, MisplacedEntry};
pub use drivers::{DriverChange, DriverField, DriverValues};
pub use entry::{CatalogEntry, EntryDetails};
pub use enums::{
    CatalogDomain, DimensionKind, EntryKind, MaterialKind, OpeningKind, ProjectType, RoofType,
    SizeClass, StandardFor, WallDepth, WallDepthClass,
};
pub use error::{ModelError, Result};
pub use ids::EntryId;
pub use selection::{DependentSelection, DependentSlot, QuantityMap};
