//! Catalog entries.
//!
//! A [`CatalogEntry`] is one selectable option of a catalog domain, tagged with
//! the driver attributes it is valid under. Entries are immutable once loaded
//! and compared by [`EntryId`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::enums::{
    DimensionKind, EntryKind, MaterialKind, OpeningKind, RoofType, SizeClass, StandardFor,
    WallDepthClass,
};
use crate::ids::EntryId;

/// Size code embedded in window and door ids: `SKYLARK200_M2`, `..._WINDOW-XL1`.
static OPENING_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]([SMLX]+)\d").expect("Invalid opening code regex"));

/// Skylight codes may end with the size letter: `SKYLARK200_mono_M`.
static SKYLIGHT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]([SMLX]+)(\d|$)").expect("Invalid skylight code regex"));

/// Presentation data carried through for the UI and the submission record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDetails {
    pub label: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub area_m2: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub wall_depth: WallDepthClass,
    pub size_class: Option<SizeClass>,
    pub roof_type: Option<RoofType>,
    pub standard_for: Option<StandardFor>,
    pub supports_quantity: bool,
    #[serde(default)]
    pub details: EntryDetails,
}

impl CatalogEntry {
    /// Create an entry valid under any wall depth with no further tags.
    ///
    /// Openings support quantities by default; everything else is single-valued.
    pub fn new(id: EntryId, kind: EntryKind) -> Self {
        Self {
            id,
            kind,
            wall_depth: WallDepthClass::Any,
            size_class: None,
            roof_type: None,
            standard_for: None,
            supports_quantity: matches!(kind, EntryKind::Opening(_)),
            details: EntryDetails::default(),
        }
    }

    pub fn dimension(id: EntryId, kind: DimensionKind) -> Self {
        Self::new(id, EntryKind::Dimension(kind))
    }

    pub fn opening(id: EntryId, kind: OpeningKind) -> Self {
        Self::new(id, EntryKind::Opening(kind))
    }

    pub fn material(id: EntryId, kind: MaterialKind) -> Self {
        Self::new(id, EntryKind::Material(kind))
    }

    pub fn with_wall_depth(mut self, wall_depth: WallDepthClass) -> Self {
        self.wall_depth = wall_depth;
        self
    }

    pub fn with_size_class(mut self, size_class: Option<SizeClass>) -> Self {
        self.size_class = size_class;
        self
    }

    pub fn with_roof_type(mut self, roof_type: Option<RoofType>) -> Self {
        self.roof_type = roof_type;
        self
    }

    pub fn with_standard_for(mut self, standard_for: Option<StandardFor>) -> Self {
        self.standard_for = standard_for;
        self
    }

    pub fn with_quantity_support(mut self, supports_quantity: bool) -> Self {
        self.supports_quantity = supports_quantity;
        self
    }

    pub fn with_details(mut self, details: EntryDetails) -> Self {
        self.details = details;
        self
    }

    /// Size class used for cross-catalog matching.
    ///
    /// An explicit tag wins; openings otherwise fall back to the size code
    /// embedded in their id.
    pub fn derived_size_class(&self) -> Option<SizeClass> {
        if self.size_class.is_some() {
            return self.size_class;
        }
        let pattern = match self.kind {
            EntryKind::Opening(OpeningKind::Skylight) => &*SKYLIGHT_CODE_REGEX,
            EntryKind::Opening(_) => &*OPENING_CODE_REGEX,
            _ => return None,
        };
        pattern
            .captures(self.id.as_str())
            .and_then(|caps| caps.get(1))
            .and_then(|code| code.as_str().parse().ok())
    }

    /// Numeric value of a dimension id (`"2400"` -> 2400.0), used for ordering.
    pub fn numeric_value(&self) -> Option<f64> {
        self.id.as_str().trim().parse().ok()
    }

    pub fn label(&self) -> &str {
        self.details.label.as_deref().unwrap_or(self.id.as_str())
    }
}
