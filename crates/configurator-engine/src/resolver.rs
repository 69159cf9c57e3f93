//! Constraint Resolver.
//!
//! Pure functions from a [`Catalog`] and the current [`DriverValues`] to the
//! admissible subset of every dependent catalog. Rules, in priority order:
//!
//! 1. Wall-depth gating. Without a wall depth, dimensions and materials are
//!    unfiltered and every opening list is empty.
//! 2. Windows and doors match the height size class, when there is one.
//! 3. Skylights need a roof type and match it, then the width size class.
//!    Mono-pitch 200 mm skylights bypass the size match on mono-pitch
//!    200 mm buildings (see [`SkylightOverride`]).
//! 4. Standard materials exist only for turnkey projects with a roof type.
//!
//! Every list is de-duplicated by id, keeping the first catalog occurrence.

use std::collections::BTreeSet;

use configurator_model::{
    Catalog, CatalogEntry, DependentSlot, DimensionKind, DriverValues, EntryId, EntryKind,
    MaterialKind, OpeningKind, ProjectType, RoofType, SizeClass, WallDepth, WallDepthClass,
};
use serde::Serialize;
use tracing::debug;

use crate::error::ResolveError;
use crate::options::{EngineOptions, SkylightOverride};

/// Admissible subsets for one set of driver values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admissible {
    /// Heights, widths and lengths, in catalog order.
    pub dimensions: Vec<CatalogEntry>,
    pub windows: Vec<CatalogEntry>,
    pub doors: Vec<CatalogEntry>,
    pub skylights: Vec<CatalogEntry>,
    pub cladding: Vec<CatalogEntry>,
    pub roofing: Vec<CatalogEntry>,
    pub standard_materials: Vec<CatalogEntry>,
    pub height_size_class: Option<SizeClass>,
    pub width_size_class: Option<SizeClass>,
    /// Windows and doors can be shown (wall depth known).
    pub openings_visible: bool,
    /// The skylight section can be shown (roof type known).
    pub skylights_visible: bool,
}

impl Admissible {
    pub fn entries(&self, slot: DependentSlot) -> &[CatalogEntry] {
        match slot {
            DependentSlot::Windows => &self.windows,
            DependentSlot::Doors => &self.doors,
            DependentSlot::Skylights => &self.skylights,
            DependentSlot::Cladding => &self.cladding,
            DependentSlot::Roofing => &self.roofing,
        }
    }

    pub fn get(&self, slot: DependentSlot, id: &str) -> Option<&CatalogEntry> {
        self.entries(slot).iter().find(|entry| entry.id.as_str() == id)
    }

    pub fn contains(&self, slot: DependentSlot, id: &str) -> bool {
        self.get(slot, id).is_some()
    }

    pub fn dimensions_of(&self, kind: DimensionKind) -> impl Iterator<Item = &CatalogEntry> {
        self.dimensions
            .iter()
            .filter(move |entry| entry.kind == EntryKind::Dimension(kind))
    }

    pub fn contains_dimension(&self, kind: DimensionKind, id: &str) -> bool {
        self.dimensions_of(kind).any(|entry| entry.id.as_str() == id)
    }

    pub fn is_standard(&self, id: &str) -> bool {
        self.standard_materials
            .iter()
            .any(|entry| entry.id.as_str() == id)
    }

    pub fn is_visible(&self, slot: DependentSlot) -> bool {
        match slot {
            DependentSlot::Windows | DependentSlot::Doors => self.openings_visible,
            DependentSlot::Skylights => self.skylights_visible,
            DependentSlot::Cladding | DependentSlot::Roofing => true,
        }
    }
}

/// Size class of a dimension value under a wall depth.
///
/// Looks up the first `kind` entry with id `value` whose wall-depth class
/// admits `wall_depth`. Unknown when either input is unset or nothing matches.
pub fn size_class_of(
    catalog: &Catalog,
    kind: DimensionKind,
    value: Option<&str>,
    wall_depth: Option<WallDepth>,
) -> Option<SizeClass> {
    let (value, wall_depth) = (value?, wall_depth?);
    catalog
        .entries_of(EntryKind::Dimension(kind))
        .find(|entry| entry.id.as_str() == value && entry.wall_depth.admits(wall_depth))
        .and_then(CatalogEntry::derived_size_class)
}

pub fn resolve_admissible(
    catalog: &Catalog,
    drivers: &DriverValues,
    options: &EngineOptions,
) -> Result<Admissible, ResolveError> {
    catalog.validate()?;

    let wall_depth = drivers.wall_depth;
    let height_size_class = size_class_of(
        catalog,
        DimensionKind::Height,
        drivers.height.as_ref().map(EntryId::as_str),
        wall_depth,
    );
    let width_size_class = size_class_of(
        catalog,
        DimensionKind::Width,
        drivers.width.as_ref().map(EntryId::as_str),
        wall_depth,
    );

    let dimensions = dedupe(
        DimensionKind::ALL
            .into_iter()
            .flat_map(|kind| catalog.entries_of(EntryKind::Dimension(kind)))
            .filter(|entry| gate_unset_admits(entry, wall_depth)),
    );

    let (windows, doors) = match wall_depth {
        Some(depth) => {
            let wall_opening = |kind: OpeningKind| {
                dedupe(
                    catalog
                        .entries_of(EntryKind::Opening(kind))
                        .filter(|entry| entry.wall_depth.admits(depth))
                        .filter(|entry| size_matches(entry, height_size_class, options)),
                )
            };
            (wall_opening(OpeningKind::Window), wall_opening(OpeningKind::Door))
        }
        None => (Vec::new(), Vec::new()),
    };

    let skylights = match (wall_depth, drivers.roof_type) {
        (Some(depth), Some(roof)) => dedupe(
            catalog
                .entries_of(EntryKind::Opening(OpeningKind::Skylight))
                .filter(|entry| skylight_admissible(entry, depth, roof, width_size_class, options)),
        ),
        _ => Vec::new(),
    };

    let materials = |kind: MaterialKind| {
        dedupe(
            catalog
                .entries_of(EntryKind::Material(kind))
                .filter(|entry| gate_unset_admits(entry, wall_depth)),
        )
    };
    let cladding = materials(MaterialKind::Cladding);
    let roofing = materials(MaterialKind::Roofing);

    let standard_materials = match (drivers.project_type, drivers.roof_type) {
        (Some(ProjectType::Turnkey), Some(roof)) => cladding
            .iter()
            .chain(roofing.iter())
            .filter(|entry| entry.standard_for.is_some_and(|standard| standard.covers(roof)))
            .cloned()
            .collect(),
        _ => Vec::new(),
    };

    let admissible = Admissible {
        dimensions,
        windows,
        doors,
        skylights,
        cladding,
        roofing,
        standard_materials,
        height_size_class,
        width_size_class,
        openings_visible: wall_depth.is_some(),
        skylights_visible: drivers.roof_type.is_some(),
    };
    debug!(
        dimensions = admissible.dimensions.len(),
        windows = admissible.windows.len(),
        doors = admissible.doors.len(),
        skylights = admissible.skylights.len(),
        standard = admissible.standard_materials.len(),
        height_size_class = ?height_size_class,
        width_size_class = ?width_size_class,
        "resolved admissible sets"
    );
    Ok(admissible)
}

/// Wall-depth gating for catalogs that stay unfiltered until a depth is set.
fn gate_unset_admits(entry: &CatalogEntry, wall_depth: Option<WallDepth>) -> bool {
    wall_depth.is_none_or(|depth| entry.wall_depth.admits(depth))
}

fn size_matches(entry: &CatalogEntry, class: Option<SizeClass>, options: &EngineOptions) -> bool {
    match class {
        Some(class) if options.opening_size_filter => entry.derived_size_class() == Some(class),
        _ => true,
    }
}

fn skylight_admissible(
    entry: &CatalogEntry,
    depth: WallDepth,
    roof: RoofType,
    width_size_class: Option<SizeClass>,
    options: &EngineOptions,
) -> bool {
    if entry.roof_type != Some(roof) || !entry.wall_depth.admits(depth) {
        return false;
    }
    size_matches(entry, width_size_class, options) || mono_200_override(entry, depth, roof, options)
}

fn mono_200_override(
    entry: &CatalogEntry,
    depth: WallDepth,
    roof: RoofType,
    options: &EngineOptions,
) -> bool {
    options.skylight_override == SkylightOverride::Enabled
        && roof == RoofType::MonoPitch
        && depth == WallDepth::Mm200
        && entry.roof_type == Some(RoofType::MonoPitch)
        && entry.wall_depth == WallDepthClass::Exact(WallDepth::Mm200)
}

/// Keep the first entry of each (kind, id), preserving order.
fn dedupe<'a>(entries: impl Iterator<Item = &'a CatalogEntry>) -> Vec<CatalogEntry> {
    let mut seen: BTreeSet<(EntryKind, &'a str)> = BTreeSet::new();
    let mut kept = Vec::new();
    for entry in entries {
        if seen.insert((entry.kind, entry.id.as_str())) {
            kept.push(entry.clone());
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_model::StandardFor;

    fn id(value: &str) -> EntryId {
        EntryId::new(value).unwrap()
    }

    fn height(value: &str, depth: WallDepth, size: SizeClass) -> CatalogEntry {
        CatalogEntry::dimension(id(value), DimensionKind::Height)
            .with_wall_depth(WallDepthClass::Exact(depth))
            .with_size_class(Some(size))
    }

    fn window(value: &str, depth: WallDepth) -> CatalogEntry {
        CatalogEntry::opening(id(value), OpeningKind::Window)
            .with_wall_depth(WallDepthClass::Exact(depth))
    }

    fn ids(entries: &[CatalogEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn size_class_requires_value_and_wall_depth() {
        let catalog = Catalog::from_entries([height("2400", WallDepth::Mm200, SizeClass::M)]);
        assert_eq!(
            size_class_of(&catalog, DimensionKind::Height, Some("2400"), Some(WallDepth::Mm200)),
            Some(SizeClass::M)
        );
        assert_eq!(
            size_class_of(&catalog, DimensionKind::Height, Some("2400"), None),
            None
        );
        assert_eq!(
            size_class_of(&catalog, DimensionKind::Height, Some("2400"), Some(WallDepth::Mm250)),
            None
        );
    }

    #[test]
    fn openings_are_empty_without_wall_depth() {
        let catalog = Catalog::from_entries([window("SKYLARK200_S1", WallDepth::Mm200)]);
        let admissible =
            resolve_admissible(&catalog, &DriverValues::new(), &EngineOptions::default()).unwrap();
        assert!(admissible.windows.is_empty());
        assert!(!admissible.openings_visible);
    }

    #[test]
    fn dimensions_are_unfiltered_without_wall_depth() {
        let catalog = Catalog::from_entries([
            height("2400", WallDepth::Mm200, SizeClass::M),
            height("3000", WallDepth::Mm250, SizeClass::L),
        ]);
        let admissible =
            resolve_admissible(&catalog, &DriverValues::new(), &EngineOptions::default()).unwrap();
        assert_eq!(ids(&admissible.dimensions), vec!["2400", "3000"]);

        let drivers = DriverValues {
            wall_depth: Some(WallDepth::Mm250),
            ..DriverValues::default()
        };
        let admissible =
            resolve_admissible(&catalog, &drivers, &EngineOptions::default()).unwrap();
        assert_eq!(ids(&admissible.dimensions), vec!["3000"]);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let catalog = Catalog::from_entries([
            window("SKYLARK200_S1", WallDepth::Mm200).with_size_class(Some(SizeClass::S)),
            window("SKYLARK200_M1", WallDepth::Mm200),
            window("SKYLARK200_S1", WallDepth::Mm200).with_size_class(Some(SizeClass::L)),
        ]);
        let drivers = DriverValues {
            wall_depth: Some(WallDepth::Mm200),
            ..DriverValues::default()
        };
        let admissible =
            resolve_admissible(&catalog, &drivers, &EngineOptions::default()).unwrap();
        assert_eq!(ids(&admissible.windows), vec!["SKYLARK200_S1", "SKYLARK200_M1"]);
        assert_eq!(admissible.windows[0].size_class, Some(SizeClass::S));
    }

    #[test]
    fn size_filter_can_be_disabled() {
        let catalog = Catalog::from_entries([
            height("2400", WallDepth::Mm200, SizeClass::M),
            window("SKYLARK200_S1", WallDepth::Mm200),
        ]);
        let drivers = DriverValues {
            wall_depth: Some(WallDepth::Mm200),
            height: Some(id("2400")),
            ..DriverValues::default()
        };
        let strict = resolve_admissible(&catalog, &drivers, &EngineOptions::default()).unwrap();
        assert!(strict.windows.is_empty());
        let loose = resolve_admissible(
            &catalog,
            &drivers,
            &EngineOptions::default().with_opening_size_filter(false),
        )
        .unwrap();
        assert_eq!(ids(&loose.windows), vec!["SKYLARK200_S1"]);
    }

    #[test]
    fn standard_materials_follow_roof_key() {
        let catalog = Catalog::from_entries([
            CatalogEntry::material(id("epdm"), MaterialKind::Roofing)
                .with_standard_for(Some(StandardFor::Mono)),
            CatalogEntry::material(id("tiles"), MaterialKind::Roofing)
                .with_standard_for(Some(StandardFor::Double)),
        ]);
        let drivers = DriverValues {
            project_type: Some(ProjectType::Turnkey),
            roof_type: Some(RoofType::DoublePitch),
            ..DriverValues::default()
        };
        let admissible =
            resolve_admissible(&catalog, &drivers, &EngineOptions::default()).unwrap();
        assert_eq!(ids(&admissible.standard_materials), vec!["tiles"]);
        assert_eq!(ids(&admissible.roofing), vec!["epdm", "tiles"]);
    }

    #[test]
    fn misplaced_entry_is_a_resolve_error() {
        let catalog = Catalog::from_parts(
            Vec::new(),
            vec![CatalogEntry::material(id("cedar"), MaterialKind::Cladding)],
            Vec::new(),
        );
        let err = resolve_admissible(&catalog, &DriverValues::new(), &EngineOptions::default())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MalformedEntry { ref id, .. } if id == "cedar"));
    }
}
