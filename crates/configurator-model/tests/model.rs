//! Tests for configurator-model types.

use configurator_model::{
    Catalog, CatalogEntry, DependentSelection, DependentSlot, DimensionKind, DriverChange,
    DriverField, DriverValues, EntryDetails, EntryId, EntryKind, MaterialKind, OpeningKind,
    RoofType, SizeClass, StandardFor, WallDepth, WallDepthClass,
};

fn id(value: &str) -> EntryId {
    EntryId::new(value).expect("valid id")
}

#[test]
fn catalog_serializes_with_camel_case_fields() {
    let catalog = Catalog::from_entries([CatalogEntry::opening(
        id("SKYLARK200_mono_M"),
        OpeningKind::Skylight,
    )
    .with_wall_depth(WallDepthClass::Exact(WallDepth::Mm200))
    .with_roof_type(Some(RoofType::MonoPitch))
    .with_details(EntryDetails {
        label: Some("Skylight M".to_string()),
        ..EntryDetails::default()
    })])
    .with_source("inline");

    let json = serde_json::to_value(&catalog).expect("serialize catalog");
    let skylight = &json["openings"][0];
    assert_eq!(skylight["id"], "SKYLARK200_mono_M");
    assert_eq!(skylight["wallDepth"], "200");
    assert_eq!(skylight["roofType"], "mono-pitch");
    assert_eq!(skylight["supportsQuantity"], true);
    assert_eq!(skylight["kind"]["domain"], "opening");
    assert_eq!(skylight["kind"]["kind"], "Skylight");

    let round: Catalog = serde_json::from_value(json).expect("deserialize catalog");
    assert_eq!(round, catalog);
}

#[test]
fn any_wall_depth_admits_every_depth() {
    for depth in WallDepth::ALL {
        assert!(WallDepthClass::Any.admits(depth));
    }
    assert!(!WallDepthClass::Exact(WallDepth::Mm250).admits(WallDepth::Mm200));
}

#[test]
fn standard_for_both_covers_every_roof() {
    assert!(StandardFor::Both.covers(RoofType::MonoPitch));
    assert!(StandardFor::Both.covers(RoofType::DoublePitch));
    assert!(!StandardFor::Mono.covers(RoofType::DoublePitch));
}

#[test]
fn drivers_round_trip_through_json() {
    let drivers = DriverValues::new()
        .with(DriverChange::parse(DriverField::ProjectType, Some("turnkey")).unwrap())
        .with(DriverChange::parse(DriverField::WallDepth, Some("200mm")).unwrap())
        .with(DriverChange::parse(DriverField::Width, Some("4800")).unwrap());
    let json = serde_json::to_string(&drivers).expect("serialize drivers");
    assert!(json.contains("\"wallDepth\":\"200\""));
    let round: DriverValues = serde_json::from_str(&json).expect("deserialize drivers");
    assert_eq!(round, drivers);
    assert_eq!(round.dimension(DimensionKind::Width), Some(&id("4800")));
}

#[test]
fn dependent_selection_slots_follow_catalog_kinds() {
    let mut selection = DependentSelection::new();
    selection.set_quantity(DependentSlot::Skylights, id("SKYLARK200_mono_M"), 1);
    selection.set_single(DependentSlot::Cladding, Some(id("cedar")));

    let catalog = Catalog::from_entries([
        CatalogEntry::opening(id("SKYLARK200_mono_M"), OpeningKind::Skylight),
        CatalogEntry::material(id("cedar"), MaterialKind::Cladding)
            .with_standard_for(Some(StandardFor::Both)),
    ]);
    for slot in DependentSlot::ALL {
        for selected in selection.selected_ids(slot) {
            assert!(catalog.contains_id(slot.entry_kind(), selected.as_str()));
        }
    }
    assert!(!selection.is_empty());
}

#[test]
fn dimension_entries_parse_numeric_values() {
    let entry = CatalogEntry::dimension(id("2400"), DimensionKind::Height)
        .with_size_class(Some(SizeClass::M));
    assert_eq!(entry.numeric_value(), Some(2400.0));
    assert_eq!(entry.kind, EntryKind::Dimension(DimensionKind::Height));
    assert_eq!(entry.derived_size_class(), Some(SizeClass::M));
}
