//! Cascade controller behaviour against the sample catalog.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{id, ids, sample_catalog};
use configurator_engine::{
    CascadeController, CatalogState, DimensionFallback, EngineError, EngineOptions,
    QuantityWidget, SelectionRecord, SelectionWidget, SingleChoiceWidget, WidgetEvent,
};
use configurator_model::{
    Catalog, CatalogDomain, CatalogEntry, DependentSelection, DependentSlot, DriverChange,
    DriverField, DriverValues, EntryId, EntryKind, MaterialKind, OpeningKind, ProjectType, RoofType,
    WallDepth,
};

fn controller() -> CascadeController {
    CascadeController::with_catalog(sample_catalog(), EngineOptions::default()).unwrap()
}

/// 200 mm walls at 2.4 m: size class M.
fn controller_200_m() -> CascadeController {
    let mut controller = controller();
    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm200)))
        .unwrap();
    controller
        .set_driver(DriverChange::Height(Some(id("2400"))))
        .unwrap();
    controller
}

#[test]
fn setting_height_again_resets_windows_and_doors() {
    let mut controller = controller_200_m();
    assert_eq!(ids(&controller.admissible().windows), vec!["SKYLARK200_M1"]);
    controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", 2)
        .unwrap();
    controller
        .set_quantity(DependentSlot::Doors, "SKYLARK200_M1", 1)
        .unwrap();

    controller
        .set_driver(DriverChange::Height(Some(id("2400"))))
        .unwrap();

    assert!(controller.dependents().windows.is_empty());
    assert!(controller.dependents().doors.is_empty());
}

#[test]
fn skylight_quantities_survive_height_change() {
    let mut controller = controller_200_m();
    controller
        .set_driver(DriverChange::RoofType(Some(RoofType::MonoPitch)))
        .unwrap();
    assert_eq!(
        ids(&controller.admissible().skylights),
        vec!["SKYLARK200_SKYLIGHT-S1"]
    );
    controller
        .set_quantity(DependentSlot::Skylights, "SKYLARK200_SKYLIGHT-S1", 1)
        .unwrap();

    controller
        .set_driver(DriverChange::Height(Some(id("2700"))))
        .unwrap();

    assert_eq!(
        controller
            .dependents()
            .quantity(DependentSlot::Skylights, "SKYLARK200_SKYLIGHT-S1"),
        1
    );
}

#[test]
fn roof_change_drops_skylights_of_other_roof() {
    let mut controller = controller_200_m();
    controller
        .set_driver(DriverChange::RoofType(Some(RoofType::MonoPitch)))
        .unwrap();
    controller
        .set_quantity(DependentSlot::Skylights, "SKYLARK200_SKYLIGHT-S1", 3)
        .unwrap();

    controller
        .set_driver(DriverChange::RoofType(Some(RoofType::DoublePitch)))
        .unwrap();

    assert!(controller.dependents().skylights.is_empty());
}

#[test]
fn wall_depth_change_clears_inadmissible_height() {
    let mut controller = controller();
    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm200)))
        .unwrap();
    controller
        .set_driver(DriverChange::Height(Some(id("2700"))))
        .unwrap();

    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm250)))
        .unwrap();

    assert_eq!(controller.drivers().height, None);
    assert_eq!(controller.admissible().height_size_class, None);
}

#[test]
fn wall_depth_change_can_fall_back_to_first_admissible_height() {
    let options =
        EngineOptions::default().with_dimension_fallback(DimensionFallback::FirstAdmissible);
    let mut controller = CascadeController::with_catalog(sample_catalog(), options).unwrap();
    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm200)))
        .unwrap();
    controller
        .set_driver(DriverChange::Height(Some(id("2700"))))
        .unwrap();

    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm250)))
        .unwrap();

    assert_eq!(controller.drivers().height, Some(id("2400")));
}

#[test]
fn height_shared_by_both_wall_depths_is_kept() {
    let mut controller = controller_200_m();
    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm250)))
        .unwrap();
    assert_eq!(controller.drivers().height, Some(id("2400")));
    assert_eq!(ids(&controller.admissible().windows), vec!["SKYLARK250_M1"]);
}

#[test]
fn unknown_dimension_is_an_invalid_driver_value() {
    let mut controller = controller_200_m();
    let err = controller
        .set_driver(DriverChange::Height(Some(id("9999"))))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidDriverValue {
            field: DriverField::Height,
            ..
        }
    ));
    assert_eq!(controller.drivers().height, Some(id("2400")));
}

#[test]
fn dimension_outside_wall_depth_is_inadmissible() {
    let mut controller = controller_200_m();
    let err = controller
        .set_driver(DriverChange::Width(Some(id("6000"))))
        .unwrap_err();
    assert!(matches!(err, EngineError::InadmissibleSelectionWrite { .. }));
    assert_eq!(controller.drivers().width, None);
}

#[test]
fn unparseable_driver_string_is_rejected() {
    let mut controller = controller();
    let err = controller
        .set_driver_str(DriverField::RoofType, Some("flat"))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidDriverValue {
            field: DriverField::RoofType,
            ..
        }
    ));
    controller
        .set_driver_str(DriverField::ProjectType, Some("self-build"))
        .unwrap();
    assert_eq!(controller.drivers().project_type, Some(ProjectType::SelfBuild));
    controller
        .set_driver_str(DriverField::ProjectType, Some(""))
        .unwrap();
    assert_eq!(controller.drivers().project_type, None);
}

#[test]
fn quantity_writes_are_checked() {
    let mut controller = controller_200_m();
    let err = controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_S1", 1)
        .unwrap_err();
    assert!(matches!(err, EngineError::InadmissibleSelectionWrite { .. }));

    let err = controller
        .set_quantity(DependentSlot::Cladding, "cedar", 1)
        .unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedSlot { .. }));

    controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", -1)
        .unwrap();
    assert!(controller.dependents().windows.is_empty());
}

#[test]
fn single_only_openings_reject_larger_quantities() {
    let catalog = Catalog::from_entries([CatalogEntry::opening(
        id("SKYLARK200_M1"),
        OpeningKind::Door,
    )
    .with_quantity_support(false)]);
    let mut controller = CascadeController::with_catalog(catalog, EngineOptions::default()).unwrap();
    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm200)))
        .unwrap();

    controller
        .set_quantity(DependentSlot::Doors, "SKYLARK200_M1", 1)
        .unwrap();
    let err = controller
        .set_quantity(DependentSlot::Doors, "SKYLARK200_M1", 2)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::UnsupportedQuantity { quantity: 2, .. }
    ));
    assert_eq!(
        controller
            .dependents()
            .quantity(DependentSlot::Doors, "SKYLARK200_M1"),
        1
    );
}

#[test]
fn adjust_quantity_stops_at_zero() {
    let mut controller = controller_200_m();
    assert_eq!(
        controller
            .adjust_quantity(DependentSlot::Windows, "SKYLARK200_M1", 1)
            .unwrap(),
        1
    );
    assert_eq!(
        controller
            .adjust_quantity(DependentSlot::Windows, "SKYLARK200_M1", -1)
            .unwrap(),
        0
    );
    assert_eq!(
        controller
            .adjust_quantity(DependentSlot::Windows, "SKYLARK200_M1", -1)
            .unwrap(),
        0
    );
    assert!(controller.dependents().windows.is_empty());
}

#[test]
fn adjust_quantity_rejects_single_valued_slots() {
    let mut controller = controller();
    for delta in [-1, 1] {
        let err = controller
            .adjust_quantity(DependentSlot::Cladding, "cedar", delta)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnsupportedSlot {
                slot: DependentSlot::Cladding,
                ..
            }
        ));
    }
    assert_eq!(controller.dependents().cladding, None);
}

#[test]
fn oversized_quantity_is_rejected() {
    let mut controller = controller_200_m();
    let too_many = i64::from(u32::MAX) + 1;
    let err = controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", too_many)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::UnsupportedQuantity { quantity, .. } if quantity == too_many
    ));
    assert!(controller.dependents().windows.is_empty());
}

#[test]
fn materials_are_single_valued_and_gated() {
    let mut controller = controller();
    controller
        .set_single(DependentSlot::Cladding, Some("larch"))
        .unwrap();
    controller
        .set_single(DependentSlot::Roofing, Some("epdm"))
        .unwrap();
    assert_eq!(controller.dependents().cladding, Some(id("larch")));

    let err = controller
        .set_single(DependentSlot::Cladding, Some("epdm"))
        .unwrap_err();
    assert!(matches!(err, EngineError::InadmissibleSelectionWrite { .. }));
    let err = controller
        .set_single(DependentSlot::Windows, None)
        .unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedSlot { .. }));

    controller.reset_slot(DependentSlot::Roofing);
    assert_eq!(controller.dependents().roofing, None);
    assert_eq!(controller.dependents().cladding, Some(id("larch")));
}

#[test]
fn subscribers_see_new_and_old_snapshots() {
    let mut controller = controller();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = controller.subscribe(move |new, old| {
        sink.borrow_mut()
            .push((new.drivers.wall_depth, old.drivers.wall_depth, new.revision));
    });
    let start = controller.state().revision();

    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm250)))
        .unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![(Some(WallDepth::Mm250), None, start + 1)]
    );

    assert!(controller.unsubscribe(subscription));
    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm200)))
        .unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn unchanged_quantity_does_not_notify() {
    let mut controller = controller_200_m();
    controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", 2)
        .unwrap();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    controller.subscribe(move |_, _| *sink.borrow_mut() += 1);

    controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", 2)
        .unwrap();
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn driver_changes_queue_while_catalog_loads() {
    let mut controller = CascadeController::new(EngineOptions::default());
    assert_eq!(controller.catalog_state(), CatalogState::Loading);

    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm200)))
        .unwrap();
    controller
        .set_driver(DriverChange::Height(Some(id("2700"))))
        .unwrap();
    controller
        .set_driver(DriverChange::Width(Some(id("6000"))))
        .unwrap();
    assert_eq!(controller.pending_len(), 3);
    assert_eq!(controller.drivers(), &DriverValues::default());

    controller.install_catalog(sample_catalog()).unwrap();

    assert_eq!(controller.catalog_state(), CatalogState::Ready);
    assert_eq!(controller.pending_len(), 0);
    assert_eq!(controller.drivers().wall_depth, Some(WallDepth::Mm200));
    assert_eq!(controller.drivers().height, Some(id("2700")));
    // 6000 exists only for 250 mm walls; the queued change is dropped.
    assert_eq!(controller.drivers().width, None);
}

#[test]
fn reload_recascades_current_selection() {
    let mut controller = controller_200_m();
    controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", 2)
        .unwrap();

    controller.begin_reload();
    controller
        .set_driver(DriverChange::RoofType(Some(RoofType::DoublePitch)))
        .unwrap();
    assert_eq!(controller.drivers().roof_type, None);

    let full = sample_catalog();
    let smaller = Catalog::from_entries(
        full.entries_of(EntryKind::Opening(OpeningKind::Window))
            .filter(|entry| entry.id.as_str() != "SKYLARK200_M1")
            .chain(full.get(CatalogDomain::Dimensions))
            .cloned(),
    );
    controller.install_catalog(smaller).unwrap();

    assert!(controller.dependents().windows.is_empty());
    assert_eq!(controller.drivers().roof_type, Some(RoofType::DoublePitch));
    assert_eq!(controller.drivers().height, Some(id("2400")));
}

#[test]
fn reinstalling_an_unchanged_catalog_does_not_notify() {
    let mut controller = controller_200_m();
    controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", 1)
        .unwrap();
    let revision = controller.state().revision();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    controller.subscribe(move |_, _| *sink.borrow_mut() += 1);

    controller.begin_reload();
    controller.install_catalog(sample_catalog()).unwrap();

    assert_eq!(controller.catalog_state(), CatalogState::Ready);
    assert_eq!(controller.state().revision(), revision);
    assert_eq!(*count.borrow(), 0);
    assert_eq!(ids(&controller.admissible().windows), vec!["SKYLARK200_M1"]);
}

#[test]
fn empty_catalog_is_a_working_degraded_mode() {
    let mut controller =
        CascadeController::with_catalog(Catalog::default(), EngineOptions::default()).unwrap();
    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm200)))
        .unwrap();
    controller
        .set_driver(DriverChange::RoofType(Some(RoofType::MonoPitch)))
        .unwrap();

    let admissible = controller.admissible();
    assert!(admissible.dimensions.is_empty());
    for slot in DependentSlot::ALL {
        assert!(admissible.entries(slot).is_empty(), "{slot} should be empty");
    }
    assert!(admissible.standard_materials.is_empty());
    assert!(admissible.skylights_visible);

    let err = controller
        .set_driver(DriverChange::Height(Some(id("2400"))))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidDriverValue {
            field: DriverField::Height,
            ..
        }
    ));
    assert_eq!(controller.drivers().height, None);

    let record = controller.submission();
    assert!(record.windows.is_empty());
    assert!(record.doors.is_empty());
    assert!(record.skylights.is_empty());
    assert_eq!(record.cladding, "");
    assert_eq!(record.wall_depth, "200");
}

#[test]
fn catalog_without_openings_still_resolves() {
    let full = sample_catalog();
    let catalog = Catalog::from_entries(
        full.get(CatalogDomain::Dimensions)
            .iter()
            .chain(full.get(CatalogDomain::Materials))
            .cloned(),
    );
    let mut controller = CascadeController::with_catalog(catalog, EngineOptions::default()).unwrap();
    controller
        .set_driver(DriverChange::WallDepth(Some(WallDepth::Mm200)))
        .unwrap();
    controller
        .set_driver(DriverChange::Height(Some(id("2400"))))
        .unwrap();
    controller
        .set_driver(DriverChange::RoofType(Some(RoofType::MonoPitch)))
        .unwrap();

    let admissible = controller.admissible();
    assert!(admissible.windows.is_empty());
    assert!(admissible.doors.is_empty());
    assert!(admissible.skylights.is_empty());
    assert!(!admissible.cladding.is_empty());

    let err = controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", 1)
        .unwrap_err();
    assert!(matches!(err, EngineError::InadmissibleSelectionWrite { .. }));
    controller
        .set_single(DependentSlot::Cladding, Some("cedar"))
        .unwrap();

    let record = controller.submission();
    assert!(record.windows.is_empty());
    assert!(record.skylights.is_empty());
    assert_eq!(record.building_height, "2400");
    assert_eq!(record.cladding, "cedar");
}

#[test]
fn malformed_catalog_leaves_state_unchanged() {
    let mut controller = controller_200_m();
    let revision = controller.state().revision();
    let malformed = Catalog::from_parts(
        Vec::new(),
        vec![CatalogEntry::material(id("cedar"), MaterialKind::Cladding)],
        Vec::new(),
    );

    let err = controller.install_catalog(malformed).unwrap_err();

    assert!(matches!(err, EngineError::Resolve(_)));
    assert_eq!(controller.state().revision(), revision);
    assert_eq!(controller.drivers().height, Some(id("2400")));
    assert!(!controller.catalog().is_empty());
}

#[test]
fn reset_clears_everything() {
    let mut controller = controller_200_m();
    controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", 1)
        .unwrap();
    controller.reset().unwrap();
    assert_eq!(controller.drivers(), &DriverValues::default());
    assert!(controller.dependents().is_empty());
    assert!(!controller.admissible().openings_visible);
}

#[test]
fn restore_drops_stale_entries() {
    let mut dependents = DependentSelection::new();
    dependents.set_quantity(DependentSlot::Windows, id("SKYLARK200_M1"), 2);
    dependents.set_quantity(DependentSlot::Windows, id("SKYLARK200_RETIRED1"), 1);
    dependents.set_single(DependentSlot::Cladding, Some(id("oak")));
    dependents.set_single(DependentSlot::Roofing, Some(id("steel")));
    let record = SelectionRecord::new(
        DriverValues {
            wall_depth: Some(WallDepth::Mm200),
            height: Some(id("2400")),
            length: Some(id("9000")),
            ..DriverValues::default()
        },
        dependents,
    );

    let mut controller = controller();
    controller.restore_selection(record).unwrap();

    assert_eq!(controller.drivers().height, Some(id("2400")));
    assert_eq!(controller.drivers().length, None);
    assert_eq!(
        controller
            .dependents()
            .windows
            .keys()
            .map(EntryId::as_str)
            .collect::<Vec<_>>(),
        vec!["SKYLARK200_M1"]
    );
    assert_eq!(controller.dependents().cladding, None);
    assert_eq!(controller.dependents().roofing, Some(id("steel")));
}

#[test]
fn serialized_selection_round_trips_through_json() {
    let mut controller = controller_200_m();
    controller
        .set_quantity(DependentSlot::Doors, "SKYLARK200_M1", 1)
        .unwrap();
    let json = controller.serialize_selection().to_json().unwrap();

    let mut restored = CascadeController::new(EngineOptions::default());
    restored
        .restore_selection(SelectionRecord::from_json(&json).unwrap())
        .unwrap();
    assert_eq!(restored.pending_len(), 1);
    restored.install_catalog(sample_catalog()).unwrap();

    assert_eq!(restored.drivers(), controller.drivers());
    assert_eq!(restored.dependents(), controller.dependents());
}

#[test]
fn submission_lists_every_catalog_opening() {
    let mut controller = controller_200_m();
    controller
        .set_driver(DriverChange::ProjectType(Some(ProjectType::Turnkey)))
        .unwrap();
    controller
        .set_quantity(DependentSlot::Windows, "SKYLARK200_M1", 2)
        .unwrap();
    controller
        .set_single(DependentSlot::Cladding, Some("cedar"))
        .unwrap();

    let record = controller.submission();

    assert_eq!(record.project_type, "turnkey");
    assert_eq!(record.building_height, "2400");
    assert_eq!(record.wall_depth, "200");
    assert_eq!(record.wall_block_suffix, "M");
    assert_eq!(record.floor_block_suffix, "");
    assert_eq!(record.windows.len(), 5);
    assert_eq!(record.windows.get("SKYLARK200_M1"), Some(&2));
    assert_eq!(record.windows.get("SKYLARK250_L2"), Some(&0));
    assert_eq!(record.skylights.len(), 4);
    assert_eq!(record.cladding, "cedar");

    let fields = record.to_form_fields().unwrap();
    assert_eq!(fields.get("buildingHeight").map(String::as_str), Some("2400"));
    assert!(fields["windows"].contains("\"SKYLARK200_M1\":2"));
    assert!(fields.contains_key("payload"));
}

#[test]
fn widgets_round_trip_through_controller() {
    let mut controller = controller_200_m();
    let mut windows = QuantityWidget::new(DependentSlot::Windows);
    let events: Rc<RefCell<Vec<WidgetEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    windows.on_change(Box::new(move |event| sink.borrow_mut().push(event.clone())));

    controller.project_onto(&mut windows);
    assert!(windows.is_visible());
    assert_eq!(windows.options(), &[id("SKYLARK200_M1")]);

    windows.user_increment(&id("SKYLARK200_M1"));
    windows.user_increment(&id("SKYLARK200_M1"));
    for event in events.borrow().iter() {
        controller.apply_widget_event(event).unwrap();
    }
    assert_eq!(
        controller
            .dependents()
            .quantity(DependentSlot::Windows, "SKYLARK200_M1"),
        2
    );

    controller
        .set_driver(DriverChange::Height(Some(id("2700"))))
        .unwrap();
    controller.project_onto(&mut windows);
    assert!(windows.quantities().is_empty());
    assert_eq!(windows.options(), &[id("SKYLARK200_L1")]);
    assert_eq!(events.borrow().len(), 2);
}

#[test]
fn rejected_widget_write_reprojects_the_widget() {
    let mut controller = controller_200_m();
    let mut windows = QuantityWidget::new(DependentSlot::Windows);
    let events: Rc<RefCell<Vec<WidgetEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    windows.on_change(Box::new(move |event| sink.borrow_mut().push(event.clone())));
    controller.project_onto(&mut windows);

    windows.user_increment(&id("SKYLARK200_S1"));
    assert_eq!(windows.quantity("SKYLARK200_S1"), 0);
    assert!(events.borrow().is_empty());

    // The widget still offers the 2.4 m window after the height moved on.
    controller
        .set_driver(DriverChange::Height(Some(id("2700"))))
        .unwrap();
    windows.user_increment(&id("SKYLARK200_M1"));
    assert_eq!(windows.quantity("SKYLARK200_M1"), 1);

    let event = events.borrow()[0].clone();
    let err = controller
        .apply_widget_event_to(&mut windows, &event)
        .unwrap_err();

    assert!(matches!(err, EngineError::InadmissibleSelectionWrite { .. }));
    assert_eq!(windows.quantity("SKYLARK200_M1"), 0);
    assert_eq!(windows.options(), &[id("SKYLARK200_L1")]);
    assert!(controller.dependents().windows.is_empty());
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn single_choice_widget_round_trip() {
    let mut controller = controller();
    let mut cladding = SingleChoiceWidget::new(DependentSlot::Cladding);
    let events: Rc<RefCell<Vec<WidgetEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    cladding.on_change(Box::new(move |event| sink.borrow_mut().push(event.clone())));

    controller.project_onto(&mut cladding);
    assert_eq!(cladding.options(), &[id("cedar"), id("larch")]);
    cladding.user_select(Some(&id("cedar")));
    let event = events.borrow()[0].clone();
    controller.apply_widget_event(&event).unwrap();
    assert_eq!(controller.dependents().cladding, Some(id("cedar")));

    let mut skylights = QuantityWidget::new(DependentSlot::Skylights);
    controller.project_onto(&mut skylights);
    assert!(!skylights.is_visible());
    assert!(skylights.options().is_empty());
}
