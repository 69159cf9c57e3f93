//! Cascade Controller.
//!
//! The single writer of [`SelectionState`]. Every mutation runs on a working
//! copy: update the driver, recompute admissible sets, drop dependents that
//! are no longer admissible, and only then commit and notify. A resolver
//! error leaves the state untouched.
//!
//! Setting the height (to any value, including the current one) resets all
//! windows and doors before recomputing, since it redefines the size class
//! they are matched against.

use std::collections::VecDeque;

use chrono::Utc;
use configurator_model::{
    Catalog, DependentSelection, DependentSlot, DimensionKind, DriverChange, DriverField,
    DriverValues, EntryId, EntryKind,
};
use tracing::{debug, info, info_span, warn};

use crate::error::{EngineError, ResolveError, Result};
use crate::options::{DimensionFallback, EngineOptions};
use crate::persistence::SelectionRecord;
use crate::resolver::{Admissible, resolve_admissible};
use crate::state::{SelectionSnapshot, SelectionState, SubscriptionId};
use crate::submission::SubmissionRecord;
use crate::widget::{SelectionWidget, WidgetChange, WidgetEvent};

/// Whether the catalog store can be resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    /// No catalog yet, or a reload is in flight. Driver changes are queued.
    Loading,
    Ready,
}

#[derive(Debug, Clone)]
enum PendingChange {
    Driver(DriverChange),
    Restore(SelectionRecord),
}

/// Outcome of one cascade over a working copy.
struct Cascade {
    drivers: DriverValues,
    dependents: DependentSelection,
    admissible: Admissible,
    /// Dimension drivers that stopped being admissible, with their old value.
    cleared: Vec<(DimensionKind, EntryId)>,
    /// Dependent selections that stopped being admissible.
    dropped: Vec<(DependentSlot, EntryId)>,
}

fn cascade(
    catalog: &Catalog,
    options: &EngineOptions,
    mut drivers: DriverValues,
    mut dependents: DependentSelection,
    height_changed: bool,
) -> std::result::Result<Cascade, ResolveError> {
    if height_changed {
        debug!("height changed, resetting windows and doors");
        dependents.clear_slot(DependentSlot::Windows);
        dependents.clear_slot(DependentSlot::Doors);
    }
    let mut admissible = resolve_admissible(catalog, &drivers, options)?;

    let mut cleared = Vec::new();
    for kind in DimensionKind::ALL {
        let Some(value) = drivers.dimension(kind).cloned() else {
            continue;
        };
        if admissible.contains_dimension(kind, value.as_str()) {
            continue;
        }
        let replacement = match options.dimension_fallback {
            DimensionFallback::Clear => None,
            DimensionFallback::FirstAdmissible => admissible
                .dimensions_of(kind)
                .next()
                .map(|entry| entry.id.clone()),
        };
        drivers.set_dimension(kind, replacement);
        cleared.push((kind, value));
    }
    if !cleared.is_empty() {
        if cleared.iter().any(|(kind, _)| *kind == DimensionKind::Height) {
            dependents.clear_slot(DependentSlot::Windows);
            dependents.clear_slot(DependentSlot::Doors);
        }
        admissible = resolve_admissible(catalog, &drivers, options)?;
    }

    let mut dropped = Vec::new();
    for slot in DependentSlot::ALL {
        let removed = dependents.retain(slot, |id| admissible.contains(slot, id.as_str()));
        dropped.extend(removed.into_iter().map(|id| (slot, id)));
    }

    Ok(Cascade {
        drivers,
        dependents,
        admissible,
        cleared,
        dropped,
    })
}

#[derive(Debug)]
pub struct CascadeController {
    catalog: Catalog,
    catalog_state: CatalogState,
    options: EngineOptions,
    state: SelectionState,
    admissible: Admissible,
    pending: VecDeque<PendingChange>,
}

impl CascadeController {
    /// A controller waiting for its catalog; see [`Self::install_catalog`].
    pub fn new(options: EngineOptions) -> Self {
        Self {
            catalog: Catalog::new(),
            catalog_state: CatalogState::Loading,
            options,
            state: SelectionState::new(),
            admissible: Admissible::default(),
            pending: VecDeque::new(),
        }
    }

    pub fn with_catalog(catalog: Catalog, options: EngineOptions) -> Result<Self> {
        let mut controller = Self::new(options);
        controller.install_catalog(catalog)?;
        Ok(controller)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_state(&self) -> CatalogState {
        self.catalog_state
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn drivers(&self) -> &DriverValues {
        self.state.drivers()
    }

    pub fn dependents(&self) -> &DependentSelection {
        self.state.dependents()
    }

    pub fn admissible(&self) -> &Admissible {
        &self.admissible
    }

    /// Number of changes waiting for a catalog.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&SelectionSnapshot, &SelectionSnapshot) + 'static,
    ) -> SubscriptionId {
        self.state.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Mark a reload as started; changes are queued until the next install.
    pub fn begin_reload(&mut self) {
        self.catalog_state = CatalogState::Loading;
    }

    /// Replace the catalog wholesale, re-cascade the current selection against
    /// it, then replay queued changes in arrival order.
    ///
    /// A malformed catalog is rejected and nothing changes.
    pub fn install_catalog(&mut self, catalog: Catalog) -> Result<()> {
        let span = info_span!("install_catalog", entries = catalog.len());
        let _guard = span.enter();

        let old = self.state.snapshot();
        let outcome = cascade(
            &catalog,
            &self.options,
            old.drivers.clone(),
            old.dependents.clone(),
            false,
        )?;
        self.catalog = catalog;
        self.catalog_state = CatalogState::Ready;
        log_invalidations(&outcome);
        if outcome.drivers == old.drivers && outcome.dependents == old.dependents {
            self.admissible = outcome.admissible;
        } else {
            self.commit(outcome, &old);
        }

        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            info!(count = pending.len(), "replaying queued changes");
        }
        for change in pending {
            let result = match change {
                PendingChange::Driver(change) => self.set_driver(change),
                PendingChange::Restore(record) => self.restore_selection(record),
            };
            if let Err(error) = result {
                warn!(%error, "dropping queued change");
            }
        }
        Ok(())
    }

    pub fn set_driver(&mut self, change: DriverChange) -> Result<()> {
        if self.catalog_state == CatalogState::Loading {
            debug!(field = %change.field(), "catalog loading, queueing driver change");
            self.pending.push_back(PendingChange::Driver(change));
            return Ok(());
        }
        let span = info_span!("set_driver", field = %change.field());
        let _guard = span.enter();

        self.check_dimension(&change)?;
        let old = self.state.snapshot();
        let height_changed = change.field() == DriverField::Height;
        let mut drivers = old.drivers.clone();
        drivers.apply(change);

        let outcome = cascade(
            &self.catalog,
            &self.options,
            drivers,
            old.dependents.clone(),
            height_changed,
        )?;
        log_invalidations(&outcome);
        self.commit(outcome, &old);
        info!(revision = self.state.revision(), "driver change applied");
        Ok(())
    }

    /// Parse a raw UI value and apply it. Blank input unsets the driver.
    pub fn set_driver_str(&mut self, field: DriverField, raw: Option<&str>) -> Result<()> {
        let change = DriverChange::parse(field, raw)
            .map_err(|e| EngineError::invalid_driver(field, raw.unwrap_or_default(), e))?;
        self.set_driver(change)
    }

    /// Dimension drivers must come from the catalog and be admissible under
    /// the current wall depth.
    fn check_dimension(&self, change: &DriverChange) -> Result<()> {
        let Some((kind, Some(id))) = change.dimension_value() else {
            return Ok(());
        };
        let field = change.field();
        if !self
            .catalog
            .contains_id(EntryKind::Dimension(kind), id.as_str())
        {
            return Err(EngineError::invalid_driver(
                field,
                id.as_str(),
                "not in the dimension catalog",
            ));
        }
        if !self.admissible.contains_dimension(kind, id.as_str()) {
            return Err(EngineError::inadmissible(field, id.as_str()));
        }
        Ok(())
    }

    /// Set the quantity of an opening. Negative quantities are ignored.
    pub fn set_quantity(&mut self, slot: DependentSlot, id: &str, quantity: i64) -> Result<()> {
        if !slot.is_quantity() {
            return Err(EngineError::UnsupportedSlot {
                slot,
                operation: "quantities",
            });
        }
        if quantity < 0 {
            debug!(slot = %slot, id, quantity, "ignoring negative quantity");
            return Ok(());
        }
        let requested = quantity;
        let quantity = u32::try_from(requested).map_err(|_| EngineError::UnsupportedQuantity {
            id: id.to_string(),
            quantity: requested,
        })?;
        let current = self.state.dependents().quantity(slot, id);
        if quantity == current {
            return Ok(());
        }

        let entry_id = if quantity > 0 {
            let entry = self
                .admissible
                .get(slot, id)
                .ok_or_else(|| EngineError::inadmissible(slot, id))?;
            if !entry.supports_quantity && quantity > 1 {
                return Err(EngineError::UnsupportedQuantity {
                    id: id.to_string(),
                    quantity: requested,
                });
            }
            entry.id.clone()
        } else {
            match self
                .state
                .dependents()
                .quantities(slot)
                .and_then(|map| map.get_key_value(id))
            {
                Some((key, _)) => key.clone(),
                None => return Ok(()),
            }
        };

        let old = self.state.snapshot();
        let mut dependents = old.dependents.clone();
        dependents.set_quantity(slot, entry_id, quantity);
        self.state.commit(old.drivers.clone(), dependents, &old);
        Ok(())
    }

    /// Add `delta` to a quantity; going below zero is a no-op. Returns the
    /// resulting quantity.
    pub fn adjust_quantity(&mut self, slot: DependentSlot, id: &str, delta: i64) -> Result<u32> {
        if !slot.is_quantity() {
            return Err(EngineError::UnsupportedSlot {
                slot,
                operation: "quantities",
            });
        }
        let current = self.state.dependents().quantity(slot, id);
        let target = i64::from(current).saturating_add(delta);
        if target < 0 {
            return Ok(current);
        }
        self.set_quantity(slot, id, target)?;
        Ok(self.state.dependents().quantity(slot, id))
    }

    /// Choose (or clear, with `None`) the cladding or roofing.
    pub fn set_single(&mut self, slot: DependentSlot, id: Option<&str>) -> Result<()> {
        if slot.is_quantity() {
            return Err(EngineError::UnsupportedSlot {
                slot,
                operation: "single values",
            });
        }
        let new = match id {
            Some(id) => Some(
                self.admissible
                    .get(slot, id)
                    .ok_or_else(|| EngineError::inadmissible(slot, id))?
                    .id
                    .clone(),
            ),
            None => None,
        };
        if self.state.dependents().single(slot) == new.as_ref() {
            return Ok(());
        }

        let old = self.state.snapshot();
        let mut dependents = old.dependents.clone();
        dependents.set_single(slot, new);
        self.state.commit(old.drivers.clone(), dependents, &old);
        Ok(())
    }

    pub fn reset_slot(&mut self, slot: DependentSlot) {
        if self.state.dependents().selected_ids(slot).is_empty() {
            return;
        }
        let old = self.state.snapshot();
        let mut dependents = old.dependents.clone();
        dependents.clear_slot(slot);
        self.state.commit(old.drivers.clone(), dependents, &old);
    }

    /// Clear every driver and dependent selection, and drop queued changes.
    /// The catalog is kept.
    pub fn reset(&mut self) -> Result<()> {
        self.pending.clear();
        let old = self.state.snapshot();
        let drivers = DriverValues::default();
        self.admissible = resolve_admissible(&self.catalog, &drivers, &self.options)?;
        self.state.commit(drivers, DependentSelection::default(), &old);
        info!("selection reset");
        Ok(())
    }

    pub fn serialize_selection(&self) -> SelectionRecord {
        SelectionRecord::new(
            self.state.drivers().clone(),
            self.state.dependents().clone(),
        )
    }

    /// Restore a persisted selection, dropping whatever is no longer
    /// admissible. Queued while the catalog is loading.
    pub fn restore_selection(&mut self, record: SelectionRecord) -> Result<()> {
        if self.catalog_state == CatalogState::Loading {
            debug!("catalog loading, queueing restore");
            self.pending.push_back(PendingChange::Restore(record));
            return Ok(());
        }
        let span = info_span!("restore_selection", version = record.version);
        let _guard = span.enter();

        let old = self.state.snapshot();
        let mut dependents = record.dependents;
        for slot in DependentSlot::ALL {
            let kind = slot.entry_kind();
            if let Some(map) = dependents.quantities_mut(slot) {
                map.retain(|_, quantity| *quantity > 0);
                for (id, quantity) in map.iter_mut() {
                    let single_only = self
                        .catalog
                        .find(kind, id.as_str())
                        .is_some_and(|entry| !entry.supports_quantity);
                    if single_only && *quantity > 1 {
                        warn!(id = %id, quantity = *quantity, "clamping persisted quantity to 1");
                        *quantity = 1;
                    }
                }
            }
        }

        let outcome = cascade(&self.catalog, &self.options, record.drivers, dependents, false)?;
        for (kind, id) in &outcome.cleared {
            warn!(dimension = kind.as_str(), value = %id, "dropping stale persisted driver");
        }
        for (slot, id) in &outcome.dropped {
            warn!(slot = %slot, id = %id, "dropping stale persisted selection");
        }
        self.commit(outcome, &old);
        Ok(())
    }

    /// Flat record of the current selection, stamped now.
    pub fn submission(&self) -> SubmissionRecord {
        SubmissionRecord::build(
            &self.catalog,
            self.state.drivers(),
            self.state.dependents(),
            &self.admissible,
            Utc::now(),
        )
    }

    /// Push the current options, visibility and selection into a widget
    /// through its programmatic setters.
    pub fn project_onto(&self, widget: &mut dyn SelectionWidget) {
        let slot = widget.slot();
        widget.set_options(self.admissible.entries(slot));
        widget.set_visible(self.admissible.is_visible(slot));
        widget.reset();
        let dependents = self.state.dependents();
        match dependents.quantities(slot) {
            Some(map) => {
                for (id, quantity) in map {
                    widget.set_quantity(id, *quantity);
                }
            }
            None => widget.set_value(dependents.single(slot).cloned()),
        }
    }

    /// Route a user-driven widget change through the matching mutator.
    pub fn apply_widget_event(&mut self, event: &WidgetEvent) -> Result<()> {
        match &event.change {
            WidgetChange::Quantity { id, quantity } => {
                self.set_quantity(event.slot, id.as_str(), i64::from(*quantity))
            }
            WidgetChange::Value { id } => {
                self.set_single(event.slot, id.as_ref().map(EntryId::as_str))
            }
            WidgetChange::Reset => {
                self.reset_slot(event.slot);
                Ok(())
            }
        }
    }

    /// [`Self::apply_widget_event`] for the widget that raised the event. A
    /// rejected write re-projects the state onto the widget so it never shows
    /// a value the selection does not hold.
    pub fn apply_widget_event_to(
        &mut self,
        widget: &mut dyn SelectionWidget,
        event: &WidgetEvent,
    ) -> Result<()> {
        let result = self.apply_widget_event(event);
        if let Err(error) = &result {
            debug!(slot = %event.slot, %error, "widget change rejected, re-projecting");
            self.project_onto(widget);
        }
        result
    }

    fn commit(&mut self, outcome: Cascade, old: &SelectionSnapshot) {
        self.admissible = outcome.admissible;
        self.state.commit(outcome.drivers, outcome.dependents, old);
    }
}

fn log_invalidations(outcome: &Cascade) {
    for (kind, id) in &outcome.cleared {
        info!(dimension = kind.as_str(), value = %id, "dimension driver no longer admissible");
    }
    for (slot, id) in &outcome.dropped {
        info!(slot = %slot, id = %id, "invalidated dependent selection");
    }
}
