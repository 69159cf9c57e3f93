//! Selection Widget Contract.
//!
//! A widget binds one dependent slot to a UI control. The controller pushes
//! state into widgets with the programmatic setters of [`SelectionWidget`];
//! those never emit events. Only the user-driven mutators of the concrete
//! widgets (`user_*`) emit [`WidgetEvent`]s, which the UI layer hands back to
//! [`CascadeController::apply_widget_event`](crate::CascadeController::apply_widget_event).

use configurator_model::{CatalogEntry, DependentSlot, EntryId, QuantityMap};
use serde::{Deserialize, Serialize};

/// A user-driven change reported by a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEvent {
    pub slot: DependentSlot,
    pub change: WidgetChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WidgetChange {
    Quantity { id: EntryId, quantity: u32 },
    Value { id: Option<EntryId> },
    Reset,
}

pub type WidgetListener = Box<dyn FnMut(&WidgetEvent)>;

pub trait SelectionWidget {
    fn slot(&self) -> DependentSlot;

    /// Current single value; always `None` for quantity widgets.
    fn value(&self) -> Option<&EntryId>;
    fn set_value(&mut self, id: Option<EntryId>);

    /// Current quantity of `id`; 0 when absent.
    fn quantity(&self, id: &str) -> u32;
    fn set_quantity(&mut self, id: &EntryId, quantity: u32);

    /// Clear every value and quantity.
    fn reset(&mut self);

    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;

    /// Replace the offered options.
    fn set_options(&mut self, options: &[CatalogEntry]);

    fn on_change(&mut self, listener: WidgetListener);
}

/// Headless quantity picker for windows, doors and skylights.
pub struct QuantityWidget {
    slot: DependentSlot,
    options: Vec<EntryId>,
    quantities: QuantityMap,
    visible: bool,
    listeners: Vec<WidgetListener>,
}

impl QuantityWidget {
    pub fn new(slot: DependentSlot) -> Self {
        Self {
            slot,
            options: Vec::new(),
            quantities: QuantityMap::new(),
            visible: true,
            listeners: Vec::new(),
        }
    }

    pub fn options(&self) -> &[EntryId] {
        &self.options
    }

    pub fn quantities(&self) -> &QuantityMap {
        &self.quantities
    }

    /// User typed a quantity. Negative input and ids that are not offered
    /// are ignored.
    pub fn user_set_quantity(&mut self, id: &EntryId, quantity: i64) {
        if !self.options.contains(id) {
            return;
        }
        let Ok(quantity) = u32::try_from(quantity) else {
            return;
        };
        if self.quantity(id.as_str()) == quantity {
            return;
        }
        self.set_quantity(id, quantity);
        self.emit(WidgetChange::Quantity {
            id: id.clone(),
            quantity,
        });
    }

    pub fn user_increment(&mut self, id: &EntryId) {
        let next = i64::from(self.quantity(id.as_str())) + 1;
        self.user_set_quantity(id, next);
    }

    /// Decrementing from zero is a no-op.
    pub fn user_decrement(&mut self, id: &EntryId) {
        let next = i64::from(self.quantity(id.as_str())) - 1;
        self.user_set_quantity(id, next);
    }

    pub fn user_reset(&mut self) {
        self.reset();
        self.emit(WidgetChange::Reset);
    }

    fn emit(&mut self, change: WidgetChange) {
        let event = WidgetEvent {
            slot: self.slot,
            change,
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl SelectionWidget for QuantityWidget {
    fn slot(&self) -> DependentSlot {
        self.slot
    }

    fn value(&self) -> Option<&EntryId> {
        None
    }

    fn set_value(&mut self, _id: Option<EntryId>) {}

    fn quantity(&self, id: &str) -> u32 {
        self.quantities.get(id).copied().unwrap_or(0)
    }

    fn set_quantity(&mut self, id: &EntryId, quantity: u32) {
        if quantity == 0 {
            self.quantities.remove(id);
        } else {
            self.quantities.insert(id.clone(), quantity);
        }
    }

    fn reset(&mut self) {
        self.quantities.clear();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_options(&mut self, options: &[CatalogEntry]) {
        self.options = options.iter().map(|entry| entry.id.clone()).collect();
        let options = &self.options;
        self.quantities.retain(|id, _| options.contains(id));
    }

    fn on_change(&mut self, listener: WidgetListener) {
        self.listeners.push(listener);
    }
}

/// Headless single-choice picker for cladding and roofing.
pub struct SingleChoiceWidget {
    slot: DependentSlot,
    options: Vec<EntryId>,
    value: Option<EntryId>,
    visible: bool,
    listeners: Vec<WidgetListener>,
}

impl SingleChoiceWidget {
    pub fn new(slot: DependentSlot) -> Self {
        Self {
            slot,
            options: Vec::new(),
            value: None,
            visible: true,
            listeners: Vec::new(),
        }
    }

    pub fn options(&self) -> &[EntryId] {
        &self.options
    }

    /// User picked an option (or cleared the choice with `None`). Ids that
    /// are not offered are ignored.
    pub fn user_select(&mut self, id: Option<&EntryId>) {
        if self.value.as_ref() == id || id.is_some_and(|id| !self.options.contains(id)) {
            return;
        }
        self.set_value(id.cloned());
        self.emit(WidgetChange::Value { id: id.cloned() });
    }

    fn emit(&mut self, change: WidgetChange) {
        let event = WidgetEvent {
            slot: self.slot,
            change,
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl SelectionWidget for SingleChoiceWidget {
    fn slot(&self) -> DependentSlot {
        self.slot
    }

    fn value(&self) -> Option<&EntryId> {
        self.value.as_ref()
    }

    fn set_value(&mut self, id: Option<EntryId>) {
        self.value = id;
    }

    fn quantity(&self, id: &str) -> u32 {
        u32::from(self.value.as_ref().is_some_and(|value| value.as_str() == id))
    }

    fn set_quantity(&mut self, id: &EntryId, quantity: u32) {
        if quantity > 0 {
            self.value = Some(id.clone());
        } else if self.value.as_ref() == Some(id) {
            self.value = None;
        }
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_options(&mut self, options: &[CatalogEntry]) {
        self.options = options.iter().map(|entry| entry.id.clone()).collect();
        if let Some(value) = &self.value
            && !self.options.contains(value)
        {
            self.value = None;
        }
    }

    fn on_change(&mut self, listener: WidgetListener) {
        self.listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn id(value: &str) -> EntryId {
        EntryId::new(value).unwrap()
    }

    fn recorder(widget: &mut dyn SelectionWidget) -> Rc<RefCell<Vec<WidgetEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        widget.on_change(Box::new(move |event| sink.borrow_mut().push(event.clone())));
        events
    }

    #[test]
    fn programmatic_setters_do_not_emit() {
        let mut widget = QuantityWidget::new(DependentSlot::Windows);
        let events = recorder(&mut widget);
        widget.set_quantity(&id("SKYLARK200_S1"), 2);
        widget.reset();
        assert!(events.borrow().is_empty());
    }

    fn door(value: &str) -> CatalogEntry {
        CatalogEntry::opening(id(value), configurator_model::OpeningKind::Door)
    }

    #[test]
    fn user_changes_emit_events() {
        let mut widget = QuantityWidget::new(DependentSlot::Doors);
        widget.set_options(&[door("SKYLARK200_M1")]);
        let events = recorder(&mut widget);
        widget.user_increment(&id("SKYLARK200_M1"));
        widget.user_increment(&id("SKYLARK200_M1"));
        assert_eq!(widget.quantity("SKYLARK200_M1"), 2);
        assert_eq!(
            events.borrow().last(),
            Some(&WidgetEvent {
                slot: DependentSlot::Doors,
                change: WidgetChange::Quantity {
                    id: id("SKYLARK200_M1"),
                    quantity: 2
                },
            })
        );
    }

    #[test]
    fn decrement_from_zero_is_a_no_op() {
        let mut widget = QuantityWidget::new(DependentSlot::Skylights);
        widget.set_options(&[CatalogEntry::opening(
            id("SKYLARK200_SKYLIGHT-S1"),
            configurator_model::OpeningKind::Skylight,
        )]);
        let events = recorder(&mut widget);
        widget.user_decrement(&id("SKYLARK200_SKYLIGHT-S1"));
        widget.user_set_quantity(&id("SKYLARK200_SKYLIGHT-S1"), -1);
        assert_eq!(widget.quantity("SKYLARK200_SKYLIGHT-S1"), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn single_choice_clears_value_missing_from_options() {
        let mut widget = SingleChoiceWidget::new(DependentSlot::Cladding);
        widget.set_options(&[CatalogEntry::material(
            id("cedar"),
            configurator_model::MaterialKind::Cladding,
        )]);
        let events = recorder(&mut widget);
        widget.user_select(Some(&id("cedar")));
        assert_eq!(events.borrow().len(), 1);

        widget.set_options(&[CatalogEntry::material(
            id("larch"),
            configurator_model::MaterialKind::Cladding,
        )]);
        assert_eq!(widget.value(), None);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn ids_outside_the_options_are_ignored() {
        let mut windows = QuantityWidget::new(DependentSlot::Windows);
        windows.set_options(&[door("SKYLARK200_M1")]);
        let mut cladding = SingleChoiceWidget::new(DependentSlot::Cladding);
        let events = recorder(&mut windows);
        let cladding_events = recorder(&mut cladding);

        windows.user_increment(&id("SKYLARK200_S1"));
        cladding.user_select(Some(&id("cedar")));

        assert_eq!(windows.quantity("SKYLARK200_S1"), 0);
        assert_eq!(cladding.value(), None);
        assert!(events.borrow().is_empty());
        assert!(cladding_events.borrow().is_empty());
    }
}
