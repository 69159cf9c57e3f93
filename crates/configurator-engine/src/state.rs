//! Selection State: driver values, dependent selections and subscribers.

use std::fmt;

use configurator_model::{DependentSelection, DriverValues};
use serde::Serialize;

/// An immutable copy of the selection state, handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    pub drivers: DriverValues,
    pub dependents: DependentSelection,
    /// Bumped on every committed change.
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Called with `(new, old)` after every committed change.
pub type Subscriber = Box<dyn FnMut(&SelectionSnapshot, &SelectionSnapshot)>;

/// The mutable selection record of one session.
///
/// Readable by anyone; written only by the cascade controller, which keeps
/// every stored dependent id inside its admissible set.
#[derive(Default)]
pub struct SelectionState {
    drivers: DriverValues,
    dependents: DependentSelection,
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drivers(&self) -> &DriverValues {
        &self.drivers
    }

    pub fn dependents(&self) -> &DependentSelection {
        &self.dependents
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            drivers: self.drivers.clone(),
            dependents: self.dependents.clone(),
            revision: self.revision,
        }
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&SelectionSnapshot, &SelectionSnapshot) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false when the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Replace the state wholesale and notify subscribers with `(new, old)`.
    pub(crate) fn commit(
        &mut self,
        drivers: DriverValues,
        dependents: DependentSelection,
        old: &SelectionSnapshot,
    ) {
        self.drivers = drivers;
        self.dependents = dependents;
        self.revision += 1;
        let new = self.snapshot();
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&new, old);
        }
    }
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("drivers", &self.drivers)
            .field("dependents", &self.dependents)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
