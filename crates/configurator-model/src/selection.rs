//! Dependent selections: openings chosen by quantity, materials chosen singly.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{EntryKind, MaterialKind, OpeningKind};
use crate::ids::EntryId;

/// Quantities keyed by entry id. Zero quantities are never stored.
pub type QuantityMap = BTreeMap<EntryId, u32>;

/// One dependent selection slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependentSlot {
    Windows,
    Doors,
    Skylights,
    Cladding,
    Roofing,
}

impl DependentSlot {
    pub const ALL: [DependentSlot; 5] = [
        DependentSlot::Windows,
        DependentSlot::Doors,
        DependentSlot::Skylights,
        DependentSlot::Cladding,
        DependentSlot::Roofing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DependentSlot::Windows => "windows",
            DependentSlot::Doors => "doors",
            DependentSlot::Skylights => "skylights",
            DependentSlot::Cladding => "cladding",
            DependentSlot::Roofing => "roofing",
        }
    }

    /// Catalog kind the slot draws from.
    pub fn entry_kind(&self) -> EntryKind {
        match self {
            DependentSlot::Windows => EntryKind::Opening(OpeningKind::Window),
            DependentSlot::Doors => EntryKind::Opening(OpeningKind::Door),
            DependentSlot::Skylights => EntryKind::Opening(OpeningKind::Skylight),
            DependentSlot::Cladding => EntryKind::Material(MaterialKind::Cladding),
            DependentSlot::Roofing => EntryKind::Material(MaterialKind::Roofing),
        }
    }

    pub fn is_quantity(&self) -> bool {
        matches!(
            self,
            DependentSlot::Windows | DependentSlot::Doors | DependentSlot::Skylights
        )
    }

    pub fn for_opening(kind: OpeningKind) -> Self {
        match kind {
            OpeningKind::Window => DependentSlot::Windows,
            OpeningKind::Door => DependentSlot::Doors,
            OpeningKind::Skylight => DependentSlot::Skylights,
        }
    }

    pub fn for_material(kind: MaterialKind) -> Self {
        match kind {
            MaterialKind::Cladding => DependentSlot::Cladding,
            MaterialKind::Roofing => DependentSlot::Roofing,
        }
    }
}

impl fmt::Display for DependentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current dependent selections.
///
/// Only the engine's controller writes this; every id stored here belongs to
/// the admissible set of its slot at the time it was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentSelection {
    #[serde(default)]
    pub windows: QuantityMap,
    #[serde(default)]
    pub doors: QuantityMap,
    #[serde(default)]
    pub skylights: QuantityMap,
    pub cladding: Option<EntryId>,
    pub roofing: Option<EntryId>,
}

impl DependentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantities(&self, slot: DependentSlot) -> Option<&QuantityMap> {
        match slot {
            DependentSlot::Windows => Some(&self.windows),
            DependentSlot::Doors => Some(&self.doors),
            DependentSlot::Skylights => Some(&self.skylights),
            _ => None,
        }
    }

    pub fn quantities_mut(&mut self, slot: DependentSlot) -> Option<&mut QuantityMap> {
        match slot {
            DependentSlot::Windows => Some(&mut self.windows),
            DependentSlot::Doors => Some(&mut self.doors),
            DependentSlot::Skylights => Some(&mut self.skylights),
            _ => None,
        }
    }

    pub fn single(&self, slot: DependentSlot) -> Option<&EntryId> {
        match slot {
            DependentSlot::Cladding => self.cladding.as_ref(),
            DependentSlot::Roofing => self.roofing.as_ref(),
            _ => None,
        }
    }

    /// Quantity of `id` in a quantity slot; 0 when absent.
    pub fn quantity(&self, slot: DependentSlot, id: &str) -> u32 {
        self.quantities(slot)
            .and_then(|map| map.get(id))
            .copied()
            .unwrap_or(0)
    }

    /// Store a quantity, dropping the key when it is zero.
    ///
    /// Has no effect on single-valued slots.
    pub fn set_quantity(&mut self, slot: DependentSlot, id: EntryId, quantity: u32) {
        if let Some(map) = self.quantities_mut(slot) {
            if quantity == 0 {
                map.remove(&id);
            } else {
                map.insert(id, quantity);
            }
        }
    }

    /// Has no effect on quantity slots.
    pub fn set_single(&mut self, slot: DependentSlot, id: Option<EntryId>) {
        match slot {
            DependentSlot::Cladding => self.cladding = id,
            DependentSlot::Roofing => self.roofing = id,
            _ => {}
        }
    }

    pub fn clear_slot(&mut self, slot: DependentSlot) {
        match self.quantities_mut(slot) {
            Some(map) => map.clear(),
            None => self.set_single(slot, None),
        }
    }

    /// Ids currently selected in a slot, in key order.
    pub fn selected_ids(&self, slot: DependentSlot) -> Vec<&EntryId> {
        match self.quantities(slot) {
            Some(map) => map.keys().collect(),
            None => self.single(slot).into_iter().collect(),
        }
    }

    /// Keep only ids for which `keep` returns true. Returns the dropped ids.
    pub fn retain(
        &mut self,
        slot: DependentSlot,
        mut keep: impl FnMut(&EntryId) -> bool,
    ) -> Vec<EntryId> {
        let mut dropped = Vec::new();
        match self.quantities_mut(slot) {
            Some(map) => {
                map.retain(|id, _| {
                    let kept = keep(id);
                    if !kept {
                        dropped.push(id.clone());
                    }
                    kept
                });
            }
            None => {
                let current = self.single(slot).cloned();
                if let Some(id) = current
                    && !keep(&id)
                {
                    self.set_single(slot, None);
                    dropped.push(id);
                }
            }
        }
        dropped
    }

    pub fn is_empty(&self) -> bool {
        DependentSlot::ALL
            .iter()
            .all(|slot| self.selected_ids(*slot).is_empty())
    }
}
