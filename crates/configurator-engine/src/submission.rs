//! Flat submission record for the network layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use configurator_model::{
    Catalog, DependentSelection, DependentSlot, DriverField, DriverValues, OpeningKind, SizeClass,
};
use serde::Serialize;

use crate::resolver::Admissible;

/// Drivers and dependents flattened into the fields the order form posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub project_type: String,
    pub building_length: String,
    pub building_width: String,
    pub building_height: String,
    pub wall_depth: String,
    pub roof_type: String,
    /// Size class of the height, selecting the wall block variant.
    pub wall_block_suffix: String,
    /// Size class of the width, selecting the floor block variant.
    pub floor_block_suffix: String,
    /// Every catalog window, door and skylight id, with 0 when not selected.
    pub windows: BTreeMap<String, u32>,
    pub doors: BTreeMap<String, u32>,
    pub skylights: BTreeMap<String, u32>,
    pub cladding: String,
    pub roofing: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn build(
        catalog: &Catalog,
        drivers: &DriverValues,
        dependents: &DependentSelection,
        admissible: &Admissible,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let text = |field: DriverField| drivers.display_value(field).unwrap_or_default();
        let quantities = |kind: OpeningKind| {
            let slot = DependentSlot::for_opening(kind);
            let mut map: BTreeMap<String, u32> = catalog
                .entries_of(slot.entry_kind())
                .map(|entry| (entry.id.to_string(), 0))
                .collect();
            if let Some(selected) = dependents.quantities(slot) {
                for (id, quantity) in selected {
                    map.insert(id.to_string(), *quantity);
                }
            }
            map
        };
        let single = |slot: DependentSlot| {
            dependents
                .single(slot)
                .map(ToString::to_string)
                .unwrap_or_default()
        };
        let suffix = |class: Option<SizeClass>| {
            class.map(|c| c.as_str().to_string()).unwrap_or_default()
        };

        Self {
            project_type: text(DriverField::ProjectType),
            building_length: text(DriverField::Length),
            building_width: text(DriverField::Width),
            building_height: text(DriverField::Height),
            wall_depth: text(DriverField::WallDepth),
            roof_type: text(DriverField::RoofType),
            wall_block_suffix: suffix(admissible.height_size_class),
            floor_block_suffix: suffix(admissible.width_size_class),
            windows: quantities(OpeningKind::Window),
            doors: quantities(OpeningKind::Door),
            skylights: quantities(OpeningKind::Skylight),
            cladding: single(DependentSlot::Cladding),
            roofing: single(DependentSlot::Roofing),
            submitted_at,
        }
    }

    /// Form-encoded view: scalars as-is, maps as JSON strings, plus the whole
    /// record under `payload`.
    pub fn to_form_fields(&self) -> serde_json::Result<BTreeMap<String, String>> {
        let value = serde_json::to_value(self)?;
        let mut fields = BTreeMap::new();
        if let serde_json::Value::Object(map) = &value {
            for (key, field) in map {
                let text = match field {
                    serde_json::Value::String(s) => s.clone(),
                    other => serde_json::to_string(other)?,
                };
                fields.insert(key.clone(), text);
            }
        }
        fields.insert("payload".to_string(), serde_json::to_string(&value)?);
        Ok(fields)
    }
}
