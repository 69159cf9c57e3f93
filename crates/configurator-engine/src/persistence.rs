//! Plain serializable snapshot for an external storage layer.

use configurator_model::{DependentSelection, DriverValues};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const SELECTION_RECORD_VERSION: u32 = 1;

/// What `serialize_selection` hands out and `restore_selection` accepts.
///
/// Entries that are no longer admissible when restored (for instance after a
/// catalog update) are dropped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub drivers: DriverValues,
    #[serde(default)]
    pub dependents: DependentSelection,
}

fn default_version() -> u32 {
    SELECTION_RECORD_VERSION
}

impl SelectionRecord {
    pub fn new(drivers: DriverValues, dependents: DependentSelection) -> Self {
        Self {
            version: SELECTION_RECORD_VERSION,
            drivers,
            dependents,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}
