use std::path::PathBuf;

use configurator_model::{DependentSlot, DriverField, MisplacedEntry};
use thiserror::Error;

/// Structural catalog problems found while resolving admissible sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("malformed catalog entry {id}: {kind} entry listed under {domain}")]
    MalformedEntry {
        id: String,
        kind: String,
        domain: String,
    },
}

impl From<MisplacedEntry> for ResolveError {
    fn from(entry: MisplacedEntry) -> Self {
        Self::MalformedEntry {
            id: entry.id,
            kind: entry.kind.to_string(),
            domain: entry.found_in.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The value could not be parsed or is absent from the catalog. The
    /// previous driver value is kept.
    #[error("invalid value {value:?} for driver {field}: {reason}")]
    InvalidDriverValue {
        field: DriverField,
        value: String,
        reason: String,
    },

    /// The id is not in the current admissible set. Nothing was changed.
    #[error("{id} is not admissible for {target}")]
    InadmissibleSelectionWrite { target: String, id: String },

    /// Above 1 for a single-only opening, or too large to store.
    #[error("{id} does not accept a quantity of {quantity}")]
    UnsupportedQuantity { id: String, quantity: i64 },

    #[error("{slot} does not support {operation}")]
    UnsupportedSlot {
        slot: DependentSlot,
        operation: &'static str,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse engine options {path}: {source}")]
    Options {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to decode selection record: {0}")]
    Record(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn inadmissible(target: impl ToString, id: &str) -> Self {
        Self::InadmissibleSelectionWrite {
            target: target.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_driver(field: DriverField, value: &str, reason: impl ToString) -> Self {
        Self::InvalidDriverValue {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
