use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("entry id must not be empty")]
    EmptyEntryId,
    #[error("unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },
}

impl ModelError {
    pub(crate) fn unknown(field: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            field,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
