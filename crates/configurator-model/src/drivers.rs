//! Driver fields: the selections whose change can invalidate others.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enums::{DimensionKind, ProjectType, RoofType, WallDepth};
use crate::error::ModelError;
use crate::ids::EntryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DriverField {
    ProjectType,
    WallDepth,
    Height,
    Width,
    Length,
    RoofType,
}

impl DriverField {
    pub const ALL: [DriverField; 6] = [
        DriverField::ProjectType,
        DriverField::WallDepth,
        DriverField::Height,
        DriverField::Width,
        DriverField::Length,
        DriverField::RoofType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DriverField::ProjectType => "projectType",
            DriverField::WallDepth => "wallDepth",
            DriverField::Height => "height",
            DriverField::Width => "width",
            DriverField::Length => "length",
            DriverField::RoofType => "roofType",
        }
    }

    /// The dimension catalog backing this driver, if any.
    pub fn dimension_kind(&self) -> Option<DimensionKind> {
        match self {
            DriverField::Height => Some(DimensionKind::Height),
            DriverField::Width => Some(DimensionKind::Width),
            DriverField::Length => Some(DimensionKind::Length),
            _ => None,
        }
    }
}

impl fmt::Display for DriverField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DriverField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "projecttype" => Ok(DriverField::ProjectType),
            "walldepth" => Ok(DriverField::WallDepth),
            "height" | "buildingheight" => Ok(DriverField::Height),
            "width" | "buildingwidth" => Ok(DriverField::Width),
            "length" | "buildinglength" => Ok(DriverField::Length),
            "rooftype" => Ok(DriverField::RoofType),
            _ => Err(ModelError::unknown("driver field", s)),
        }
    }
}

/// A typed driver assignment. `None` unsets the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum DriverChange {
    ProjectType(Option<ProjectType>),
    WallDepth(Option<WallDepth>),
    Height(Option<EntryId>),
    Width(Option<EntryId>),
    Length(Option<EntryId>),
    RoofType(Option<RoofType>),
}

impl DriverChange {
    pub fn field(&self) -> DriverField {
        match self {
            DriverChange::ProjectType(_) => DriverField::ProjectType,
            DriverChange::WallDepth(_) => DriverField::WallDepth,
            DriverChange::Height(_) => DriverField::Height,
            DriverChange::Width(_) => DriverField::Width,
            DriverChange::Length(_) => DriverField::Length,
            DriverChange::RoofType(_) => DriverField::RoofType,
        }
    }

    /// Parse a raw UI value for `field`. Blank input unsets the driver.
    pub fn parse(field: DriverField, raw: Option<&str>) -> Result<Self, ModelError> {
        let raw = raw.map(str::trim).filter(|value| !value.is_empty());
        let change = match field {
            DriverField::ProjectType => DriverChange::ProjectType(raw.map(str::parse).transpose()?),
            DriverField::WallDepth => DriverChange::WallDepth(raw.map(str::parse).transpose()?),
            DriverField::RoofType => DriverChange::RoofType(raw.map(str::parse).transpose()?),
            DriverField::Height => DriverChange::Height(raw.map(EntryId::new).transpose()?),
            DriverField::Width => DriverChange::Width(raw.map(EntryId::new).transpose()?),
            DriverField::Length => DriverChange::Length(raw.map(EntryId::new).transpose()?),
        };
        Ok(change)
    }

    /// The dimension value carried by a height/width/length change.
    pub fn dimension_value(&self) -> Option<(DimensionKind, Option<&EntryId>)> {
        match self {
            DriverChange::Height(value) => Some((DimensionKind::Height, value.as_ref())),
            DriverChange::Width(value) => Some((DimensionKind::Width, value.as_ref())),
            DriverChange::Length(value) => Some((DimensionKind::Length, value.as_ref())),
            _ => None,
        }
    }
}

/// Current driver values; each is unset or one admissible value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverValues {
    pub project_type: Option<ProjectType>,
    pub wall_depth: Option<WallDepth>,
    pub height: Option<EntryId>,
    pub width: Option<EntryId>,
    pub length: Option<EntryId>,
    pub roof_type: Option<RoofType>,
}

impl DriverValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, change: DriverChange) {
        match change {
            DriverChange::ProjectType(value) => self.project_type = value,
            DriverChange::WallDepth(value) => self.wall_depth = value,
            DriverChange::Height(value) => self.height = value,
            DriverChange::Width(value) => self.width = value,
            DriverChange::Length(value) => self.length = value,
            DriverChange::RoofType(value) => self.roof_type = value,
        }
    }

    pub fn with(mut self, change: DriverChange) -> Self {
        self.apply(change);
        self
    }

    pub fn dimension(&self, kind: DimensionKind) -> Option<&EntryId> {
        match kind {
            DimensionKind::Height => self.height.as_ref(),
            DimensionKind::Width => self.width.as_ref(),
            DimensionKind::Length => self.length.as_ref(),
        }
    }

    pub fn set_dimension(&mut self, kind: DimensionKind, value: Option<EntryId>) {
        match kind {
            DimensionKind::Height => self.height = value,
            DimensionKind::Width => self.width = value,
            DimensionKind::Length => self.length = value,
        }
    }

    /// Canonical string form of a driver, for logging and flat records.
    pub fn display_value(&self, field: DriverField) -> Option<String> {
        match field {
            DriverField::ProjectType => self.project_type.map(|v| v.as_str().to_string()),
            DriverField::WallDepth => self.wall_depth.map(|v| v.as_str().to_string()),
            DriverField::Height => self.height.as_ref().map(EntryId::to_string),
            DriverField::Width => self.width.as_ref().map(EntryId::to_string),
            DriverField::Length => self.length.as_ref().map(EntryId::to_string),
            DriverField::RoofType => self.roof_type.map(|v| v.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_blank_unsets() {
        let change = DriverChange::parse(DriverField::WallDepth, Some("  ")).unwrap();
        assert_eq!(change, DriverChange::WallDepth(None));
    }

    #[test]
    fn parse_rejects_unknown_roof() {
        assert!(DriverChange::parse(DriverField::RoofType, Some("flat")).is_err());
    }

    #[test]
    fn apply_sets_dimension() {
        let change = DriverChange::parse(DriverField::Height, Some("2400")).unwrap();
        let drivers = DriverValues::new().with(change);
        assert_eq!(
            drivers.dimension(DimensionKind::Height).map(EntryId::as_str),
            Some("2400")
        );
        assert_eq!(
            drivers.display_value(DriverField::Height).as_deref(),
            Some("2400")
        );
    }

    #[test]
    fn field_aliases() {
        assert_eq!(
            "buildingHeight".parse::<DriverField>().unwrap(),
            DriverField::Height
        );
        assert_eq!(
            "wall_depth".parse::<DriverField>().unwrap(),
            DriverField::WallDepth
        );
    }
}
