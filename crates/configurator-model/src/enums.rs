//! Type-safe enumerations for configurator metadata.
//!
//! Catalog files and the UI layer exchange these concepts as loose strings
//! (`"200mm"`, `"mono-pitch"`, `"XL"`). Parsing is lenient about case,
//! whitespace and unit suffixes; rendering always uses the canonical token.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Structural wall depth of the building system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WallDepth {
    #[serde(rename = "200")]
    Mm200,
    #[serde(rename = "250")]
    Mm250,
}

impl WallDepth {
    pub const ALL: [WallDepth; 2] = [WallDepth::Mm200, WallDepth::Mm250];

    /// Canonical catalog token (millimetres, no unit).
    pub fn as_str(&self) -> &'static str {
        match self {
            WallDepth::Mm200 => "200",
            WallDepth::Mm250 => "250",
        }
    }

    pub fn millimetres(&self) -> u32 {
        match self {
            WallDepth::Mm200 => 200,
            WallDepth::Mm250 => 250,
        }
    }
}

impl fmt::Display for WallDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WallDepth {
    type Err = ModelError;

    /// Accepts `200`, `200mm`, `200 mm` and the float rendering `200.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let digits = normalized.trim_end_matches("mm").trim();
        let digits = digits.strip_suffix(".0").unwrap_or(digits);
        match digits {
            "200" => Ok(WallDepth::Mm200),
            "250" => Ok(WallDepth::Mm250),
            _ => Err(ModelError::unknown("wall depth", s)),
        }
    }
}

/// Wall depths an entry is valid under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WallDepthClass {
    Any,
    Exact(WallDepth),
}

impl WallDepthClass {
    /// Wall-depth gating: `Any` admits every depth, `Exact` only its own.
    pub fn admits(&self, depth: WallDepth) -> bool {
        match self {
            WallDepthClass::Any => true,
            WallDepthClass::Exact(own) => *own == depth,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WallDepthClass::Any => "any",
            WallDepthClass::Exact(depth) => depth.as_str(),
        }
    }
}

impl fmt::Display for WallDepthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WallDepthClass {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("any") {
            return Ok(WallDepthClass::Any);
        }
        s.parse::<WallDepth>()
            .map(WallDepthClass::Exact)
            .map_err(|_| ModelError::unknown("wall depth class", s))
    }
}

impl TryFrom<String> for WallDepthClass {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WallDepthClass> for String {
    fn from(value: WallDepthClass) -> Self {
        value.as_str().to_string()
    }
}

/// Coarse building-size bucket used to match openings to dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    S,
    M,
    L,
    #[serde(rename = "XL")]
    Xl,
}

impl SizeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::S => "S",
            SizeClass::M => "M",
            SizeClass::L => "L",
            SizeClass::Xl => "XL",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SizeClass {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "S" => Ok(SizeClass::S),
            "M" => Ok(SizeClass::M),
            "L" => Ok(SizeClass::L),
            "XL" => Ok(SizeClass::Xl),
            _ => Err(ModelError::unknown("size class", s)),
        }
    }
}

/// Roof profile of the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofType {
    #[serde(rename = "mono-pitch")]
    MonoPitch,
    #[serde(rename = "double-pitch")]
    DoublePitch,
}

impl RoofType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoofType::MonoPitch => "mono-pitch",
            RoofType::DoublePitch => "double-pitch",
        }
    }

    /// The short key used by the `Standard` column of the materials catalog.
    pub fn standard_key(&self) -> StandardFor {
        match self {
            RoofType::MonoPitch => StandardFor::Mono,
            RoofType::DoublePitch => StandardFor::Double,
        }
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoofType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mono-pitch" | "mono pitch" | "mono" => Ok(RoofType::MonoPitch),
            "double-pitch" | "double pitch" | "double" => Ok(RoofType::DoublePitch),
            _ => Err(ModelError::unknown("roof type", s)),
        }
    }
}

/// Which roof types a material is standard for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardFor {
    Mono,
    Double,
    Both,
}

impl StandardFor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardFor::Mono => "mono",
            StandardFor::Double => "double",
            StandardFor::Both => "both",
        }
    }

    /// True when a material tagged with `self` is standard under `roof`.
    pub fn covers(&self, roof: RoofType) -> bool {
        matches!(self, StandardFor::Both) || *self == roof.standard_key()
    }
}

impl fmt::Display for StandardFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StandardFor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mono" | "mono-pitch" => Ok(StandardFor::Mono),
            "double" | "double-pitch" => Ok(StandardFor::Double),
            "both" => Ok(StandardFor::Both),
            _ => Err(ModelError::unknown("standard", s)),
        }
    }
}

/// Commercial project type chosen on the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectType {
    /// Fully finished build; the only type that ships standard materials.
    Turnkey,
    SelfBuild,
    StructureOnly,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Turnkey => "turnkey",
            ProjectType::SelfBuild => "selfBuild",
            ProjectType::StructureOnly => "structureOnly",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "turnkey" => Ok(ProjectType::Turnkey),
            "selfbuild" => Ok(ProjectType::SelfBuild),
            "structureonly" => Ok(ProjectType::StructureOnly),
            _ => Err(ModelError::unknown("project type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DimensionKind {
    Height,
    Width,
    Length,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 3] = [
        DimensionKind::Height,
        DimensionKind::Width,
        DimensionKind::Length,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionKind::Height => "Height",
            DimensionKind::Width => "Width",
            DimensionKind::Length => "Length",
        }
    }
}

impl FromStr for DimensionKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "height" => Ok(DimensionKind::Height),
            "width" => Ok(DimensionKind::Width),
            "length" => Ok(DimensionKind::Length),
            _ => Err(ModelError::unknown("dimension type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OpeningKind {
    Window,
    Door,
    Skylight,
}

impl OpeningKind {
    pub const ALL: [OpeningKind; 3] = [OpeningKind::Window, OpeningKind::Door, OpeningKind::Skylight];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpeningKind::Window => "Window",
            OpeningKind::Door => "Door",
            OpeningKind::Skylight => "Skylight",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    Cladding,
    Roofing,
}

impl MaterialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Cladding => "Cladding",
            MaterialKind::Roofing => "Roofing",
        }
    }
}

impl FromStr for MaterialKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cladding" => Ok(MaterialKind::Cladding),
            "roofing" => Ok(MaterialKind::Roofing),
            _ => Err(ModelError::unknown("material type", s)),
        }
    }
}

/// What a catalog entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "domain", content = "kind", rename_all = "lowercase")]
pub enum EntryKind {
    Dimension(DimensionKind),
    Opening(OpeningKind),
    Material(MaterialKind),
}

impl EntryKind {
    pub fn domain(&self) -> CatalogDomain {
        match self {
            EntryKind::Dimension(_) => CatalogDomain::Dimensions,
            EntryKind::Opening(_) => CatalogDomain::Openings,
            EntryKind::Material(_) => CatalogDomain::Materials,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Dimension(kind) => kind.as_str(),
            EntryKind::Opening(kind) => kind.as_str(),
            EntryKind::Material(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three loaded-once lists of the catalog store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogDomain {
    Dimensions,
    Openings,
    Materials,
}

impl CatalogDomain {
    pub const ALL: [CatalogDomain; 3] = [
        CatalogDomain::Dimensions,
        CatalogDomain::Openings,
        CatalogDomain::Materials,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogDomain::Dimensions => "dimensions",
            CatalogDomain::Openings => "openings",
            CatalogDomain::Materials => "materials",
        }
    }
}

impl fmt::Display for CatalogDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
