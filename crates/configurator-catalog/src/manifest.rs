#![deny(unsafe_code)]

use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "catalog.toml";
pub const MANIFEST_SCHEMA: &str = "configurator.catalog-manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// `catalog.toml`: lists the three catalog files of a directory by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub role: FileRole,
    /// Optional pin; verified at load when present.
    #[serde(default)]
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Dimensions,
    Openings,
    Materials,
}

impl FileRole {
    pub const ALL: [FileRole; 3] = [FileRole::Dimensions, FileRole::Openings, FileRole::Materials];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileRole::Dimensions => "dimensions",
            FileRole::Openings => "openings",
            FileRole::Materials => "materials",
        }
    }
}

impl Manifest {
    /// Manifest used for directories without `catalog.toml`: the default file
    /// names, unpinned.
    pub fn default_layout() -> Self {
        let file = |path: &str, role| ManifestFile {
            path: path.to_string(),
            role,
            sha256: None,
        };
        Self {
            manifest: ManifestHeader {
                schema: MANIFEST_SCHEMA.to_string(),
                schema_version: MANIFEST_SCHEMA_VERSION,
            },
            notes: None,
            files: vec![
                file(crate::paths::DEFAULT_DIMENSIONS_FILE, FileRole::Dimensions),
                file(crate::paths::DEFAULT_OPENINGS_FILE, FileRole::Openings),
                file(crate::paths::DEFAULT_MATERIALS_FILE, FileRole::Materials),
            ],
        }
    }

    pub fn file_for(&self, role: FileRole) -> Option<&ManifestFile> {
        self.files.iter().find(|file| file.role == role)
    }
}
