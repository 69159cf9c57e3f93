#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use configurator_model::{Catalog, CatalogEntry};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::csv::dimensions::parse_dimensions_csv;
use crate::csv::materials::parse_materials_csv;
use crate::csv::openings::parse_openings_csv;
use crate::error::{LoadError, Result};
use crate::hash::sha256_hex;
use crate::manifest::{
    FileRole, MANIFEST_FILE, MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest, ManifestFile,
};

/// Catalog contents held in memory, e.g. bundled with the application.
#[derive(Debug, Clone, Default)]
pub struct InlineCatalog {
    pub label: String,
    pub dimensions: String,
    pub openings: String,
    pub materials: String,
}

impl InlineCatalog {
    fn contents(&self, role: FileRole) -> &str {
        match role {
            FileRole::Dimensions => &self.dimensions,
            FileRole::Openings => &self.openings,
            FileRole::Materials => &self.materials,
        }
    }
}

/// Where a catalog is read from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// A directory with `catalog.toml`, or with the default file names.
    Directory(PathBuf),
    Inline(InlineCatalog),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Directory(dir) => write!(f, "{}", dir.display()),
            CatalogSource::Inline(inline) => write!(f, "inline:{}", inline.label),
        }
    }
}

/// A catalog file as it was read.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedFile {
    pub role: FileRole,
    pub path: String,
    pub sha256: String,
    pub pinned: bool,
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub files: Vec<LoadedFile>,
}

/// Load a catalog from a single source.
pub fn load(source: &CatalogSource) -> Result<LoadedCatalog> {
    let span = info_span!("catalog_load", source = %source);
    let _guard = span.enter();

    let loaded = match source {
        CatalogSource::Directory(dir) => load_directory(dir)?,
        CatalogSource::Inline(inline) => load_inline(inline)?,
    };
    let catalog = &loaded.catalog;
    info!(
        dimensions = catalog.get(configurator_model::CatalogDomain::Dimensions).len(),
        openings = catalog.get(configurator_model::CatalogDomain::Openings).len(),
        materials = catalog.get(configurator_model::CatalogDomain::Materials).len(),
        "catalog loaded"
    );
    Ok(loaded)
}

/// Try each source in order, one attempt each.
///
/// Returns the first catalog that loads together with the index of the source
/// used, or the last error when every source fails.
pub fn load_with_fallback(sources: &[CatalogSource]) -> Result<(LoadedCatalog, usize)> {
    let mut last_error = LoadError::NoSources;
    for (index, source) in sources.iter().enumerate() {
        match load(source) {
            Ok(loaded) => {
                if index > 0 {
                    info!(source = %source, index, "using fallback catalog source");
                }
                return Ok((loaded, index));
            }
            Err(error) => {
                warn!(source = %source, %error, "catalog source failed");
                last_error = error;
            }
        }
    }
    Err(last_error)
}

fn load_directory(dir: &Path) -> Result<LoadedCatalog> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest = if manifest_path.is_file() {
        load_manifest(&manifest_path)?
    } else {
        Manifest::default_layout()
    };
    validate_manifest(&manifest)?;

    let mut files = Vec::new();
    let mut parts: [Vec<CatalogEntry>; 3] = Default::default();
    for (slot, role) in FileRole::ALL.into_iter().enumerate() {
        let file = manifest
            .file_for(role)
            .ok_or_else(|| LoadError::MissingRole {
                role: role.as_str().to_string(),
            })?;
        let full_path = dir.join(&file.path);
        let bytes = read_file(&full_path)?;
        let actual = verify_pin(&full_path, file, &bytes)?;
        parts[slot] = parse_role(role, &full_path, &bytes)?;
        files.push(LoadedFile {
            role,
            path: file.path.clone(),
            sha256: actual,
            pinned: file.sha256.is_some(),
        });
    }

    let [dimensions, openings, materials] = parts;
    Ok(LoadedCatalog {
        catalog: Catalog::from_parts(dimensions, openings, materials)
            .with_source(dir.display().to_string()),
        files,
    })
}

fn load_inline(inline: &InlineCatalog) -> Result<LoadedCatalog> {
    let mut files = Vec::new();
    let mut parts: [Vec<CatalogEntry>; 3] = Default::default();
    for (slot, role) in FileRole::ALL.into_iter().enumerate() {
        let label = format!("inline:{}/{}", inline.label, role.as_str());
        let bytes = inline.contents(role).as_bytes();
        parts[slot] = parse_role(role, Path::new(&label), bytes)?;
        files.push(LoadedFile {
            role,
            path: label,
            sha256: sha256_hex(bytes),
            pinned: false,
        });
    }

    let [dimensions, openings, materials] = parts;
    Ok(LoadedCatalog {
        catalog: Catalog::from_parts(dimensions, openings, materials)
            .with_source(format!("inline:{}", inline.label)),
        files,
    })
}

fn parse_role(role: FileRole, path: &Path, bytes: &[u8]) -> Result<Vec<CatalogEntry>> {
    match role {
        FileRole::Dimensions => parse_dimensions_csv(path, bytes),
        FileRole::Openings => parse_openings_csv(path, bytes),
        FileRole::Materials => parse_materials_csv(path, bytes),
    }
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    let contents = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| LoadError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<()> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(LoadError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(LoadError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }

    let mut roles = BTreeSet::new();
    for file in &manifest.files {
        if !roles.insert(file.role) {
            return Err(LoadError::DuplicateRole {
                role: file.role.as_str().to_string(),
            });
        }
        if let Some(sha) = &file.sha256 {
            validate_sha(sha, &file.path)?;
        }
        validate_path(&file.path)?;
    }

    for role in FileRole::ALL {
        if !roles.contains(&role) {
            return Err(LoadError::MissingRole {
                role: role.as_str().to_string(),
            });
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::io(path, e)
        }
    })
}

/// Hash `bytes` and check them against the manifest pin, if any.
fn verify_pin(path: &Path, file: &ManifestFile, bytes: &[u8]) -> Result<String> {
    let actual = sha256_hex(bytes);
    if let Some(expected) = &file.sha256 {
        let expected = expected.to_ascii_lowercase();
        if actual != expected {
            return Err(LoadError::Sha256Mismatch {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }
    }
    Ok(actual)
}

fn validate_sha(sha: &str, path: &str) -> Result<()> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LoadError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "sha256 must be 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<()> {
    if path.contains('\\') {
        return Err(LoadError::InvalidPath {
            path: PathBuf::from(path),
            message: "manifest path must use '/' separators".to_string(),
        });
    }
    let p = Path::new(path);
    if p.is_absolute() {
        return Err(LoadError::InvalidPath {
            path: p.to_path_buf(),
            message: "manifest path must be relative".to_string(),
        });
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(LoadError::InvalidPath {
            path: p.to_path_buf(),
            message: "manifest path must not leave the catalog directory".to_string(),
        });
    }
    Ok(())
}
