//! Catalog directory resolution.

use std::path::PathBuf;

/// Environment variable for overriding the catalog directory.
pub const CATALOG_ENV_VAR: &str = "CONFIGURATOR_CATALOG_DIR";

/// Default file names used when a directory carries no `catalog.toml`.
pub const DEFAULT_DIMENSIONS_FILE: &str = "dimensions.csv";
pub const DEFAULT_OPENINGS_FILE: &str = "openings.csv";
pub const DEFAULT_MATERIALS_FILE: &str = "materials.csv";

/// Get the catalog root directory.
///
/// Resolution order:
/// 1. `CONFIGURATOR_CATALOG_DIR` environment variable
/// 2. `catalog/` directory relative to the workspace root
pub fn catalog_root() -> PathBuf {
    if let Ok(root) = std::env::var(CATALOG_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../catalog")
}
