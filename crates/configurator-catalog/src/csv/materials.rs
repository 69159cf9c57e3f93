#![deny(unsafe_code)]

use std::path::Path;

use configurator_model::{CatalogEntry, EntryDetails, EntryId, MaterialKind, StandardFor, WallDepthClass};
use tracing::warn;

use crate::csv::read_rows;
use crate::error::{LoadError, Result};

const REQUIRED: &[&str] = &["Type", "Value", "Title"];

/// Parse `Type,Value,Title,Description,ImageURL,Price,Standard` rows.
///
/// A blank `Standard` marks a non-standard material. An optional `WallDepth`
/// column restricts a material to one wall depth.
pub fn parse_materials_csv(path: &Path, contents: &[u8]) -> Result<Vec<CatalogEntry>> {
    let mut results = Vec::new();
    for row in read_rows(path, contents, REQUIRED)? {
        if REQUIRED.iter().any(|column| row.get(column).is_none()) {
            warn!(path = %path.display(), line = row.line, "skipping incomplete material row");
            continue;
        }
        let kind: MaterialKind = row.parse(path, "Type")?.unwrap_or(MaterialKind::Cladding);
        let standard_for: Option<StandardFor> = row.parse(path, "Standard")?;
        let wall_depth: WallDepthClass = row.parse(path, "WallDepth")?.unwrap_or(WallDepthClass::Any);
        let id = EntryId::new(row.get("Value").unwrap_or_default())
            .map_err(|e| LoadError::csv(path, format!("line {}: {e}", row.line)))?;

        results.push(
            CatalogEntry::material(id, kind)
                .with_standard_for(standard_for)
                .with_wall_depth(wall_depth)
                .with_details(EntryDetails {
                    label: row.get("Title").map(str::to_string),
                    description: row.get("Description").map(str::to_string),
                    image_url: row.get("ImageURL").map(str::to_string),
                    price: row.number("Price"),
                    ..EntryDetails::default()
                }),
        );
    }
    Ok(results)
}
