#![deny(unsafe_code)]

use std::path::Path;

use configurator_model::{
    CatalogEntry, EntryDetails, EntryId, OpeningKind, RoofType, SizeClass, WallDepth,
    WallDepthClass,
};
use tracing::{debug, warn};

use crate::csv::{CsvRow, read_rows};
use crate::error::{LoadError, Result};

const WALL_ROW_TYPE: &str = "windows and doorways";
const ROOF_ROW_TYPE: &str = "roof";

/// Parse the openings price list into windows, doors and skylights.
///
/// Wall rows become windows or doors keyed `<model>_<code>`
/// (`SKYLARK200_WINDOW-S1` -> `SKYLARK200_S1`); roof rows naming a skylight
/// keep their full name as id. Other rows are ignored.
pub fn parse_openings_csv(path: &Path, contents: &[u8]) -> Result<Vec<CatalogEntry>> {
    let mut results = Vec::new();
    for row in read_rows(path, contents, &["Type", "Name"])? {
        let (Some(row_type), Some(name)) = (row.get("Type"), row.get("Name")) else {
            warn!(path = %path.display(), line = row.line, "skipping incomplete opening row");
            continue;
        };
        let upper = name.to_uppercase();
        let kind = match row_type.to_lowercase().as_str() {
            WALL_ROW_TYPE if upper.contains("WINDOW") => OpeningKind::Window,
            WALL_ROW_TYPE if upper.contains("DOOR") => OpeningKind::Door,
            ROOF_ROW_TYPE if upper.contains("SKYLIGHT") => OpeningKind::Skylight,
            _ => {
                debug!(line = row.line, name, "ignoring non-opening row");
                continue;
            }
        };
        results.push(build_entry(path, &row, name, kind)?);
    }
    Ok(results)
}

fn build_entry(path: &Path, row: &CsvRow, name: &str, kind: OpeningKind) -> Result<CatalogEntry> {
    let model = name.split('_').next().unwrap_or(name);
    let (id, code) = match kind {
        OpeningKind::Skylight => (name.to_string(), name.split_once('-').map_or(name, |(_, c)| c)),
        _ => {
            let code = name.rsplit('-').next().unwrap_or(name);
            (format!("{model}_{code}"), code)
        }
    };
    let id = EntryId::new(id).map_err(|e| LoadError::csv(path, format!("line {}: {e}", row.line)))?;

    let wall_depth = match row.parse::<WallDepthClass>(path, "WallDepth")? {
        Some(class) => class,
        None => model_wall_depth(model),
    };
    let size_class: Option<SizeClass> = row.parse(path, "Size")?;
    let roof_type: Option<RoofType> = row.parse(path, "RoofType")?;
    if kind == OpeningKind::Skylight && roof_type.is_none() {
        warn!(line = row.line, name, "skylight without roof type is never admissible");
    }

    let width_mm = row.number("Opening Width(mm)");
    let height_mm = row.number("Opening Height (mm)");
    let area_m2 = row.number("Opening Area (m2)");
    let description = match (width_mm, height_mm, area_m2) {
        (Some(w), Some(h), Some(a)) => Some(format!("{name}\nHeight: {h}mm\nWidth: {w}mm ({a}m²)")),
        _ => Some(name.to_string()),
    };

    Ok(CatalogEntry::opening(id, kind)
        .with_wall_depth(wall_depth)
        .with_size_class(size_class)
        .with_roof_type(roof_type)
        .with_details(EntryDetails {
            label: Some(format!("{model} {code}")),
            description,
            image_url: row.get("ImageURL").map(str::to_string),
            price: row.number("Price"),
            width_mm,
            height_mm,
            area_m2,
        }))
}

/// Wall depth encoded in the product model name (`SKYLARK250` -> 250 mm).
fn model_wall_depth(model: &str) -> WallDepthClass {
    let digits: String = model.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<WallDepth>()
        .map_or(WallDepthClass::Any, WallDepthClass::Exact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_model::EntryKind;

    const CSV: &str = "\
Type,Name,Opening Width(mm),Opening Height (mm),Opening Area (m2),RoofType,ImageURL
Windows and doorways,SKYLARK200_WINDOW-S1,600,900,0.54,,https://cdn/w.jpg
Windows and doorways,SKYLARK250_DOOR-M2,900,2100,1.89,,
Roof,SKYLARK200_SKYLIGHT-M1,800,800,0.64,mono-pitch,
Roof,SKYLARK200_RIDGE,0,0,0,,
Floor,SKYLARK200_WINDOW-S1,0,0,0,,
";

    fn parse() -> Vec<CatalogEntry> {
        parse_openings_csv(Path::new("openings.csv"), CSV.as_bytes()).unwrap()
    }

    #[test]
    fn classifies_rows_by_type_and_name() {
        let entries = parse();
        let kinds: Vec<(&str, EntryKind)> = entries.iter().map(|e| (e.id.as_str(), e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("SKYLARK200_S1", EntryKind::Opening(OpeningKind::Window)),
                ("SKYLARK250_M2", EntryKind::Opening(OpeningKind::Door)),
                ("SKYLARK200_SKYLIGHT-M1", EntryKind::Opening(OpeningKind::Skylight)),
            ]
        );
    }

    #[test]
    fn wall_depth_falls_back_to_model_name() {
        let entries = parse();
        assert_eq!(entries[0].wall_depth, WallDepthClass::Exact(WallDepth::Mm200));
        assert_eq!(entries[1].wall_depth, WallDepthClass::Exact(WallDepth::Mm250));
    }

    #[test]
    fn carries_presentation_details() {
        let entries = parse();
        let window = &entries[0];
        assert_eq!(window.label(), "SKYLARK200 S1");
        assert_eq!(window.details.width_mm, Some(600.0));
        assert_eq!(window.details.image_url.as_deref(), Some("https://cdn/w.jpg"));
        assert_eq!(window.derived_size_class(), Some(SizeClass::S));

        let skylight = &entries[2];
        assert_eq!(skylight.roof_type, Some(RoofType::MonoPitch));
        assert_eq!(skylight.label(), "SKYLARK200 M1");
        assert_eq!(skylight.derived_size_class(), Some(SizeClass::M));
    }

    #[test]
    fn explicit_columns_override_derived_values() {
        let entries = parse_openings_csv(
            Path::new("openings.csv"),
            b"Type,Name,WallDepth,Size\nWindows and doorways,SKYLARK200_WINDOW-S1,any,L\n",
        )
        .unwrap();
        assert_eq!(entries[0].wall_depth, WallDepthClass::Any);
        assert_eq!(entries[0].derived_size_class(), Some(SizeClass::L));
    }
}
