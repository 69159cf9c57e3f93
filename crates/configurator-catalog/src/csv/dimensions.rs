#![deny(unsafe_code)]

use std::cmp::Ordering;
use std::path::Path;

use configurator_model::{
    CatalogEntry, DimensionKind, EntryDetails, EntryId, SizeClass, WallDepthClass,
};
use tracing::warn;

use crate::csv::read_rows;
use crate::error::{LoadError, Result};

const REQUIRED: &[&str] = &["Type", "Value", "Label", "WallDepth"];

/// Parse `Type,Value,Label,WallDepth,Size` rows into dimension entries.
///
/// Incomplete rows are skipped. The result is ordered by kind, then by
/// numeric value.
pub fn parse_dimensions_csv(path: &Path, contents: &[u8]) -> Result<Vec<CatalogEntry>> {
    let mut results = Vec::new();
    for row in read_rows(path, contents, REQUIRED)? {
        if REQUIRED.iter().any(|column| row.get(column).is_none()) {
            warn!(path = %path.display(), line = row.line, "skipping incomplete dimension row");
            continue;
        }
        let kind: DimensionKind = row.parse(path, "Type")?.unwrap_or(DimensionKind::Height);
        let wall_depth: WallDepthClass = row.parse(path, "WallDepth")?.unwrap_or(WallDepthClass::Any);
        let size_class: Option<SizeClass> = row.parse(path, "Size")?;
        let id = EntryId::new(row.get("Value").unwrap_or_default())
            .map_err(|e| LoadError::csv(path, format!("line {}: {e}", row.line)))?;

        results.push(
            CatalogEntry::dimension(id, kind)
                .with_wall_depth(wall_depth)
                .with_size_class(size_class)
                .with_details(EntryDetails {
                    label: row.get("Label").map(str::to_string),
                    ..EntryDetails::default()
                }),
        );
    }

    results.sort_by(compare_dimensions);
    Ok(results)
}

fn compare_dimensions(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    a.kind.cmp(&b.kind).then_with(|| {
        match (a.numeric_value(), b.numeric_value()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_model::{EntryKind, WallDepth};

    const CSV: &str = "\
Type,Value,Label,WallDepth,Size
Height,3000,3.0 m,200,L
Height,2400,2.4 m,200,M
Width,4800,4.8 m,any,M
Height,2700,,200,M
Height,2400,2.4 m,250,M
";

    #[test]
    fn orders_by_kind_then_value_and_skips_incomplete_rows() {
        let entries = parse_dimensions_csv(Path::new("dimensions.csv"), CSV.as_bytes()).unwrap();
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2400", "2400", "3000", "4800"]);
        assert_eq!(entries[0].wall_depth, WallDepthClass::Exact(WallDepth::Mm200));
        assert_eq!(entries[1].wall_depth, WallDepthClass::Exact(WallDepth::Mm250));
        assert_eq!(entries[3].kind, EntryKind::Dimension(DimensionKind::Width));
        assert_eq!(entries[3].wall_depth, WallDepthClass::Any);
        assert_eq!(entries[2].size_class, Some(SizeClass::L));
        assert_eq!(entries[0].label(), "2.4 m");
    }

    #[test]
    fn unknown_size_token_fails() {
        let err = parse_dimensions_csv(
            Path::new("dimensions.csv"),
            b"Type,Value,Label,WallDepth,Size\nHeight,2400,2.4 m,200,XXL\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn unknown_type_fails() {
        assert!(
            parse_dimensions_csv(
                Path::new("dimensions.csv"),
                b"Type,Value,Label,WallDepth\nDepth,2400,2.4 m,200\n",
            )
            .is_err()
        );
    }
}
