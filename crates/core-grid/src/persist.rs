//! Worksheet export/import as JSON text.
//!
//! Format (version 1):
//! `{"version":1,"rows":R,"cols":C,"grid":[[{"char":"1"},{"char":""},...],...]}`
//!
//! Only characters are persisted. Lock, correctness and underline flags are
//! session state owned by the operation registry and do not survive a save.
//! Import never touches an existing grid: it builds a fresh one or fails.

use crate::Grid;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const FORMAT_VERSION: u32 = 1;

/// Largest worksheet `import_json` will allocate.
pub const MAX_IMPORT_CELLS: usize = 1 << 20;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("worksheet is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported worksheet version {0}")]
    Version(u32),
    #[error("worksheet has invalid dimensions {rows}x{cols}")]
    Dimensions { rows: usize, cols: usize },
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct CellRecord {
    #[serde(rename = "char", default)]
    ch: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct WorksheetFile {
    #[serde(default = "default_version")]
    version: u32,
    rows: usize,
    cols: usize,
    grid: Vec<Vec<CellRecord>>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

pub fn export_json(grid: &Grid) -> Result<String, GridError> {
    let rows = (0..grid.rows())
        .map(|r| {
            (0..grid.cols())
                .map(|c| CellRecord {
                    ch: grid.get(r, c).map(String::from).unwrap_or_default(),
                })
                .collect()
        })
        .collect();
    let file = WorksheetFile {
        version: FORMAT_VERSION,
        rows: grid.rows(),
        cols: grid.cols(),
        grid: rows,
    };
    Ok(serde_json::to_string(&file)?)
}

/// Parse a worksheet. Missing trailing rows/cells import as empty; only the
/// first character of each stored cell string is kept.
pub fn import_json(text: &str) -> Result<Grid, GridError> {
    let file: WorksheetFile = serde_json::from_str(text)?;
    if file.version != FORMAT_VERSION {
        return Err(GridError::Version(file.version));
    }
    let cells = file.rows.checked_mul(file.cols).unwrap_or(usize::MAX);
    if cells == 0 || cells > MAX_IMPORT_CELLS {
        return Err(GridError::Dimensions {
            rows: file.rows,
            cols: file.cols,
        });
    }
    let mut grid = Grid::new(file.rows, file.cols);
    for (r, row) in file.grid.iter().enumerate().take(file.rows) {
        for (c, cell) in row.iter().enumerate().take(file.cols) {
            if let Some(ch) = cell.ch.chars().next() {
                grid.set_char(r, c, ch);
            }
        }
    }
    debug!(target: "io", rows = file.rows, cols = file.cols, "worksheet_imported");
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_then_import_preserves_characters() {
        let mut g = Grid::new(3, 4);
        g.write_str(0, 0, "12");
        g.write_str(1, 0, "+7");
        let text = export_json(&g).unwrap();
        assert!(text.contains("\"version\":1"));
        let back = import_json(&text).unwrap();
        assert_eq!(back.row_text(0), "12");
        assert_eq!(back.row_text(1), "+7");
        assert_eq!((back.rows(), back.cols()), (3, 4));
    }

    #[test]
    fn rejects_missing_grid_array() {
        let err = import_json(r#"{"rows":2,"cols":2}"#).unwrap_err();
        assert!(matches!(err, GridError::Json(_)));
    }

    #[test]
    fn rejects_zero_dimensions_and_unknown_version() {
        assert!(matches!(
            import_json(r#"{"rows":0,"cols":2,"grid":[]}"#),
            Err(GridError::Dimensions { rows: 0, cols: 2 })
        ));
        assert!(matches!(
            import_json(r#"{"version":9,"rows":1,"cols":1,"grid":[]}"#),
            Err(GridError::Version(9))
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected_before_allocating() {
        assert!(matches!(
            import_json(r#"{"version":1,"rows":4294967296,"cols":4294967296,"grid":[]}"#),
            Err(GridError::Dimensions { .. })
        ));
        assert!(matches!(
            import_json(r#"{"rows":100000,"cols":100000,"grid":[]}"#),
            Err(GridError::Dimensions { rows: 100000, cols: 100000 })
        ));
        let g = import_json(r#"{"rows":1024,"cols":1024,"grid":[]}"#).unwrap();
        assert_eq!(g.rows() * g.cols(), MAX_IMPORT_CELLS);
    }

    #[test]
    fn short_rows_import_as_empty() {
        let g = import_json(r#"{"rows":2,"cols":3,"grid":[[{"char":"5"}]]}"#).unwrap();
        assert_eq!(g.get(0, 0), Some('5'));
        assert_eq!(g.get(1, 2), None);
    }
}
