//! Worksheet file IO.
//!
//! Synchronous and minimal. The JSON format itself lives in `core_grid`;
//! these helpers add the filesystem and the logging around it.

use anyhow::{Context, Result};
use core_grid::{Grid, export_json, import_json};
use std::path::{Path, PathBuf};

/// Result of attempting to open a worksheet.
#[derive(Debug)]
pub enum OpenFileResult {
    Success { grid: Grid, file_name: PathBuf },
    /// Nothing at the path yet; the caller starts an empty worksheet there.
    Missing,
    Error, // already logged
}

pub fn open_file(path: &Path) -> OpenFileResult {
    if !path.exists() {
        tracing::debug!(target: "io", path = %path.display(), "worksheet_missing");
        return OpenFileResult::Missing;
    }
    match read_grid(path) {
        Ok(grid) => {
            tracing::info!(target: "io", path = %path.display(), rows = grid.rows(), cols = grid.cols(), "worksheet_opened");
            OpenFileResult::Success {
                grid,
                file_name: path.to_path_buf(),
            }
        }
        Err(e) => {
            tracing::error!(target: "io", path = %path.display(), error = %format!("{e:#}"), "worksheet_open_error");
            OpenFileResult::Error
        }
    }
}

fn read_grid(path: &Path) -> Result<Grid> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let grid = import_json(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(grid)
}

/// Serialize the grid to `path`. Metadata flags are not written.
pub fn write_file(grid: &Grid, path: &Path) -> Result<()> {
    let text = export_json(grid)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(target: "io", path = %path.display(), "worksheet_saved");
    Ok(())
}
