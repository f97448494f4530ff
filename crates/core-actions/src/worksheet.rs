//! Editor state for one worksheet: grid, operation registry, cursor and the
//! bits the status line needs.

use core_grid::{Grid, Position};
use core_ops::OperationRegistry;
use core_render::GridRenderer;
use core_render::status::{StatusContext, StatusMode, build_status};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Worksheet {
    pub(crate) grid: Grid,
    pub(crate) registry: OperationRegistry,
    cursor: Position,
    /// Where Ctrl+S writes: the opened file, else the configured default.
    save_path: PathBuf,
    /// File the worksheet was opened from or last saved to.
    file_name: Option<PathBuf>,
    pub(crate) dirty: bool,
    message: Option<String>,
}

impl Worksheet {
    pub fn new(rows: usize, cols: usize, save_path: PathBuf) -> Self {
        Self::from_grid(Grid::new(rows, cols), save_path, None)
    }

    pub fn from_grid(grid: Grid, save_path: PathBuf, file_name: Option<PathBuf>) -> Self {
        Self {
            grid,
            registry: OperationRegistry::new(),
            cursor: Position::origin(),
            save_path,
            file_name,
            dirty: false,
            message: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub(crate) fn clear_message(&mut self) {
        self.message = None;
    }

    pub(crate) fn mark_saved(&mut self, path: PathBuf) {
        self.dirty = false;
        self.file_name = Some(path);
    }

    /// Place the cursor (clamped to the grid) and bring the registry along:
    /// entry follows or ends, a pending range resumes, and a locked box under
    /// the cursor is highlighted.
    pub fn set_cursor(&mut self, pos: Position, renderer: &mut dyn GridRenderer) {
        let mut pos = pos;
        pos.clamp_to(self.grid.rows(), self.grid.cols());
        self.cursor = pos;
        renderer.update_cursor(pos.row, pos.col);
        self.registry.update_cursor_context(pos.row, pos.col);
        self.registry.try_resume_at(pos.row, pos.col);
        self.registry.select_at(pos.row, pos.col, renderer);
    }

    /// Empty the grid and forget every operation.
    pub fn clear(&mut self, renderer: &mut dyn GridRenderer) {
        self.grid.clear_all();
        self.registry.reset();
        self.dirty = true;
        self.set_cursor(Position::origin(), renderer);
    }

    pub fn status_line(&self) -> String {
        let mode = if self.registry.active_entry().is_some() {
            StatusMode::Entry
        } else {
            StatusMode::Edit
        };
        build_status(&StatusContext {
            mode,
            row: self.cursor.row,
            col: self.cursor.col,
            pending_operator: self.registry.active_operation().map(|op| op.symbol),
            file_name: self.file_name.as_deref(),
            dirty: self.dirty,
            message: self.message.as_deref(),
        })
    }
}
