//! Configuration loading and parsing.
//!
//! Parses `longform.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [grid]
//! rows = 30
//! cols = 24
//!
//! [worksheet]
//! save_path = "worksheet.json"
//!
//! [terminal]
//! mouse = true
//! ```
//!
//! The grid size requested in the file is kept as parsed; the size actually
//! used is clamped to the terminal by `Config::apply_context`, which the
//! binary calls at startup and again on resize. Unknown fields are ignored so
//! older binaries tolerate newer files.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::info;

pub const DEFAULT_ROWS: usize = 30;
pub const DEFAULT_COLS: usize = 24;
pub const DEFAULT_SAVE_PATH: &str = "worksheet.json";

/// Terminal columns drawn per grid cell.
pub const SCREEN_COLUMNS_PER_CELL: u16 = 2;

/// Smallest grid worth laying arithmetic out in.
const MIN_ROWS: usize = 4;
const MIN_COLS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
    pub status_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16, status_rows: u16) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
            status_rows,
        }
    }

    /// Grid rows the viewport can show above the status line.
    pub fn grid_rows(&self) -> usize {
        self.viewport_rows.saturating_sub(self.status_rows) as usize
    }

    pub fn grid_cols(&self) -> usize {
        (self.viewport_columns / SCREEN_COLUMNS_PER_CELL) as usize
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GridConfig {
    #[serde(default = "GridConfig::default_rows")]
    pub rows: usize,
    #[serde(default = "GridConfig::default_cols")]
    pub cols: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            cols: Self::default_cols(),
        }
    }
}

impl GridConfig {
    const fn default_rows() -> usize {
        DEFAULT_ROWS
    }
    const fn default_cols() -> usize {
        DEFAULT_COLS
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WorksheetConfig {
    #[serde(default = "WorksheetConfig::default_save_path")]
    pub save_path: PathBuf,
}

impl Default for WorksheetConfig {
    fn default() -> Self {
        Self {
            save_path: Self::default_save_path(),
        }
    }
}

impl WorksheetConfig {
    fn default_save_path() -> PathBuf {
        PathBuf::from(DEFAULT_SAVE_PATH)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Capture the mouse so clicks move the cursor and select boxes.
    #[serde(default = "TerminalConfig::default_mouse")]
    pub mouse: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            mouse: Self::default_mouse(),
        }
    }
}

impl TerminalConfig {
    const fn default_mouse() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub worksheet: WorksheetConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    /// Grid size after clamping to the viewport, as (rows, cols).
    pub effective_grid: (usize, usize),
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(None, ConfigFile::default())
    }
}

/// Config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("longform.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("longform").join("longform.toml");
    }
    PathBuf::from("longform.toml")
}

/// Load configuration. A missing or unparsable file yields defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config::from_file(Some(content), file)),
        Err(err) => {
            info!(target: "config", path = %path.display(), %err, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    fn from_file(raw: Option<String>, file: ConfigFile) -> Self {
        let effective_grid = (file.grid.rows.max(MIN_ROWS), file.grid.cols.max(MIN_COLS));
        Self {
            raw,
            file,
            effective_grid,
        }
    }

    pub fn save_path(&self) -> &PathBuf {
        &self.file.worksheet.save_path
    }

    /// Clamp the requested grid size to what the viewport can show. Returns
    /// the effective (rows, cols).
    pub fn apply_context(&mut self, ctx: ConfigContext) -> (usize, usize) {
        let requested = (self.file.grid.rows.max(MIN_ROWS), self.file.grid.cols.max(MIN_COLS));
        let fit = (ctx.grid_rows().max(MIN_ROWS), ctx.grid_cols().max(MIN_COLS));
        let clamped = (requested.0.min(fit.0), requested.1.min(fit.1));

        if clamped != requested {
            info!(
                target: "config",
                requested_rows = requested.0,
                requested_cols = requested.1,
                rows = clamped.0,
                cols = clamped.1,
                viewport_rows = ctx.viewport_rows,
                viewport_columns = ctx.viewport_columns,
                status_rows = ctx.status_rows,
                "grid_size_clamped"
            );
        }
        self.effective_grid = clamped;
        clamped
    }

    /// Re-clamp after a viewport change. Returns `Some(new_size)` when the
    /// effective grid size changed, else `None`.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<(usize, usize)> {
        let prev = self.effective_grid;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    fn roomy() -> ConfigContext {
        ConfigContext::new(200, 60, 1)
    }

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), text).unwrap();
        tmp
    }

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file.grid, GridConfig::default());
        assert_eq!(cfg.effective_grid, (30, 24));
        assert_eq!(cfg.save_path(), &PathBuf::from("worksheet.json"));
    }

    #[test]
    fn parses_grid_and_worksheet_sections() {
        let tmp = write_config("[grid]\nrows = 12\ncols = 16\n[worksheet]\nsave_path = \"/tmp/sums.json\"\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!((cfg.file.grid.rows, cfg.file.grid.cols), (12, 16));
        assert_eq!(cfg.save_path(), &PathBuf::from("/tmp/sums.json"));
        assert_eq!(cfg.apply_context(roomy()), (12, 16));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let tmp = write_config("[grid]\nrows = 40\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!((cfg.file.grid.rows, cfg.file.grid.cols), (40, 24));
        assert_eq!(cfg.save_path(), &PathBuf::from("worksheet.json"));
        assert!(cfg.file.terminal.mouse);
    }

    #[test]
    fn mouse_capture_can_be_turned_off() {
        let tmp = write_config("[terminal]\nmouse = false\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.terminal, TerminalConfig { mouse: false });
        assert_eq!(cfg.file.grid, GridConfig::default());
    }

    #[test]
    fn parse_error_falls_back_to_defaults() {
        let tmp = write_config("[grid\nrows = ");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.effective_grid, (30, 24));
    }

    #[test]
    fn clamps_to_viewport_two_columns_per_cell() {
        let mut cfg = Config::default();
        // 40 columns -> 20 cells, 21 rows minus 1 status row -> 20 rows
        assert_eq!(cfg.apply_context(ConfigContext::new(40, 21, 1)), (20, 20));
        assert_eq!(cfg.effective_grid, (20, 20));
    }

    #[test]
    fn tiny_viewport_keeps_a_minimum_grid() {
        let mut cfg = Config::default();
        assert_eq!(cfg.apply_context(ConfigContext::new(2, 2, 1)), (MIN_ROWS, MIN_COLS));
    }

    #[test]
    fn recompute_with_context_reports_changes_only() {
        let mut cfg = Config::default();
        cfg.apply_context(roomy());
        assert_eq!(cfg.effective_grid, (30, 24));
        assert_eq!(cfg.recompute_with_context(ConfigContext::new(200, 11, 1)), Some((10, 24)));
        assert_eq!(cfg.recompute_with_context(ConfigContext::new(180, 11, 1)), None);
        assert_eq!(cfg.recompute_with_context(roomy()), Some((30, 24)));
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let mut cfg = Config::default();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        with_default(subscriber, || {
            cfg.apply_context(ConfigContext::new(30, 10, 1));
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("grid_size_clamped"));
        assert_eq!(cfg.effective_grid, (9, 15));
    }
}
