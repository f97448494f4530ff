//! Longform entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::io_ops::{OpenFileResult, open_file};
use core_actions::{Worksheet, dispatch, translate_key, translate_mouse};
use core_config::{Config, ConfigContext, load_from};
use core_grid::Grid;
use core_render::TerminalRenderer;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard, TerminalOptions};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

mod input;

use input::{EVENT_CHANNEL_CAP, InputEvent};

const STATUS_ROWS: u16 = 1;
const LOG_FILE: &str = "longform.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "longform", version, about = "Long-form arithmetic worksheet")]
struct Args {
    /// Worksheet to open (JSON). Created on first save if it does not exist.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `longform.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StartupTelemetry {
    opened_path: Option<PathBuf>,
    open_failed: bool,
    rows: usize,
    cols: usize,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    /// Rebuild the (not yet entered) backend with the configured options.
    fn configure_terminal(&mut self, config: &Config) {
        let options = terminal_options(config);
        info!(target: "runtime.startup", mouse = options.mouse_capture, "terminal_configured");
        self.backend = CrosstermBackend::with_options(options);
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn terminal_options(config: &Config) -> TerminalOptions {
    TerminalOptions {
        mouse_capture: config.file.terminal.mouse,
        ..TerminalOptions::default()
    }
}

/// Build the starting worksheet. An existing file is loaded at its own size;
/// otherwise an empty sheet of the configured size is created.
fn load_worksheet(path: Option<&Path>, config: &Config) -> (Worksheet, StartupTelemetry) {
    let (rows, cols) = config.effective_grid;
    let mut open_failed = false;
    let sheet = match path {
        None => Worksheet::new(rows, cols, config.save_path().clone()),
        Some(path) => match open_file(path) {
            OpenFileResult::Success { grid, file_name } => {
                Worksheet::from_grid(grid, file_name.clone(), Some(file_name))
            }
            OpenFileResult::Missing => {
                Worksheet::from_grid(Grid::new(rows, cols), path.to_path_buf(), Some(path.to_path_buf()))
            }
            OpenFileResult::Error => {
                open_failed = true;
                let mut sheet = Worksheet::new(rows, cols, config.save_path().clone());
                sheet.set_message("open failed");
                sheet
            }
        },
    };
    let telemetry = StartupTelemetry {
        opened_path: path.map(Path::to_path_buf),
        open_failed,
        rows: sheet.grid().rows(),
        cols: sheet.grid().cols(),
    };
    (sheet, telemetry)
}

enum LoopControl {
    Continue,
    Quit,
}

struct Runtime<'a> {
    sheet: Worksheet,
    renderer: TerminalRenderer,
    config: Config,
    _terminal_guard: TerminalGuard<'a>,
}

impl Runtime<'_> {
    async fn run(&mut self, mut rx: mpsc::Receiver<InputEvent>) {
        self.paint();
        while let Some(event) = rx.recv().await {
            if let LoopControl::Quit = self.handle_event(event) {
                info!(target: "runtime", unsaved = self.sheet.is_dirty(), "quit");
                break;
            }
        }
        rx.close();
    }

    fn handle_event(&mut self, event: InputEvent) -> LoopControl {
        let action = match event {
            InputEvent::Key(key) => translate_key(&key),
            InputEvent::Mouse(mouse) => translate_mouse(&mouse),
            InputEvent::Resize(w, h) => {
                self.handle_resize(w, h);
                return LoopControl::Continue;
            }
        };
        let Some(action) = action else {
            return LoopControl::Continue;
        };
        let result = dispatch(action, &mut self.sheet, &mut self.renderer);
        if result.quit {
            return LoopControl::Quit;
        }
        if result.grid_replaced {
            self.renderer.invalidate();
        }
        if result.dirty || result.grid_replaced {
            self.paint();
        }
        LoopControl::Continue
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        let ctx = ConfigContext::new(width, height, STATUS_ROWS);
        if let Some((rows, cols)) = self.config.recompute_with_context(ctx) {
            // the open worksheet keeps its size; the new fit applies to the next one
            info!(target: "runtime", width, height, rows, cols, "viewport_fit_changed");
        }
        self.renderer.invalidate();
        self.paint();
    }

    fn paint(&mut self) {
        let status = self.sheet.status_line();
        if let Err(e) = self.renderer.paint(self.sheet.grid(), &status) {
            error!(target: "render", error = %e, "paint_failed");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let mut config = load_from(args.config.clone())?;
    if let Ok((w, h)) = startup.backend.size() {
        config.apply_context(ConfigContext::new(w, h, STATUS_ROWS));
    }
    startup.configure_terminal(&config);
    let (sheet, telemetry) = load_worksheet(args.path.as_deref(), &config);
    let path_str = telemetry
        .opened_path
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());
    info!(
        target: "runtime.startup",
        path = path_str.as_deref(),
        open_failed = telemetry.open_failed,
        config_override = args.config.is_some(),
        rows = telemetry.rows,
        cols = telemetry.cols,
        "bootstrap_complete"
    );

    startup.backend.set_title("Longform")?;
    let guard = startup.backend.enter_guard()?;

    let (tx, rx) = mpsc::channel::<InputEvent>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = input::spawn_input(tx);

    let mut runtime = Runtime {
        sheet,
        renderer: TerminalRenderer::new(),
        config,
        _terminal_guard: guard,
    };
    runtime.run(rx).await;

    input_shutdown.signal();
    if let Err(e) = input_task.await {
        error!(target: "runtime.shutdown", ?e, "input_task_join_failed");
    }
    drop(runtime);
    info!(target: "runtime", "shutdown_complete");
    Ok(())
}
