//! Terminal session setup for the worksheet.
//!
//! Entering a session applies a fixed sequence of screen changes (raw mode,
//! alternate screen, mouse capture, hidden cursor) and remembers which ones
//! took effect. Leaving undoes exactly those, newest first, so a setup that
//! fails halfway still restores the terminal. The renderer draws its own
//! cursor, hence the hidden hardware one; mouse capture is what lets left
//! clicks reach the worksheet and can be turned off.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{self, Stdout, Write};
use tracing::{debug, warn};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current size as `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
}

/// One reversible change made to the terminal on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenStep {
    RawMode,
    AlternateScreen,
    MouseCapture,
    HiddenCursor,
}

impl ScreenStep {
    fn label(self) -> &'static str {
        match self {
            ScreenStep::RawMode => "raw_mode",
            ScreenStep::AlternateScreen => "alternate_screen",
            ScreenStep::MouseCapture => "mouse_capture",
            ScreenStep::HiddenCursor => "hidden_cursor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalOptions {
    /// Report mouse clicks as events.
    pub mouse_capture: bool,
    /// Switch the tty into raw mode. Off only when the output is not a tty.
    pub raw_mode: bool,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            mouse_capture: true,
            raw_mode: true,
        }
    }
}

impl TerminalOptions {
    /// Steps applied on entry, in order.
    pub fn steps(&self) -> Vec<ScreenStep> {
        let mut steps = Vec::with_capacity(4);
        if self.raw_mode {
            steps.push(ScreenStep::RawMode);
        }
        steps.push(ScreenStep::AlternateScreen);
        if self.mouse_capture {
            steps.push(ScreenStep::MouseCapture);
        }
        steps.push(ScreenStep::HiddenCursor);
        steps
    }
}

pub struct CrosstermBackend<W: Write = Stdout> {
    out: W,
    options: TerminalOptions,
    applied: Vec<ScreenStep>,
}

/// RAII guard restoring the terminal even if the caller early-returns or panics.
pub struct TerminalGuard<'a, W: Write = Stdout> {
    backend: &'a mut CrosstermBackend<W>,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::with_options(TerminalOptions::default())
    }

    pub fn with_options(options: TerminalOptions) -> Self {
        Self::with_writer(io::stdout(), options)
    }
}

impl<W: Write> CrosstermBackend<W> {
    pub fn with_writer(out: W, options: TerminalOptions) -> Self {
        Self {
            out,
            options,
            applied: Vec::new(),
        }
    }

    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    pub fn is_entered(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_, W>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }

    fn apply(&mut self, step: ScreenStep) -> io::Result<()> {
        match step {
            ScreenStep::RawMode => enable_raw_mode(),
            ScreenStep::AlternateScreen => execute!(self.out, EnterAlternateScreen),
            ScreenStep::MouseCapture => execute!(self.out, EnableMouseCapture),
            ScreenStep::HiddenCursor => execute!(self.out, Hide),
        }
    }

    fn undo(&mut self, step: ScreenStep) -> io::Result<()> {
        match step {
            ScreenStep::RawMode => disable_raw_mode(),
            ScreenStep::AlternateScreen => execute!(self.out, LeaveAlternateScreen),
            ScreenStep::MouseCapture => execute!(self.out, DisableMouseCapture),
            ScreenStep::HiddenCursor => execute!(self.out, Show),
        }
    }
}

impl<W: Write> TerminalBackend for CrosstermBackend<W> {
    fn enter(&mut self) -> Result<()> {
        if self.is_entered() {
            return Ok(());
        }
        for step in self.options.steps() {
            if let Err(e) = self.apply(step) {
                warn!(target: "terminal", step = step.label(), error = %e, "enter_step_failed");
                // leave whatever did take effect
                let _ = self.leave();
                return Err(e.into());
            }
            self.applied.push(step);
        }
        debug!(target: "terminal", steps = self.applied.len(), mouse = self.options.mouse_capture, "entered");
        Ok(())
    }

    /// Undo every applied step even when one fails; the first error wins.
    fn leave(&mut self) -> Result<()> {
        let mut first_err = None;
        while let Some(step) = self.applied.pop() {
            if let Err(e) = self.undo(step) {
                warn!(target: "terminal", step = step.label(), error = %e, "leave_step_failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => {
                debug!(target: "terminal", "left");
                Ok(())
            }
        }
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.out, SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl<W: Write> Drop for TerminalGuard<'_, W> {
    fn drop(&mut self) {
        if let Err(e) = self.backend.leave() {
            warn!(target: "terminal", error = %e, "leave_failed");
        }
    }
}
