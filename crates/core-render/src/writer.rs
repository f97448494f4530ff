//! Queued terminal commands flushed once per frame.
//!
//! * Commands preserve ordering; nothing reaches the terminal before `flush`.
//! * All positions are absolute screen coordinates; caller ensures bounds.
//! * Styled text always resets attributes afterwards so styles never leak
//!   into the next cell.

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

/// Visual attributes for one painted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub underline: bool,
    pub bold: bool,
    pub reverse: bool,
}

impl CellStyle {
    pub fn is_plain(&self) -> bool {
        *self == CellStyle::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearAll,
    ClearLine,
    Print(String),
    Styled(String, CellStyle),
}

#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    pub fn clear_all(&mut self) {
        self.cmds.push(Command::ClearAll);
    }
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }
    pub fn styled<S: Into<String>>(&mut self, s: S, style: CellStyle) {
        if style.is_plain() {
            self.print(s);
        } else {
            self.cmds.push(Command::Styled(s.into(), style));
        }
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }
    pub fn flush(self) -> Result<()> {
        let mut out = stdout();
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearAll => queue!(out, Clear(ClearType::All))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::Styled(s, style) => {
                    if let Some(fg) = style.fg {
                        queue!(out, SetForegroundColor(fg))?;
                    }
                    if let Some(bg) = style.bg {
                        queue!(out, SetBackgroundColor(bg))?;
                    }
                    if style.underline {
                        queue!(out, SetAttribute(Attribute::Underlined))?;
                    }
                    if style.bold {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                    if style.reverse {
                        queue!(out, SetAttribute(Attribute::Reverse))?;
                    }
                    queue!(out, Print(s), SetAttribute(Attribute::Reset), ResetColor)?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}
