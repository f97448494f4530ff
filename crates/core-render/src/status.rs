//! Status line composition.
//!
//! Format: `[MODE] <name>[*] Ln X, Col Y[ | op <symbol>][ | <message>]`
//! * `<name>` is the base file name or `[No Name]` for an unsaved worksheet.
//! * `*` appears only when the worksheet changed since it was opened/saved.
//!
//! Two stages: `compose_status` produces ordered segments and
//! `format_status` renders them, so callers can inspect or extend segments
//! without string surgery.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

/// What the editor is doing right now, as far as the status line cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMode {
    /// Free typing on the grid.
    Edit,
    /// A result row is accepting digits.
    Entry,
}

impl StatusMode {
    pub fn label(self) -> &'static str {
        match self {
            StatusMode::Edit => "EDIT",
            StatusMode::Entry => "RESULT",
        }
    }
}

pub struct StatusContext<'a> {
    pub mode: StatusMode,
    pub row: usize,
    pub col: usize,
    /// Operator symbol of the operation awaiting Enter, if any.
    pub pending_operator: Option<char>,
    pub file_name: Option<&'a Path>,
    pub dirty: bool,
    /// Short-lived feedback such as "saved" or "correct".
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Mode(&'static str),
    FileName(Cow<'a, str>),
    Position { line_1: usize, col_1: usize },
    PendingOperator(char),
    Message(&'a str),
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let name: Cow<'_, str> = match ctx.file_name.and_then(|p| p.file_name()).and_then(|s| s.to_str()) {
        Some(n) if ctx.dirty => format!(" {n}*").into(),
        Some(n) => format!(" {n}").into(),
        None if ctx.dirty => " [No Name]*".into(),
        None => " [No Name]".into(),
    };
    let mut out = Vec::with_capacity(5);
    out.push(StatusSegment::Mode(ctx.mode.label()));
    out.push(StatusSegment::FileName(name));
    out.push(StatusSegment::Position {
        line_1: ctx.row + 1,
        col_1: ctx.col + 1,
    });
    if let Some(op) = ctx.pending_operator {
        out.push(StatusSegment::PendingOperator(op));
    }
    if let Some(m) = ctx.message {
        out.push(StatusSegment::Message(m));
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(48);
    for seg in segments {
        match seg {
            StatusSegment::Mode(m) => {
                s.push('[');
                s.push_str(m);
                s.push(']');
            }
            StatusSegment::FileName(name) => s.push_str(name),
            StatusSegment::Position { line_1, col_1 } => {
                let _ = write!(s, " Ln {line_1}, Col {col_1}");
            }
            StatusSegment::PendingOperator(op) => {
                let _ = write!(s, " | op {op}");
            }
            StatusSegment::Message(m) => {
                s.push_str(" | ");
                s.push_str(m);
            }
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext) -> String {
    format_status(&compose_status(ctx))
}
