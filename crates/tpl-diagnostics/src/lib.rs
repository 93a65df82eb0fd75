// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! TPL compiler diagnostics.
//!
//! The front end records plain `(position, ErrorKind)` pairs. This crate
//! turns them into rich diagnostics with an error code, a labeled source
//! position and optional help, and renders those for a terminal or as
//! JSON. Compiler crates stay free of presentation concerns.

pub mod codes;
pub mod convert;
pub mod formatter;
pub mod hints;
pub mod json;

use serde::Serialize;
use tpl_ast::{ErrorKind, SourcePosition};

// ============================================================================
// Core Types
// ============================================================================

/// A compiler diagnostic with rich context for display.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Option<String>,
    /// The front-end error this was built from.
    pub kind: Option<ErrorKind>,
}

/// A labeled source position within a diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub pos: SourcePosition,
    /// Width of the underline in characters.
    pub width: usize,
    pub style: LabelStyle,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// Primary error location (red underline).
    Primary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

/// An error code like E0303.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorCode(pub String);

// ============================================================================
// Builder API
// ============================================================================

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: None,
            kind: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(ErrorCode(code.into()));
        self
    }

    pub fn with_label(mut self, pos: SourcePosition, width: usize, style: LabelStyle, msg: impl Into<String>) -> Self {
        self.labels.push(Label { pos, width: width.max(1), style, message: Some(msg.into()) });
        self
    }

    pub fn with_primary(self, pos: SourcePosition, width: usize, msg: impl Into<String>) -> Self {
        self.with_label(pos, width, LabelStyle::Primary, msg)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Returns the primary position (first primary label, or first label).
    pub fn primary_pos(&self) -> Option<SourcePosition> {
        self.labels
            .iter()
            .find(|l| l.style == LabelStyle::Primary)
            .or(self.labels.first())
            .map(|l| l.pos)
    }
}

// ============================================================================
// Conversion Trait
// ============================================================================

/// Convert a front-end error into a rich diagnostic. `source` is the text
/// the error was reported against, used to size labels.
pub trait ToDiagnostic {
    fn to_diagnostic(&self, source: &str) -> Diagnostic;
}
