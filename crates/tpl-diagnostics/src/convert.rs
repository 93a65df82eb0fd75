// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversion from reporter entries to `Diagnostic`.

use tpl_ast::{ErrorKind, SourcePosition};

use crate::codes::code_for;
use crate::{hints, Diagnostic, ToDiagnostic};

impl ToDiagnostic for tpl_ast::Diagnostic {
    fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let width = token_width(source, self.pos);
        let mut diag = Diagnostic::error(self.kind.to_string())
            .with_code(code_for(&self.kind))
            .with_primary(self.pos, width, label_for(&self.kind))
            .with_kind(self.kind.clone());

        if let Some(note) = note_for(&self.kind) {
            diag = diag.with_note(note);
        }
        if let Some(hint) = hints::for_kind(&self.kind) {
            diag = diag.with_help(hint);
        }
        diag
    }
}

/// Convert every reporter entry, preserving order.
pub fn convert_all(diagnostics: &[tpl_ast::Diagnostic], source: &str) -> Vec<Diagnostic> {
    diagnostics.iter().map(|d| d.to_diagnostic(source)).collect()
}

fn label_for(kind: &ErrorKind) -> String {
    use ErrorKind::*;

    match kind {
        UnexpectedCharacter(_) => "unexpected character".into(),
        UnterminatedString => "string starts here".into(),
        UnterminatedComment => "comment starts here".into(),
        InvalidNumber(_) | InvalidEscape => "in this literal".into(),
        UnexpectedToken { expected, .. } => format!("expected {} here", expected),
        UndefinedIdentifier(_) => "not found in this scope".into(),
        Redeclaration(_) => "declared again here".into(),
        UnknownType(_) => "unknown type".into(),
        IncompatibleAssignment { dest, .. } => format!("expected '{}'", dest),
        IncompatibleArgument { expected, .. } => format!("expected '{}'", expected),
        ReturnTypeMismatch { expected, .. } => format!("expected '{}'", expected),
        ArityMismatch { expected, .. } => format!("expects {} argument(s)", expected),
        NonBoolCondition(found) => format!("this is '{}'", found),
        _ => "here".into(),
    }
}

fn note_for(kind: &ErrorKind) -> Option<String> {
    match kind {
        ErrorKind::MismatchedBinaryOperands { left, right, .. } => {
            Some(format!("neither '{}' nor '{}' widens to the other", left, right))
        }
        _ => None,
    }
}

/// Width of the token at `pos`, for underlining: a run of word characters,
/// a quoted string, or a single character.
pub fn token_width(source: &str, pos: SourcePosition) -> usize {
    let Some(rest) = source.get(pos.offset..) else {
        return 1;
    };
    let mut chars = rest.chars();
    match chars.next() {
        Some('"') => {
            let mut escaped = false;
            let mut width = 1;
            for c in chars {
                width += 1;
                match c {
                    '\n' => return width - 1,
                    '"' if !escaped => return width,
                    '\\' => escaped = !escaped,
                    _ => escaped = false,
                }
            }
            width
        }
        Some(c) if c.is_alphanumeric() || c == '_' => {
            rest.chars().take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.').count()
        }
        _ => 1,
    }
}
