// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compilation errors and the reporter that collects them.

use std::fmt::Write as _;

use crate::token::LexErrorKind;
use crate::SourcePosition;

/// Every problem the front end can report.
///
/// Payloads are pre-rendered strings (type names, token names) so a
/// diagnostic stays meaningful after the context that produced it is gone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    // Lexical
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(String),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("invalid escape sequence in string literal")]
    InvalidEscape,

    // Syntactic
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    // Semantic
    #[error("undefined identifier '{0}'")]
    UndefinedIdentifier(String),
    #[error("'{0}' is already declared in this scope")]
    Redeclaration(String),
    #[error("unknown type '{0}'")]
    UnknownType(String),
    #[error("mismatched types '{left}' and '{right}' for operator '{op}'")]
    MismatchedBinaryOperands { op: String, left: String, right: String },
    #[error("invalid operand type '{ty}' for operator '{op}'")]
    InvalidOperand { op: String, ty: String },
    #[error("cannot compare '{left}' with '{right}'")]
    IncomparableOperands { left: String, right: String },
    #[error("cannot assign a value of type '{src}' to a destination of type '{dest}'")]
    IncompatibleAssignment { dest: String, src: String },
    #[error("left-hand side of assignment is not assignable")]
    NotAssignable,
    #[error("'{0}' is not a function")]
    NotAFunction(String),
    #[error("function '{name}' expects {expected} argument(s), found {found}")]
    ArityMismatch { name: String, expected: usize, found: usize },
    #[error("argument {index} has type '{found}', expected '{expected}'")]
    IncompatibleArgument { index: usize, expected: String, found: String },
    #[error("type '{0}' cannot be indexed")]
    InvalidIndex(String),
    #[error("index must be an integer, found '{0}'")]
    NonIntegerIndex(String),
    #[error("type '{0}' has no members")]
    InvalidMemberAccess(String),
    #[error("type '{ty}' has no field '{field}'")]
    NoSuchField { ty: String, field: String },
    #[error("condition must be 'bool', found '{0}'")]
    NonBoolCondition(String),
    #[error("type '{0}' is not iterable")]
    NotIterable(String),
    #[error("cannot return '{found}' from a function returning '{expected}'")]
    ReturnTypeMismatch { expected: String, found: String },
    #[error("missing return value in function returning '{0}'")]
    MissingReturnValue(String),
    #[error("function returning 'nil' cannot return a value")]
    UnexpectedReturnValue,
    #[error("cannot infer the type of '{0}'")]
    CannotInferType(String),
    #[error("unknown builtin '@{0}'")]
    UnknownBuiltin(String),
}

/// Coarse classification of an [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCategory {
    Lexical,
    Syntactic,
    Semantic,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Lexical => write!(f, "Lexical"),
            ErrorCategory::Syntactic => write!(f, "Syntax"),
            ErrorCategory::Semantic => write!(f, "Semantic"),
        }
    }
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::UnexpectedCharacter(_)
            | ErrorKind::UnterminatedString
            | ErrorKind::UnterminatedComment
            | ErrorKind::InvalidNumber(_)
            | ErrorKind::InvalidEscape => ErrorCategory::Lexical,
            ErrorKind::UnexpectedToken { .. } => ErrorCategory::Syntactic,
            _ => ErrorCategory::Semantic,
        }
    }

    /// Lift a scanner failure into a reportable error. `text` is the
    /// offending source text.
    pub fn from_lex(kind: LexErrorKind, text: &str) -> Self {
        match kind {
            LexErrorKind::UnexpectedCharacter => ErrorKind::UnexpectedCharacter(text.to_string()),
            LexErrorKind::UnterminatedString => ErrorKind::UnterminatedString,
            LexErrorKind::UnterminatedComment => ErrorKind::UnterminatedComment,
            LexErrorKind::InvalidNumber => ErrorKind::InvalidNumber(text.to_string()),
            LexErrorKind::InvalidEscape => ErrorKind::InvalidEscape,
        }
    }
}

/// A reported error together with where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub pos: SourcePosition,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: error: {}", self.pos, self.kind)
    }
}

/// Ordered, append-only collection of diagnostics for one compilation.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, pos: SourcePosition, kind: ErrorKind) {
        log::trace!("report {}: {}", pos, kind);
        self.diagnostics.push(Diagnostic { kind, pos });
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// One `line:col: error: message` line per diagnostic, in report order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            let _ = writeln!(out, "{}", diag);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_preserves_order() {
        let mut reporter = ErrorReporter::new();
        assert!(!reporter.has_errors());

        reporter.report(SourcePosition::new(3, 1, 20), ErrorKind::UndefinedIdentifier("b".into()));
        reporter.report(SourcePosition::new(1, 5, 4), ErrorKind::UnterminatedString);

        assert!(reporter.has_errors());
        assert_eq!(reporter.error_count(), 2);
        assert_eq!(
            reporter.render(),
            "3:1: error: undefined identifier 'b'\n1:5: error: unterminated string literal\n"
        );
    }

    #[test]
    fn categories() {
        assert_eq!(ErrorKind::InvalidEscape.category(), ErrorCategory::Lexical);
        let syntax = ErrorKind::UnexpectedToken { expected: "')'".into(), found: "'}'".into() };
        assert_eq!(syntax.category(), ErrorCategory::Syntactic);
        assert_eq!(syntax.to_string(), "expected ')', found '}'");
        assert_eq!(ErrorKind::NotAssignable.category(), ErrorCategory::Semantic);
    }

    #[test]
    fn lex_errors_keep_offending_text() {
        let kind = ErrorKind::from_lex(LexErrorKind::UnexpectedCharacter, "$");
        assert_eq!(kind.to_string(), "unexpected character '$'");
    }
}
