// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the scanner.

use std::borrow::Cow;

use crate::SourcePosition;

/// A token produced by the scanner.
///
/// `text` is the literal spelling of the token. For string literals it is
/// the decoded contents (quotes removed, escapes applied), which only
/// allocates when the literal actually contains an escape.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub text: Cow<'s, str>,
    pub pos: SourcePosition,
}

impl<'s> Token<'s> {
    pub fn new(kind: TokenKind, text: impl Into<Cow<'s, str>>, pos: SourcePosition) -> Self {
        Self { kind, text: text.into(), pos }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// Reason the scanner produced an invalid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("invalid number literal")]
    InvalidNumber,
    #[error("invalid escape sequence")]
    InvalidEscape,
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Integer,
    Float,
    String,

    // Identifier
    Identifier,

    // Keywords
    And,
    Else,
    False,
    For,
    Fun,
    If,
    In,
    Map,
    Nil,
    Or,
    Return,
    Struct,
    True,
    Var,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Eq,
    EqEq,
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Arrow,
    Dot,
    At,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semi,

    // Special
    Eof,
    Invalid(LexErrorKind),
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Integer => "an integer",
            TokenKind::Float => "a number",
            TokenKind::String => "a string",
            TokenKind::Identifier => "a name",

            TokenKind::And => "'and'",
            TokenKind::Else => "'else'",
            TokenKind::False => "'false'",
            TokenKind::For => "'for'",
            TokenKind::Fun => "'fun'",
            TokenKind::If => "'if'",
            TokenKind::In => "'in'",
            TokenKind::Map => "'map'",
            TokenKind::Nil => "'nil'",
            TokenKind::Or => "'or'",
            TokenKind::Return => "'return'",
            TokenKind::Struct => "'struct'",
            TokenKind::True => "'true'",
            TokenKind::Var => "'var'",

            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::Bang => "'!'",
            TokenKind::Eq => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::Arrow => "'->'",
            TokenKind::Dot => "'.'",
            TokenKind::At => "'@'",

            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",

            TokenKind::Eof => "end of file",
            TokenKind::Invalid(_) => "an invalid token",
        }
    }

    /// Whether this token can start a statement inside a block.
    ///
    /// Used by the parser to find a synchronization point after an error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::If | TokenKind::For | TokenKind::Return | TokenKind::Var | TokenKind::LBrace
        )
    }

    /// Whether this token can start a top-level declaration.
    pub fn starts_declaration(&self) -> bool {
        matches!(self, TokenKind::Fun | TokenKind::Struct | TokenKind::Var)
    }
}
