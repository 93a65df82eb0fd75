// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The scanner implementation using logos.

use std::borrow::Cow;

use logos::Logos;
use tpl_ast::token::{LexErrorKind, Token, TokenKind};
use tpl_ast::LineMap;

/// Raw token type for logos. String contents are decoded in a second pass.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // === Keywords ===
    #[token("and")]
    And,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("fun")]
    Fun,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("map")]
    Map,
    #[token("nil")]
    Nil,
    #[token("or")]
    Or,
    #[token("return")]
    Return,
    #[token("struct")]
    Struct,
    #[token("true")]
    True,
    #[token("var")]
    Var,

    // === Operators (order matters - longer first) ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("->")]
    Arrow,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(".")]
    Dot,
    #[token("@")]
    At,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,

    // === Comments (skip them) ===
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // === Literals ===
    // Outranks `MalformedNumber` on exponents like `1.5e3`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", priority = 10)]
    Float,

    #[regex(r"[0-9]+", integer_fits)]
    Integer,

    // A number running straight into letters, e.g. `12abc`.
    #[regex(r"[0-9]+(\.[0-9]+)?[a-zA-Z_][a-zA-Z0-9_]*", |_| { Err::<(), _>(LexErrorKind::InvalidNumber) })]
    MalformedNumber,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    // Loses to the closed form by length whenever a closing quote exists.
    #[regex(r#""([^"\\\n]|\\.)*"#, |_| { Err::<(), _>(LexErrorKind::UnterminatedString) })]
    UnterminatedString,

    // === Identifier (must come after keywords) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
}

/// Skip a `/* ... */` comment. Comments do not nest.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> logos::FilterResult<(), LexErrorKind> {
    match lexer.remainder().find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            logos::FilterResult::Skip
        }
        None => {
            let rest = lexer.remainder().len();
            lexer.bump(rest);
            logos::FilterResult::Error(LexErrorKind::UnterminatedComment)
        }
    }
}

/// Integer literals must fit in 64 signed bits.
fn integer_fits(lexer: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    lexer
        .slice()
        .parse::<i64>()
        .map(|_| ())
        .map_err(|_| LexErrorKind::InvalidNumber)
}

/// A lazy token stream over a source buffer.
///
/// Scanning never fails: malformed input comes back as
/// [`TokenKind::Invalid`] and scanning resumes after it. Once the input is
/// exhausted, [`Scanner::next_token`] keeps returning `Eof`.
pub struct Scanner<'s> {
    source: &'s str,
    inner: logos::Lexer<'s, RawToken>,
    lines: LineMap,
}

impl<'s> Scanner<'s> {
    pub fn new(source: &'s str) -> Self {
        log::debug!("scanning {} bytes", source.len());
        Self {
            source,
            inner: RawToken::lexer(source),
            lines: LineMap::new(source),
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token<'s> {
        let Some(result) = self.inner.next() else {
            let pos = self.lines.position(self.source.len());
            return Token::new(TokenKind::Eof, "", pos);
        };

        let span = self.inner.span();
        let slice = self.inner.slice();
        let pos = self.lines.position(span.start);

        let kind = match result {
            Ok(RawToken::String) => {
                return match decode_string(&slice[1..slice.len() - 1]) {
                    Ok(text) => Token::new(TokenKind::String, text, pos),
                    Err(kind) => self.invalid(kind, slice, pos),
                };
            }
            Ok(raw) => convert_token(raw),
            Err(kind) => return self.invalid(kind, slice, pos),
        };

        Token::new(kind, slice, pos)
    }

    fn invalid(&self, kind: LexErrorKind, slice: &'s str, pos: tpl_ast::SourcePosition) -> Token<'s> {
        log::trace!("invalid token at {}: {}", pos, kind);
        Token::new(TokenKind::Invalid(kind), slice, pos)
    }
}

impl<'s> Iterator for Scanner<'s> {
    type Item = Token<'s>;

    /// Yields every token before `Eof`.
    fn next(&mut self) -> Option<Token<'s>> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

fn convert_token(raw: RawToken) -> TokenKind {
    match raw {
        // Keywords
        RawToken::And => TokenKind::And,
        RawToken::Else => TokenKind::Else,
        RawToken::False => TokenKind::False,
        RawToken::For => TokenKind::For,
        RawToken::Fun => TokenKind::Fun,
        RawToken::If => TokenKind::If,
        RawToken::In => TokenKind::In,
        RawToken::Map => TokenKind::Map,
        RawToken::Nil => TokenKind::Nil,
        RawToken::Or => TokenKind::Or,
        RawToken::Return => TokenKind::Return,
        RawToken::Struct => TokenKind::Struct,
        RawToken::True => TokenKind::True,
        RawToken::Var => TokenKind::Var,

        // Operators
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::BangEq => TokenKind::BangEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Dot => TokenKind::Dot,
        RawToken::At => TokenKind::At,

        // Delimiters
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semi => TokenKind::Semi,

        // Literals
        RawToken::Float => TokenKind::Float,
        RawToken::Integer => TokenKind::Integer,
        RawToken::String => TokenKind::String,
        RawToken::Identifier => TokenKind::Identifier,

        // Filtered out or turned into errors by their callbacks.
        RawToken::LineComment
        | RawToken::BlockComment
        | RawToken::MalformedNumber
        | RawToken::UnterminatedString => TokenKind::Invalid(LexErrorKind::UnexpectedCharacter),
    }
}

/// The source spelling, quotes included, of the string literal that starts
/// at byte `offset`. Falls back to the rest of the line if it never closes.
pub fn string_spelling(source: &str, offset: usize) -> &str {
    let Some(rest) = source.get(offset..) else {
        return "";
    };
    let mut escaped = false;
    for (i, c) in rest.char_indices().skip(1) {
        match c {
            '"' if !escaped => return &rest[..=i],
            '\\' if !escaped => escaped = true,
            '\n' => break,
            _ => escaped = false,
        }
    }
    rest.lines().next().unwrap_or(rest)
}

/// Decode the body of a string literal. Borrows when there is nothing to
/// unescape.
fn decode_string(body: &str) -> Result<Cow<'_, str>, LexErrorKind> {
    if !body.contains('\\') {
        return Ok(Cow::Borrowed(body));
    }

    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            result.push(parse_escape(&mut chars)?);
        } else {
            result.push(c);
        }
    }
    Ok(Cow::Owned(result))
}

fn parse_escape(chars: &mut impl Iterator<Item = char>) -> Result<char, LexErrorKind> {
    match chars.next() {
        Some('n') => Ok('\n'),
        Some('r') => Ok('\r'),
        Some('t') => Ok('\t'),
        Some('\\') => Ok('\\'),
        Some('0') => Ok('\0'),
        Some('"') => Ok('"'),
        _ => Err(LexErrorKind::InvalidEscape),
    }
}
