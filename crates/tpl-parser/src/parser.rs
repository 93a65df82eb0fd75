// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation: recursive descent for statements and
//! declarations, binding-power climbing for expressions.

use std::collections::VecDeque;

use tpl_ast::node::{BinaryOp, CallKind, CompareOp, Literal, UnaryOp};
use tpl_ast::token::{Token, TokenKind};
use tpl_ast::{Context, ErrorKind, NodeId, SourcePosition};
use tpl_lexer::{string_spelling, Scanner};

/// Parser settings.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    /// Stop once this many errors (lexical or syntactic) have been reported.
    pub max_errors: usize,
    /// Deepest allowed nesting of expressions, blocks and types.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_errors: 20, max_depth: 128 }
    }
}

/// The parser for TPL source code.
///
/// Nodes are created in the borrowed [`Context`]; errors go to its reporter.
pub struct Parser<'s, 'c> {
    scanner: Scanner<'s>,
    /// Tokens pulled from the scanner but not consumed yet.
    lookahead: VecDeque<Token<'s>>,
    ctx: &'c mut Context,
    config: ParserConfig,
    /// Errors reported by this parser
    errors: usize,
    /// Set once the error cap is hit; the token stream then reads as `Eof`.
    halted: bool,
    /// Current nesting level, bounded by `config.max_depth`.
    depth: usize,
    last_pos: SourcePosition,
}

impl<'s, 'c> Parser<'s, 'c> {
    pub fn new(scanner: Scanner<'s>, ctx: &'c mut Context) -> Self {
        Self::with_config(scanner, ctx, ParserConfig::default())
    }

    pub fn with_config(scanner: Scanner<'s>, ctx: &'c mut Context, config: ParserConfig) -> Self {
        Self {
            scanner,
            lookahead: VecDeque::new(),
            ctx,
            config,
            errors: 0,
            halted: false,
            depth: 0,
            last_pos: SourcePosition::new(1, 1, 0),
        }
    }

    /// Parse a whole file and return the `File` node.
    ///
    /// Always produces a root. If the context's reporter is non-empty
    /// afterwards, the tree is unreliable.
    pub fn parse(&mut self) -> NodeId {
        let start = self.current_pos();
        let mut decls = Vec::new();

        while !self.at_end() {
            if self.match_token(TokenKind::Semi) {
                continue;
            }
            match self.parse_decl() {
                Ok(decl) => decls.push(decl),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize();
                }
            }
        }

        let root = self.ctx.new_file(start, decls);
        log::debug!(
            "parsed {} node(s) with {} error(s)",
            self.ctx.node_count(),
            self.errors
        );
        root
    }

    // =========================================================================
    // Error Handling
    // =========================================================================

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        let kind = ErrorKind::UnexpectedToken { expected: error.expected, found: error.found };
        self.report(error.pos, kind)
    }

    fn report(&mut self, pos: SourcePosition, kind: ErrorKind) -> bool {
        if self.halted {
            return false;
        }
        self.ctx.report(pos, kind);
        self.errors += 1;
        if self.errors >= self.config.max_errors {
            log::debug!("error limit of {} reached, stopping", self.config.max_errors);
            self.halted = true;
            self.lookahead.clear();
            self.lookahead.push_back(Token::new(TokenKind::Eof, "", pos));
            return false;
        }
        true
    }

    /// Skip to next declaration after error.
    fn synchronize(&mut self) {
        let mut brace_depth = 0;

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace => {
                    brace_depth += 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    self.advance();
                    if brace_depth > 0 {
                        brace_depth -= 1;
                        if brace_depth == 0 {
                            return;
                        }
                    }
                }
                kind if kind.starts_declaration() && brace_depth == 0 => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Synchronize within a block - skip to the next statement boundary.
    /// Newlines are not tokens, so a token on a later line than the error
    /// also counts as a boundary.
    fn synchronize_in_block(&mut self) {
        let line = self.current_pos().line.max(self.last_pos.line);
        while !self.at_end() {
            if self.current_pos().line > line {
                return;
            }
            match self.current_kind() {
                TokenKind::RBrace => return,
                TokenKind::Semi => {
                    self.advance();
                    return;
                }
                kind if kind.starts_statement() => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Run `parse` one nesting level deeper. Past `max_depth` the nested
    /// construct is skipped and reported instead of recursing further.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, ParseError>) -> Result<T, ParseError> {
        let max = self.config.max_depth;
        if self.depth >= max {
            let error = self.error_expected(&format!("at most {} levels of nesting", max));
            self.skip_balanced();
            return Err(error);
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// If the current token opens a bracket, skip through its partner.
    fn skip_balanced(&mut self) {
        let mut open = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => open += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace if open > 0 => open -= 1,
                _ if open == 0 => return,
                _ => {}
            }
            self.advance();
            if open == 0 {
                return;
            }
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    /// Make sure at least `n + 1` tokens are buffered. Invalid tokens are
    /// reported as lexical errors and never reach the grammar.
    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n && !self.halted {
            let token = self.scanner.next_token();
            if let TokenKind::Invalid(kind) = token.kind {
                let error = ErrorKind::from_lex(kind, &token.text);
                self.report(token.pos, error);
                continue;
            }
            self.lookahead.push_back(token);
        }
    }

    fn peek(&mut self, n: usize) -> TokenKind {
        self.fill(n);
        self.lookahead.get(n).map_or(TokenKind::Eof, |t| t.kind)
    }

    fn current_kind(&mut self) -> TokenKind {
        self.peek(0)
    }

    fn current_pos(&mut self) -> SourcePosition {
        self.fill(0);
        self.lookahead.front().map_or(self.last_pos, |t| t.pos)
    }

    fn at_end(&mut self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Consume the current token. `Eof` is never consumed.
    fn advance(&mut self) -> Token<'s> {
        if self.at_end() {
            return self.lookahead.front().cloned().unwrap_or_else(|| self.eof());
        }
        match self.lookahead.pop_front() {
            Some(token) => {
                self.last_pos = token.pos;
                token
            }
            None => self.eof(),
        }
    }

    fn eof(&self) -> Token<'s> {
        Token::new(TokenKind::Eof, "", self.last_pos)
    }

    fn check(&mut self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'s>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(kind.display_name()))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, SourcePosition), ParseError> {
        let token = self.expect_kind(TokenKind::Identifier, "a name")?;
        Ok((token.text.into_owned(), token.pos))
    }

    fn expect_kind(&mut self, kind: TokenKind, expected: &str) -> Result<Token<'s>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_expected(expected))
        }
    }

    /// An "expected X, found <current token>" error.
    fn error_expected(&mut self, expected: &str) -> ParseError {
        self.fill(0);
        match self.lookahead.front() {
            Some(token) => ParseError::expected(expected, token),
            None => ParseError::expected(expected, &self.eof()),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_decl(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::Fun => self.parse_function_decl(),
            TokenKind::Struct => self.parse_struct_decl(),
            TokenKind::Var => self.parse_variable_decl(),
            _ => Err(self.error_expected("a declaration ('fun', 'struct' or 'var')")),
        }
    }

    /// `fun name (params) -> ret { body }`
    fn parse_function_decl(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.expect(TokenKind::Fun)?.pos;
        let (name, _) = self.expect_ident()?;
        let func = self.parse_function_lit()?;
        Ok(self.ctx.new_function_decl(pos, name, func))
    }

    /// `struct name { fields }`
    fn parse_struct_decl(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.expect(TokenKind::Struct)?.pos;
        let (name, _) = self.expect_ident()?;
        let type_repr = self.parse_struct_fields(None)?;
        Ok(self.ctx.new_struct_decl(pos, name, type_repr))
    }

    /// `var name [: type] [= init]`
    fn parse_variable_decl(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.expect(TokenKind::Var)?.pos;
        let (name, _) = self.expect_ident()?;

        let type_repr = if self.match_token(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.match_token(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(self.ctx.new_variable_decl(pos, name, type_repr, init))
    }

    /// `name: type`, used for parameters and struct fields.
    fn parse_field_decl(&mut self) -> Result<NodeId, ParseError> {
        let (name, pos) = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let type_repr = self.parse_type()?;
        Ok(self.ctx.new_field_decl(pos, name, type_repr))
    }

    /// `{ name: type [, | ;] ... }`. The repr is positioned at `struct` when
    /// it is written inline as a type, otherwise at the opening brace.
    fn parse_struct_fields(&mut self, pos: Option<SourcePosition>) -> Result<NodeId, ParseError> {
        let brace = self.expect(TokenKind::LBrace)?.pos;
        let mut fields = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.at_end() {
            fields.push(self.parse_field_decl()?);
            if !self.match_token(TokenKind::Comma) {
                self.match_token(TokenKind::Semi);
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(self.ctx.new_struct_type_repr(pos.unwrap_or(brace), fields))
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// `(params) -> ret { body }`
    fn parse_function_lit(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.current_pos();
        let type_repr = self.parse_function_type()?;
        let body = self.parse_block()?;
        Ok(self.ctx.new_function_lit_expr(pos, type_repr, body))
    }

    /// `(params) -> ret`
    fn parse_function_type(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.expect(TokenKind::LParen)?.pos;
        let mut params = Vec::new();

        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.parse_field_decl()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Arrow)?;
        let ret = self.parse_type()?;
        Ok(self.ctx.new_function_type_repr(pos, params, ret))
    }

    /// At a `(`, decide between a function literal and a parenthesized
    /// expression. `()` and `(name:` can only start a parameter list.
    fn at_function_lit(&mut self) -> bool {
        self.check(TokenKind::LParen)
            && (self.peek(1) == TokenKind::RParen
                || (self.peek(1) == TokenKind::Identifier && self.peek(2) == TokenKind::Colon))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// `{ stmts }`
    fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        self.nested(Self::parse_block_inner)
    }

    fn parse_block_inner(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.expect(TokenKind::LBrace)?.pos;
        let mut stmts = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.at_end() {
            if self.match_token(TokenKind::Semi) {
                continue;
            }
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    // Record error but stay within the block
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize_in_block();
                }
            }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(self.ctx.new_block_stmt(pos, stmts))
    }

    fn parse_stmt(&mut self) -> Result<NodeId, ParseError> {
        match self.current_kind() {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Var => self.parse_decl_stmt(),
            _ => self.parse_simple_stmt(),
        }
    }

    fn parse_decl_stmt(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.current_pos();
        let decl = self.parse_variable_decl()?;
        Ok(self.ctx.new_decl_stmt(pos, decl))
    }

    /// `expr` or `dest = src`
    fn parse_simple_stmt(&mut self) -> Result<NodeId, ParseError> {
        let expr = self.parse_expr()?;
        self.finish_simple_stmt(expr)
    }

    fn finish_simple_stmt(&mut self, expr: NodeId) -> Result<NodeId, ParseError> {
        let pos = self.ctx.pos(expr);
        if self.match_token(TokenKind::Eq) {
            let src = self.parse_expr()?;
            Ok(self.ctx.new_assignment_stmt(pos, expr, src))
        } else {
            Ok(self.ctx.new_expression_stmt(pos, expr))
        }
    }

    /// `if (cond) { ... } [else if ... | else { ... }]`
    fn parse_if_stmt(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.expect(TokenKind::If)?.pos;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_stmt = self.parse_block()?;

        let else_stmt = if self.match_token(TokenKind::Else) {
            if self.check(TokenKind::If) {
                Some(self.parse_if_stmt()?)
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        Ok(self.ctx.new_if_stmt(pos, cond, then_stmt, else_stmt))
    }

    /// The four loop forms:
    /// `for () {}`, `for (cond) {}`, `for (init; cond; next) {}` and
    /// `for (x in iter) {}`.
    fn parse_for_stmt(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.expect(TokenKind::For)?.pos;
        self.expect(TokenKind::LParen)?;

        // for () {}
        if self.match_token(TokenKind::RParen) {
            let body = self.parse_block()?;
            return Ok(self.ctx.new_for_stmt(pos, None, None, None, body));
        }

        // for (x in iter) {}
        if self.check(TokenKind::Identifier) && self.peek(1) == TokenKind::In {
            let (name, name_pos) = self.expect_ident()?;
            let target = self.ctx.new_identifier_expr(name_pos, name);
            self.expect(TokenKind::In)?;
            let iter = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_block()?;
            return Ok(self.ctx.new_for_in_stmt(pos, target, iter, body));
        }

        // for (cond) {} or the head of a three-part loop
        let init = match self.current_kind() {
            TokenKind::Semi => None,
            TokenKind::Var => Some(self.parse_decl_stmt()?),
            _ => {
                let expr = self.parse_expr()?;
                if self.match_token(TokenKind::RParen) {
                    let body = self.parse_block()?;
                    return Ok(self.ctx.new_for_stmt(pos, None, Some(expr), None, body));
                }
                Some(self.finish_simple_stmt(expr)?)
            }
        };
        self.expect(TokenKind::Semi)?;

        let cond = if self.check(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semi)?;

        let next = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_simple_stmt()?)
        };
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        Ok(self.ctx.new_for_stmt(pos, init, cond, next, body))
    }

    /// `return [expr]`. A value is parsed unless the statement visibly ends.
    fn parse_return_stmt(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.expect(TokenKind::Return)?.pos;
        let ret = match self.current_kind() {
            TokenKind::RBrace | TokenKind::Semi | TokenKind::Eof => None,
            _ => Some(self.parse_expr()?),
        };
        Ok(self.ctx.new_return_stmt(pos, ret))
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type(&mut self) -> Result<NodeId, ParseError> {
        self.nested(Self::parse_type_inner)
    }

    fn parse_type_inner(&mut self) -> Result<NodeId, ParseError> {
        let pos = self.current_pos();
        match self.current_kind() {
            TokenKind::Identifier => {
                let (name, pos) = self.expect_ident()?;
                Ok(self.ctx.new_identifier_expr(pos, name))
            }
            // `nil` is a keyword but also names the empty type.
            TokenKind::Nil => {
                self.advance();
                Ok(self.ctx.new_identifier_expr(pos, "nil"))
            }
            // *T
            TokenKind::Star => {
                self.advance();
                let base = self.parse_type()?;
                Ok(self.ctx.new_pointer_type_repr(pos, base))
            }
            // [N]T or [*]T
            TokenKind::LBracket => {
                self.advance();
                let len = match self.current_kind() {
                    TokenKind::Star => {
                        self.advance();
                        None
                    }
                    TokenKind::Integer => Some(self.parse_primary()?),
                    _ => return Err(self.error_expected("an array length or '*'")),
                };
                self.expect(TokenKind::RBracket)?;
                let elem = self.parse_type()?;
                Ok(self.ctx.new_array_type_repr(pos, len, elem))
            }
            // map[K]V
            TokenKind::Map => {
                self.advance();
                self.expect(TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.parse_type()?;
                Ok(self.ctx.new_map_type_repr(pos, key, value))
            }
            TokenKind::LParen => self.parse_function_type(),
            TokenKind::Struct => {
                self.advance();
                self.parse_struct_fields(Some(pos))
            }
            _ => Err(self.error_expected("a type")),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        self.nested(|p| p.parse_infix(min_bp))
    }

    fn parse_infix(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_unary()?;

        loop {
            let kind = self.current_kind();
            let Some((l_bp, r_bp)) = infix_bp(kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(r_bp)?;
            let pos = self.ctx.pos(lhs);

            lhs = match infix_op(kind) {
                Some(Infix::Compare(op)) => self.ctx.new_comparison_op_expr(pos, op, lhs, rhs),
                Some(Infix::Binary(op)) => self.ctx.new_binary_op_expr(pos, op, lhs, rhs),
                None => break,
            };
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Amp => UnaryOp::AddrOf,
            TokenKind::Star => UnaryOp::Deref,
            _ => return self.parse_postfix(),
        };
        let pos = self.advance().pos;
        let expr = self.nested(Self::parse_unary)?;
        Ok(self.ctx.new_unary_op_expr(pos, op, expr))
    }

    /// Calls, indexing and member access.
    fn parse_postfix(&mut self) -> Result<NodeId, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let pos = self.ctx.pos(expr);
            match self.current_kind() {
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    expr = self.ctx.new_call_expr(pos, expr, args, CallKind::Regular);
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = self.ctx.new_index_expr(pos, expr, index);
                }
                TokenKind::Dot => {
                    self.advance();
                    let (name, name_pos) = self.expect_ident()?;
                    let member = self.ctx.new_identifier_expr(name_pos, name);
                    expr = self.ctx.new_member_expr(pos, expr, member);
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// `( [expr {, expr}] )`
    fn parse_args(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();

        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        if self.at_function_lit() {
            return self.parse_function_lit();
        }

        let pos = self.current_pos();
        let lit = match self.current_kind() {
            TokenKind::Identifier => {
                let (name, pos) = self.expect_ident()?;
                return Ok(self.ctx.new_identifier_expr(pos, name));
            }
            TokenKind::Integer => {
                let token = self.advance();
                let value = token
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParseError::expected("an integer", &token))?;
                Literal::Int { value, text: token.text.into_owned() }
            }
            TokenKind::Float => {
                let token = self.advance();
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| ParseError::expected("a number", &token))?;
                Literal::Float { value, text: token.text.into_owned() }
            }
            TokenKind::String => {
                let token = self.advance();
                let text = string_spelling(self.scanner.source(), token.pos.offset).to_string();
                Literal::String { value: token.text.into_owned(), text }
            }
            TokenKind::True => {
                self.advance();
                Literal::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                Literal::Bool(false)
            }
            TokenKind::Nil => {
                self.advance();
                Literal::Nil
            }
            // (expr) builds no node of its own
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                return Ok(expr);
            }
            // @builtin(args)
            TokenKind::At => {
                self.advance();
                let (name, name_pos) = self.expect_ident()?;
                let callee = self.ctx.new_identifier_expr(name_pos, name);
                let args = self.parse_args()?;
                return Ok(self.ctx.new_call_expr(pos, callee, args, CallKind::Builtin));
            }
            _ => return Err(self.error_expected("an expression")),
        };

        Ok(self.ctx.new_lit_expr(pos, lit))
    }
}

enum Infix {
    Binary(BinaryOp),
    Compare(CompareOp),
}

/// Binding powers, loosest first:
/// `or` < `and` < comparisons < `|` < `^` < `&` < `+ -` < `* / %`.
fn infix_bp(kind: TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Or => Some((1, 2)),
        TokenKind::And => Some((3, 4)),
        TokenKind::EqEq
        | TokenKind::BangEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some((5, 6)),
        TokenKind::Pipe => Some((7, 8)),
        TokenKind::Caret => Some((9, 10)),
        TokenKind::Amp => Some((11, 12)),
        TokenKind::Plus | TokenKind::Minus => Some((13, 14)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((15, 16)),
        _ => None,
    }
}

fn infix_op(kind: TokenKind) -> Option<Infix> {
    let op = match kind {
        TokenKind::Plus => Infix::Binary(BinaryOp::Add),
        TokenKind::Minus => Infix::Binary(BinaryOp::Sub),
        TokenKind::Star => Infix::Binary(BinaryOp::Mul),
        TokenKind::Slash => Infix::Binary(BinaryOp::Div),
        TokenKind::Percent => Infix::Binary(BinaryOp::Mod),
        TokenKind::Amp => Infix::Binary(BinaryOp::BitAnd),
        TokenKind::Pipe => Infix::Binary(BinaryOp::BitOr),
        TokenKind::Caret => Infix::Binary(BinaryOp::BitXor),
        TokenKind::And => Infix::Binary(BinaryOp::And),
        TokenKind::Or => Infix::Binary(BinaryOp::Or),
        TokenKind::EqEq => Infix::Compare(CompareOp::Eq),
        TokenKind::BangEq => Infix::Compare(CompareOp::Ne),
        TokenKind::Lt => Infix::Compare(CompareOp::Lt),
        TokenKind::LtEq => Infix::Compare(CompareOp::Le),
        TokenKind::Gt => Infix::Compare(CompareOp::Gt),
        TokenKind::GtEq => Infix::Compare(CompareOp::Ge),
        _ => return None,
    };
    Some(op)
}

/// A syntax error, before it is handed to the reporter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub pos: SourcePosition,
}

impl ParseError {
    fn expected(expected: &str, found: &Token<'_>) -> Self {
        Self {
            expected: expected.to_string(),
            found: describe_token(found),
            pos: found.pos,
        }
    }
}

/// Name a token for an error message. Names and literals are quoted as
/// written; everything else uses the kind's display name.
fn describe_token(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::Identifier | TokenKind::Integer | TokenKind::Float => {
            format!("'{}'", token.text)
        }
        TokenKind::String => format!("{:?}", token.text),
        kind => kind.display_name().to_string(),
    }
}
