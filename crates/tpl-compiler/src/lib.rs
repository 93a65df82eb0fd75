// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! One-call compilation of TPL source through the front end.
//!
//! [`compile`] scans, parses and (if parsing succeeded) type-checks a
//! source string inside a fresh [`Context`]. Each compilation owns its
//! context, so independent compilations can run on separate threads.

use tpl_ast::{AstDump, Context, Diagnostic, NodeId};
use tpl_lexer::Scanner;
use tpl_parser::{Parser, ParserConfig};
use tpl_sema::Sema;

/// Options for a single compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Stop parsing after this many syntax errors.
    pub max_errors: usize,
    /// Run semantic analysis after a clean parse. When false only the
    /// parser runs.
    pub check: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { max_errors: ParserConfig::default().max_errors, check: true }
    }
}

/// The outcome of compiling one source text.
#[derive(Debug)]
pub struct Compilation {
    pub context: Context,
    /// The `File` node, or `None` if parsing reported errors.
    pub root: Option<NodeId>,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        self.context.reporter().has_errors()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.context.reporter().diagnostics()
    }

    /// The indented tree dump, if there is a tree.
    pub fn dump(&self) -> Option<String> {
        self.root.map(|root| AstDump::dump(&self.context, root))
    }
}

/// Compile `source`. Problems are returned as diagnostics in the
/// compilation, never as a failure of this call.
pub fn compile(source: &str, options: &CompileOptions) -> Compilation {
    let mut context = Context::new();
    let config = ParserConfig { max_errors: options.max_errors, ..ParserConfig::default() };
    let root = Parser::with_config(Scanner::new(source), &mut context, config).parse();

    if context.reporter().has_errors() {
        log::debug!("parse failed with {} error(s); skipping sema", context.reporter().error_count());
        return Compilation { context, root: None };
    }

    if options.check {
        let failed = Sema::new(&mut context).run(root);
        log::debug!("sema done, errors: {}", failed);
    }
    Compilation { context, root: Some(root) }
}
