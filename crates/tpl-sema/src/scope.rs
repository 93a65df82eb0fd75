// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexical scopes for name resolution.

use std::collections::HashMap;

use tpl_ast::{SourcePosition, TypeId};

/// The kind of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top-level declarations.
    File,
    /// Function parameters.
    Function,
    /// Block scope (within a function).
    Block,
    /// Loop header bindings.
    Loop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Type,
}

/// A declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// `None` when the declaration itself failed to type; uses of the name
    /// are then skipped instead of reported again.
    pub ty: Option<TypeId>,
    pub pos: SourcePosition,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    bindings: HashMap<String, Symbol>,
}

/// Stack of scopes, innermost last.
#[derive(Debug, Default)]
pub struct Scopes {
    stack: Vec<Scope>,
}

impl Scopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.stack.push(Scope { kind, bindings: HashMap::new() });
    }

    pub fn pop(&mut self) {
        if let Some(scope) = self.stack.pop() {
            log::trace!("closed {:?} scope with {} binding(s)", scope.kind, scope.bindings.len());
        }
    }

    /// Bind `name` in the innermost scope. On a clash the existing symbol is
    /// kept and its position returned.
    pub fn declare(&mut self, name: &str, symbol: Symbol) -> Result<(), SourcePosition> {
        let Some(scope) = self.stack.last_mut() else {
            return Ok(());
        };
        if let Some(existing) = scope.bindings.get(name) {
            return Err(existing.pos);
        }
        scope.bindings.insert(name.to_string(), symbol);
        Ok(())
    }

    /// Look a name up, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.stack.iter().rev().find_map(|s| s.bindings.get(name))
    }
}
