// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Semantic analysis for the TPL execution language.
//!
//! [`Sema`] walks a parsed tree, binds names to declarations, resolves type
//! representations and annotates expressions with their types. Where a
//! value is implicitly widened it inserts an `ImplicitCastExpr`; no other
//! node is ever created or moved by this pass.

mod builtins;
mod check_decl;
mod check_expr;
mod check_stmt;
mod coerce;
mod resolve_type;
mod scope;
mod sema;

pub use coerce::widening_cast;
pub use scope::{ScopeKind, Scopes, Symbol, SymbolKind};
pub use sema::Sema;
