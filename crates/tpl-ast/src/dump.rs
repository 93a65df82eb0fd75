// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Human-readable tree dump.
//!
//! ```text
//! File <1:1>
//!   FunctionDecl <1:1> main
//!     FunctionLitExpr <1:9>
//! ```

use std::fmt::Write as _;

use crate::context::Context;
use crate::node::{CallKind, NodeId, NodeKind};
use crate::visit::{dispatch, Visitor};

const INDENT: &str = "  ";

/// Renders a tree as one line per node, children indented under parents.
pub struct AstDump<'c> {
    ctx: &'c Context,
    out: String,
    depth: usize,
}

impl<'c> AstDump<'c> {
    /// Dump the tree rooted at `root`.
    pub fn dump(ctx: &'c Context, root: NodeId) -> String {
        let mut dumper = AstDump { ctx, out: String::new(), depth: 0 };
        dumper.visit(root);
        dumper.out
    }

    fn write_line(&mut self, id: NodeId) {
        let ctx = self.ctx;
        let node = ctx.node(id);
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        let _ = write!(self.out, "{} <{}>", node.kind.ast_kind(), node.pos);

        match &node.kind {
            NodeKind::FieldDecl { name, .. }
            | NodeKind::FunctionDecl { name, .. }
            | NodeKind::StructDecl { name, .. }
            | NodeKind::VariableDecl { name, .. }
            | NodeKind::IdentifierExpr { name } => {
                let _ = write!(self.out, " {}", name);
            }
            NodeKind::BinaryOpExpr { op, .. } => {
                let _ = write!(self.out, " {}", op.symbol());
            }
            NodeKind::ComparisonOpExpr { op, .. } => {
                let _ = write!(self.out, " {}", op.symbol());
            }
            NodeKind::UnaryOpExpr { op, .. } => {
                let _ = write!(self.out, " {}", op.symbol());
            }
            NodeKind::CallExpr { call_kind: CallKind::Builtin, .. } => {
                self.out.push_str(" builtin");
            }
            NodeKind::ImplicitCastExpr { cast, .. } => {
                let _ = write!(self.out, " {}", cast.name());
            }
            NodeKind::LitExpr { lit } => {
                let _ = write!(self.out, " {}", lit);
            }
            _ => {}
        }

        if let Some(ty) = node.ty {
            let _ = write!(self.out, " : {}", ctx.types().display(ty));
        }
        self.out.push('\n');
    }
}

impl Visitor for AstDump<'_> {
    fn ctx(&self) -> &Context {
        self.ctx
    }

    fn visit(&mut self, id: NodeId) {
        self.write_line(id);
        self.depth += 1;
        dispatch(self, id);
        self.depth -= 1;
    }
}
