// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statically dispatched AST traversal.
//!
//! A pass implements [`Visitor`] and overrides only the hooks it cares
//! about; every other hook walks the node's children in program order.
//! Dispatch is a single exhaustive `match` on [`AstKind`], generated from the
//! same kind list as the node model, so a new kind cannot be forgotten.

use std::collections::BTreeMap;

use crate::context::Context;
use crate::node::{AstKind, NodeId};

macro_rules! declare_visitor {
    ($($kind:ident => $visit:ident),* $(,)?) => {
        /// A pass over the tree owned by a [`Context`].
        ///
        /// The tree is reached through [`Visitor::ctx`], so an implementor may
        /// hold either `&Context` or `&mut Context`.
        pub trait Visitor: Sized {
            fn ctx(&self) -> &Context;

            /// Entry point for a node. Override to run code around every node.
            fn visit(&mut self, id: NodeId) {
                dispatch(self, id);
            }

            $(
                #[doc = concat!("Called for each `", stringify!($kind), "` node.")]
                fn $visit(&mut self, id: NodeId) {
                    walk_children(self, id);
                }
            )*
        }

        /// Route `id` to the hook for its kind.
        pub fn dispatch<V: Visitor>(visitor: &mut V, id: NodeId) {
            match visitor.ctx().kind(id).ast_kind() {
                $(AstKind::$kind => visitor.$visit(id),)*
            }
        }
    };
}

for_each_ast_kind!(declare_visitor);

/// Visit every child of `id`, in program order.
pub fn walk_children<V: Visitor>(visitor: &mut V, id: NodeId) {
    let children = visitor.ctx().kind(id).children();
    for child in children {
        visitor.visit(child);
    }
}

/// Counts how many nodes of each kind a tree contains.
pub struct KindCounter<'c> {
    ctx: &'c Context,
    counts: BTreeMap<&'static str, usize>,
}

impl<'c> KindCounter<'c> {
    pub fn new(ctx: &'c Context) -> Self {
        Self { ctx, counts: BTreeMap::new() }
    }

    /// Kind name to occurrence count for the tree rooted at `root`.
    pub fn count(ctx: &'c Context, root: NodeId) -> BTreeMap<&'static str, usize> {
        let mut counter = Self::new(ctx);
        counter.visit(root);
        counter.counts
    }
}

impl Visitor for KindCounter<'_> {
    fn ctx(&self) -> &Context {
        self.ctx
    }

    fn visit(&mut self, id: NodeId) {
        let name = self.ctx.kind(id).ast_kind().name();
        *self.counts.entry(name).or_insert(0) += 1;
        dispatch(self, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BinaryOp, Literal};
    use crate::SourcePosition;

    /// `fun f() -> int32 { return a + 1 }`
    fn build(ctx: &mut Context) -> NodeId {
        let p = SourcePosition::default();
        let ret_ty = ctx.new_identifier_expr(p, "int32");
        let fn_ty = ctx.new_function_type_repr(p, vec![], ret_ty);
        let a = ctx.new_identifier_expr(p, "a");
        let one = ctx.new_lit_expr(p, Literal::Int { value: 1, text: "1".into() });
        let sum = ctx.new_binary_op_expr(p, BinaryOp::Add, a, one);
        let ret = ctx.new_return_stmt(p, Some(sum));
        let body = ctx.new_block_stmt(p, vec![ret]);
        let lit = ctx.new_function_lit_expr(p, fn_ty, body);
        let decl = ctx.new_function_decl(p, "f", lit);
        ctx.new_file(p, vec![decl])
    }

    struct Names<'c> {
        ctx: &'c Context,
        seen: Vec<String>,
    }

    impl Visitor for Names<'_> {
        fn ctx(&self) -> &Context {
            self.ctx
        }

        fn visit_identifier_expr(&mut self, id: NodeId) {
            if let crate::NodeKind::IdentifierExpr { name } = self.ctx.kind(id) {
                self.seen.push(name.clone());
            }
        }
    }

    #[test]
    fn counts_every_kind() {
        let mut ctx = Context::new();
        let root = build(&mut ctx);
        let counts = KindCounter::count(&ctx, root);

        assert_eq!(counts["File"], 1);
        assert_eq!(counts["FunctionDecl"], 1);
        assert_eq!(counts["IdentifierExpr"], 2);
        assert_eq!(counts["BinaryOpExpr"], 1);
        assert_eq!(counts.values().sum::<usize>(), ctx.node_count());
    }

    #[test]
    fn overridden_hook_sees_nodes_in_program_order() {
        let mut ctx = Context::new();
        let root = build(&mut ctx);
        let mut names = Names { ctx: &ctx, seen: Vec::new() };
        names.visit(root);
        assert_eq!(names.seen, vec!["int32", "a"]);
    }
}
