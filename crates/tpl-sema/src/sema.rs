// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The semantic analysis pass.

use tpl_ast::{Context, ErrorKind, NodeId, NodeKind, SourcePosition, TypeId, Visitor};

use crate::scope::Scopes;

/// Type checker over a parsed tree.
///
/// Resolves names and type representations, annotates every well-typed
/// expression with its type and inserts `ImplicitCastExpr` nodes where a
/// value is widened. All problems go to the context's reporter; the pass
/// never stops early.
pub struct Sema<'c> {
    pub(crate) ctx: &'c mut Context,
    pub(crate) scopes: Scopes,
    /// Return types of the enclosing function literals, innermost last.
    /// `None` when the signature did not resolve.
    pub(crate) returns: Vec<Option<TypeId>>,
}

impl<'c> Sema<'c> {
    pub fn new(ctx: &'c mut Context) -> Self {
        Self { ctx, scopes: Scopes::new(), returns: Vec::new() }
    }

    /// Check the tree rooted at `root`. Returns true if any error has been
    /// reported to the context, by this pass or an earlier one.
    pub fn run(mut self, root: NodeId) -> bool {
        let before = self.ctx.reporter().error_count();
        self.visit(root);
        let found = self.ctx.reporter().error_count() - before;
        log::debug!("sema finished with {} new error(s)", found);
        self.ctx.reporter().has_errors()
    }

    pub(crate) fn error(&mut self, pos: SourcePosition, kind: ErrorKind) {
        self.ctx.report(pos, kind);
    }

    pub(crate) fn error_at(&mut self, id: NodeId, kind: ErrorKind) {
        let pos = self.ctx.pos(id);
        self.ctx.report(pos, kind);
    }

    pub(crate) fn type_name(&self, ty: TypeId) -> String {
        self.ctx.type_name(ty)
    }

    /// Check an expression and return its type, if it has one.
    pub(crate) fn check_expr(&mut self, id: NodeId) -> Option<TypeId> {
        self.visit(id);
        self.ctx.ty(id)
    }

    /// How an expression is named in an error: identifiers by name, anything
    /// else by its type.
    pub(crate) fn describe(&self, id: NodeId) -> String {
        match self.ctx.kind(id) {
            NodeKind::IdentifierExpr { name } => name.clone(),
            _ => match self.ctx.ty(id) {
                Some(ty) => self.type_name(ty),
                None => self.ctx.kind(id).ast_kind().name().to_string(),
            },
        }
    }
}

impl Visitor for Sema<'_> {
    fn ctx(&self) -> &Context {
        &*self.ctx
    }

    // Declarations
    fn visit_file(&mut self, id: NodeId) {
        self.check_file(id);
    }

    fn visit_field_decl(&mut self, id: NodeId) {
        self.check_field_decl(id);
    }

    fn visit_function_decl(&mut self, id: NodeId) {
        self.check_function_decl(id);
    }

    fn visit_struct_decl(&mut self, _id: NodeId) {
        // Registered by the file pre-pass.
    }

    fn visit_variable_decl(&mut self, id: NodeId) {
        self.check_variable_decl(id);
    }

    // Statements
    fn visit_assignment_stmt(&mut self, id: NodeId) {
        self.check_assignment_stmt(id);
    }

    fn visit_block_stmt(&mut self, id: NodeId) {
        self.check_block_stmt(id);
    }

    fn visit_decl_stmt(&mut self, id: NodeId) {
        if let NodeKind::DeclStmt { decl } = *self.ctx.kind(id) {
            self.visit(decl);
        }
    }

    fn visit_expression_stmt(&mut self, id: NodeId) {
        if let NodeKind::ExpressionStmt { expr } = *self.ctx.kind(id) {
            self.check_expr(expr);
        }
    }

    fn visit_for_stmt(&mut self, id: NodeId) {
        self.check_for_stmt(id);
    }

    fn visit_for_in_stmt(&mut self, id: NodeId) {
        self.check_for_in_stmt(id);
    }

    fn visit_if_stmt(&mut self, id: NodeId) {
        self.check_if_stmt(id);
    }

    fn visit_return_stmt(&mut self, id: NodeId) {
        self.check_return_stmt(id);
    }

    // Expressions
    fn visit_binary_op_expr(&mut self, id: NodeId) {
        self.check_binary_op(id);
    }

    fn visit_call_expr(&mut self, id: NodeId) {
        self.check_call(id);
    }

    fn visit_comparison_op_expr(&mut self, id: NodeId) {
        self.check_comparison(id);
    }

    fn visit_function_lit_expr(&mut self, id: NodeId) {
        self.check_function_lit(id);
    }

    fn visit_identifier_expr(&mut self, id: NodeId) {
        self.check_identifier(id);
    }

    fn visit_implicit_cast_expr(&mut self, _id: NodeId) {
        // Only created by this pass, already typed.
    }

    fn visit_index_expr(&mut self, id: NodeId) {
        self.check_index(id);
    }

    fn visit_lit_expr(&mut self, id: NodeId) {
        self.check_literal(id);
    }

    fn visit_member_expr(&mut self, id: NodeId) {
        self.check_member(id);
    }

    fn visit_unary_op_expr(&mut self, id: NodeId) {
        self.check_unary_op(id);
    }

    // Type representations
    fn visit_array_type_repr(&mut self, id: NodeId) {
        self.resolve_type(id);
    }

    fn visit_function_type_repr(&mut self, id: NodeId) {
        self.resolve_type(id);
    }

    fn visit_map_type_repr(&mut self, id: NodeId) {
        self.resolve_type(id);
    }

    fn visit_pointer_type_repr(&mut self, id: NodeId) {
        self.resolve_type(id);
    }

    fn visit_struct_type_repr(&mut self, id: NodeId) {
        self.resolve_type(id);
    }
}
