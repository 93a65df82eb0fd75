// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The per-compilation context: node arena, type table and error reporter.

use crate::error::{ErrorKind, ErrorReporter};
use crate::node::{
    BinaryOp, CallKind, CastKind, CompareOp, Literal, Node, NodeId, NodeKind, UnaryOp,
};
use crate::types::{TypeId, TypeTable};
use crate::SourcePosition;

/// Owns every node and type created during one compilation.
///
/// Nodes are only created through the `new_*` factory methods and are never
/// removed; dropping the context frees the whole tree at once.
#[derive(Debug, Default)]
pub struct Context {
    nodes: Vec<Node>,
    types: TypeTable,
    reporter: ErrorReporter,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, pos: SourcePosition, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, pos, ty: None });
        id
    }

    // ------------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------------

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn pos(&self, id: NodeId) -> SourcePosition {
        self.node(id).pos
    }

    pub fn ty(&self, id: NodeId) -> Option<TypeId> {
        self.node(id).ty
    }

    pub fn set_ty(&mut self, id: NodeId, ty: TypeId) {
        self.nodes[id.index()].ty = Some(ty);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    pub fn report(&mut self, pos: SourcePosition, kind: ErrorKind) {
        self.reporter.report(pos, kind);
    }

    /// Display name of a type, for error payloads.
    pub fn type_name(&self, ty: TypeId) -> String {
        self.types.display(ty).to_string()
    }

    /// Wrap the expression at `id` in an implicit cast to `ty`.
    ///
    /// The original expression moves to a fresh slot and `id` becomes the
    /// cast, so whichever parent referenced `id` now references the cast.
    /// Returns the id the original expression moved to.
    pub fn wrap_in_implicit_cast(&mut self, id: NodeId, cast: CastKind, ty: TypeId) -> NodeId {
        let original = self.nodes[id.index()].clone();
        let pos = original.pos;
        let moved = NodeId(self.nodes.len() as u32);
        self.nodes.push(original);
        self.nodes[id.index()] = Node {
            kind: NodeKind::ImplicitCastExpr { cast, input: moved },
            pos,
            ty: Some(ty),
        };
        moved
    }

    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------

    pub fn new_file(&mut self, pos: SourcePosition, decls: Vec<NodeId>) -> NodeId {
        self.alloc(pos, NodeKind::File { decls })
    }

    pub fn new_field_decl(
        &mut self,
        pos: SourcePosition,
        name: impl Into<String>,
        type_repr: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::FieldDecl { name: name.into(), type_repr })
    }

    pub fn new_function_decl(
        &mut self,
        pos: SourcePosition,
        name: impl Into<String>,
        func: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::FunctionDecl { name: name.into(), func })
    }

    pub fn new_struct_decl(
        &mut self,
        pos: SourcePosition,
        name: impl Into<String>,
        type_repr: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::StructDecl { name: name.into(), type_repr })
    }

    pub fn new_variable_decl(
        &mut self,
        pos: SourcePosition,
        name: impl Into<String>,
        type_repr: Option<NodeId>,
        init: Option<NodeId>,
    ) -> NodeId {
        self.alloc(pos, NodeKind::VariableDecl { name: name.into(), type_repr, init })
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    pub fn new_assignment_stmt(&mut self, pos: SourcePosition, dest: NodeId, src: NodeId) -> NodeId {
        self.alloc(pos, NodeKind::AssignmentStmt { dest, src })
    }

    pub fn new_block_stmt(&mut self, pos: SourcePosition, stmts: Vec<NodeId>) -> NodeId {
        self.alloc(pos, NodeKind::BlockStmt { stmts })
    }

    pub fn new_decl_stmt(&mut self, pos: SourcePosition, decl: NodeId) -> NodeId {
        self.alloc(pos, NodeKind::DeclStmt { decl })
    }

    pub fn new_expression_stmt(&mut self, pos: SourcePosition, expr: NodeId) -> NodeId {
        self.alloc(pos, NodeKind::ExpressionStmt { expr })
    }

    pub fn new_for_stmt(
        &mut self,
        pos: SourcePosition,
        init: Option<NodeId>,
        cond: Option<NodeId>,
        next: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::ForStmt { init, cond, next, body })
    }

    pub fn new_for_in_stmt(
        &mut self,
        pos: SourcePosition,
        target: NodeId,
        iter: NodeId,
        body: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::ForInStmt { target, iter, body })
    }

    pub fn new_if_stmt(
        &mut self,
        pos: SourcePosition,
        cond: NodeId,
        then_stmt: NodeId,
        else_stmt: Option<NodeId>,
    ) -> NodeId {
        self.alloc(pos, NodeKind::IfStmt { cond, then_stmt, else_stmt })
    }

    pub fn new_return_stmt(&mut self, pos: SourcePosition, ret: Option<NodeId>) -> NodeId {
        self.alloc(pos, NodeKind::ReturnStmt { ret })
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub fn new_binary_op_expr(
        &mut self,
        pos: SourcePosition,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::BinaryOpExpr { op, left, right })
    }

    pub fn new_call_expr(
        &mut self,
        pos: SourcePosition,
        callee: NodeId,
        args: Vec<NodeId>,
        call_kind: CallKind,
    ) -> NodeId {
        self.alloc(pos, NodeKind::CallExpr { callee, args, call_kind })
    }

    pub fn new_comparison_op_expr(
        &mut self,
        pos: SourcePosition,
        op: CompareOp,
        left: NodeId,
        right: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::ComparisonOpExpr { op, left, right })
    }

    pub fn new_function_lit_expr(
        &mut self,
        pos: SourcePosition,
        type_repr: NodeId,
        body: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::FunctionLitExpr { type_repr, body })
    }

    pub fn new_identifier_expr(&mut self, pos: SourcePosition, name: impl Into<String>) -> NodeId {
        self.alloc(pos, NodeKind::IdentifierExpr { name: name.into() })
    }

    pub fn new_index_expr(&mut self, pos: SourcePosition, object: NodeId, index: NodeId) -> NodeId {
        self.alloc(pos, NodeKind::IndexExpr { object, index })
    }

    pub fn new_lit_expr(&mut self, pos: SourcePosition, lit: Literal) -> NodeId {
        self.alloc(pos, NodeKind::LitExpr { lit })
    }

    pub fn new_member_expr(&mut self, pos: SourcePosition, object: NodeId, member: NodeId) -> NodeId {
        self.alloc(pos, NodeKind::MemberExpr { object, member })
    }

    pub fn new_unary_op_expr(&mut self, pos: SourcePosition, op: UnaryOp, expr: NodeId) -> NodeId {
        self.alloc(pos, NodeKind::UnaryOpExpr { op, expr })
    }

    // ------------------------------------------------------------------------
    // Type representations
    // ------------------------------------------------------------------------

    pub fn new_array_type_repr(
        &mut self,
        pos: SourcePosition,
        len: Option<NodeId>,
        elem: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::ArrayTypeRepr { len, elem })
    }

    pub fn new_function_type_repr(
        &mut self,
        pos: SourcePosition,
        params: Vec<NodeId>,
        ret: NodeId,
    ) -> NodeId {
        self.alloc(pos, NodeKind::FunctionTypeRepr { params, ret })
    }

    pub fn new_map_type_repr(&mut self, pos: SourcePosition, key: NodeId, value: NodeId) -> NodeId {
        self.alloc(pos, NodeKind::MapTypeRepr { key, value })
    }

    pub fn new_pointer_type_repr(&mut self, pos: SourcePosition, base: NodeId) -> NodeId {
        self.alloc(pos, NodeKind::PointerTypeRepr { base })
    }

    pub fn new_struct_type_repr(&mut self, pos: SourcePosition, fields: Vec<NodeId>) -> NodeId {
        self.alloc(pos, NodeKind::StructTypeRepr { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuiltinKind;

    fn pos(line: u32, column: u32) -> SourcePosition {
        SourcePosition::new(line, column, 0)
    }

    #[test]
    fn factory_allocates_in_order() {
        let mut ctx = Context::new();
        let a = ctx.new_identifier_expr(pos(1, 1), "a");
        let one = ctx.new_lit_expr(pos(1, 5), Literal::Int { value: 1, text: "1".into() });
        let assign = ctx.new_assignment_stmt(pos(1, 1), a, one);

        assert_eq!(ctx.node_count(), 3);
        assert_eq!(ctx.kind(assign), &NodeKind::AssignmentStmt { dest: a, src: one });
        assert_eq!(ctx.pos(one), pos(1, 5));
        assert_eq!(ctx.ty(one), None);
    }

    #[test]
    fn implicit_cast_takes_over_the_original_slot() {
        let mut ctx = Context::new();
        let int8 = ctx.types().builtin(BuiltinKind::Int8);
        let int32 = ctx.types().builtin(BuiltinKind::Int32);

        let x = ctx.new_identifier_expr(pos(2, 9), "x");
        ctx.set_ty(x, int8);
        let y = ctx.new_identifier_expr(pos(2, 5), "y");
        let assign = ctx.new_assignment_stmt(pos(2, 5), y, x);

        let moved = ctx.wrap_in_implicit_cast(x, CastKind::IntegralCast, int32);

        // The statement still points at `x`, which is now the cast.
        assert_eq!(ctx.kind(assign), &NodeKind::AssignmentStmt { dest: y, src: x });
        assert_eq!(
            ctx.kind(x),
            &NodeKind::ImplicitCastExpr { cast: CastKind::IntegralCast, input: moved }
        );
        assert_eq!(ctx.ty(x), Some(int32));
        assert_eq!(ctx.kind(moved), &NodeKind::IdentifierExpr { name: "x".into() });
        assert_eq!(ctx.ty(moved), Some(int8));
        assert_eq!(ctx.pos(x), pos(2, 9));
    }
}
