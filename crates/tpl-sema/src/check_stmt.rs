// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement checking.

use tpl_ast::node::UnaryOp;
use tpl_ast::{ErrorKind, NodeId, NodeKind, Type, Visitor};

use crate::scope::{ScopeKind, SymbolKind};
use crate::sema::Sema;

impl Sema<'_> {
    pub(crate) fn check_block_stmt(&mut self, id: NodeId) {
        let NodeKind::BlockStmt { stmts } = self.ctx.kind(id).clone() else {
            return;
        };
        self.scopes.push(ScopeKind::Block);
        for stmt in stmts {
            self.visit(stmt);
        }
        self.scopes.pop();
    }

    pub(crate) fn check_assignment_stmt(&mut self, id: NodeId) {
        let NodeKind::AssignmentStmt { dest, src } = *self.ctx.kind(id) else {
            return;
        };
        let dest_ty = self.check_expr(dest);
        let src_ty = self.check_expr(src);

        if !self.is_assignable(dest) {
            self.error_at(dest, ErrorKind::NotAssignable);
            return;
        }
        if let (Some(dest_ty), Some(src_ty)) = (dest_ty, src_ty) {
            if !self.coerce(src, dest_ty) {
                let kind = ErrorKind::IncompatibleAssignment {
                    dest: self.type_name(dest_ty),
                    src: self.type_name(src_ty),
                };
                self.error_at(src, kind);
            }
        }
    }

    /// Variables, index and member expressions and dereferences.
    fn is_assignable(&self, dest: NodeId) -> bool {
        match self.ctx.kind(dest) {
            NodeKind::IdentifierExpr { name } => {
                !matches!(self.scopes.lookup(name), Some(s) if s.kind != SymbolKind::Variable)
            }
            NodeKind::IndexExpr { .. } | NodeKind::MemberExpr { .. } => true,
            NodeKind::UnaryOpExpr { op, .. } => *op == UnaryOp::Deref,
            _ => false,
        }
    }

    /// Conditions must be `bool`; untyped conditions were already reported.
    fn check_condition(&mut self, cond: NodeId) {
        if let Some(ty) = self.check_expr(cond) {
            if !self.ctx.types().is_bool(ty) {
                self.error_at(cond, ErrorKind::NonBoolCondition(self.type_name(ty)));
            }
        }
    }

    pub(crate) fn check_if_stmt(&mut self, id: NodeId) {
        let NodeKind::IfStmt { cond, then_stmt, else_stmt } = *self.ctx.kind(id) else {
            return;
        };
        self.check_condition(cond);
        self.visit(then_stmt);
        if let Some(else_stmt) = else_stmt {
            self.visit(else_stmt);
        }
    }

    pub(crate) fn check_for_stmt(&mut self, id: NodeId) {
        let NodeKind::ForStmt { init, cond, next, body } = *self.ctx.kind(id) else {
            return;
        };
        self.scopes.push(ScopeKind::Loop);
        if let Some(init) = init {
            self.visit(init);
        }
        if let Some(cond) = cond {
            self.check_condition(cond);
        }
        if let Some(next) = next {
            self.visit(next);
        }
        self.visit(body);
        self.scopes.pop();
    }

    /// Arrays bind the element type, maps bind the key type.
    pub(crate) fn check_for_in_stmt(&mut self, id: NodeId) {
        let NodeKind::ForInStmt { target, iter, body } = *self.ctx.kind(id) else {
            return;
        };
        let elem = self.check_expr(iter).and_then(|ty| match self.ctx.types().get(ty) {
            Type::Array { elem, .. } => Some(*elem),
            Type::Map { key, .. } => Some(*key),
            _ => {
                self.error_at(iter, ErrorKind::NotIterable(self.type_name(ty)));
                None
            }
        });

        self.scopes.push(ScopeKind::Loop);
        if let NodeKind::IdentifierExpr { name } = self.ctx.kind(target).clone() {
            self.declare(target, &name, SymbolKind::Variable, elem);
        }
        if let Some(elem) = elem {
            self.ctx.set_ty(target, elem);
        }
        self.visit(body);
        self.scopes.pop();
    }

    pub(crate) fn check_return_stmt(&mut self, id: NodeId) {
        let NodeKind::ReturnStmt { ret } = *self.ctx.kind(id) else {
            return;
        };
        let value_ty = ret.and_then(|ret| self.check_expr(ret));
        // Outside any function, or the signature failed to resolve.
        let Some(Some(expected)) = self.returns.last().copied() else {
            return;
        };
        let returns_nil = self.ctx.types().is_nil(expected);

        match ret {
            Some(ret) if returns_nil => self.error_at(ret, ErrorKind::UnexpectedReturnValue),
            Some(ret) => {
                if let Some(found) = value_ty {
                    if !self.coerce(ret, expected) {
                        let kind = ErrorKind::ReturnTypeMismatch {
                            expected: self.type_name(expected),
                            found: self.type_name(found),
                        };
                        self.error_at(ret, kind);
                    }
                }
            }
            None if !returns_nil => {
                self.error_at(id, ErrorKind::MissingReturnValue(self.type_name(expected)));
            }
            None => {}
        }
    }
}
