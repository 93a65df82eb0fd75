// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compiler builtins called as `@name(args)`.

use tpl_ast::node::UnaryOp;
use tpl_ast::types::BuiltinKind;
use tpl_ast::{ErrorKind, NodeId, NodeKind};

use crate::sema::Sema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    /// `@sizeOf(T or expr) -> uint32`
    SizeOf,
    /// `@ptrCast(*T, ptr) -> *T`
    PtrCast,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sizeOf" => Some(Self::SizeOf),
            "ptrCast" => Some(Self::PtrCast),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::SizeOf => "@sizeOf",
            Self::PtrCast => "@ptrCast",
        }
    }

    fn arity(self) -> usize {
        match self {
            Self::SizeOf => 1,
            Self::PtrCast => 2,
        }
    }
}

impl Sema<'_> {
    /// The callee of a builtin call is a bare name, never resolved as a
    /// variable.
    pub(crate) fn check_builtin_call(&mut self, id: NodeId, callee: NodeId, args: &[NodeId]) {
        let NodeKind::IdentifierExpr { name } = self.ctx.kind(callee).clone() else {
            return;
        };
        let Some(builtin) = Builtin::from_name(&name) else {
            self.error_at(callee, ErrorKind::UnknownBuiltin(name));
            for &arg in args {
                self.check_expr(arg);
            }
            return;
        };
        if args.len() != builtin.arity() {
            let kind = ErrorKind::ArityMismatch {
                name: builtin.name().to_string(),
                expected: builtin.arity(),
                found: args.len(),
            };
            self.error_at(id, kind);
            for &arg in args {
                self.check_expr(arg);
            }
            return;
        }

        let result = match builtin {
            Builtin::SizeOf => self.check_size_of(args[0]),
            Builtin::PtrCast => self.check_ptr_cast(args[0], args[1]),
        };
        if let Some(ty) = result {
            self.ctx.set_ty(id, ty);
        }
    }

    /// Accepts a type name or any typed expression.
    fn check_size_of(&mut self, arg: NodeId) -> Option<tpl_ast::TypeId> {
        if self.type_from_expr(arg).is_none() {
            self.check_expr(arg)?;
        }
        Some(self.ctx.types().builtin(BuiltinKind::UInt32))
    }

    fn check_ptr_cast(&mut self, target: NodeId, value: NodeId) -> Option<tpl_ast::TypeId> {
        let target_ty = self.type_from_expr(target);
        let value_ty = self.check_expr(value);

        let Some(target_ty) = target_ty else {
            self.error_at(target, ErrorKind::UnknownType(self.type_expr_text(target)));
            return None;
        };
        if !self.ctx.types().is_pointer(target_ty) {
            let kind = ErrorKind::InvalidOperand { op: "@ptrCast".to_string(), ty: self.type_name(target_ty) };
            self.error_at(target, kind);
            return None;
        }

        let value_ty = value_ty?;
        if !self.ctx.types().is_pointer(value_ty) {
            let kind = ErrorKind::InvalidOperand { op: "@ptrCast".to_string(), ty: self.type_name(value_ty) };
            self.error_at(value, kind);
            return None;
        }
        Some(target_ty)
    }

    /// Spell out a type written in expression form, e.g. `*Row`.
    fn type_expr_text(&self, id: NodeId) -> String {
        match self.ctx.kind(id) {
            NodeKind::IdentifierExpr { name } => name.clone(),
            NodeKind::UnaryOpExpr { op: UnaryOp::Deref, expr } => format!("*{}", self.type_expr_text(*expr)),
            other => other.ast_kind().name().to_string(),
        }
    }
}
