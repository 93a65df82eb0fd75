// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression type inference.

use tpl_ast::node::{CallKind, Literal, UnaryOp};
use tpl_ast::types::BuiltinKind;
use tpl_ast::{ErrorKind, NodeId, NodeKind, Type, TypeId};

use crate::scope::SymbolKind;
use crate::sema::Sema;

impl Sema<'_> {
    /// Integer literals default to `int32`, or `int64` when the value does
    /// not fit. Float literals default to `float32`.
    pub(crate) fn check_literal(&mut self, id: NodeId) {
        let NodeKind::LitExpr { lit } = self.ctx.kind(id) else {
            return;
        };
        let kind = match lit {
            Literal::Nil => BuiltinKind::Nil,
            Literal::Bool(_) => BuiltinKind::Bool,
            Literal::Int { value, .. } if i32::try_from(*value).is_ok() => BuiltinKind::Int32,
            Literal::Int { .. } => BuiltinKind::Int64,
            Literal::Float { .. } => BuiltinKind::Float32,
            Literal::String { .. } => BuiltinKind::String,
        };
        let ty = self.ctx.types().builtin(kind);
        self.ctx.set_ty(id, ty);
    }

    pub(crate) fn check_identifier(&mut self, id: NodeId) {
        let NodeKind::IdentifierExpr { name } = self.ctx.kind(id).clone() else {
            return;
        };
        match self.scopes.lookup(&name).map(|symbol| (symbol.kind, symbol.ty)) {
            Some((SymbolKind::Type, _)) => self.error_at(id, ErrorKind::CannotInferType(name)),
            Some((_, Some(ty))) => self.ctx.set_ty(id, ty),
            Some((_, None)) => {}
            None if self.ctx.types().lookup_builtin(&name).is_some() => {
                self.error_at(id, ErrorKind::CannotInferType(name));
            }
            None => self.error_at(id, ErrorKind::UndefinedIdentifier(name)),
        }
    }

    pub(crate) fn check_binary_op(&mut self, id: NodeId) {
        let NodeKind::BinaryOpExpr { op, left, right } = *self.ctx.kind(id) else {
            return;
        };
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        let (Some(lt), Some(rt)) = (lt, rt) else {
            return;
        };

        for (operand, ty) in [(left, lt), (right, rt)] {
            let types = self.ctx.types();
            let valid = if op.is_logical() {
                types.is_bool(ty)
            } else if op.is_bitwise() {
                types.is_integer(ty)
            } else {
                types.is_numeric(ty)
            };
            if !valid {
                let kind = ErrorKind::InvalidOperand { op: op.symbol().to_string(), ty: self.type_name(ty) };
                self.error_at(operand, kind);
                return;
            }
        }

        let result = if op.is_logical() { Some(lt) } else { self.unify_numeric(left, right) };
        match result {
            Some(ty) => self.ctx.set_ty(id, ty),
            None => {
                let kind = ErrorKind::MismatchedBinaryOperands {
                    op: op.symbol().to_string(),
                    left: self.type_name(lt),
                    right: self.type_name(rt),
                };
                self.error_at(id, kind);
            }
        }
    }

    /// Numbers compare after widening and strings compare fully. Booleans
    /// and pointers (including a pointer against `nil`) only support
    /// equality.
    pub(crate) fn check_comparison(&mut self, id: NodeId) {
        let NodeKind::ComparisonOpExpr { op, left, right } = *self.ctx.kind(id) else {
            return;
        };
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        let (Some(lt), Some(rt)) = (lt, rt) else {
            return;
        };

        let types = self.ctx.types();
        let numeric = types.is_numeric(lt) && types.is_numeric(rt);
        let strings = types.is_string(lt) && types.is_string(rt);
        let pointer_like = |ty| types.is_pointer(ty) || types.is_nil(ty);
        let equatable = (lt == rt && (types.is_bool(lt) || types.is_pointer(lt)))
            || (pointer_like(lt) && pointer_like(rt) && (types.is_pointer(lt) || types.is_pointer(rt)));

        let comparable = if numeric {
            self.unify_numeric(left, right).is_some()
        } else {
            strings || (op.is_equality() && equatable)
        };

        if comparable {
            let bool_ty = self.ctx.types().builtin(BuiltinKind::Bool);
            self.ctx.set_ty(id, bool_ty);
        } else {
            let kind = ErrorKind::IncomparableOperands { left: self.type_name(lt), right: self.type_name(rt) };
            self.error_at(id, kind);
        }
    }

    pub(crate) fn check_unary_op(&mut self, id: NodeId) {
        let NodeKind::UnaryOpExpr { op, expr } = *self.ctx.kind(id) else {
            return;
        };
        let Some(operand) = self.check_expr(expr) else {
            return;
        };

        let result = if op == UnaryOp::AddrOf {
            Some(self.ctx.types_mut().pointer_to(operand))
        } else {
            let types = self.ctx.types();
            match op {
                UnaryOp::Neg => types.is_numeric(operand).then_some(operand),
                UnaryOp::Not => types.is_bool(operand).then_some(operand),
                UnaryOp::BitNot => types.is_integer(operand).then_some(operand),
                _ => types.pointee(operand),
            }
        };

        match result {
            Some(ty) => self.ctx.set_ty(id, ty),
            None => {
                let kind = ErrorKind::InvalidOperand { op: op.symbol().to_string(), ty: self.type_name(operand) };
                self.error_at(expr, kind);
            }
        }
    }

    pub(crate) fn check_call(&mut self, id: NodeId) {
        let NodeKind::CallExpr { callee, args, call_kind } = self.ctx.kind(id).clone() else {
            return;
        };
        if call_kind == CallKind::Builtin {
            self.check_builtin_call(id, callee, &args);
            return;
        }

        let callee_ty = self.check_expr(callee);
        let arg_types: Vec<Option<TypeId>> = args.iter().map(|&arg| self.check_expr(arg)).collect();
        let Some(callee_ty) = callee_ty else {
            return;
        };
        let Type::Function { params, ret } = self.ctx.types().get(callee_ty).clone() else {
            self.error_at(callee, ErrorKind::NotAFunction(self.describe(callee)));
            return;
        };
        if params.len() != args.len() {
            let kind = ErrorKind::ArityMismatch {
                name: self.describe(callee),
                expected: params.len(),
                found: args.len(),
            };
            self.error_at(id, kind);
            return;
        }

        let mut valid = true;
        for (index, ((&arg, found), param)) in args.iter().zip(arg_types).zip(params).enumerate() {
            let Some(found) = found else {
                valid = false;
                continue;
            };
            if !self.coerce(arg, param) {
                let kind = ErrorKind::IncompatibleArgument {
                    index: index + 1,
                    expected: self.type_name(param),
                    found: self.type_name(found),
                };
                self.error_at(arg, kind);
                valid = false;
            }
        }
        if valid {
            self.ctx.set_ty(id, ret);
        }
    }

    /// Arrays (directly or through a pointer) take integer indices; maps take
    /// anything assignable to their key type.
    pub(crate) fn check_index(&mut self, id: NodeId) {
        let NodeKind::IndexExpr { object, index } = *self.ctx.kind(id) else {
            return;
        };
        let object_ty = self.check_expr(object);
        let index_ty = self.check_expr(index);
        let Some(object_ty) = object_ty else {
            return;
        };

        let types = self.ctx.types();
        let base = match types.pointee(object_ty) {
            Some(pointee) if matches!(types.get(pointee), Type::Array { .. }) => pointee,
            _ => object_ty,
        };

        match types.get(base).clone() {
            Type::Array { elem, .. } => {
                let Some(index_ty) = index_ty else {
                    return;
                };
                if self.ctx.types().is_integer(index_ty) {
                    self.ctx.set_ty(id, elem);
                } else {
                    self.error_at(index, ErrorKind::NonIntegerIndex(self.type_name(index_ty)));
                }
            }
            Type::Map { key, value } => {
                let Some(index_ty) = index_ty else {
                    return;
                };
                if self.coerce(index, key) {
                    self.ctx.set_ty(id, value);
                } else {
                    let kind = ErrorKind::IncompatibleAssignment {
                        dest: self.type_name(key),
                        src: self.type_name(index_ty),
                    };
                    self.error_at(index, kind);
                }
            }
            _ => self.error_at(object, ErrorKind::InvalidIndex(self.type_name(object_ty))),
        }
    }

    /// Struct fields, directly or through one pointer. The member name is
    /// annotated with the field type.
    pub(crate) fn check_member(&mut self, id: NodeId) {
        let NodeKind::MemberExpr { object, member } = *self.ctx.kind(id) else {
            return;
        };
        let Some(object_ty) = self.check_expr(object) else {
            return;
        };
        let NodeKind::IdentifierExpr { name } = self.ctx.kind(member).clone() else {
            return;
        };

        let types = self.ctx.types();
        let base = types.pointee(object_ty).unwrap_or(object_ty);
        if !matches!(types.get(base), Type::Struct { .. }) {
            self.error_at(object, ErrorKind::InvalidMemberAccess(self.type_name(object_ty)));
            return;
        }

        match types.struct_field(base, &name) {
            Some(field_ty) => {
                self.ctx.set_ty(member, field_ty);
                self.ctx.set_ty(id, field_ty);
            }
            None => {
                let kind = ErrorKind::NoSuchField { ty: self.type_name(base), field: name };
                self.error_at(member, kind);
            }
        }
    }
}
