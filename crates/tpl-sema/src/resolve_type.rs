// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolve type representations to interned types.

use std::collections::HashSet;

use tpl_ast::node::{Literal, UnaryOp};
use tpl_ast::types::StructField;
use tpl_ast::{ErrorKind, NodeId, NodeKind, TypeId};

use crate::scope::SymbolKind;
use crate::sema::Sema;

impl Sema<'_> {
    /// Resolve a type representation, annotating it. Unknown names are
    /// reported and yield `None`.
    pub(crate) fn resolve_type(&mut self, id: NodeId) -> Option<TypeId> {
        let ty = match self.ctx.kind(id).clone() {
            NodeKind::IdentifierExpr { name } => match self.lookup_type_name(&name) {
                Some(ty) => ty,
                None => {
                    self.error_at(id, ErrorKind::UnknownType(name));
                    return None;
                }
            },
            NodeKind::PointerTypeRepr { base } => {
                let base = self.resolve_type(base)?;
                self.ctx.types_mut().pointer_to(base)
            }
            NodeKind::ArrayTypeRepr { len, elem } => {
                let len = len.and_then(|len| match self.ctx.kind(len) {
                    NodeKind::LitExpr { lit: Literal::Int { value, .. } } => u64::try_from(*value).ok(),
                    _ => None,
                });
                let elem = self.resolve_type(elem)?;
                self.ctx.types_mut().array_of(len, elem)
            }
            NodeKind::MapTypeRepr { key, value } => {
                let key = self.resolve_type(key);
                let value = self.resolve_type(value);
                self.ctx.types_mut().map_of(key?, value?)
            }
            NodeKind::FunctionTypeRepr { params, ret } => {
                let mut param_types = Vec::with_capacity(params.len());
                let mut complete = true;
                for param in params {
                    match self.check_field_decl(param) {
                        Some(ty) => param_types.push(ty),
                        None => complete = false,
                    }
                }
                let ret = self.resolve_type(ret);
                if !complete {
                    return None;
                }
                self.ctx.types_mut().function(param_types, ret?)
            }
            NodeKind::StructTypeRepr { .. } => {
                let ty = self.ctx.types_mut().declare_struct("struct{...}");
                self.resolve_struct_fields(id, ty);
                ty
            }
            _ => {
                self.error_at(id, ErrorKind::UnknownType(self.describe(id)));
                return None;
            }
        };
        self.ctx.set_ty(id, ty);
        Some(ty)
    }

    /// Attach the fields of a `StructTypeRepr` to an already declared struct.
    pub(crate) fn resolve_struct_fields(&mut self, repr: NodeId, ty: TypeId) {
        let NodeKind::StructTypeRepr { fields } = self.ctx.kind(repr).clone() else {
            return;
        };

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(fields.len());
        for field in fields {
            let NodeKind::FieldDecl { name, .. } = self.ctx.kind(field).clone() else {
                continue;
            };
            if !seen.insert(name.clone()) {
                self.error_at(field, ErrorKind::Redeclaration(name.clone()));
            }
            if let Some(field_ty) = self.check_field_decl(field) {
                resolved.push(StructField { name, ty: field_ty });
            }
        }

        self.ctx.types_mut().set_struct_fields(ty, resolved);
        self.ctx.set_ty(repr, ty);
    }

    /// `name: type` in a parameter list or struct body.
    pub(crate) fn check_field_decl(&mut self, id: NodeId) -> Option<TypeId> {
        let NodeKind::FieldDecl { type_repr, .. } = *self.ctx.kind(id) else {
            return None;
        };
        let ty = self.resolve_type(type_repr)?;
        self.ctx.set_ty(id, ty);
        Some(ty)
    }

    /// Struct names in scope, then builtin names.
    pub(crate) fn lookup_type_name(&self, name: &str) -> Option<TypeId> {
        match self.scopes.lookup(name) {
            Some(symbol) if symbol.kind == SymbolKind::Type => symbol.ty,
            _ => self.ctx.types().lookup_builtin(name),
        }
    }

    /// Read an expression written where a builtin expects a type, such as
    /// the `*Row` in `@ptrCast(*Row, p)`. The parser sees `*Row` as a
    /// dereference, so pointer types arrive as `UnaryOpExpr`.
    pub(crate) fn type_from_expr(&mut self, id: NodeId) -> Option<TypeId> {
        let ty = match self.ctx.kind(id).clone() {
            NodeKind::IdentifierExpr { name } => self.lookup_type_name(&name)?,
            NodeKind::UnaryOpExpr { op: UnaryOp::Deref, expr } => {
                let base = self.type_from_expr(expr)?;
                self.ctx.types_mut().pointer_to(base)
            }
            _ => return None,
        };
        self.ctx.set_ty(id, ty);
        Some(ty)
    }
}
