// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Declaration checking: the file pre-pass, functions and variables.

use tpl_ast::{ErrorKind, NodeId, NodeKind, Type, TypeId, Visitor};

use crate::scope::{ScopeKind, Symbol, SymbolKind};
use crate::sema::Sema;

impl Sema<'_> {
    /// Bind `name` in the innermost scope, reporting a clash at `id`.
    pub(crate) fn declare(&mut self, id: NodeId, name: &str, kind: SymbolKind, ty: Option<TypeId>) -> bool {
        let pos = self.ctx.pos(id);
        match self.scopes.declare(name, Symbol { kind, ty, pos }) {
            Ok(()) => true,
            Err(_) => {
                self.error(pos, ErrorKind::Redeclaration(name.to_string()));
                false
            }
        }
    }

    /// Top-level declarations.
    ///
    /// Struct names are declared first so fields and signatures can refer
    /// to any of them, then struct bodies and function signatures are
    /// resolved, and only then are variables and bodies checked in source
    /// order.
    pub(crate) fn check_file(&mut self, id: NodeId) {
        let NodeKind::File { decls } = self.ctx.kind(id).clone() else {
            return;
        };
        self.scopes.push(ScopeKind::File);

        let mut structs = Vec::new();
        for &decl in &decls {
            if let NodeKind::StructDecl { name, type_repr } = self.ctx.kind(decl).clone() {
                let ty = self.ctx.types_mut().declare_struct(name.clone());
                self.declare(decl, &name, SymbolKind::Type, Some(ty));
                structs.push((decl, type_repr, ty));
            }
        }
        for (decl, type_repr, ty) in structs {
            self.resolve_struct_fields(type_repr, ty);
            self.ctx.set_ty(decl, ty);
        }

        for &decl in &decls {
            if let NodeKind::FunctionDecl { name, func } = self.ctx.kind(decl).clone() {
                let ty = self.function_signature(func);
                self.declare(decl, &name, SymbolKind::Function, ty);
            }
        }

        for &decl in &decls {
            self.visit(decl);
        }

        self.scopes.pop();
        log::trace!("checked {} top-level declaration(s)", decls.len());
    }

    fn function_signature(&mut self, func: NodeId) -> Option<TypeId> {
        let NodeKind::FunctionLitExpr { type_repr, .. } = *self.ctx.kind(func) else {
            return None;
        };
        self.resolve_type(type_repr)
    }

    /// The signature was resolved by the file pre-pass; only the body is left.
    pub(crate) fn check_function_decl(&mut self, id: NodeId) {
        let NodeKind::FunctionDecl { func, .. } = *self.ctx.kind(id) else {
            return;
        };
        let NodeKind::FunctionLitExpr { type_repr, .. } = *self.ctx.kind(func) else {
            return;
        };
        let ty = self.ctx.ty(type_repr);
        self.check_function_body(func, ty);
        if let Some(ty) = ty {
            self.ctx.set_ty(id, ty);
        }
    }

    /// A function literal in expression position.
    pub(crate) fn check_function_lit(&mut self, id: NodeId) {
        let ty = self.function_signature(id);
        self.check_function_body(id, ty);
    }

    fn check_function_body(&mut self, lit: NodeId, ty: Option<TypeId>) {
        let NodeKind::FunctionLitExpr { type_repr, body } = *self.ctx.kind(lit) else {
            return;
        };
        let NodeKind::FunctionTypeRepr { params, ret: ret_repr } = self.ctx.kind(type_repr).clone() else {
            return;
        };

        self.scopes.push(ScopeKind::Function);
        for param in params {
            if let NodeKind::FieldDecl { name, .. } = self.ctx.kind(param).clone() {
                let param_ty = self.ctx.ty(param);
                self.declare(param, &name, SymbolKind::Variable, param_ty);
            }
        }

        let ret = match ty.map(|ty| self.ctx.types().get(ty)) {
            Some(Type::Function { ret, .. }) => Some(*ret),
            _ => self.ctx.ty(ret_repr),
        };
        self.returns.push(ret);
        self.visit(body);
        self.returns.pop();
        self.scopes.pop();

        if let Some(ty) = ty {
            self.ctx.set_ty(lit, ty);
        }
    }

    /// `var name [: type] [= init]`. The initializer is checked before the
    /// name is bound, so it cannot refer to the variable itself.
    pub(crate) fn check_variable_decl(&mut self, id: NodeId) {
        let NodeKind::VariableDecl { name, type_repr, init } = self.ctx.kind(id).clone() else {
            return;
        };
        let declared = type_repr.and_then(|repr| self.resolve_type(repr));
        let init_ty = init.and_then(|init| self.check_expr(init));

        let ty = match (type_repr, init) {
            (Some(_), Some(init)) => {
                if let (Some(dest), Some(src)) = (declared, init_ty) {
                    if !self.coerce(init, dest) {
                        let kind = ErrorKind::IncompatibleAssignment {
                            dest: self.type_name(dest),
                            src: self.type_name(src),
                        };
                        self.error_at(init, kind);
                    }
                }
                declared
            }
            (Some(_), None) => declared,
            (None, Some(init)) => match init_ty {
                Some(src) if self.ctx.types().is_nil(src) => {
                    self.error_at(init, ErrorKind::CannotInferType(name.clone()));
                    None
                }
                src => src,
            },
            (None, None) => {
                self.error_at(id, ErrorKind::CannotInferType(name.clone()));
                None
            }
        };

        self.declare(id, &name, SymbolKind::Variable, ty);
        if let Some(ty) = ty {
            self.ctx.set_ty(id, ty);
        }
    }
}
