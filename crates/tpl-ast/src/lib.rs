// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the TPL execution language.
//!
//! This crate defines everything the front-end passes share: source
//! positions, tokens, the arena-owned AST, resolved type descriptors, the
//! error reporter, the generic traversal mechanism and the AST dumper.
//! All of it hangs off a per-compilation [`Context`].

/// Invokes `$m!` with the full list of node kinds, each paired with the name
/// of its visitor hook. This is the single place the closed set of kinds is
/// spelled out; the kind tag, the name table and the visitor trait are all
/// generated from it.
macro_rules! for_each_ast_kind {
    ($m:ident) => {
        $m! {
            // Declarations
            File => visit_file,
            FieldDecl => visit_field_decl,
            FunctionDecl => visit_function_decl,
            StructDecl => visit_struct_decl,
            VariableDecl => visit_variable_decl,
            // Statements
            AssignmentStmt => visit_assignment_stmt,
            BlockStmt => visit_block_stmt,
            DeclStmt => visit_decl_stmt,
            ExpressionStmt => visit_expression_stmt,
            ForStmt => visit_for_stmt,
            ForInStmt => visit_for_in_stmt,
            IfStmt => visit_if_stmt,
            ReturnStmt => visit_return_stmt,
            // Expressions
            BinaryOpExpr => visit_binary_op_expr,
            CallExpr => visit_call_expr,
            ComparisonOpExpr => visit_comparison_op_expr,
            FunctionLitExpr => visit_function_lit_expr,
            IdentifierExpr => visit_identifier_expr,
            ImplicitCastExpr => visit_implicit_cast_expr,
            IndexExpr => visit_index_expr,
            LitExpr => visit_lit_expr,
            MemberExpr => visit_member_expr,
            UnaryOpExpr => visit_unary_op_expr,
            // Type representations
            ArrayTypeRepr => visit_array_type_repr,
            FunctionTypeRepr => visit_function_type_repr,
            MapTypeRepr => visit_map_type_repr,
            PointerTypeRepr => visit_pointer_type_repr,
            StructTypeRepr => visit_struct_type_repr,
        }
    };
}

pub mod span;
pub mod token;
pub mod node;
pub mod types;
pub mod error;
pub mod context;
pub mod visit;
pub mod dump;

pub use context::Context;
pub use dump::AstDump;
pub use error::{Diagnostic, ErrorCategory, ErrorKind, ErrorReporter};
pub use node::{AstKind, Node, NodeId, NodeKind};
pub use span::{LineMap, SourcePosition};
pub use types::{Type, TypeId, TypeTable};
pub use visit::{KindCounter, Visitor};
