// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! AST node model.
//!
//! Nodes live in the [`Context`](crate::Context) arena and refer to their
//! children by [`NodeId`]. There are no parent links; passes that need
//! enclosing context (scopes, the current function) keep their own stacks.

use std::fmt;

use crate::types::TypeId;
use crate::SourcePosition;

/// Index of a node in its owning context's arena.
///
/// Only meaningful for the `Context` that allocated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

macro_rules! declare_ast_kind {
    ($($kind:ident => $visit:ident),* $(,)?) => {
        /// Fieldless tag identifying a node's grammatical category.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum AstKind {
            $($kind,)*
        }

        impl AstKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [AstKind] = &[$(AstKind::$kind,)*];

            /// The canonical kind name, e.g. `"IfStmt"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(AstKind::$kind => stringify!($kind),)*
                }
            }
        }

        impl NodeKind {
            pub fn ast_kind(&self) -> AstKind {
                match self {
                    $(NodeKind::$kind { .. } => AstKind::$kind,)*
                }
            }
        }
    };
}

for_each_ast_kind!(declare_ast_kind);

impl fmt::Display for AstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Position of the node's leading token.
    pub pos: SourcePosition,
    /// Resolved type, set by semantic analysis.
    pub ty: Option<TypeId>,
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // ------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------
    /// A whole compilation unit.
    File { decls: Vec<NodeId> },
    /// A struct field or function parameter.
    FieldDecl { name: String, type_repr: NodeId },
    /// `fun name(params) -> ret { body }`; `func` is the function literal.
    FunctionDecl { name: String, func: NodeId },
    /// `struct name { fields }`; `type_repr` is a `StructTypeRepr`.
    StructDecl { name: String, type_repr: NodeId },
    /// `var name [: type] [= init]`
    VariableDecl {
        name: String,
        type_repr: Option<NodeId>,
        init: Option<NodeId>,
    },

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------
    AssignmentStmt { dest: NodeId, src: NodeId },
    BlockStmt { stmts: Vec<NodeId> },
    /// A declaration in statement position.
    DeclStmt { decl: NodeId },
    ExpressionStmt { expr: NodeId },
    /// `for (init; cond; next) body`; every header part is optional.
    ForStmt {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        next: Option<NodeId>,
        body: NodeId,
    },
    /// `for (target in iter) body`; `target` is an `IdentifierExpr`.
    ForInStmt { target: NodeId, iter: NodeId, body: NodeId },
    /// `else if` chains nest another `IfStmt` in `else_stmt`.
    IfStmt {
        cond: NodeId,
        then_stmt: NodeId,
        else_stmt: Option<NodeId>,
    },
    ReturnStmt { ret: Option<NodeId> },

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------
    BinaryOpExpr { op: BinaryOp, left: NodeId, right: NodeId },
    CallExpr {
        callee: NodeId,
        args: Vec<NodeId>,
        call_kind: CallKind,
    },
    ComparisonOpExpr { op: CompareOp, left: NodeId, right: NodeId },
    /// `(params) -> ret { body }`; `type_repr` is a `FunctionTypeRepr`.
    FunctionLitExpr { type_repr: NodeId, body: NodeId },
    IdentifierExpr { name: String },
    /// Compiler-inserted conversion of `input` to the node's own type.
    ImplicitCastExpr { cast: CastKind, input: NodeId },
    IndexExpr { object: NodeId, index: NodeId },
    LitExpr { lit: Literal },
    /// `object.member`; `member` is an `IdentifierExpr`.
    MemberExpr { object: NodeId, member: NodeId },
    UnaryOpExpr { op: UnaryOp, expr: NodeId },

    // ------------------------------------------------------------------------
    // Type representations
    // ------------------------------------------------------------------------
    /// `[len]elem`, or `[*]elem` when `len` is absent.
    ArrayTypeRepr { len: Option<NodeId>, elem: NodeId },
    /// `(params) -> ret`; `params` are `FieldDecl`s.
    FunctionTypeRepr { params: Vec<NodeId>, ret: NodeId },
    MapTypeRepr { key: NodeId, value: NodeId },
    PointerTypeRepr { base: NodeId },
    /// `struct { fields }`; `fields` are `FieldDecl`s.
    StructTypeRepr { fields: Vec<NodeId> },
}

impl NodeKind {
    /// Children in program order.
    ///
    /// This is the only place child order is defined; the generic walker
    /// and every pass built on it inherit it.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::File { decls } => decls.clone(),
            NodeKind::FieldDecl { type_repr, .. } => vec![*type_repr],
            NodeKind::FunctionDecl { func, .. } => vec![*func],
            NodeKind::StructDecl { type_repr, .. } => vec![*type_repr],
            NodeKind::VariableDecl { type_repr, init, .. } => {
                type_repr.iter().chain(init.iter()).copied().collect()
            }
            NodeKind::AssignmentStmt { dest, src } => vec![*dest, *src],
            NodeKind::BlockStmt { stmts } => stmts.clone(),
            NodeKind::DeclStmt { decl } => vec![*decl],
            NodeKind::ExpressionStmt { expr } => vec![*expr],
            NodeKind::ForStmt { init, cond, next, body } => init
                .iter()
                .chain(cond.iter())
                .chain(next.iter())
                .chain(std::iter::once(body))
                .copied()
                .collect(),
            NodeKind::ForInStmt { target, iter, body } => vec![*target, *iter, *body],
            NodeKind::IfStmt { cond, then_stmt, else_stmt } => {
                let mut children = vec![*cond, *then_stmt];
                children.extend(else_stmt);
                children
            }
            NodeKind::ReturnStmt { ret } => ret.iter().copied().collect(),
            NodeKind::BinaryOpExpr { left, right, .. }
            | NodeKind::ComparisonOpExpr { left, right, .. } => vec![*left, *right],
            NodeKind::CallExpr { callee, args, .. } => {
                let mut children = Vec::with_capacity(args.len() + 1);
                children.push(*callee);
                children.extend(args);
                children
            }
            NodeKind::FunctionLitExpr { type_repr, body } => vec![*type_repr, *body],
            NodeKind::IdentifierExpr { .. } | NodeKind::LitExpr { .. } => Vec::new(),
            NodeKind::ImplicitCastExpr { input, .. } => vec![*input],
            NodeKind::IndexExpr { object, index } => vec![*object, *index],
            NodeKind::MemberExpr { object, member } => vec![*object, *member],
            NodeKind::UnaryOpExpr { expr, .. } => vec![*expr],
            NodeKind::ArrayTypeRepr { len, elem } => {
                len.iter().chain(std::iter::once(elem)).copied().collect()
            }
            NodeKind::FunctionTypeRepr { params, ret } => {
                let mut children = params.clone();
                children.push(*ret);
                children
            }
            NodeKind::MapTypeRepr { key, value } => vec![*key, *value],
            NodeKind::PointerTypeRepr { base } => vec![*base],
            NodeKind::StructTypeRepr { fields } => fields.clone(),
        }
    }
}

/// Arithmetic, bitwise and logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Comparison operators. Always produce `bool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    /// `==` and `!=`; everything else needs an ordering.
    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::Ne)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
    /// `~`
    BitNot,
    /// `&`
    AddrOf,
    /// `*`
    Deref,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::AddrOf => "&",
            UnaryOp::Deref => "*",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Regular,
    /// `@name(args)`
    Builtin,
}

/// Conversions Sema is allowed to perform without being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    /// Narrower integer to wider integer.
    IntegralCast,
    IntToFloat,
    /// `float32` to `float64`.
    FloatWiden,
}

impl CastKind {
    pub fn name(self) -> &'static str {
        match self {
            CastKind::IntegralCast => "IntegralCast",
            CastKind::IntToFloat => "IntToFloat",
            CastKind::FloatWiden => "FloatWiden",
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    /// Numeric and string literals keep their source spelling for the dump;
    /// `007` and `7` are the same value.
    Int { value: i64, text: String },
    Float { value: f64, text: String },
    /// `value` is decoded, `text` is the quoted source form.
    String { value: String, text: String },
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "nil"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int { text, .. } | Literal::Float { text, .. } | Literal::String { text, .. } => {
                f.write_str(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_canonical() {
        assert_eq!(AstKind::IfStmt.name(), "IfStmt");
        assert_eq!(AstKind::ComparisonOpExpr.name(), "ComparisonOpExpr");
        assert_eq!(AstKind::File.to_string(), "File");
        assert_eq!(AstKind::ALL.len(), 28);
    }

    #[test]
    fn payload_maps_to_its_tag() {
        let kind = NodeKind::ReturnStmt { ret: None };
        assert_eq!(kind.ast_kind(), AstKind::ReturnStmt);
        assert!(kind.children().is_empty());
    }

    #[test]
    fn for_children_skip_missing_header_parts() {
        let kind = NodeKind::ForStmt {
            init: None,
            cond: Some(NodeId(3)),
            next: None,
            body: NodeId(4),
        };
        assert_eq!(kind.children(), vec![NodeId(3), NodeId(4)]);
    }

    #[test]
    fn literals_keep_spelling() {
        let lit = Literal::Float { value: 1.5, text: "1.50".to_string() };
        assert_eq!(lit.to_string(), "1.50");
        let lit = Literal::Int { value: 7, text: "007".to_string() };
        assert_eq!(lit.to_string(), "007");
        let lit = Literal::String { value: "a\tb".to_string(), text: "\"a\tb\"".to_string() };
        assert_eq!(lit.to_string(), "\"a\tb\"");
    }
}
