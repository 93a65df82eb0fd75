// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the TPL execution language.
//!
//! Consumes the scanner's token stream and builds the AST in a [`Context`],
//! recovering from syntax errors so that one run reports as many as it can.
//!
//! [`Context`]: tpl_ast::Context

mod parser;

pub use parser::{ParseError, Parser, ParserConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use tpl_ast::node::{BinaryOp, CallKind, CompareOp, Literal};
    use tpl_ast::{AstDump, Context, ErrorCategory, ErrorKind, KindCounter, NodeId, NodeKind};
    use tpl_lexer::Scanner;

    fn parse(src: &str) -> (Context, NodeId) {
        let mut ctx = Context::new();
        let root = Parser::new(Scanner::new(src), &mut ctx).parse();
        (ctx, root)
    }

    fn parse_ok(src: &str) -> (Context, NodeId) {
        let (ctx, root) = parse(src);
        assert!(!ctx.reporter().has_errors(), "Parse errors: {}", ctx.reporter().render());
        (ctx, root)
    }

    /// Statements in the body of the first function.
    fn body_stmts(ctx: &Context, root: NodeId) -> Vec<NodeId> {
        let NodeKind::File { decls } = ctx.kind(root) else { panic!("expected file") };
        let NodeKind::FunctionDecl { func, .. } = ctx.kind(decls[0]) else { panic!("expected fun") };
        let NodeKind::FunctionLitExpr { body, .. } = ctx.kind(*func) else { panic!("expected lit") };
        let NodeKind::BlockStmt { stmts } = ctx.kind(*body) else { panic!("expected block") };
        stmts.clone()
    }

    /// The single statement of `fun f() -> nil { <stmt> }`.
    fn only_stmt(ctx: &Context, root: NodeId) -> NodeId {
        let stmts = body_stmts(ctx, root);
        assert_eq!(stmts.len(), 1);
        stmts[0]
    }

    fn stmt(src: &str) -> (Context, NodeId) {
        let (ctx, root) = parse_ok(&format!("fun f() -> nil {{ {} }}", src));
        let stmt = only_stmt(&ctx, root);
        (ctx, stmt)
    }

    #[test]
    fn parse_function_decl() {
        let (ctx, root) = parse_ok("fun add(a: int32, b: int32) -> int32 { return a + b }");
        let counts = KindCounter::count(&ctx, root);
        assert_eq!(counts["FunctionDecl"], 1);
        assert_eq!(counts["FunctionLitExpr"], 1);
        assert_eq!(counts["FunctionTypeRepr"], 1);
        assert_eq!(counts["FieldDecl"], 2);
        assert_eq!(counts["ReturnStmt"], 1);
        assert_eq!(counts["BinaryOpExpr"], 1);
    }

    #[test]
    fn parse_struct_decl_with_mixed_separators() {
        let (ctx, root) = parse_ok("struct Row { a: int32, b: *Row; c: [*]uint8 d: map[string]bool }");
        let NodeKind::File { decls } = ctx.kind(root) else { panic!() };
        let NodeKind::StructDecl { name, type_repr } = ctx.kind(decls[0]) else { panic!() };
        assert_eq!(name, "Row");
        let NodeKind::StructTypeRepr { fields } = ctx.kind(*type_repr) else { panic!() };
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn parse_top_level_variables() {
        let (ctx, root) = parse_ok("var a: int32 = 1\nvar b = 2.50;\nvar c: *[10]float64");
        let counts = KindCounter::count(&ctx, root);
        assert_eq!(counts["VariableDecl"], 3);
        assert_eq!(counts["PointerTypeRepr"], 1);
        assert_eq!(counts["ArrayTypeRepr"], 1);
    }

    #[test]
    fn precedence() {
        let (ctx, stmt) = stmt("a + b * c == d or e and f");
        let NodeKind::ExpressionStmt { expr } = ctx.kind(stmt) else { panic!() };

        // or binds loosest
        let NodeKind::BinaryOpExpr { op: BinaryOp::Or, left, right } = ctx.kind(*expr) else {
            panic!("expected 'or' at the top, got {:?}", ctx.kind(*expr))
        };
        assert!(matches!(ctx.kind(*right), NodeKind::BinaryOpExpr { op: BinaryOp::And, .. }));

        let NodeKind::ComparisonOpExpr { op: CompareOp::Eq, left: sum, .. } = ctx.kind(*left) else {
            panic!("expected comparison")
        };
        let NodeKind::BinaryOpExpr { op: BinaryOp::Add, right: product, .. } = ctx.kind(*sum) else {
            panic!("expected addition")
        };
        assert!(matches!(ctx.kind(*product), NodeKind::BinaryOpExpr { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn bitwise_precedence() {
        let (ctx, stmt) = stmt("a | b ^ c & d");
        let NodeKind::ExpressionStmt { expr } = ctx.kind(stmt) else { panic!() };
        let NodeKind::BinaryOpExpr { op: BinaryOp::BitOr, right, .. } = ctx.kind(*expr) else {
            panic!()
        };
        let NodeKind::BinaryOpExpr { op: BinaryOp::BitXor, right, .. } = ctx.kind(*right) else {
            panic!()
        };
        assert!(matches!(ctx.kind(*right), NodeKind::BinaryOpExpr { op: BinaryOp::BitAnd, .. }));
    }

    #[test]
    fn parentheses_build_no_node() {
        let (ctx, stmt) = stmt("(a + b) * c");
        let NodeKind::ExpressionStmt { expr } = ctx.kind(stmt) else { panic!() };
        let NodeKind::BinaryOpExpr { op: BinaryOp::Mul, left, .. } = ctx.kind(*expr) else {
            panic!()
        };
        assert!(matches!(ctx.kind(*left), NodeKind::BinaryOpExpr { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn postfix_chains() {
        let (ctx, stmt) = stmt("rows[i].next.value = f(1, 2)(3)");
        let NodeKind::AssignmentStmt { dest, src } = ctx.kind(stmt) else { panic!() };
        assert!(matches!(ctx.kind(*dest), NodeKind::MemberExpr { .. }));
        let NodeKind::CallExpr { callee, args, .. } = ctx.kind(*src) else { panic!() };
        assert_eq!(args.len(), 1);
        assert!(matches!(ctx.kind(*callee), NodeKind::CallExpr { .. }));
    }

    #[test]
    fn unary_operators() {
        let (ctx, stmt) = stmt("*p = -~x");
        let counts = KindCounter::count(&ctx, stmt);
        assert_eq!(counts["UnaryOpExpr"], 3);
        assert_eq!(counts["AssignmentStmt"], 1);
    }

    #[test]
    fn builtin_call() {
        let (ctx, stmt) = stmt("@sizeOf(x)");
        let NodeKind::ExpressionStmt { expr } = ctx.kind(stmt) else { panic!() };
        let NodeKind::CallExpr { callee, call_kind, .. } = ctx.kind(*expr) else { panic!() };
        assert_eq!(*call_kind, CallKind::Builtin);
        assert_eq!(ctx.kind(*callee), &NodeKind::IdentifierExpr { name: "sizeOf".into() });
    }

    #[test]
    fn literals() {
        let (ctx, root) = parse_ok(r#"fun f() -> nil { g(1, 2.50, "s", true, false, nil) }"#);
        let lits: Vec<_> = (0..ctx.node_count() as u32)
            .map(NodeId)
            .filter_map(|id| match ctx.kind(id) {
                NodeKind::LitExpr { lit } => Some(lit.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(lits, vec!["1", "2.50", "\"s\"", "true", "false", "nil"]);
        assert_eq!(KindCounter::count(&ctx, root)["LitExpr"], 6);
    }

    #[test]
    fn function_literal_expression() {
        let (ctx, stmt) = stmt("var g = (a: int32) -> int32 { return a }");
        let NodeKind::DeclStmt { decl } = ctx.kind(stmt) else { panic!() };
        let NodeKind::VariableDecl { init: Some(init), .. } = ctx.kind(*decl) else { panic!() };
        assert!(matches!(ctx.kind(*init), NodeKind::FunctionLitExpr { .. }));
    }

    #[test]
    fn if_else_chain() {
        let (ctx, stmt) = stmt("if (a) { } else if (b) { } else { x = 1 }");
        let NodeKind::IfStmt { else_stmt: Some(nested), .. } = ctx.kind(stmt) else { panic!() };
        let NodeKind::IfStmt { else_stmt: Some(last), .. } = ctx.kind(*nested) else { panic!() };
        assert!(matches!(ctx.kind(*last), NodeKind::BlockStmt { .. }));
    }

    #[test]
    fn for_loop_forms() {
        let (ctx, s) = stmt("for () { }");
        assert!(matches!(
            ctx.kind(s),
            NodeKind::ForStmt { init: None, cond: None, next: None, .. }
        ));

        let (ctx, s) = stmt("for (i < 10) { }");
        assert!(matches!(
            ctx.kind(s),
            NodeKind::ForStmt { init: None, cond: Some(_), next: None, .. }
        ));

        let (ctx, s) = stmt("for (var i = 0; i < 10; i = i + 1) { }");
        let NodeKind::ForStmt { init: Some(init), cond: Some(_), next: Some(next), .. } = ctx.kind(s)
        else {
            panic!()
        };
        assert!(matches!(ctx.kind(*init), NodeKind::DeclStmt { .. }));
        assert!(matches!(ctx.kind(*next), NodeKind::AssignmentStmt { .. }));

        let (ctx, s) = stmt("for (;;) { }");
        assert!(matches!(ctx.kind(s), NodeKind::ForStmt { init: None, cond: None, next: None, .. }));

        let (ctx, s) = stmt("for (row in rows) { }");
        let NodeKind::ForInStmt { target, .. } = ctx.kind(s) else { panic!() };
        assert_eq!(ctx.kind(*target), &NodeKind::IdentifierExpr { name: "row".into() });
    }

    #[test]
    fn return_without_value_before_closing_brace() {
        let (ctx, s) = stmt("return\n");
        assert_eq!(ctx.kind(s), &NodeKind::ReturnStmt { ret: None });

        let (ctx, s) = stmt("return -1");
        assert!(matches!(ctx.kind(s), NodeKind::ReturnStmt { ret: Some(_) }));
    }

    #[test]
    fn semicolons_are_optional() {
        let (ctx, root) = parse_ok("fun f() -> nil { var a = 1; a = 2\n a = 3;; }");
        assert_eq!(KindCounter::count(&ctx, root)["AssignmentStmt"], 2);
    }

    #[test]
    fn nodes_are_positioned_at_their_leading_token() {
        let (ctx, s) = stmt("x = y");
        assert_eq!(ctx.pos(s).to_string(), "1:18");
        let NodeKind::AssignmentStmt { src, .. } = ctx.kind(s) else { panic!() };
        assert_eq!(ctx.pos(*src).to_string(), "1:22");
    }

    #[test]
    fn unexpected_token_message() {
        let (ctx, _) = parse("fun f( -> nil { }");
        let diag = &ctx.reporter().diagnostics()[0];
        assert_eq!(diag.kind.category(), ErrorCategory::Syntactic);
        assert_eq!(diag.to_string(), "1:8: error: expected a name, found '->'");
    }

    #[test]
    fn recovers_inside_blocks() {
        let src = "fun f() -> nil {\n  var a = )\n  var b = 1\n  c = ]\n}\nfun g() -> nil { }";
        let (ctx, root) = parse(src);
        assert_eq!(ctx.reporter().error_count(), 2);

        // both functions and the good statement survive
        let counts = KindCounter::count(&ctx, root);
        assert_eq!(counts["FunctionDecl"], 2);
        assert_eq!(counts["DeclStmt"], 1);
    }

    #[test]
    fn each_line_gets_its_own_error() {
        let (ctx, root) = parse("fun f() -> nil {\n  x = )\n  y = ]\n}\n");
        let diags = ctx.reporter().diagnostics();
        assert_eq!(diags.len(), 2, "{}", ctx.reporter().render());
        assert_eq!(diags[0].pos.line, 2);
        assert_eq!(diags[1].pos.line, 3);
        assert_eq!(KindCounter::count(&ctx, root)["FunctionDecl"], 1);
    }

    #[test]
    fn recovery_resumes_at_the_next_line() {
        let (ctx, root) = parse("fun f() -> nil {\n  x = ) 1 2\n  y = 3\n}");
        assert_eq!(ctx.reporter().error_count(), 1);
        assert_eq!(KindCounter::count(&ctx, root)["AssignmentStmt"], 1);
    }

    #[test]
    fn recovers_at_top_level() {
        let (ctx, root) = parse("fun 1 { x }\nstruct S { a: int32 }\n)\nvar v = 1");
        assert_eq!(ctx.reporter().error_count(), 2);
        let counts = KindCounter::count(&ctx, root);
        assert_eq!(counts["StructDecl"], 1);
        assert_eq!(counts["VariableDecl"], 1);
    }

    #[test]
    fn invalid_tokens_are_lexical_errors() {
        let (ctx, root) = parse("fun f() -> nil { var a = 1 $ }");
        let diags = ctx.reporter().diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, ErrorKind::UnexpectedCharacter("$".into()));
        assert_eq!(KindCounter::count(&ctx, root)["DeclStmt"], 1);
    }

    #[test]
    fn error_cap_stops_parsing() {
        let mut ctx = Context::new();
        let config = ParserConfig { max_errors: 3, ..ParserConfig::default() };
        let src = "$ $ $ $ $ $ fun f() -> nil { }";
        let root = Parser::with_config(Scanner::new(src), &mut ctx, config).parse();
        assert_eq!(ctx.reporter().error_count(), 3);
        assert!(matches!(ctx.kind(root), NodeKind::File { .. }));
    }

    #[test]
    fn dump_is_deterministic() {
        let src = "fun main() -> int32 { var x = 1.50 if (x > 0) { return 1 } return 0 }";
        let (a, ra) = parse_ok(src);
        let (b, rb) = parse_ok(src);
        assert_eq!(AstDump::dump(&a, ra), AstDump::dump(&b, rb));
        assert_eq!(body_stmts(&a, ra).len(), 3);
    }

    #[test]
    fn integer_literal_value() {
        let (ctx, s) = stmt("x = 42");
        let NodeKind::AssignmentStmt { src, .. } = ctx.kind(s) else { panic!() };
        assert_eq!(ctx.kind(*src), &NodeKind::LitExpr { lit: Literal::Int { value: 42, text: "42".into() } });
    }

    #[test]
    fn integer_literal_keeps_spelling() {
        let (ctx, s) = stmt("x = 007");
        let NodeKind::AssignmentStmt { src, .. } = ctx.kind(s) else { panic!() };
        assert_eq!(ctx.kind(*src), &NodeKind::LitExpr { lit: Literal::Int { value: 7, text: "007".into() } });
        let (ctx, root) = parse_ok("fun f() -> nil { x = 007 }");
        assert!(AstDump::dump(&ctx, root).contains("LitExpr <1:22> 007"));
    }

    #[test]
    fn string_literal_dumps_its_source_text() {
        let (ctx, s) = stmt("x = \"a\\tb\"");
        let NodeKind::AssignmentStmt { src, .. } = ctx.kind(s) else { panic!() };
        let NodeKind::LitExpr { lit: Literal::String { value, text } } = ctx.kind(*src) else { panic!() };
        assert_eq!(value, "a\tb");
        assert_eq!(text, "\"a\\tb\"");

        // a raw tab in the source stays a raw tab in the dump
        let (ctx, root) = parse_ok("fun f() -> nil { x = \"a\tb\" }");
        assert!(AstDump::dump(&ctx, root).contains("LitExpr <1:22> \"a\tb\""));
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let mut ctx = Context::new();
        let config = ParserConfig { max_depth: 8, ..ParserConfig::default() };
        let src = format!("fun f() -> nil {{ x = {}1{} }}", "(".repeat(20), ")".repeat(20));
        let root = Parser::with_config(Scanner::new(&src), &mut ctx, config).parse();
        let diags = ctx.reporter().diagnostics();
        assert_eq!(diags.len(), 1, "{}", ctx.reporter().render());
        assert!(diags[0].to_string().contains("levels of nesting"), "{}", diags[0]);
        assert_eq!(KindCounter::count(&ctx, root)["FunctionDecl"], 1);
    }

    #[test]
    fn nesting_below_the_limit_parses() {
        let src = format!("fun f() -> nil {{ x = {}1{} }}", "(".repeat(50), ")".repeat(50));
        parse_ok(&src);
    }
}
