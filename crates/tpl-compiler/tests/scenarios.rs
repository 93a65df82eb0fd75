// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end checks of the front end: source text in, tree dump and
//! diagnostics out.

use std::collections::BTreeSet;

use tpl_ast::{AstKind, ErrorCategory, ErrorKind, KindCounter, SourcePosition};
use tpl_compiler::{compile, CompileOptions, Compilation};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run(source: &str) -> Compilation {
    init_logger();
    compile(source, &CompileOptions::default())
}

fn run_ok(source: &str) -> (Compilation, String) {
    let result = run(source);
    assert!(!result.has_errors(), "unexpected errors:\n{}", result.context.reporter().render());
    let dump = result.dump().expect("clean compilation has a tree");
    (result, dump)
}

/// Number of dump lines that describe a node of `kind`.
fn dump_lines_of(dump: &str, kind: &str) -> usize {
    let prefix = format!("{} <", kind);
    dump.lines().filter(|line| line.trim_start().starts_with(&prefix)).count()
}

#[test]
fn nested_ifs_with_comparisons() {
    let src = "fun f1(xyz: int) -> void { if (xyz < 67890) { if (xyz < 12345) { if (xyz < 1) {} else {} } } }";
    let (result, dump) = run_ok(src);

    for needle in ["FunctionDecl", "IfStmt", "ComparisonOpExpr", "BlockStmt", "xyz", "12345", "67890"] {
        assert!(dump.contains(needle), "dump is missing {needle}:\n{dump}");
    }
    let root = result.root.expect("root");
    let counts = KindCounter::count(&result.context, root);
    assert_eq!(counts["IfStmt"], 3);
    assert_eq!(counts["ComparisonOpExpr"], 3);
}

#[test]
fn conditional_loop_then_return() {
    let src = "fun test(xxxxxx: int) -> int { for (xxxxxx + 777777 < 888888) { } return 999999 }";
    let (_, dump) = run_ok(src);

    for needle in ["ForStmt", "BinaryOpExpr", "ComparisonOpExpr", "ReturnStmt", "777777", "888888", "999999"] {
        assert!(dump.contains(needle), "dump is missing {needle}:\n{dump}");
    }
}

#[test]
fn return_value_on_the_following_line() {
    let src = "fun test(x: int) -> int {\n  for (x < 10) {\n    x = x + 1\n  }\n  return\n    x\n}";
    let (_, dump) = run_ok(src);
    let ret = dump.lines().position(|l| l.trim_start().starts_with("ReturnStmt")).expect("return");
    let next = dump.lines().nth(ret + 1).expect("return value");
    assert!(next.trim_start().starts_with("IdentifierExpr"), "got {next}");
}

#[test]
fn sibling_functions() {
    let src = "fun XXXXXX(a: int) -> void { }\nfun yyyyyy(b: int) -> void { }";
    let (result, dump) = run_ok(src);

    assert!(dump.contains("XXXXXX"));
    assert!(dump.contains("yyyyyy"));
    let counts = KindCounter::count(&result.context, result.root.expect("root"));
    assert_eq!(counts["FunctionDecl"], 2);
    assert_eq!(dump_lines_of(&dump, "FunctionDecl"), 2);
}

#[test]
fn call_to_undeclared_function() {
    let result = run("fun main() -> nil {\n  undefinedFn(1)\n}");
    assert!(result.has_errors());

    let diags = result.diagnostics();
    assert_eq!(diags.len(), 1, "{:?}", diags);
    assert_eq!(diags[0].kind, ErrorKind::UndefinedIdentifier("undefinedFn".into()));
    assert_eq!(diags[0].pos, SourcePosition::new(2, 3, 22));
    assert!(diags[0].to_string().contains("undefinedFn"));
}

#[test]
fn string_into_integer_variable() {
    let result = run("fun main() -> nil {\n  var n: int = \"hello\"\n}");
    assert!(result.has_errors());

    let diag = &result.diagnostics()[0];
    assert_eq!(
        diag.kind,
        ErrorKind::IncompatibleAssignment { dest: "int32".into(), src: "string".into() }
    );
    let message = diag.kind.to_string();
    assert!(message.contains("int32") && message.contains("string"), "{message}");

    let counts = KindCounter::count(&result.context, result.root.expect("sema ran"));
    assert!(!counts.contains_key("ImplicitCastExpr"));
}

#[test]
fn widening_shows_up_as_implicit_cast() {
    let src = "fun f(a: int32) -> int64 { var b: int64 = a\n return b + a }";
    let (_, dump) = run_ok(src);
    assert_eq!(dump_lines_of(&dump, "ImplicitCastExpr"), 2);
    assert!(dump.contains("ImplicitCastExpr <1:43> IntegralCast : int64"), "{dump}");
}

#[test]
fn dump_is_deterministic() {
    let src = "struct P { x: int32 }\nfun f(p: *P) -> int32 { return p.x * 2 }";
    let (_, first) = run_ok(src);
    let (_, second) = run_ok(src);
    assert_eq!(first, second);
}

#[test]
fn dump_lists_every_node_once() {
    let src = r#"
struct Point { x: int32, y: int32 }
var origin: *Point = nil

fun sum(xs: [8]int32, scale: float64) -> float64 {
  var total: int64 = 0
  for (x in xs) { total = total + x }
  var weights: map[string]int32
  var p: Point
  p.x = -xs[0]
  var f: (a: int32) -> int32 = (a: int32) -> int32 { return a }
  var anon: struct { a: int32 }
  for (var i = 0; i < 8; i = i + 1) {
    if (f(i) == 0) { anon.a = i }
  }
  @sizeOf(p)
  return scale
}
"#;
    let (result, dump) = run_ok(src);
    let counts = KindCounter::count(&result.context, result.root.expect("root"));

    for (kind, count) in &counts {
        assert_eq!(dump_lines_of(&dump, kind), *count, "count mismatch for {kind}");
    }
    let seen: BTreeSet<&str> = counts.keys().copied().collect();
    let all: BTreeSet<&str> = AstKind::ALL.iter().map(|k| k.name()).collect();
    assert_eq!(seen, all, "program should exercise every node kind");
}

#[test]
fn recovers_from_several_syntax_errors() {
    let src = "fun f( -> nil { }\nfun g() -> nil { var = 1 }\nfun h() -> nil { }";
    let result = run(src);

    assert!(result.root.is_none());
    let syntax = result
        .diagnostics()
        .iter()
        .filter(|d| d.kind.category() == ErrorCategory::Syntactic)
        .count();
    assert!(syntax >= 2, "{:?}", result.diagnostics());
}

#[test]
fn recovers_on_consecutive_lines() {
    let result = run("fun f() -> nil {\n  x = )\n  y = ]\n}");
    assert!(result.root.is_none());
    let lines: Vec<u32> = result
        .diagnostics()
        .iter()
        .filter(|d| d.kind.category() == ErrorCategory::Syntactic)
        .map(|d| d.pos.line)
        .collect();
    assert_eq!(lines, vec![2, 3], "{:?}", result.diagnostics());
}

#[test]
fn deeply_nested_parentheses_are_reported() {
    let src = format!("fun f() -> int32 {{ return {}1{} }}", "(".repeat(1000), ")".repeat(1000));
    let result = run(&src);
    assert!(result.root.is_none());
    let diags = result.diagnostics();
    assert_eq!(diags.len(), 1, "{:?}", diags);
    assert!(diags[0].to_string().contains("levels of nesting"), "{}", diags[0]);
}

#[test]
fn literals_dump_as_written() {
    let (_, dump) = run_ok("fun f() -> nil {\n  var a: int32 = 007\n  var s = \"x\\ty\"\n}");
    assert!(dump.contains("LitExpr <2:18> 007 : int32"), "{dump}");
    assert!(dump.contains("LitExpr <3:11> \"x\\ty\" : string"), "{dump}");
}

#[test]
fn lexical_errors_stop_before_sema() {
    let result = run("fun f() -> nil { var s = \"open\n}");
    assert!(result.root.is_none());
    assert!(result.diagnostics().iter().any(|d| d.kind == ErrorKind::UnterminatedString));
}

#[test]
fn compilations_are_independent_across_threads() {
    init_logger();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let src = format!("fun f{i}(a: int32) -> int32 {{ return a + {i} }}");
                let result = compile(&src, &CompileOptions::default());
                (result.has_errors(), result.dump().unwrap_or_default())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (failed, dump) = handle.join().expect("thread panicked");
        assert!(!failed);
        assert!(dump.contains(&format!("FunctionDecl <1:1> f{i}")));
    }
}
