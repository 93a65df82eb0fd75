// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! TPL CLI: runs the front end over a file and shows tokens, trees or
//! diagnostics.

mod output;

use std::env;
use std::fs;
use std::process;

use tpl_ast::token::TokenKind;
use tpl_ast::ErrorKind;
use tpl_compiler::{compile, CompileOptions, Compilation};
use tpl_diagnostics::codes::ErrorCodeRegistry;
use tpl_diagnostics::convert::convert_all;
use tpl_diagnostics::formatter::DiagnosticFormatter;
use tpl_diagnostics::json::{to_json_report, to_json_string};
use tpl_lexer::Scanner;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Human,
    Json,
}

fn main() {
    env_logger::init();
    output::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let json = args.iter().any(|a| a == "--json");
    let format = if json { Format::Json } else { Format::Human };
    let positional: Vec<&str> = args[2..].iter().map(String::as_str).filter(|a| !a.starts_with("--")).collect();

    match args[1].as_str() {
        "lex" => cmd_lex(require_file("lex", &positional), format),
        "parse" => cmd_parse(require_file("parse", &positional), format),
        "check" => cmd_check(require_file("check", &positional), format),
        "dump" => cmd_dump(require_file("dump", &positional), format),
        "explain" => {
            let Some(code) = positional.first() else {
                eprintln!("Usage: tpl explain <code>");
                process::exit(1);
            };
            cmd_explain(code);
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => println!("tpl {}", VERSION),
        other => {
            // Treat as filename
            if other.ends_with(".tpl") {
                cmd_check(other, format);
            } else {
                eprintln!("Unknown command: {}", other);
                print_usage();
                process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("TPL {} - front end for the TPL execution language", VERSION);
    println!();
    println!("Usage: tpl <command> [args] [--json]");
    println!();
    println!("Commands:");
    println!("  lex <file>       Tokenize a file and print tokens");
    println!("  parse <file>     Parse a file and print the syntax tree");
    println!("  check <file>     Parse and type check a file");
    println!("  dump <file>      Type check a file and print the annotated tree");
    println!("  explain <code>   Describe an error code (e.g. E0303)");
    println!("  help             Show this help");
    println!("  version          Show version");
    println!();
    println!("Set RUST_LOG=debug for compiler tracing.");
}

fn require_file<'a>(command: &str, positional: &[&'a str]) -> &'a str {
    match positional.first() {
        Some(path) => path,
        None => {
            eprintln!("Usage: tpl {} <file.tpl> [--json]", command);
            process::exit(1);
        }
    }
}

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => {
            log::debug!("read {} ({} bytes)", path, s.len());
            s
        }
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), path, e);
            process::exit(1);
        }
    }
}

fn cmd_lex(path: &str, format: Format) {
    let source = read_source(path);
    let mut errors = Vec::new();
    let mut lines = Vec::new();

    for token in Scanner::new(&source) {
        if let TokenKind::Invalid(kind) = token.kind {
            errors.push(tpl_ast::Diagnostic { kind: ErrorKind::from_lex(kind, &token.text), pos: token.pos });
            continue;
        }
        lines.push(format!("{:>8}  {:<12} {}", token.pos.to_string(), token.kind.display_name(), token.text));
    }

    log::info!("lex {}: {} tokens, {} errors", path, lines.len(), errors.len());
    report(path, &source, &errors, "lex", format);
    if format == Format::Human {
        println!("{}\n", output::section(&format!("Tokens ({})", lines.len())));
        for line in &lines {
            println!("{}", line);
        }
        println!("\n{}", output::banner_ok("Lex"));
    }
}

fn cmd_parse(path: &str, format: Format) {
    let source = read_source(path);
    let result = compile(&source, &CompileOptions { check: false, ..Default::default() });
    finish(path, &source, &result, "parse", format, true);
}

fn cmd_check(path: &str, format: Format) {
    let source = read_source(path);
    let result = compile(&source, &CompileOptions::default());
    finish(path, &source, &result, "check", format, false);
}

fn cmd_dump(path: &str, format: Format) {
    let source = read_source(path);
    let result = compile(&source, &CompileOptions::default());
    finish(path, &source, &result, "check", format, true);
}

/// Print diagnostics, and the tree if requested and the run was clean.
fn finish(path: &str, source: &str, result: &Compilation, phase: &str, format: Format, show_tree: bool) {
    // Sema never runs on a tree with syntax errors.
    let phase = if result.root.is_none() { "parse" } else { phase };
    log::info!("{} {}: {} diagnostics", phase, path, result.diagnostics().len());
    report(path, source, result.diagnostics(), phase, format);
    if format == Format::Json {
        return;
    }

    if show_tree {
        if let Some(dump) = result.dump() {
            print!("{}", dump);
            println!();
        }
    }
    let title = if phase == "check" { "Check" } else { "Parse" };
    println!("{}", output::banner_ok(title));
}

/// Print `diagnostics` in the requested format and exit with status 1 if
/// there are any. A JSON report is printed even when empty.
fn report(path: &str, source: &str, diagnostics: &[tpl_ast::Diagnostic], phase: &str, format: Format) {
    let rich = convert_all(diagnostics, source);
    match format {
        Format::Json => {
            let report = to_json_report(&rich, source, path, phase);
            println!("{}", to_json_string(&report));
            if !report.success {
                process::exit(1);
            }
        }
        Format::Human if rich.is_empty() => {}
        Format::Human => {
            let formatter = DiagnosticFormatter::new(source).with_file_name(path);
            eprintln!("{}", formatter.format_all(&rich));
            let title = match phase {
                "lex" => "Lex",
                "parse" => "Parse",
                _ => "Check",
            };
            eprintln!("{}", output::banner_fail(title, rich.len()));
            process::exit(1);
        }
    }
}

fn cmd_explain(code: &str) {
    let registry = ErrorCodeRegistry::default();
    let code = code.to_ascii_uppercase();
    log::debug!("explain {} ({} known codes)", code, registry.all().count());
    match registry.get(&code) {
        Some(info) => {
            println!("{}: {}", output::code(info.code), info.title);
            println!("category: {}", info.category);
        }
        None => {
            eprintln!("{}: unknown error code '{}'", output::error_label(), code);
            eprintln!("known codes:");
            for info in registry.all() {
                eprintln!("  {}  {}", info.code, info.title);
            }
            process::exit(1);
        }
    }
}
