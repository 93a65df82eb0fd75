// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rich terminal formatter for diagnostics.
//!
//! ```text
//! error[E0303]: cannot assign a value of type 'string' to a destination of type 'int32'
//!   --> main.tpl:2:18
//!    |
//!  2 |   var n: int32 = "hello"
//!    |                  ^^^^^^^ expected 'int32'
//!    |
//!    = help: only widening conversions are implicit; narrowing and sign changes are not
//! ```

use colored::Colorize;

use tpl_ast::LineMap;

use crate::{Diagnostic, Label, LabelStyle, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, file_name: None, line_map: LineMap::new(source) }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.format_header(&mut out, diagnostic);

        let mut labels: Vec<&Label> = diagnostic.labels.iter().collect();
        labels.sort_by_key(|l| (l.pos.line, l.pos.column));

        if let Some(first) = labels.first() {
            let file = self.file_name.unwrap_or("<source>");
            out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue(), file, first.pos.line, first.pos.column));

            let max_line = labels.iter().map(|l| l.pos.line).max().unwrap_or(1);
            let gutter_width = max_line.to_string().len().max(2);
            out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));

            let mut prev_line = None;
            for label in labels {
                if prev_line != Some(label.pos.line) {
                    if prev_line.is_some_and(|prev| label.pos.line > prev + 1) {
                        out.push_str(&format!("{} {}\n", " ".repeat(gutter_width), "...".blue()));
                    }
                    let text = self.line_map.line_text(self.source, label.pos.line).unwrap_or("");
                    out.push_str(&format!(
                        "{:>width$} {} {}\n",
                        label.pos.line.to_string().blue().bold(),
                        "|".blue(),
                        text,
                        width = gutter_width + 1,
                    ));
                    prev_line = Some(label.pos.line);
                }
                self.format_label(&mut out, label, gutter_width);
            }
        }

        self.format_footer(&mut out, diagnostic);
        out
    }

    /// Format every diagnostic, separated by blank lines.
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics.iter().map(|d| self.format(d)).collect::<Vec<_>>().join("\n")
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
        };

        match diagnostic.code {
            Some(ref code) => out.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code.0.clone().red().bold(),
                diagnostic.message.bold()
            )),
            None => out.push_str(&format!("{}: {}\n", severity_str, diagnostic.message.bold())),
        }
    }

    fn format_label(&self, out: &mut String, label: &Label, gutter_width: usize) {
        let (marker, message) = match label.style {
            LabelStyle::Primary => (
                "^".repeat(label.width).red().bold(),
                label.message.as_deref().unwrap_or("").red().bold(),
            ),
        };
        let indent = " ".repeat((label.pos.column as usize).saturating_sub(1));
        let line = format!("{} {} {}{} {}", " ".repeat(gutter_width + 1), "|".blue(), indent, marker, message);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic) {
        let gutter = " ".repeat(3);

        if !diagnostic.notes.is_empty() || diagnostic.help.is_some() {
            out.push_str(&format!("{}{}\n", gutter, "|".blue()));
        }
        for note in &diagnostic.notes {
            out.push_str(&format!("{}{} {}: {}\n", gutter, "=".cyan(), "note".cyan().bold(), note));
        }
        if let Some(ref help) = diagnostic.help {
            out.push_str(&format!("{}{} {}: {}\n", gutter, "=".cyan(), "help".cyan().bold(), help));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpl_ast::SourcePosition;

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        f()
    }

    #[test]
    fn renders_source_line_and_caret() {
        let source = "fun f() -> nil {\n  var n: int32 = \"hello\"\n}";
        let diag = Diagnostic::error("cannot assign")
            .with_code("E0303")
            .with_primary(SourcePosition::new(2, 18, 34), 7, "expected 'int32'")
            .with_help("only widening conversions are implicit");

        let out = plain(|| DiagnosticFormatter::new(source).with_file_name("main.tpl").format(&diag));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "error[E0303]: cannot assign");
        assert_eq!(lines[1], "  --> main.tpl:2:18");
        assert_eq!(lines[3], "  2 |   var n: int32 = \"hello\"");
        assert_eq!(lines[4], "    |                  ^^^^^^^ expected 'int32'");
        assert_eq!(lines.last(), Some(&"   = help: only widening conversions are implicit"));
    }

    #[test]
    fn diagnostics_without_labels_have_no_snippet() {
        let diag = Diagnostic::error("something odd").with_note("a note");
        let out = plain(|| DiagnosticFormatter::new("").format(&diag));
        assert_eq!(out, "error: something odd\n   |\n   = note: a note\n");
    }
}
