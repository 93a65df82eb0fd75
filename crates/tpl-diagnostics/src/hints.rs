// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.

use tpl_ast::ErrorKind;

/// Get a hint for an "expected X, found Y" error. Both sides are the
/// rendered strings from the message.
pub fn for_expected(expected: &str, found: &str) -> Option<&'static str> {
    match (expected, found) {
        // Colon hints
        ("':'", "'='") => Some("use ':' for types, '=' for values"),
        ("':'", _) => Some("syntax: name: type"),

        // Block hints
        ("'{'", _) => Some("blocks start with '{'"),
        ("'}'", "end of file") => Some("every '{' needs a matching '}'"),

        // Parentheses hints
        ("'('", _) => Some("conditions and parameter lists are written in parentheses"),
        ("')'", "end of file") => Some("add ')' to close the parenthesis"),
        ("']'", "end of file") => Some("add ']' to close the bracket"),

        // Function types
        ("'->'", _) => Some("every function declares its result, e.g. '-> nil'"),

        // Expression hints
        ("an expression", "'='") => Some("put the value after '='"),
        ("an expression", "';'") => Some("statement is incomplete"),
        ("an expression", _) => Some("try a value, variable, or function call"),

        // Name hints
        ("a name", f) if f.starts_with("'") && f[1..].starts_with(|c: char| c.is_ascii_digit()) => {
            Some("names can't start with a number")
        }
        ("a name", _) => Some("names start with a letter or '_'"),

        // Type hints
        ("a type", _) => Some("try a type like 'int32', '*T', '[N]T', 'map[K]V' or a struct name"),
        ("an array length or '*'", _) => Some("array lengths are integer literals, or '*' for unknown"),

        // Declarations
        (s, _) if s.starts_with("a declaration") => Some("top-level items start with 'fun', 'struct' or 'var'"),

        _ => None,
    }
}

/// A hint for a semantic error, if there is a common fix.
pub fn for_kind(kind: &ErrorKind) -> Option<&'static str> {
    match kind {
        ErrorKind::UnexpectedToken { expected, found } => for_expected(expected, found),
        ErrorKind::UnterminatedString => Some("close the string with '\"' before the end of the line"),
        ErrorKind::UnterminatedComment => Some("close the comment with '*/'"),
        ErrorKind::InvalidEscape => Some("supported escapes are \\n, \\r, \\t, \\0, \\\\ and \\\""),
        ErrorKind::UndefinedIdentifier(_) => Some("declare it with 'var' or 'fun' before using it"),
        ErrorKind::MismatchedBinaryOperands { .. } | ErrorKind::IncompatibleAssignment { .. } => {
            Some("only widening conversions are implicit; narrowing and sign changes are not")
        }
        ErrorKind::IncompatibleArgument { .. } => Some("arguments convert to parameters only by widening"),
        ErrorKind::NonBoolCondition(_) => Some("compare explicitly, e.g. 'x != 0'"),
        ErrorKind::NotAssignable => Some("only variables, elements, fields and dereferences can be assigned"),
        ErrorKind::CannotInferType(_) => Some("add a type annotation, e.g. 'var p: *T = nil'"),
        ErrorKind::UnknownBuiltin(_) => Some("available builtins are @sizeOf and @ptrCast"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_depend_on_what_was_found() {
        assert_eq!(for_expected("':'", "'='"), Some("use ':' for types, '=' for values"));
        assert_eq!(for_expected("a name", "'1'"), Some("names can't start with a number"));
        assert_eq!(for_expected("a name", "'->'"), Some("names start with a letter or '_'"));
        assert_eq!(for_expected("')'", "'}'"), None);
    }

    #[test]
    fn unexpected_tokens_use_expected_hints() {
        let kind = ErrorKind::UnexpectedToken { expected: "an expression".into(), found: "';'".into() };
        assert_eq!(for_kind(&kind), Some("statement is incomplete"));
        assert_eq!(for_kind(&ErrorKind::InvalidIndex("int32".into())), None);
    }
}
