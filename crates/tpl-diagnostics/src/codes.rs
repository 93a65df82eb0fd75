// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! Maps error codes (E0001, E0301, etc.) to titles and categories.
//! Used by `tpl explain <code>` and for error display.

use std::collections::HashMap;

use tpl_ast::{ErrorCategory, ErrorKind};

/// Registry of all known error codes.
pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

/// Information about a single error code.
#[derive(Debug)]
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                // Scanner errors (E00xx)
                "E0001" => ("unexpected character", Lexical),
                "E0002" => ("unterminated string literal", Lexical),
                "E0003" => ("unterminated block comment", Lexical),
                "E0004" => ("invalid number literal", Lexical),
                "E0005" => ("invalid escape sequence", Lexical),

                // Parser errors (E01xx)
                "E0100" => ("unexpected token", Syntactic),

                // Name errors (E02xx)
                "E0200" => ("undefined identifier", Semantic),
                "E0201" => ("duplicate declaration", Semantic),
                "E0202" => ("unknown type", Semantic),
                "E0203" => ("unknown builtin", Semantic),

                // Type errors (E03xx)
                "E0300" => ("mismatched operand types", Semantic),
                "E0301" => ("invalid operand type", Semantic),
                "E0302" => ("incomparable operands", Semantic),
                "E0303" => ("incompatible assignment", Semantic),
                "E0304" => ("destination is not assignable", Semantic),
                "E0305" => ("type is not callable", Semantic),
                "E0306" => ("arity mismatch", Semantic),
                "E0307" => ("incompatible argument", Semantic),
                "E0308" => ("type cannot be indexed", Semantic),
                "E0309" => ("index is not an integer", Semantic),
                "E0310" => ("type has no members", Semantic),
                "E0311" => ("no such field", Semantic),
                "E0312" => ("condition is not a bool", Semantic),
                "E0313" => ("type is not iterable", Semantic),
                "E0314" => ("mismatched return type", Semantic),
                "E0315" => ("missing return value", Semantic),
                "E0316" => ("unexpected return value", Semantic),
                "E0317" => ("cannot infer type", Semantic),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    /// All codes, sorted.
    pub fn all(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        let mut infos: Vec<_> = self.codes.values().collect();
        infos.sort_by_key(|info| info.code);
        infos.into_iter()
    }
}

/// The code reported for an error kind.
pub fn code_for(kind: &ErrorKind) -> &'static str {
    use ErrorKind::*;

    match kind {
        UnexpectedCharacter(_) => "E0001",
        UnterminatedString => "E0002",
        UnterminatedComment => "E0003",
        InvalidNumber(_) => "E0004",
        InvalidEscape => "E0005",

        UnexpectedToken { .. } => "E0100",

        UndefinedIdentifier(_) => "E0200",
        Redeclaration(_) => "E0201",
        UnknownType(_) => "E0202",
        UnknownBuiltin(_) => "E0203",

        MismatchedBinaryOperands { .. } => "E0300",
        InvalidOperand { .. } => "E0301",
        IncomparableOperands { .. } => "E0302",
        IncompatibleAssignment { .. } => "E0303",
        NotAssignable => "E0304",
        NotAFunction(_) => "E0305",
        ArityMismatch { .. } => "E0306",
        IncompatibleArgument { .. } => "E0307",
        InvalidIndex(_) => "E0308",
        NonIntegerIndex(_) => "E0309",
        InvalidMemberAccess(_) => "E0310",
        NoSuchField { .. } => "E0311",
        NonBoolCondition(_) => "E0312",
        NotIterable(_) => "E0313",
        ReturnTypeMismatch { .. } => "E0314",
        MissingReturnValue(_) => "E0315",
        UnexpectedReturnValue => "E0316",
        CannotInferType(_) => "E0317",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_is_registered_with_matching_category() {
        let registry = ErrorCodeRegistry::default();
        let samples = [
            ErrorKind::UnterminatedComment,
            ErrorKind::UnexpectedToken { expected: "')'".into(), found: "'}'".into() },
            ErrorKind::UndefinedIdentifier("x".into()),
            ErrorKind::IncompatibleAssignment { dest: "int32".into(), src: "string".into() },
            ErrorKind::CannotInferType("x".into()),
        ];
        for kind in samples {
            let info = registry.get(code_for(&kind)).expect("registered");
            assert_eq!(info.category, kind.category());
        }
    }

    #[test]
    fn listing_is_sorted() {
        let registry = ErrorCodeRegistry::default();
        let codes: Vec<_> = registry.all().map(|i| i.code).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(codes.first(), Some(&"E0001"));
    }
}
