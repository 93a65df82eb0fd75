// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Scanner for the TPL execution language.
//!
//! Turns a source buffer into a lazy stream of tokens for the parser.

mod scanner;

pub use scanner::{string_spelling, Scanner};
