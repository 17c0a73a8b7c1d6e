//! Frame-range expression pipeline: lexer, parser, expander, resolver.
//!
//! The grammar, informally:
//!
//! ```text
//! expression     := clause (separator clause)*
//! clause         := exclude_clause | include_clause
//! include_clause := number ("-" number)? ("x" number)?
//! exclude_clause := ("^"|"!") number ("-" number)? ("x" number)?
//! separator      := "," | ";" | whitespace
//! number         := ["-"]? digit+ ("." digit+)?
//! ```

pub(crate) mod lexer;

pub mod expand;
pub mod parser;
pub mod resolve;
