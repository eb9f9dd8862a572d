//! `go2py` library crate.
//!
//! High-level layout:
//! - `ast`: the source-language syntax tree, handed over by an external parser
//! - `lower` + `zero`: rewrite source expressions into target expressions
//! - `pyast`: the target-language syntax tree
//! - `printer`: renders the target tree as indented source text
pub mod ast;
pub mod lower;
pub mod printer;
pub mod pyast;
pub mod zero;
