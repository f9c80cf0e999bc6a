//! # Introduction
//!
//! langfront is the front end of a small statically typed language. It reads
//! source text once, front to back, and produces an AST in which every name
//! already points at its symbol table entry and every expression carries its
//! type.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser (+ scopes, name and type binding) → Program
//! ```
//!
//! 1. [`parser::lexer`] turns characters into tokens on demand.
//! 2. [`parser`] is the recursive descent translator. It opens and closes
//!    scopes as it goes and resolves each identifier where it is read.
//! 3. [`symbols`] is the arena of nested scopes and their entries.
//! 4. [`analysis`] infers a function's return type from its `return`s.
//!
//! The first error aborts translation.

pub mod analysis;
pub mod parser;
pub mod symbols;

use parser::{ParseError, Parser, Program};

/// Translate a whole source text.
pub fn translate(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.program()
}
