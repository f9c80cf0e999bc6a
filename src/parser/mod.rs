//! Single-pass front end
//!
//! This module turns source text into a resolved AST in one pass:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: the [`Parser`] state and shared helpers
//! - [`declarations`], [`statements`], [`expressions`]: the grammar rules
//! - [`ast`]: AST node definitions
//! - [`errors`]: the [`ParseError`] taxonomy
//! - [`display`]: tree printing
//!
//! # Language
//!
//! - Top level: `var` declarations and function definitions
//! - Types: `int`, `float`, `bool`, `string` (built in, never declared)
//! - Statements: blocks, `if/else`, `while`, `for`, `return`, `var`, expressions
//! - Expressions: assignment, `||`, `&&`, comparisons, `+ -`, `* /`, calls
//!
//! Scopes are built and every name is bound while the tokens are read;
//! there is no separate resolution pass.

pub mod ast;
pub mod declarations;
pub mod display;
pub mod errors;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;

pub use ast::Program;
pub use errors::ParseError;
pub use parse::Parser;
