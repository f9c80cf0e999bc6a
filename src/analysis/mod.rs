//! Passes that run over already translated nodes.
//!
//! - [`return_type`]: unifies the types of a function body's `return`s

pub mod return_type;
