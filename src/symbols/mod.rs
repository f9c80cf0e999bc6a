//! Scope tables
//!
//! - [`ids`]: typed handles ([`ScopeId`], [`EntryId`], [`DeclId`])
//! - [`entry`]: what a name can be bound to (type, variable, function)
//! - [`table`]: the arena of nested scopes with outward lookup
//!
//! # Built-in Types
//!
//! The translator seeds the root scope with these primitive types:
//! - `int`: 4 bytes
//! - `float`: 4 bytes
//! - `bool`: 1 byte
//! - `string`: 8 bytes (a handle, never inspected)

pub mod entry;
pub mod ids;
pub mod table;

pub use entry::{Entry, Function, ScopeKind, TypeInfo, Variable};
pub use ids::{DeclId, EntryId, ScopeId};
pub use table::{SymbolError, SymbolTable};

/// Names and sizes of the types defined in every root scope.
pub const BUILTIN_TYPES: [(&str, usize); 4] =
    [("int", 4), ("float", 4), ("bool", 1), ("string", 8)];
