//! Typed handles into the symbol arena and the program's declaration list.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
        pub struct $name(u32);

        impl $name {
            pub const fn to_raw(self) -> u32 {
                self.0
            }

            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_id!(
    /// A scope in the [`SymbolTable`](super::SymbolTable) arena.
    ScopeId
);
define_id!(
    /// An entry (type, variable or function) in the symbol arena.
    EntryId
);
define_id!(
    /// Position of a declaration in [`Program::declarations`](crate::parser::ast::Program).
    DeclId
);
