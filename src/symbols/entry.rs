//! Symbol table entry variants.

use super::ids::{DeclId, EntryId};
use std::fmt;

/// Primitive type descriptor. Only the byte size is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    pub size: usize,
}

/// Where a variable was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Parameter,
    Local,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Global => write!(f, "global"),
            ScopeKind::Parameter => write!(f, "param"),
            ScopeKind::Local => write!(f, "local"),
        }
    }
}

/// A declared variable or parameter.
///
/// `offset` is filled in by storage allocation after translation; only
/// parameters receive one while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: EntryId,
    pub kind: ScopeKind,
    pub offset: Option<usize>,
    pub active: bool,
    pub alive: bool,
    pub temporary: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: EntryId, kind: ScopeKind) -> Self {
        Self {
            name: name.into(),
            ty,
            kind,
            offset: None,
            active: true,
            alive: true,
            temporary: false,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// A fully translated function.
///
/// `decl` points back at the `FuncDef` in the program's declaration list;
/// the signature is copied here so call sites can be checked without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub decl: DeclId,
    pub params: Vec<EntryId>,
    pub return_type: EntryId,
}

/// The three roles a name can play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Type(TypeInfo),
    Variable(Variable),
    Function(Function),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Type(ty) => &ty.name,
            Entry::Variable(var) => &var.name,
            Entry::Function(func) => &func.name,
        }
    }

    /// Short role name used in name-role diagnostics
    pub fn role(&self) -> &'static str {
        match self {
            Entry::Type(_) => "type",
            Entry::Variable(_) => "variable",
            Entry::Function(_) => "function",
        }
    }
}

impl From<TypeInfo> for Entry {
    fn from(ty: TypeInfo) -> Self {
        Entry::Type(ty)
    }
}

impl From<Variable> for Entry {
    fn from(var: Variable) -> Self {
        Entry::Variable(var)
    }
}

impl From<Function> for Entry {
    fn from(func: Function) -> Self {
        Entry::Function(func)
    }
}
