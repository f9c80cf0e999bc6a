//! Arena-backed tree of nested scopes.
//!
//! Every scope and every entry lives in one [`SymbolTable`]. Scopes refer to
//! their parent by [`ScopeId`], so moving the table never invalidates a link,
//! and AST nodes hold [`EntryId`]s instead of references.

use super::entry::{Entry, Function, TypeInfo, Variable};
use super::ids::{EntryId, ScopeId};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Failures of the two scope operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("'{name}' is already defined in this scope")]
    DuplicateName { name: String },

    #[error("'{name}' is not defined")]
    UndefinedName { name: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Scope {
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    names: FxHashMap<String, EntryId>,
    // definition order, for deterministic iteration
    order: Vec<EntryId>,
}

/// Owner of all scopes and entries of one program.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    entries: Vec<Entry>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table holding only an empty root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            entries: Vec::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::from_index(0)
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    pub fn children(&self, scope: ScopeId) -> &[ScopeId] {
        &self.scopes[scope.index()].children
    }

    /// Open a new scope nested in `parent`.
    pub fn add_child(&mut self, parent: ScopeId) -> ScopeId {
        let child = ScopeId::from_index(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        self.scopes[parent.index()].children.push(child);
        child
    }

    /// Bind `name` in `scope`. Names are write-once per scope; an outer
    /// binding of the same name is shadowed, not replaced.
    pub fn define(
        &mut self,
        scope: ScopeId,
        name: &str,
        entry: impl Into<Entry>,
    ) -> Result<EntryId, SymbolError> {
        if self.scopes[scope.index()].names.contains_key(name) {
            return Err(SymbolError::DuplicateName {
                name: name.to_string(),
            });
        }

        let id = EntryId::from_index(self.entries.len());
        self.entries.push(entry.into());

        let scope = &mut self.scopes[scope.index()];
        scope.names.insert(name.to_string(), id);
        scope.order.push(id);
        Ok(id)
    }

    /// Resolve `name` starting at `scope` and walking outward to the root.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Result<EntryId, SymbolError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(entry) = self.lookup_local(id, name) {
                return Ok(entry);
            }
            current = self.parent(id);
        }

        Err(SymbolError::UndefinedName {
            name: name.to_string(),
        })
    }

    /// Resolve `name` in `scope` only.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<EntryId> {
        self.scopes[scope.index()].names.get(name).copied()
    }

    /// Entries defined directly in `scope`, in definition order.
    pub fn entries_of(&self, scope: ScopeId) -> impl Iterator<Item = EntryId> + '_ {
        self.scopes[scope.index()].order.iter().copied()
    }

    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id.index()]
    }

    pub fn type_info(&self, id: EntryId) -> Option<&TypeInfo> {
        match self.entry(id) {
            Entry::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn variable(&self, id: EntryId) -> Option<&Variable> {
        match self.entry(id) {
            Entry::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// Mutable access for the deferred fields (storage offset, lifecycle
    /// flags) that later stages fill in.
    pub fn variable_mut(&mut self, id: EntryId) -> Option<&mut Variable> {
        match &mut self.entries[id.index()] {
            Entry::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn function(&self, id: EntryId) -> Option<&Function> {
        match self.entry(id) {
            Entry::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Name of the type entry `id`, or `"?"` if it is not a type.
    pub fn type_name(&self, id: EntryId) -> &str {
        self.type_info(id).map(|ty| ty.name.as_str()).unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::ScopeKind;

    fn int_table() -> (SymbolTable, EntryId) {
        let mut table = SymbolTable::new();
        let root = table.root();
        let int = table
            .define(root, "int", TypeInfo { name: "int".into(), size: 4 })
            .unwrap();
        (table, int)
    }

    #[test]
    fn test_define_and_lookup() {
        let (mut table, int) = int_table();
        let root = table.root();
        let a = table
            .define(root, "a", Variable::new("a", int, ScopeKind::Global))
            .unwrap();

        assert_eq!(table.lookup(root, "a"), Ok(a));
        assert_eq!(table.variable(a).unwrap().ty, int);
        assert!(table.function(a).is_none());
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let (mut table, int) = int_table();
        let root = table.root();
        table
            .define(root, "a", Variable::new("a", int, ScopeKind::Global))
            .unwrap();
        let err = table
            .define(root, "a", Variable::new("a", int, ScopeKind::Global))
            .unwrap_err();

        assert_eq!(err, SymbolError::DuplicateName { name: "a".into() });
    }

    #[test]
    fn test_shadowing_in_child_scope() {
        let (mut table, int) = int_table();
        let root = table.root();
        let outer = table
            .define(root, "a", Variable::new("a", int, ScopeKind::Global))
            .unwrap();
        let child = table.add_child(root);
        let inner = table
            .define(child, "a", Variable::new("a", int, ScopeKind::Local))
            .unwrap();

        assert_ne!(outer, inner);
        assert_eq!(table.lookup(child, "a"), Ok(inner));
        assert_eq!(table.lookup(root, "a"), Ok(outer));
    }

    #[test]
    fn test_lookup_walks_outward() {
        let (mut table, int) = int_table();
        let root = table.root();
        let mid = table.add_child(root);
        let leaf = table.add_child(mid);

        assert_eq!(table.lookup(leaf, "int"), Ok(int));
        assert_eq!(table.parent(leaf), Some(mid));
        assert_eq!(table.parent(root), None);
        assert_eq!(table.children(root), &[mid]);
        assert_eq!(
            table.lookup(leaf, "missing"),
            Err(SymbolError::UndefinedName {
                name: "missing".into()
            })
        );
    }

    #[test]
    fn test_entries_keep_definition_order() {
        let (mut table, int) = int_table();
        let root = table.root();
        for name in ["z", "y", "x"] {
            table
                .define(root, name, Variable::new(name, int, ScopeKind::Global))
                .unwrap();
        }

        let names: Vec<_> = table
            .entries_of(root)
            .map(|id| table.entry(id).name().to_string())
            .collect();
        assert_eq!(names, ["int", "z", "y", "x"]);
    }
}
