//! Scope definitions.

use crate::binding::Binding;
use xlate_ast::ScopeId;
use xlate_core::{FxSet, OrderedMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Class,
}

/// A lexical scope. Scopes form a chain from inner to outer through `parent`.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Name of the module, function or class that opened the scope.
    pub name: String,
    /// The parent scope (None for the module scope).
    pub parent: Option<ScopeId>,
    /// Bindings in first-definition order.
    pub bindings: OrderedMap<String, Binding>,
    /// Names declared `global` in this scope.
    pub(crate) globals: FxSet<String>,
}

impl Scope {
    pub fn new(id: ScopeId, kind: ScopeKind, name: &str, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            kind,
            name: name.to_string(),
            parent,
            bindings: OrderedMap::default(),
            globals: FxSet::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }
}
