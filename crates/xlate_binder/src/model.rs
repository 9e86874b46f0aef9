//! The analysis result handed to the backends.

use crate::binding::{Binding, ClassFacts, FunctionFacts};
use crate::scope::Scope;
use xlate_ast::{NodeData, ScopeId};

/// Scope chains and binding facts for one module. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct SemanticModel {
    pub(crate) scopes: Vec<Scope>,
    pub(crate) node_count: u32,
}

impl SemanticModel {
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        if !id.is_valid() {
            return None;
        }
        self.scopes.get(id.index())
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        if !id.is_valid() {
            return None;
        }
        self.scopes.get_mut(id.index())
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    /// The module scope.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Scope chain from `scope` outward.
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> + '_ {
        std::iter::successors(self.scope(scope), move |s| s.parent.and_then(|p| self.scope(p)))
    }

    /// Find a binding by name, searching outward from `scope`.
    pub fn find(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        self.chain(scope).find_map(|s| s.get(name))
    }

    pub(crate) fn find_mut(&mut self, scope: ScopeId, name: &str) -> Option<&mut Binding> {
        let owner = self.chain(scope).find(|s| s.contains(name))?.id;
        self.scope_mut(owner)?.bindings.get_mut(name)
    }

    /// Find a binding in the immediate parent of `scope` only.
    pub fn find_in_parent(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        let parent = self.scope(scope)?.parent?;
        self.scope(parent)?.get(name)
    }

    /// Find a binding searching outward, starting at the parent of `scope`.
    pub fn find_from_parent(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        let parent = self.scope(scope)?.parent?;
        self.find(parent, name)
    }

    /// Whether the binding's defining occurrence precedes `node` in program order.
    pub fn defined_before(&self, binding: &Binding, node: &NodeData) -> bool {
        binding.defined_at < node.range.pos
    }

    pub fn is_mutable(&self, scope: ScopeId, name: &str) -> bool {
        name != "_" && self.find(scope, name).is_some_and(|b| b.mutable)
    }

    pub fn function_facts(&self, scope: ScopeId, name: &str) -> Option<&FunctionFacts> {
        self.find(scope, name)?.function_facts()
    }

    pub fn class_facts(&self, scope: ScopeId, name: &str) -> Option<&ClassFacts> {
        self.find(scope, name)?.class_facts()
    }
}
