//! Binding facts.

use xlate_ast::{NodeId, ScopeId, TypeAnnotation};
use xlate_core::{OrderedMap, TextPos};

/// A named entity at its first defining occurrence in one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    /// Node of the defining occurrence (target expression, parameter,
    /// function, class or import statement).
    pub definition: NodeId,
    /// Start of the defining occurrence; the defined-before key.
    pub defined_at: TextPos,
    /// Re-bound, augmented, assigned through, or mutated in place.
    pub mutable: bool,
    /// Declared or inferred type.
    pub ty: Option<TypeAnnotation>,
    pub kind: BindingKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindingKind {
    Variable,
    Parameter,
    Function(FunctionFacts),
    Class(ClassFacts),
    /// An imported module or member, with the qualified name it stands for
    /// (`math`, `math.floor`).
    Import { qualified: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionFacts {
    /// First body statement is an `if smt_pre:` guard.
    pub precondition: bool,
    /// Some `return` in the body carries a value.
    pub returns_value: bool,
    /// Scope opened by the function body.
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFacts {
    pub decorators: Vec<String>,
    pub bases: Vec<String>,
    /// Class-level members in declaration order.
    pub declarations: OrderedMap<String, MemberDeclaration>,
    /// Scope opened by the class body.
    pub scope: ScopeId,
}

impl ClassFacts {
    pub fn is_sealed(&self) -> bool {
        self.decorators.iter().any(|d| d == "sealed")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberDeclaration {
    pub annotation: Option<TypeAnnotation>,
    pub has_default: bool,
}

impl Binding {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, BindingKind::Function(_))
    }

    pub fn function_facts(&self) -> Option<&FunctionFacts> {
        match &self.kind {
            BindingKind::Function(facts) => Some(facts),
            _ => None,
        }
    }

    pub fn class_facts(&self) -> Option<&ClassFacts> {
        match &self.kind {
            BindingKind::Class(facts) => Some(facts),
            _ => None,
        }
    }
}
