//! xlate_binder: Scope and binding analysis.
//!
//! The binder walks a module and produces the facts every backend reads:
//! scope chains, one binding per name and scope, mutability, the
//! defined-before relation, class declaration maps, pre-condition flags,
//! standard-library call resolution and a light type inference.

mod binder;
mod binding;
mod model;
mod resolver;
mod scope;

pub use binder::Binder;
pub use binding::{Binding, BindingKind, ClassFacts, FunctionFacts, MemberDeclaration};
pub use model::SemanticModel;
pub use scope::{Scope, ScopeKind};
