//! xlate_ast: Syntax tree definitions for the transpiler.
//!
//! The tree models a dynamically-typed imperative source language (module,
//! statements, expressions, type annotations) plus the slots the analysis
//! pass fills in: node ids, enclosing scopes, flags, inferred types and
//! resolved standard-library call targets.

pub mod generated;
pub mod node;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
