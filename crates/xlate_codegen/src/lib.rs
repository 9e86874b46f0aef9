//! xlate_codegen: Shared code generation machinery.
//!
//! Everything a backend composes rather than re-implements:
//! - `dispatch`: rewrite rules for built-in and standard-library calls;
//! - `base`: the capability interface backends implement, the per-pass
//!   context (model, registry, usings, type map) and generic fallbacks;
//! - `assign`: the declare / mutate decision for every binding occurrence.

pub mod assign;
pub mod base;
pub mod dispatch;
pub mod type_map;

pub use assign::{AssignPlan, BindingForm, PatternForm, TargetPlan};
pub use base::{CodegenContext, TargetLanguage, Transpiler};
pub use dispatch::{CallSite, CallTarget, DispatchRegistry, RangeArgs, ReceiverKind};
pub use type_map::TypeMap;
