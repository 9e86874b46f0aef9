//! xlate_targets: The code generation backends.
//!
//! - [`VTranspiler`]: V, an imperative systems language.
//! - [`SmtTranspiler`]: SMT-LIB assertions.
//!
//! Both are built over [`xlate_codegen::CodegenContext`] and implement
//! [`xlate_codegen::Transpiler`]. Every statement and expression kind has an
//! explicit arm in each backend; kinds a target cannot express raise an
//! unsupported-construct error.

pub mod smt;
pub mod v;

pub use smt::SmtTranspiler;
pub use v::VTranspiler;

/// Join generated fragments with newlines, skipping empty ones.
pub(crate) fn join_lines(fragments: impl IntoIterator<Item = String>) -> String {
    fragments
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
