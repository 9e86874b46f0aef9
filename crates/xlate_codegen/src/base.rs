//! Shared visitor base: the capability interface every backend implements
//! and the per-pass state it is built over.

use crate::assign::TEMPORARY;
use crate::dispatch::{CallSite, DispatchRegistry};
use crate::type_map::TypeMap;
use std::collections::BTreeSet;
use tracing::trace;
use xlate_ast::{Expr, ExprKind, Module, TypeAnnotation};
use xlate_binder::{BindingKind, SemanticModel};
use xlate_diagnostics::{DiagnosticMessage, NodeContext, Result, TranspileError};

/// Modules that only carry source-level typing helpers and never need an
/// import in generated code.
pub const IGNORED_MODULES: &[&str] = &["typing", "dataclasses", "enum", "adt"];

/// A complete code generator for one target.
///
/// An instance performs one traversal; call [`Transpiler::reset`] (or build
/// a fresh instance) before transpiling another module.
pub trait Transpiler {
    /// Human-readable target name used in diagnostics.
    fn target_name(&self) -> &'static str;

    /// Generate the body text for a module.
    fn transpile_module(&mut self, module: &Module) -> Result<String>;

    /// Import block for the modules required by the last traversal, sorted
    /// and de-duplicated, one import per line.
    fn usings(&self) -> String;

    /// `text` as a target comment block.
    fn comment(&self, text: &str) -> String;

    /// Drop all per-traversal state.
    fn reset(&mut self);
}

// ============================================================================
// Codegen Context
// ============================================================================

/// State shared by all visit rules of one traversal.
pub struct CodegenContext<'m> {
    pub model: &'m SemanticModel,
    pub registry: DispatchRegistry,
    pub type_map: TypeMap,
    usings: BTreeSet<String>,
    temporaries: usize,
    indent_unit: String,
}

impl<'m> CodegenContext<'m> {
    pub fn new(model: &'m SemanticModel, registry: DispatchRegistry, type_map: TypeMap) -> Self {
        Self {
            model,
            registry,
            type_map,
            usings: BTreeSet::new(),
            temporaries: 0,
            indent_unit: "  ".to_string(),
        }
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_unit = " ".repeat(width);
        self
    }

    /// Record a required module. Ignored modules are dropped.
    pub fn record_using(&mut self, module: &str) {
        if IGNORED_MODULES.contains(&module) {
            return;
        }
        if self.usings.insert(module.to_string()) {
            trace!(module, "recorded using");
        }
    }

    /// Required modules in sorted order.
    pub fn usings(&self) -> impl Iterator<Item = &str> {
        self.usings.iter().map(String::as_str)
    }

    /// Name for the next shared call result: `tmp`, then `tmp1`, `tmp2`, ...
    pub fn fresh_temporary(&mut self) -> String {
        let name = match self.temporaries {
            0 => TEMPORARY.to_string(),
            n => format!("{}{}", TEMPORARY, n),
        };
        self.temporaries += 1;
        name
    }

    pub fn reset(&mut self) {
        self.usings.clear();
        self.temporaries = 0;
    }

    /// Indent every non-empty line of `text` by one unit.
    pub fn indent(&self, text: &str) -> String {
        text.lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", self.indent_unit, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The callee is a name bound by user code, so builtins of that name do
    /// not apply.
    pub fn shadows_builtin(&self, func: &Expr) -> bool {
        let ExprKind::Name { id } = &func.kind else {
            return false;
        };
        self.model
            .find(func.data.scope, id)
            .is_some_and(|binding| !matches!(binding.kind, BindingKind::Import { .. }))
    }

    /// `value[index]`.
    pub fn default_subscript(&self, value: &str, index: &str) -> String {
        format!("{}[{}]", value, index)
    }

    /// `target op= value`, with `op` already spelled for the target.
    pub fn default_aug_assign(&self, target: &str, op: &str, value: &str) -> String {
        format!("{} {}= {}", target, op, value)
    }
}

// ============================================================================
// Target Language
// ============================================================================

/// The hooks through which backends differ. Everything else a backend needs
/// from the base comes as a provided method.
pub trait TargetLanguage<'m> {
    /// Target name as it appears in diagnostics (`V`, `SMT`).
    fn name(&self) -> &'static str;

    fn context(&self) -> &CodegenContext<'m>;

    fn context_mut(&mut self) -> &mut CodegenContext<'m>;

    fn comment_marker(&self) -> &'static str;

    /// One import line for a whole module.
    fn format_import(&self, module: &str) -> String;

    /// One import line for names taken from a module.
    fn format_import_from(&self, module: &str, names: &[String]) -> String;

    fn resolve_type_name(&self, ty: Option<&TypeAnnotation>, node: NodeContext) -> Result<String> {
        self.context().type_map.resolve(ty, self.name(), node)
    }

    fn record_using(&mut self, module: &str) {
        self.context_mut().record_using(module);
    }

    fn format_comment(&self, text: &str) -> String {
        let marker = self.comment_marker();
        text.lines()
            .map(|line| {
                if line.is_empty() {
                    marker.to_string()
                } else {
                    format!("{} {}", marker, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The import block for everything recorded so far.
    fn usings_block(&self) -> String {
        self.context()
            .usings()
            .map(|module| self.format_import(module))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The entry point every call visitor goes through before falling back
    /// to default call syntax. Records the call's required module, then asks
    /// the registry for a rewrite.
    fn dispatch_call(&mut self, site: &CallSite<'_>, vargs: &[String]) -> Result<Option<String>> {
        if let Some(module) = self.context().registry.using_for(site) {
            self.record_using(module);
        }
        self.context().registry.dispatch(site, vargs)
    }

    /// An unsupported-construct error naming this target.
    fn unsupported(&self, message: &DiagnosticMessage, args: &[&str], node: NodeContext) -> TranspileError {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(self.name());
        all.extend_from_slice(args);
        TranspileError::unsupported(message, &all, node)
    }
}
