//! xlate_emitter: Target output for syntax tree modules.
//!
//! Coordinates the per-unit pipeline:
//! 1. Run the target's pre-pass transforms
//! 2. Bind (scopes, bindings, facts, inferred types)
//! 3. Generate the body with a fresh backend
//! 4. Assemble banner, usings and body, and write output files

use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, warn};
use xlate_ast::Module;
use xlate_binder::{Binder, SemanticModel};
use xlate_codegen::Transpiler;
use xlate_diagnostics::{Diagnostic, DiagnosticCollection, Result};
use xlate_options::{Target, TranspilerOptions};
use xlate_targets::{SmtTranspiler, VTranspiler};
use xlate_transformers::pipeline_for;

/// The emitter produces target text from bound modules.
pub struct Emitter {
    options: TranspilerOptions,
}

/// The result of emitting one module.
#[derive(Debug, Clone)]
pub struct EmitResult {
    pub module_name: String,
    pub target: Target,
    /// The complete output text.
    pub text: String,
}

/// A file produced by the emitter.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
    pub text: String,
}

impl Emitter {
    pub fn new(options: TranspilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TranspilerOptions {
        &self.options
    }

    /// Emit one module. A fresh backend is built for every call.
    pub fn emit(&self, module: Module) -> Result<EmitResult> {
        let target = self.options.target();
        let mut module = pipeline_for(target).run(module);
        let model = Binder::new().bind_module(&mut module);
        debug!(
            module = %module.name,
            scopes = model.scopes().len(),
            nodes = model.node_count(),
            "bound module"
        );

        let mut backend = self.backend(target, &model);
        let body = backend.transpile_module(&module)?;
        let usings = backend.usings();
        debug!(module = %module.name, backend = %target, usings = %usings.replace('\n', ", "), "generated module");

        let mut text = String::new();
        if self.options.emit_header() {
            text.push_str(&backend.comment(&format!("Generated by xlate from module '{}'.", module.name)));
            text.push('\n');
        }
        if !usings.is_empty() {
            text.push_str(&usings);
            text.push_str("\n\n");
        }
        text.push_str(&body);
        text.push('\n');

        Ok(EmitResult {
            module_name: module.name,
            target,
            text,
        })
    }

    /// Emit every module in parallel. Units that fail are skipped and
    /// reported in the returned collection; the rest are returned in input
    /// order.
    pub fn emit_all(&self, modules: Vec<Module>) -> (Vec<EmitResult>, DiagnosticCollection) {
        let outcomes: Vec<(String, Result<EmitResult>)> = modules
            .into_par_iter()
            .map(|module| {
                let name = module.name.clone();
                (name, self.emit(module))
            })
            .collect();

        let mut results = Vec::with_capacity(outcomes.len());
        let mut diagnostics = DiagnosticCollection::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(error) => {
                    warn!(module = %name, code = error.code(), "skipping unit: {}", error);
                    diagnostics.add(Diagnostic::from_error(Some(name), &error));
                }
            }
        }
        diagnostics.sort();
        (results, diagnostics)
    }

    /// The files for a set of results, under the configured output directory.
    pub fn output_files(&self, results: &[EmitResult]) -> Vec<OutputFile> {
        results
            .iter()
            .map(|result| OutputFile {
                path: self.output_path(&result.module_name, result.target),
                text: result.text.clone(),
            })
            .collect()
    }

    /// Write output files to disk.
    pub fn write_output_files(&self, results: &[EmitResult]) -> std::io::Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(results.len());
        for file in self.output_files(results) {
            if let Some(parent) = file.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&file.path, &file.text)?;
            debug!(path = %file.path.display(), "wrote output");
            written.push(file.path);
        }
        Ok(written)
    }

    fn output_path(&self, module_name: &str, target: Target) -> PathBuf {
        self.options
            .out_dir()
            .join(format!("{}.{}", module_name, target.extension()))
    }

    fn backend<'m>(&self, target: Target, model: &'m SemanticModel) -> Box<dyn Transpiler + 'm> {
        let width = self.options.indent_width();
        match target {
            Target::V => Box::new(VTranspiler::new(model).with_indent_width(width)),
            Target::Smt => Box::new(SmtTranspiler::new(model).with_indent_width(width)),
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(TranspilerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_output_path() {
        let emitter = Emitter::default();
        assert_eq!(emitter.output_path("demo", Target::V), PathBuf::from("./demo.v"));
    }

    #[test]
    fn test_output_path_with_out_dir() {
        let emitter = Emitter::new(TranspilerOptions {
            out_dir: Some(PathBuf::from("dist")),
            ..Default::default()
        });
        assert_eq!(emitter.output_path("demo", Target::Smt), Path::new("dist").join("demo.smt2"));
    }
}
