//! End-to-end emission: pre-passes, binding, backend and assembly.

use std::path::PathBuf;
use xlate_ast::*;
use xlate_emitter::Emitter;
use xlate_options::{Target, TranspilerOptions};
use xlate_nodebuilder::NodeBuilder;

fn options(target: Target) -> TranspilerOptions {
    TranspilerOptions {
        target: Some(target),
        ..Default::default()
    }
}

fn floor_module(name: &str) -> Module {
    let b = NodeBuilder::new();
    b.module(
        name,
        vec![
            b.import(&[("math", None)]),
            b.assign(b.name("x"), b.call_path("math.floor", vec![b.float(1.5)])),
        ],
    )
}

fn lambda_module(name: &str) -> Module {
    let b = NodeBuilder::new();
    let lambda = b.lambda(vec![], b.int(1));
    b.module(name, vec![b.assign(b.name("f"), lambda)])
}

// ============================================================================
// Single unit
// ============================================================================

#[test]
fn test_v_output_has_usings_block() {
    let result = Emitter::new(options(Target::V)).emit(floor_module("demo")).unwrap();
    assert_eq!(result.text, "import math\n\nx := int(math.floor(1.5))\n");
    assert_eq!(result.module_name, "demo");
}

#[test]
fn test_header_uses_target_comment_syntax() {
    let mut opts = options(Target::Smt);
    opts.emit_header = Some(true);
    let b = NodeBuilder::new();
    let module = b.module("demo", vec![b.assign(b.name("x"), b.int(1))]);
    let result = Emitter::new(opts).emit(module).unwrap();
    assert_eq!(
        result.text,
        "; Generated by xlate from module 'demo'.\n(define-fun x () Int 1)\n"
    );
}

#[test]
fn test_indent_width_option() {
    let mut opts = options(Target::V);
    opts.indent_width = Some(4);
    let b = NodeBuilder::new();
    let module = b.module(
        "demo",
        vec![b.function_def("one", vec![], Some(TypeAnnotation::name("int")), vec![b.ret(Some(b.int(1)))])],
    );
    let result = Emitter::new(opts).emit(module).unwrap();
    assert_eq!(result.text, "fn one() int {\n    return 1\n}\n");
}

#[test]
fn test_failure_is_returned_as_error() {
    let err = Emitter::new(options(Target::V)).emit(lambda_module("bad")).unwrap_err();
    assert_eq!(err.code(), 1001);
}

// ============================================================================
// Many units
// ============================================================================

#[test]
fn test_emit_all_skips_failing_units() {
    let emitter = Emitter::new(options(Target::V));
    let modules = vec![floor_module("a"), lambda_module("bad"), floor_module("c")];
    let (results, diagnostics) = emitter.emit_all(modules);

    let names: Vec<&str> = results.iter().map(|r| r.module_name.as_str()).collect();
    assert_eq!(names, ["a", "c"]);
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics.diagnostics()[0];
    assert_eq!(diagnostic.file.as_deref(), Some("bad"));
    assert_eq!(diagnostic.code, 1001);
    assert!(!diagnostics.has_fatal());
}

#[test]
fn test_units_do_not_share_usings() {
    let b = NodeBuilder::new();
    let plain = b.module("plain", vec![b.assign(b.name("y"), b.int(2))]);
    let (results, _) = Emitter::new(options(Target::V)).emit_all(vec![floor_module("a"), plain]);
    assert_eq!(results[1].text, "y := 2\n");
}

// ============================================================================
// Output files
// ============================================================================

#[test]
fn test_write_output_files() {
    let out_dir = std::env::temp_dir().join(format!("xlate_emitter_test_{}", std::process::id()));
    let mut opts = options(Target::Smt);
    opts.out_dir = Some(out_dir.clone());
    let emitter = Emitter::new(opts);

    let b = NodeBuilder::new();
    let module = b.module("unit", vec![b.assign(b.name("x"), b.int(1))]);
    let result = emitter.emit(module).unwrap();
    let written = emitter.write_output_files(&[result]).unwrap();

    assert_eq!(written, vec![out_dir.join("unit.smt2")]);
    let text = std::fs::read_to_string(&written[0]).unwrap();
    assert_eq!(text, "(define-fun x () Int 1)\n");
    let _ = std::fs::remove_dir_all(&out_dir);
}

#[test]
fn test_output_files_follow_target_extension() {
    let mut opts = options(Target::V);
    opts.out_dir = Some(PathBuf::from("gen"));
    let emitter = Emitter::new(opts);
    let result = emitter.emit(floor_module("m")).unwrap();
    let files = emitter.output_files(&[result]);
    assert_eq!(files[0].path, PathBuf::from("gen").join("m.v"));
}
