//! V backend tests over bound trees.

use xlate_ast::*;
use xlate_binder::Binder;
use xlate_codegen::Transpiler;
use xlate_diagnostics::Result;
use xlate_nodebuilder::NodeBuilder;
use xlate_targets::VTranspiler;

fn transpile(b: &NodeBuilder, body: Vec<Stmt>) -> Result<String> {
    transpile_with_usings(b, body).map(|(out, _)| out)
}

fn transpile_with_usings(b: &NodeBuilder, body: Vec<Stmt>) -> Result<(String, String)> {
    let mut module = b.module("test", body);
    let model = Binder::new().bind_module(&mut module);
    let mut v = VTranspiler::new(&model);
    let out = v.transpile_module(&module)?;
    Ok((out, v.usings()))
}

fn int() -> TypeAnnotation {
    TypeAnnotation::name("int")
}

// ============================================================================
// Calls
// ============================================================================

#[test]
fn test_range_forms() {
    let b = NodeBuilder::new();
    let body = vec![
        b.for_(b.name("i"), b.call_path("range", vec![b.int(10)]), vec![b.pass()], vec![]),
        b.assign(b.name("r"), b.call_path("range", vec![b.int(1), b.int(5)])),
        b.for_(
            b.name("j"),
            b.call_path("range", vec![b.int(0), b.int(10), b.int(2)]),
            vec![b.pass()],
            vec![],
        ),
    ];
    assert_eq!(
        transpile(&b, body).unwrap(),
        "for i in 0 .. 10 {\n}\nr := 1 .. 5\nfor j := 0; j < 10; j += 2 {\n}"
    );
}

#[test]
fn test_range_with_four_arguments_is_malformed() {
    let b = NodeBuilder::new();
    let call = b.call_path("range", vec![b.int(1), b.int(2), b.int(3), b.int(4)]);
    let err = transpile(&b, vec![b.expr_stmt(call)]).unwrap_err();
    assert_eq!(err.code(), 2001);
    assert!(!err.is_unsupported());
    assert_eq!(err.message(), "encountered range() call with unknown parameters: range(1, 2, 3, 4)");
}

#[test]
fn test_stepped_range_parenthesizes_compound_arguments() {
    let b = NodeBuilder::new();
    let step = b.binop(b.name("k"), BinOpKind::Add, b.int(1));
    let body = vec![
        b.assign(b.name("k"), b.int(2)),
        b.assign(b.name("r"), b.call_path("range", vec![b.int(0), b.int(10), step])),
    ];
    assert_eq!(
        transpile(&b, body).unwrap(),
        "k := 2\nr := []int{len: (10 - 0 + (k + 1) - 1) / (k + 1), init: 0 + index * (k + 1)}"
    );
}

#[test]
fn test_postfix_rewrites_parenthesize_compound_arguments() {
    let b = NodeBuilder::new();
    let sum = b.binop(b.name("a"), BinOpKind::Add, b.name("a"));
    let body = vec![
        b.assign(b.name("a"), b.int(1)),
        b.assign(b.name("n"), b.call_path("len", vec![sum])),
        b.assign(b.name("s"), b.call_path("str", vec![b.binop(b.int(1), BinOpKind::Add, b.int(2))])),
    ];
    assert_eq!(transpile(&b, body).unwrap(), "a := 1\nn := (a + a).len\ns := (1 + 2).str()");
}

#[test]
fn test_print_arities() {
    let b = NodeBuilder::new();
    let body = vec![
        b.expr_stmt(b.call_path("print", vec![])),
        b.expr_stmt(b.call_path("print", vec![b.str("hi")])),
        b.expr_stmt(b.call_path("print", vec![b.name("a"), b.name("b")])),
    ];
    assert_eq!(transpile(&b, body).unwrap(), "println('')\nprintln('hi')\nprintln('${a} ${b}')");
}

#[test]
fn test_shadowed_builtin_keeps_call_syntax() {
    let b = NodeBuilder::new();
    let body = vec![
        b.function_def("len", vec![b.arg("x", None)], None, vec![b.ret(Some(b.int(0)))]),
        b.assign(b.name("n"), b.call_path("len", vec![b.name("xs")])),
    ];
    let out = transpile(&b, body).unwrap();
    assert_eq!(out.lines().last(), Some("n := len(xs)"));
}

#[test]
fn test_builtin_len_is_rewritten() {
    let b = NodeBuilder::new();
    let body = vec![b.assign(b.name("n"), b.call_path("len", vec![b.name("xs")]))];
    assert_eq!(transpile(&b, body).unwrap(), "n := xs.len");
}

#[test]
fn test_list_append_uses_receiver_type() {
    let b = NodeBuilder::new();
    let body = vec![
        b.assign(b.name("xs"), b.list(vec![b.int(1)])),
        b.expr_stmt(b.method_call(b.name("xs"), "append", vec![b.int(2)])),
    ];
    assert_eq!(transpile(&b, body).unwrap(), "mut xs := [1]\nxs << 2");
}

#[test]
fn test_usings_are_sorted_and_deduplicated() {
    let b = NodeBuilder::new();
    let body = vec![
        b.import(&[("sys", None)]),
        b.import(&[("math", None)]),
        b.import(&[("typing", None)]),
        b.expr_stmt(b.call_path("math.floor", vec![b.float(1.5)])),
        b.expr_stmt(b.call_path("abs", vec![b.int(-1)])),
    ];
    let (out, usings) = transpile_with_usings(&b, body).unwrap();
    assert_eq!(out, "int(math.floor(1.5))\nmath.abs(-1)");
    assert_eq!(usings, "import math\nimport os");
}

// ============================================================================
// Declarations and assignment
// ============================================================================

#[test]
fn test_declare_then_mutate() {
    let b = NodeBuilder::new();
    let body = vec![
        b.assign(b.name("x"), b.int(1)),
        b.assign(b.name("x"), b.int(2)),
        b.assign(b.name("y"), b.int(3)),
    ];
    assert_eq!(transpile(&b, body).unwrap(), "mut x := 1\nx = 2\ny := 3");
}

#[test]
fn test_tuple_pattern_declaration_and_swap() {
    let b = NodeBuilder::new();
    let body = vec![
        b.assign(b.tuple(vec![b.name("a"), b.name("b")]), b.tuple(vec![b.int(1), b.int(2)])),
        b.assign(b.tuple(vec![b.name("a"), b.name("b")]), b.tuple(vec![b.name("b"), b.name("a")])),
    ];
    assert_eq!(transpile(&b, body).unwrap(), "mut a, mut b := 1, 2\na, b = b, a");
}

#[test]
fn test_mixed_pattern_is_rejected() {
    let b = NodeBuilder::new();
    let body = vec![
        b.assign(b.name("a"), b.int(1)),
        b.assign(b.tuple(vec![b.name("a"), b.name("b")]), b.tuple(vec![b.int(2), b.int(3)])),
    ];
    let err = transpile(&b, body).unwrap_err();
    assert_eq!(err.code(), 1020);
    assert!(err.is_unsupported());
}

#[test]
fn test_chained_assignment_from_call_uses_temporary() {
    let b = NodeBuilder::new();
    let body = vec![
        b.function_def("pair", vec![], Some(int()), vec![b.ret(Some(b.int(1)))]),
        b.assign_many(vec![b.name("a"), b.name("b")], b.call_path("pair", vec![])),
    ];
    assert_eq!(
        transpile(&b, body).unwrap(),
        "fn pair() int {\n  return 1\n}\nmut tmp := pair()\na := tmp\nb := tmp"
    );
}

#[test]
fn test_each_chained_assignment_gets_its_own_temporary() {
    let b = NodeBuilder::new();
    let body = vec![
        b.function_def("g", vec![], Some(int()), vec![b.ret(Some(b.int(1)))]),
        b.assign_many(vec![b.name("p"), b.name("q")], b.call_path("g", vec![])),
        b.assign_many(vec![b.name("p2"), b.name("q2")], b.call_path("g", vec![])),
    ];
    assert_eq!(
        transpile(&b, body).unwrap(),
        "fn g() int {\n  return 1\n}\nmut tmp := g()\np := tmp\nq := tmp\nmut tmp1 := g()\np2 := tmp1\nq2 := tmp1"
    );
}

#[test]
fn test_optional_annotation_keeps_none() {
    let b = NodeBuilder::new();
    let optional = TypeAnnotation::generic("Optional", vec![int()]);
    let body = vec![b.ann_assign(b.name("m"), optional, Some(b.none()))];
    assert_eq!(transpile(&b, body).unwrap(), "m := none");
}

#[test]
fn test_floor_division_aug_assign() {
    let b = NodeBuilder::new();
    let body = vec![
        b.assign(b.name("n"), b.int(8)),
        b.aug_assign(b.name("n"), BinOpKind::FloorDiv, b.int(2)),
    ];
    assert_eq!(transpile(&b, body).unwrap(), "mut n := 8\nn /= 2");
}

#[test]
fn test_annotated_defaults_and_numeric_list_cast() {
    let b = NodeBuilder::new();
    let floats = TypeAnnotation::generic("List", vec![TypeAnnotation::name("float")]);
    let body = vec![
        b.ann_assign(b.name("n"), int(), Some(b.none())),
        b.ann_assign(b.name("xs"), floats.clone(), Some(b.list(vec![b.int(1), b.int(2)]))),
        b.ann_assign(b.name("ys"), floats, Some(b.list(vec![]))),
    ];
    assert_eq!(transpile(&b, body).unwrap(), "n := 0\nxs := [f64(1), 2]\nys := []f64{}");
}

// ============================================================================
// Definitions
// ============================================================================

#[test]
fn test_function_with_generic_and_mutable_parameters() {
    let b = NodeBuilder::new();
    let body = vec![b.function_def(
        "bump",
        vec![b.arg("n", Some(int())), b.arg("label", None)],
        Some(int()),
        vec![b.aug_assign(b.name("n"), BinOpKind::Add, b.int(1)), b.ret(Some(b.name("n")))],
    )];
    assert_eq!(
        transpile(&b, body).unwrap(),
        "fn bump<A>(mut n int, label A) int {\n  n += 1\n  return n\n}"
    );
}

#[test]
fn test_class_becomes_struct_and_constructor_a_literal() {
    let b = NodeBuilder::new();
    let body = vec![
        b.class_def(
            "Point",
            vec![],
            vec![],
            vec![b.ann_assign(b.name("x"), int(), None), b.ann_assign(b.name("y"), int(), None)],
        ),
        b.assign(b.name("p"), b.call_path("Point", vec![b.int(1), b.int(2)])),
    ];
    assert_eq!(
        transpile(&b, body).unwrap(),
        "struct Point {\n  x int\n  y int\n}\np := Point{x: 1, y: 2}"
    );
}

#[test]
fn test_if_elif_else() {
    let b = NodeBuilder::new();
    let body = vec![b.if_(
        b.compare(b.name("x"), CmpOpKind::Lt, b.int(0)),
        vec![b.expr_stmt(b.call_path("print", vec![b.str("neg")]))],
        vec![b.if_(
            b.compare(b.name("x"), CmpOpKind::Eq, b.int(0)),
            vec![b.expr_stmt(b.call_path("print", vec![b.str("zero")]))],
            vec![b.expr_stmt(b.call_path("print", vec![b.str("pos")]))],
        )],
    )];
    assert_eq!(
        transpile(&b, body).unwrap(),
        "if x < 0 {\n  println('neg')\n} else if x == 0 {\n  println('zero')\n} else {\n  println('pos')\n}"
    );
}

// ============================================================================
// Unsupported constructs
// ============================================================================

#[test]
fn test_unsupported_constructs_name_the_target() {
    let b = NodeBuilder::new();
    let lambda = b.lambda(vec![b.arg("x", None)], b.name("x"));
    let err = transpile(&b, vec![b.assign(b.name("f"), lambda)]).unwrap_err();
    assert_eq!(err.code(), 1001);
    assert_eq!(err.message(), "Lambdas are not supported in V.");

    let b = NodeBuilder::new();
    let err = transpile(&b, vec![b.expr_stmt(b.set(vec![b.int(1)]))]).unwrap_err();
    assert_eq!(err.code(), 1012);

    let b = NodeBuilder::new();
    let err = transpile(&b, vec![b.raise(None)]).unwrap_err();
    assert_eq!(err.code(), 1002);
}

#[test]
fn test_declaration_only_function_is_a_forward_declaration() {
    let b = NodeBuilder::new();
    let body = vec![b.function_def("g", vec![], Some(int()), vec![b.expr_stmt(b.ellipsis())])];
    assert_eq!(transpile(&b, body).unwrap(), "fn g() int");
}

// ============================================================================
// Loops
// ============================================================================

#[test]
fn test_while_true_is_an_infinite_loop() {
    let b = NodeBuilder::new();
    let body = vec![b.while_(b.bool(true), vec![b.break_()], vec![])];
    assert_eq!(transpile(&b, body).unwrap(), "for {\n  break\n}");
}

#[test]
fn test_loop_variable_rebinds_in_each_loop() {
    let b = NodeBuilder::new();
    let body = vec![
        b.for_(b.name("i"), b.call_path("range", vec![b.int(3)]), vec![b.pass()], vec![]),
        b.for_(b.name("i"), b.call_path("range", vec![b.int(4)]), vec![b.pass()], vec![]),
    ];
    assert_eq!(transpile(&b, body).unwrap(), "for i in 0 .. 3 {\n}\nfor i in 0 .. 4 {\n}");
}

#[test]
fn test_subscript_loop_target_is_rejected() {
    let b = NodeBuilder::new();
    let target = b.subscript(b.name("xs"), b.int(0));
    let body = vec![b.for_(target, b.call_path("range", vec![b.int(3)]), vec![b.pass()], vec![])];
    let err = transpile(&b, body).unwrap_err();
    assert_eq!(err.code(), 1021);
    assert_eq!(err.message(), "Cannot assign to Subscript in V.");
}

#[test]
fn test_loop_else_is_rejected() {
    let b = NodeBuilder::new();
    let body = vec![b.while_(b.bool(true), vec![b.break_()], vec![b.pass()])];
    let err = transpile(&b, body).unwrap_err();
    assert_eq!(err.code(), 1015);
}

// ============================================================================
// Traversal state
// ============================================================================

#[test]
fn test_fresh_instances_are_idempotent() {
    let b = NodeBuilder::new();
    let mut module = b.module(
        "test",
        vec![
            b.import(&[("math", None)]),
            b.assign(b.name("m"), b.call_path("min", vec![b.int(1), b.int(2)])),
        ],
    );
    let model = Binder::new().bind_module(&mut module);

    let mut first = VTranspiler::new(&model);
    let out1 = first.transpile_module(&module).unwrap();
    let mut second = VTranspiler::new(&model);
    let out2 = second.transpile_module(&module).unwrap();
    assert_eq!(out1, out2);
    assert_eq!(first.usings(), second.usings());

    first.reset();
    assert_eq!(first.usings(), "");
    assert_eq!(first.transpile_module(&module).unwrap(), out1);
    assert_eq!(first.usings(), "import math");
}
