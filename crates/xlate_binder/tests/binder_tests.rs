//! Binder tests over trees built with the node builder.

use xlate_ast::*;
use xlate_binder::{Binder, BindingKind, ScopeKind, SemanticModel};
use xlate_nodebuilder::NodeBuilder;

fn bind(mut module: Module) -> (Module, SemanticModel) {
    let model = Binder::new().bind_module(&mut module);
    (module, model)
}

fn int() -> TypeAnnotation {
    TypeAnnotation::name("int")
}

// ============================================================================
// Scopes and ids
// ============================================================================

#[test]
fn test_every_node_gets_an_id_and_scope() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![
            b.assign(b.name("x"), b.int(1)),
            b.function_def("f", vec![b.arg("a", Some(int()))], Some(int()), vec![b.ret(Some(b.name("a")))]),
        ],
    );
    let (module, model) = bind(module);

    assert!(module.data.id.is_valid());
    assert_eq!(module.data.scope, model.root());
    for stmt in &module.body {
        assert!(stmt.data().id.is_valid());
        assert_eq!(stmt.data().scope, model.root());
    }

    let Stmt::FunctionDef(func) = &module.body[1] else {
        panic!("expected function");
    };
    let body_scope = func.body[0].data().scope;
    assert_ne!(body_scope, model.root());
    assert_eq!(model.scope(body_scope).map(|s| s.kind), Some(ScopeKind::Function));
    assert!(model.node_count() > 0);
}

#[test]
fn test_existing_ids_are_kept() {
    let b = NodeBuilder::new();
    let mut stmt = b.assign(b.name("x"), b.int(1));
    stmt.data_mut().id = NodeId(41);
    let (module, _) = bind(b.module("m", vec![stmt]));
    assert_eq!(module.body[0].data().id, NodeId(41));
    let Stmt::Assign(assign) = &module.body[0] else {
        panic!("expected assignment");
    };
    assert!(assign.targets[0].data.id.0 > 41);
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_find_searches_outward_and_parent_lookups() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![
            b.assign(b.name("g"), b.int(1)),
            b.function_def(
                "f",
                vec![],
                None,
                vec![b.assign(b.name("g"), b.int(2)), b.expr_stmt(b.name("g"))],
            ),
        ],
    );
    let (module, model) = bind(module);
    let Stmt::FunctionDef(func) = &module.body[1] else {
        panic!("expected function");
    };
    let inner = func.body[0].data().scope;

    let local = model.find(inner, "g").unwrap();
    let outer = model.find_in_parent(inner, "g").unwrap();
    assert_ne!(local.definition, outer.definition);
    assert_eq!(model.find_from_parent(inner, "g").unwrap().definition, outer.definition);
    assert!(model.find_in_parent(model.root(), "g").is_none());
    assert!(model.find(inner, "missing").is_none());
}

#[test]
fn test_global_statement_binds_in_module_scope() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![
            b.assign(b.name("counter"), b.int(0)),
            b.function_def(
                "bump",
                vec![],
                None,
                vec![b.global(&["counter"]), b.assign(b.name("counter"), b.int(1))],
            ),
        ],
    );
    let (_, model) = bind(module);
    let root = model.scope(model.root()).unwrap();
    assert!(root.get("counter").unwrap().mutable);
    let function_scope = &model.scopes()[1];
    assert!(!function_scope.contains("counter"));
}

// ============================================================================
// Defined-before and mutability
// ============================================================================

#[test]
fn test_defined_before_follows_program_order() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![b.assign(b.name("x"), b.int(1)), b.assign(b.name("x"), b.int(2))],
    );
    let (module, model) = bind(module);
    let binding = model.find(model.root(), "x").unwrap();

    assert!(!model.defined_before(binding, module.body[0].data()));
    assert!(model.defined_before(binding, module.body[1].data()));
    assert!(binding.mutable);
}

#[test]
fn test_single_assignment_is_immutable() {
    let b = NodeBuilder::new();
    let module = b.module("m", vec![b.assign(b.name("x"), b.int(1))]);
    let (_, model) = bind(module);
    assert!(!model.is_mutable(model.root(), "x"));
}

#[test]
fn test_in_place_mutation_marks_binding() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![
            b.assign(b.name("xs"), b.list(vec![b.int(1)])),
            b.expr_stmt(b.method_call(b.name("xs"), "append", vec![b.int(2)])),
            b.assign(b.name("ys"), b.list(vec![b.int(1)])),
            b.assign(b.subscript(b.name("ys"), b.int(0)), b.int(5)),
            b.assign(b.name("n"), b.int(0)),
            b.aug_assign(b.name("n"), BinOpKind::Add, b.int(1)),
            b.assign(b.name("zs"), b.list(vec![])),
            b.expr_stmt(b.method_call(b.name("zs"), "count", vec![b.int(2)])),
        ],
    );
    let (_, model) = bind(module);
    let root = model.root();
    assert!(model.is_mutable(root, "xs"));
    assert!(model.is_mutable(root, "ys"));
    assert!(model.is_mutable(root, "n"));
    assert!(!model.is_mutable(root, "zs"));
}

#[test]
fn test_underscore_is_never_mutable() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![b.assign(b.name("_"), b.int(1)), b.assign(b.name("_"), b.int(2))],
    );
    let (_, model) = bind(module);
    assert!(!model.is_mutable(model.root(), "_"));
}

#[test]
fn test_mutation_before_declaration_in_function() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![
            b.function_def(
                "push",
                vec![],
                None,
                vec![b.expr_stmt(b.method_call(b.name("items"), "append", vec![b.int(1)]))],
            ),
            b.assign(b.name("items"), b.list(vec![b.int(0)])),
        ],
    );
    let (_, model) = bind(module);
    assert!(model.is_mutable(model.root(), "items"));
}

// ============================================================================
// Function and class facts
// ============================================================================

#[test]
fn test_precondition_function_is_flagged() {
    let b = NodeBuilder::new();
    let guard = b.if_(
        b.name("smt_pre"),
        vec![b.assert_(b.compare(b.name("x"), CmpOpKind::Gt, b.int(0)), None)],
        vec![],
    );
    let module = b.module(
        "m",
        vec![b.function_def(
            "positive",
            vec![b.arg("x", Some(int()))],
            Some(int()),
            vec![guard, b.ret(Some(b.name("x")))],
        )],
    );
    let (module, model) = bind(module);
    let facts = model.function_facts(model.root(), "positive").unwrap();
    assert!(facts.precondition);
    assert!(facts.returns_value);
    assert!(module.body[0].data().flags.contains(NodeFlags::PRECONDITION));
}

#[test]
fn test_class_facts_collect_members_in_order() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![b.class_def(
            "Shape",
            vec![],
            vec![b.name("sealed")],
            vec![
                b.ann_assign(b.name("width"), int(), None),
                b.ann_assign(b.name("height"), int(), Some(b.int(1))),
            ],
        )],
    );
    let (module, model) = bind(module);
    let facts = model.class_facts(model.root(), "Shape").unwrap();
    assert!(facts.is_sealed());
    let members: Vec<_> = facts.declarations.keys().cloned().collect();
    assert_eq!(members, vec!["width", "height"]);
    assert!(!facts.declarations["width"].has_default);
    assert!(facts.declarations["height"].has_default);
    assert!(module.body[0].data().flags.contains(NodeFlags::SEALED));
    assert_eq!(model.scope(facts.scope).map(|s| s.kind), Some(ScopeKind::Class));
}

// ============================================================================
// Call resolution and types
// ============================================================================

fn call_of(stmt: &Stmt) -> &CallExpr {
    match stmt {
        Stmt::Expr(e) => e.value.as_call().unwrap(),
        Stmt::Assign(a) => a.value.as_call().unwrap(),
        _ => panic!("expected call statement"),
    }
}

#[test]
fn test_stdlib_calls_resolve_through_imports() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![
            b.import(&[("math", None), ("random", Some("rnd"))]),
            b.import_from("time", &[("time", Some("now"))]),
            b.expr_stmt(b.call_path("math.floor", vec![b.float(1.5)])),
            b.expr_stmt(b.call_path("rnd.random", vec![])),
            b.expr_stmt(b.call_path("now", vec![])),
            b.expr_stmt(b.call_path("print", vec![b.int(1)])),
        ],
    );
    let (module, model) = bind(module);
    assert_eq!(call_of(&module.body[2]).stdlib, Some(StdlibFunction::MathFloor));
    assert_eq!(call_of(&module.body[3]).stdlib, Some(StdlibFunction::RandomRandom));
    assert_eq!(call_of(&module.body[4]).stdlib, Some(StdlibFunction::TimeTime));
    assert_eq!(call_of(&module.body[5]).stdlib, Some(StdlibFunction::Print));
    assert!(matches!(
        model.find(model.root(), "rnd").map(|b| &b.kind),
        Some(BindingKind::Import { qualified }) if qualified == "random"
    ));
}

#[test]
fn test_user_definition_shadows_builtin() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![
            b.function_def("len", vec![b.arg("x", None)], None, vec![b.ret(Some(b.int(0)))]),
            b.expr_stmt(b.call_path("len", vec![b.int(1)])),
        ],
    );
    let (module, _) = bind(module);
    assert_eq!(call_of(&module.body[1]).stdlib, None);
}

#[test]
fn test_types_flow_through_names_and_calls() {
    let b = NodeBuilder::new();
    let module = b.module(
        "m",
        vec![
            b.function_def("half", vec![b.arg("v", Some(int()))], Some(TypeAnnotation::name("float")), vec![
                b.ret(Some(b.binop(b.name("v"), BinOpKind::Div, b.int(2)))),
            ]),
            b.assign(b.name("a"), b.int(1)),
            b.assign(b.name("b"), b.binop(b.name("a"), BinOpKind::Add, b.int(2))),
            b.assign(b.name("c"), b.call_path("half", vec![b.name("b")])),
            b.assign(b.name("xs"), b.list(vec![b.int(1), b.int(2)])),
            b.for_(b.name("i"), b.call_path("range", vec![b.int(3)]), vec![b.pass()], vec![]),
        ],
    );
    let (_, model) = bind(module);
    let root = model.root();
    let ty = |name: &str| model.find(root, name).and_then(|b| b.ty.clone());
    assert_eq!(ty("a"), Some(int()));
    assert_eq!(ty("b"), Some(int()));
    assert_eq!(ty("c"), Some(TypeAnnotation::name("float")));
    assert_eq!(ty("xs"), Some(TypeAnnotation::generic("List", vec![int()])));
    assert_eq!(ty("i"), Some(int()));
}
