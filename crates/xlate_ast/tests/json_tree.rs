//! The CLI reads trees as JSON; these tests pin the accepted shape.

use xlate_ast::*;

#[test]
fn test_deserialize_minimal_assignment() {
    let json = r#"{
        "data": { "range": { "pos": 0, "end": 5 } },
        "name": "demo",
        "body": [
            { "Assign": {
                "data": { "range": { "pos": 0, "end": 5 } },
                "targets": [
                    { "data": { "range": { "pos": 0, "end": 1 } }, "kind": { "Name": { "id": "x" } } }
                ],
                "value": { "data": { "range": { "pos": 4, "end": 5 } }, "kind": { "Constant": { "Int": 3 } } }
            } },
            { "Pass": { "range": { "pos": 6, "end": 10 } } }
        ]
    }"#;

    let module: Module = serde_json::from_str(json).unwrap();
    assert_eq!(module.name, "demo");
    assert_eq!(module.body.len(), 2);
    assert!(!module.data.id.is_valid());

    let Stmt::Assign(assign) = &module.body[0] else {
        panic!("expected assignment");
    };
    assert_eq!(assign.targets[0].as_name(), Some("x"));
    assert_eq!(assign.value.as_constant(), Some(&Constant::Int(3)));
    assert_eq!(module.body[1].kind(), SyntaxKind::Pass);
}

#[test]
fn test_deserialize_annotated_call() {
    let json = r#"{
        "data": { "range": { "pos": 0, "end": 20 } },
        "ty": { "Generic": { "base": "List", "args": [ { "Name": "int" } ] } },
        "kind": { "Call": {
            "func": { "data": { "range": { "pos": 0, "end": 5 } }, "kind": { "Name": { "id": "range" } } },
            "args": [
                { "data": { "range": { "pos": 6, "end": 7 } }, "kind": { "Constant": { "Int": 4 } } }
            ]
        } }
    }"#;

    let expr: Expr = serde_json::from_str(json).unwrap();
    let call = expr.as_call().unwrap();
    assert_eq!(call.args.len(), 1);
    assert!(call.keywords.is_empty());
    assert_eq!(call.stdlib, None);
    let ty = expr.ty.as_ref().unwrap();
    assert_eq!(ty.to_string(), "List[int]");
    assert_eq!(ty.list_element(), Some(&TypeAnnotation::name("int")));
}
