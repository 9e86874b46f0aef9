//! Declaration / assignment classification.
//!
//! Every place a binding is produced (assignment, annotated assignment, loop
//! headers) asks the same question: does this occurrence declare the name or
//! update something that already exists? The answer depends only on the
//! target shape and the defined-before fact, so it is computed here once and
//! each backend renders the resulting plan in its own syntax.

use xlate_ast::{Assign, Constant, Expr, ExprKind, NodeData, TypeAnnotation};
use xlate_binder::SemanticModel;
use xlate_diagnostics::{messages, Result, TranspileError};

/// Stem of the temporaries holding a call result shared by several targets.
pub const TEMPORARY: &str = "tmp";

/// Marker call meaning "initialise with the type's default value".
pub const DEFAULT_VALUE_MARKER: &str = "default_value";

/// What one target occurrence does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingForm {
    /// Update an existing value: a re-bound name, or a subscript/attribute.
    Mutate,
    /// First occurrence of a name.
    Declare { mutable: bool },
}

impl BindingForm {
    pub fn is_declaration(self) -> bool {
        matches!(self, BindingForm::Declare { .. })
    }
}

/// Classification of a tuple or list target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternForm {
    /// All elements are declarations; otherwise all are mutations.
    pub declare: bool,
    pub elements: Vec<BindingForm>,
}

/// One target of an assignment, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetPlan<'a> {
    Mutate(&'a Expr),
    Declare { target: &'a Expr, mutable: bool },
    Pattern { elts: &'a [Expr], form: PatternForm },
}

/// How to emit a whole assignment statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignPlan<'a> {
    /// Evaluate the value once into a fresh temporary and assign each
    /// target from it.
    pub temporary: bool,
    pub targets: Vec<TargetPlan<'a>>,
}

/// Classify a single (non-pattern) target of the statement `stmt`.
///
/// Subscript and attribute targets always mutate. A name declares unless
/// its defining occurrence comes before `stmt`. `target_name` is only used
/// in the error for targets that cannot be assigned.
pub fn classify_target(model: &SemanticModel, target_name: &str, stmt: &NodeData, target: &Expr) -> Result<BindingForm> {
    match &target.kind {
        ExprKind::Subscript { .. } | ExprKind::Attribute { .. } => Ok(BindingForm::Mutate),
        ExprKind::Name { id } => Ok(match model.find(target.data.scope, id) {
            Some(binding) if model.defined_before(binding, stmt) => BindingForm::Mutate,
            _ => BindingForm::Declare {
                mutable: model.is_mutable(target.data.scope, id),
            },
        }),
        _ => Err(TranspileError::unsupported(
            &messages::ASSIGNMENT_TARGET_NOT_SUPPORTED,
            &[target_name, target.kind().as_str()],
            target.context(),
        )),
    }
}

/// Classify each element of a tuple/list target independently. A pattern
/// that declares some names and updates others is unsupported.
pub fn classify_pattern(model: &SemanticModel, target_name: &str, stmt: &NodeData, pattern: &Expr) -> Result<PatternForm> {
    let elts = match &pattern.kind {
        ExprKind::Tuple { elts } | ExprKind::List { elts } => elts,
        _ => return classify_target(model, target_name, stmt, pattern).map(|form| PatternForm {
            declare: form.is_declaration(),
            elements: vec![form],
        }),
    };
    let elements = elts
        .iter()
        .map(|elt| classify_target(model, target_name, stmt, elt))
        .collect::<Result<Vec<_>>>()?;
    let declared = elements.iter().filter(|form| form.is_declaration()).count();
    if declared != 0 && declared != elements.len() {
        return Err(TranspileError::unsupported(
            &messages::MIXED_DECLARATION_AND_ASSIGNMENT,
            &[target_name],
            pattern.context(),
        ));
    }
    Ok(PatternForm {
        declare: declared != 0,
        elements,
    })
}

/// More than one target fed by a call: evaluate the call once.
pub fn needs_temporary(targets: &[Expr], value: &Expr) -> bool {
    targets.len() > 1 && matches!(value.kind, ExprKind::Call(_))
}

/// No initializer, the "use the type's default value" marker, or `None`
/// for a type that is not `Optional`.
pub fn is_default_initializer(annotation: &TypeAnnotation, value: Option<&Expr>) -> bool {
    let Some(value) = value else {
        return true;
    };
    if let Some(Constant::None) = value.as_constant() {
        return annotation.base_name() != "Optional";
    }
    value
        .as_call()
        .and_then(|call| call.func.as_name())
        .is_some_and(|name| name == DEFAULT_VALUE_MARKER)
}

/// Build the emission plan for an assignment statement.
pub fn plan_assign<'a>(model: &SemanticModel, target_name: &str, assign: &'a Assign) -> Result<AssignPlan<'a>> {
    let targets = assign
        .targets
        .iter()
        .map(|target| match &target.kind {
            ExprKind::Tuple { elts } | ExprKind::List { elts } => {
                let form = classify_pattern(model, target_name, &assign.data, target)?;
                Ok(TargetPlan::Pattern { elts, form })
            }
            _ => Ok(match classify_target(model, target_name, &assign.data, target)? {
                BindingForm::Mutate => TargetPlan::Mutate(target),
                BindingForm::Declare { mutable } => TargetPlan::Declare { target, mutable },
            }),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(AssignPlan {
        temporary: needs_temporary(&assign.targets, &assign.value),
        targets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlate_ast::{Module, Stmt};
    use xlate_binder::Binder;
    use xlate_nodebuilder::NodeBuilder;

    fn bind(mut module: Module) -> (Module, SemanticModel) {
        let model = Binder::new().bind_module(&mut module);
        (module, model)
    }

    fn assign(stmt: &Stmt) -> &Assign {
        match stmt {
            Stmt::Assign(assign) => assign,
            _ => panic!("expected assignment"),
        }
    }

    #[test]
    fn test_first_occurrence_declares_later_mutates() {
        let b = NodeBuilder::new();
        let (module, model) = bind(b.module(
            "m",
            vec![b.assign(b.name("x"), b.int(1)), b.assign(b.name("x"), b.int(2))],
        ));
        let first = plan_assign(&model, "V", assign(&module.body[0])).unwrap();
        let second = plan_assign(&model, "V", assign(&module.body[1])).unwrap();
        assert!(matches!(first.targets[0], TargetPlan::Declare { mutable: true, .. }));
        assert!(matches!(second.targets[0], TargetPlan::Mutate(_)));
    }

    #[test]
    fn test_subscript_and_attribute_always_mutate() {
        let b = NodeBuilder::new();
        let (module, model) = bind(b.module(
            "m",
            vec![
                b.assign(b.subscript(b.name("xs"), b.int(0)), b.int(1)),
                b.assign(b.attribute(b.name("p"), "x"), b.int(1)),
            ],
        ));
        for stmt in &module.body {
            let plan = plan_assign(&model, "V", assign(stmt)).unwrap();
            assert!(matches!(plan.targets[0], TargetPlan::Mutate(_)));
        }
    }

    #[test]
    fn test_pattern_declares_all_new_names() {
        let b = NodeBuilder::new();
        let (module, model) = bind(b.module(
            "m",
            vec![b.assign(b.tuple(vec![b.name("a"), b.name("b")]), b.tuple(vec![b.int(1), b.int(2)]))],
        ));
        let plan = plan_assign(&model, "V", assign(&module.body[0])).unwrap();
        let TargetPlan::Pattern { elts, form } = &plan.targets[0] else {
            panic!("expected pattern");
        };
        assert_eq!(elts.len(), 2);
        assert!(form.declare);
        assert_eq!(form.elements, vec![BindingForm::Declare { mutable: false }; 2]);
    }

    #[test]
    fn test_pattern_mutating_existing_names() {
        let b = NodeBuilder::new();
        let (module, model) = bind(b.module(
            "m",
            vec![
                b.assign(b.tuple(vec![b.name("a"), b.name("b")]), b.tuple(vec![b.int(1), b.int(2)])),
                b.assign(b.tuple(vec![b.name("a"), b.name("b")]), b.tuple(vec![b.name("b"), b.name("a")])),
            ],
        ));
        let plan = plan_assign(&model, "V", assign(&module.body[1])).unwrap();
        let TargetPlan::Pattern { form, .. } = &plan.targets[0] else {
            panic!("expected pattern");
        };
        assert!(!form.declare);
        assert_eq!(form.elements, vec![BindingForm::Mutate; 2]);
    }

    #[test]
    fn test_mixed_pattern_is_unsupported() {
        let b = NodeBuilder::new();
        let (module, model) = bind(b.module(
            "m",
            vec![
                b.assign(b.name("a"), b.int(0)),
                b.assign(b.tuple(vec![b.name("a"), b.name("fresh")]), b.tuple(vec![b.int(1), b.int(2)])),
            ],
        ));
        let err = plan_assign(&model, "SMT", assign(&module.body[1])).unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(err.code(), 1020);
        assert_eq!(err.node().kind, "Tuple");
    }

    #[test]
    fn test_temporary_for_multiple_targets_from_call() {
        let b = NodeBuilder::new();
        let (module, model) = bind(b.module(
            "m",
            vec![
                b.assign_many(vec![b.name("a"), b.name("b")], b.call_path("f", vec![])),
                b.assign_many(vec![b.name("c"), b.name("d")], b.int(0)),
                b.assign(b.name("e"), b.call_path("f", vec![])),
            ],
        ));
        assert!(plan_assign(&model, "V", assign(&module.body[0])).unwrap().temporary);
        assert!(!plan_assign(&model, "V", assign(&module.body[1])).unwrap().temporary);
        assert!(!plan_assign(&model, "V", assign(&module.body[2])).unwrap().temporary);
    }

    #[test]
    fn test_unassignable_target() {
        let b = NodeBuilder::new();
        let (module, model) = bind(b.module("m", vec![b.assign(b.starred(b.name("rest")), b.int(0))]));
        let err = plan_assign(&model, "V", assign(&module.body[0])).unwrap_err();
        assert_eq!(err.code(), 1021);
        assert_eq!(err.message(), "Cannot assign to Starred in V.");
    }

    #[test]
    fn test_default_initializer() {
        let b = NodeBuilder::new();
        let int = TypeAnnotation::name("int");
        assert!(is_default_initializer(&int, None));
        assert!(is_default_initializer(&int, Some(&b.call_path("default_value", vec![]))));
        assert!(!is_default_initializer(&int, Some(&b.int(0))));
        assert!(!is_default_initializer(&int, Some(&b.call_path("value", vec![]))));
    }

    #[test]
    fn test_none_initializer_depends_on_optional() {
        let b = NodeBuilder::new();
        let optional = TypeAnnotation::generic("Optional", vec![TypeAnnotation::name("int")]);
        assert!(is_default_initializer(&TypeAnnotation::name("int"), Some(&b.none())));
        assert!(!is_default_initializer(&optional, Some(&b.none())));
    }
}
