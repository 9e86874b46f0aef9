//! xlate_transformers: Pre-pass tree rewrites.
//!
//! Each transformer is a total function from tree to tree, run before the
//! binder and the backend. A [`TransformPipeline`] applies them in a fixed,
//! named order; [`pipeline_for`] gives the order a target needs.

use tracing::trace;
use xlate_ast::visitor::{walk_expr_mut, MutVisitor};
use xlate_ast::*;
use xlate_options::Target;

/// A transformer that rewrites the AST.
pub trait Transformer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Transform a module.
    fn transform(&self, module: Module) -> Module;
}

/// An ordered list of transformers.
#[derive(Default)]
pub struct TransformPipeline {
    transformers: Vec<Box<dyn Transformer>>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    pub fn run(&self, module: Module) -> Module {
        self.transformers.iter().fold(module, |module, transformer| {
            trace!(transform = transformer.name(), module = %module.name, "applying pre-pass");
            transformer.transform(module)
        })
    }
}

/// The pre-passes a target runs, in order.
pub fn pipeline_for(target: Target) -> TransformPipeline {
    match target {
        Target::V => TransformPipeline::new()
            .with(DictValuesRewriter)
            .with(NoneCompareRewriter),
        Target::Smt => TransformPipeline::new(),
    }
}

// ============================================================================
// DictValuesRewriter
// ============================================================================

/// Rewrites `d.values()` to `d.keys().map(d[it])`.
pub struct DictValuesRewriter;

impl Transformer for DictValuesRewriter {
    fn name(&self) -> &'static str {
        "dict-values"
    }

    fn transform(&self, mut module: Module) -> Module {
        DictValuesVisitor.visit_module_mut(&mut module);
        module
    }
}

struct DictValuesVisitor;

impl MutVisitor for DictValuesVisitor {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
        let ExprKind::Call(call) = &expr.kind else {
            return;
        };
        let ExprKind::Attribute { value, attr } = &call.func.kind else {
            return;
        };
        if attr != "values" || !call.args.is_empty() {
            return;
        }
        *expr = keys_map(&expr.data, value);
    }
}

/// `dict.keys().map(dict[it])`, with every new node stamped from `origin`.
fn keys_map(origin: &NodeData, dict: &Expr) -> Expr {
    let node = |kind: ExprKind| Expr {
        data: origin.synthesized(),
        ty: None,
        kind,
    };
    let keys = node(ExprKind::Call(CallExpr {
        func: Box::new(node(ExprKind::Attribute {
            value: Box::new(dict.clone()),
            attr: "keys".to_string(),
        })),
        args: Vec::new(),
        keywords: Vec::new(),
        stdlib: None,
    }));
    let lookup = node(ExprKind::Subscript {
        value: Box::new(fresh_copy(dict)),
        slice: Box::new(node(ExprKind::Name { id: "it".to_string() })),
    });
    node(ExprKind::Call(CallExpr {
        func: Box::new(node(ExprKind::Attribute {
            value: Box::new(keys),
            attr: "map".to_string(),
        })),
        args: vec![lookup],
        keywords: Vec::new(),
        stdlib: None,
    }))
}

/// A copy of `expr` with node ids cleared, so the binder numbers it afresh.
fn fresh_copy(expr: &Expr) -> Expr {
    struct ClearIds;

    impl MutVisitor for ClearIds {
        fn visit_expr_mut(&mut self, expr: &mut Expr) {
            expr.data.id = NodeId::INVALID;
            walk_expr_mut(self, expr);
        }
    }

    let mut copy = expr.clone();
    ClearIds.visit_expr_mut(&mut copy);
    copy
}

// ============================================================================
// NoneCompareRewriter
// ============================================================================

/// In `<int literal> op None`, replaces the `None` comparator with `0`.
pub struct NoneCompareRewriter;

impl Transformer for NoneCompareRewriter {
    fn name(&self) -> &'static str {
        "none-compare"
    }

    fn transform(&self, mut module: Module) -> Module {
        NoneCompareVisitor.visit_module_mut(&mut module);
        module
    }
}

struct NoneCompareVisitor;

impl MutVisitor for NoneCompareVisitor {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
        if let ExprKind::Compare { left, comparators, .. } = &mut expr.kind {
            let int_left = matches!(left.kind, ExprKind::Constant(Constant::Int(_)));
            if let Some(first) = comparators.first_mut() {
                if int_left && first.is_none() {
                    first.kind = ExprKind::Constant(Constant::Int(0));
                    first.data.flags |= NodeFlags::SYNTHESIZED;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlate_nodebuilder::NodeBuilder;

    fn single_expr(module: &Module) -> &Expr {
        match &module.body[0] {
            Stmt::Expr(stmt) => &stmt.value,
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn test_dict_values_rewrite() {
        let b = NodeBuilder::new();
        let module = b.module(
            "m",
            vec![b.expr_stmt(b.method_call(b.name("d"), "values", vec![]))],
        );
        let module = DictValuesRewriter.transform(module);
        let expr = single_expr(&module);

        let call = expr.as_call().unwrap();
        let ExprKind::Attribute { value: keys, attr } = &call.func.kind else {
            panic!("expected attribute callee");
        };
        assert_eq!(attr, "map");
        assert_eq!(keys.as_call().unwrap().func.dotted_name().as_deref(), Some("d.keys"));
        let ExprKind::Subscript { value, slice } = &call.args[0].kind else {
            panic!("expected subscript argument");
        };
        assert_eq!(value.as_name(), Some("d"));
        assert_eq!(slice.as_name(), Some("it"));
        assert!(expr.data.flags.contains(NodeFlags::SYNTHESIZED));
    }

    #[test]
    fn test_values_with_arguments_untouched() {
        let b = NodeBuilder::new();
        let module = b.module(
            "m",
            vec![b.expr_stmt(b.method_call(b.name("d"), "values", vec![b.int(1)]))],
        );
        let before = module.clone();
        assert_eq!(DictValuesRewriter.transform(module), before);
    }

    #[test]
    fn test_none_compare_against_int() {
        let b = NodeBuilder::new();
        let module = b.module(
            "m",
            vec![
                b.expr_stmt(b.compare(b.int(3), CmpOpKind::Eq, b.none())),
                b.expr_stmt(b.compare(b.name("x"), CmpOpKind::Eq, b.none())),
            ],
        );
        let module = NoneCompareRewriter.transform(module);
        let ExprKind::Compare { comparators, .. } = &single_expr(&module).kind else {
            panic!("expected comparison");
        };
        assert_eq!(comparators[0].as_constant(), Some(&Constant::Int(0)));

        let Stmt::Expr(second) = &module.body[1] else {
            panic!("expected expression statement");
        };
        let ExprKind::Compare { comparators, .. } = &second.value.kind else {
            panic!("expected comparison");
        };
        assert!(comparators[0].is_none());
    }

    #[test]
    fn test_pipeline_order_per_target() {
        assert_eq!(pipeline_for(Target::V).names(), vec!["dict-values", "none-compare"]);
        assert!(pipeline_for(Target::Smt).is_empty());
    }
}
