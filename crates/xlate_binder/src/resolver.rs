//! Second binding pass: mutation marks, call targets and inferred types.
//!
//! Runs after every binding exists, so a function body may mutate a
//! module-level name declared further down.

use crate::binding::BindingKind;
use crate::model::SemanticModel;
use xlate_ast::visitor::{walk_expr_mut, walk_stmt_mut, MutVisitor};
use xlate_ast::*;

/// Methods that mutate their receiver in place.
const MUTATING_METHODS: &[&str] = &[
    "append", "extend", "insert", "pop", "remove", "clear", "sort", "reverse", "update", "add",
    "discard",
];

pub(crate) struct Resolver<'m> {
    model: &'m mut SemanticModel,
}

impl<'m> Resolver<'m> {
    pub(crate) fn new(model: &'m mut SemanticModel) -> Self {
        Self { model }
    }

    // ========================================================================
    // Mutability
    // ========================================================================

    /// Mark the binding behind the root name of `expr` (`a` in `a.b[c]`) mutable.
    fn mark_root_mutable(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Name { id } if id != "_" => {
                if let Some(binding) = self.model.find_mut(expr.data.scope, id) {
                    binding.mutable = true;
                }
            }
            ExprKind::Attribute { value, .. } | ExprKind::Subscript { value, .. } => {
                self.mark_root_mutable(value)
            }
            _ => {}
        }
    }

    fn mark_assignment_target(&mut self, target: &Expr) {
        match &target.kind {
            ExprKind::Attribute { .. } | ExprKind::Subscript { .. } => self.mark_root_mutable(target),
            ExprKind::Tuple { elts } | ExprKind::List { elts } => {
                for elt in elts {
                    self.mark_assignment_target(elt);
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Push a value's type onto an assignment target and, at the defining
    /// occurrence, onto its binding.
    fn propagate(&mut self, target: &mut Expr, ty: Option<TypeAnnotation>) {
        let Some(ty) = ty else {
            return;
        };
        match &mut target.kind {
            ExprKind::Name { id } => {
                if target.ty.is_none() {
                    target.ty = Some(ty.clone());
                }
                if let Some(binding) = self.model.find_mut(target.data.scope, id) {
                    if binding.definition == target.data.id && binding.ty.is_none() {
                        binding.ty = Some(ty);
                    }
                }
            }
            ExprKind::Tuple { elts } | ExprKind::List { elts } => {
                if let TypeAnnotation::Generic { base, args } = ty {
                    if base == "Tuple" && args.len() == elts.len() {
                        for (elt, arg) in elts.iter_mut().zip(args) {
                            self.propagate(elt, Some(arg));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn infer(&self, expr: &Expr) -> Option<TypeAnnotation> {
        let scope = expr.data.scope;
        match &expr.kind {
            ExprKind::Constant(constant) => match constant {
                Constant::Int(_) => Some(TypeAnnotation::name("int")),
                Constant::Float(_) => Some(TypeAnnotation::name("float")),
                Constant::Str(_) => Some(TypeAnnotation::name("str")),
                Constant::Bool(_) => Some(TypeAnnotation::name("bool")),
                Constant::Bytes(_) => Some(TypeAnnotation::name("bytes")),
                Constant::None | Constant::Ellipsis => None,
            },
            ExprKind::Name { id } => {
                let binding = self.model.find(scope, id)?;
                match binding.kind {
                    BindingKind::Variable | BindingKind::Parameter => binding.ty.clone(),
                    _ => None,
                }
            }
            ExprKind::BinOp { left, op, right } => binop_type(left.ty.as_ref()?, *op, right.ty.as_ref()?),
            ExprKind::UnaryOp { op, operand } => match op {
                UnaryOpKind::Not => Some(TypeAnnotation::name("bool")),
                _ => operand.ty.clone(),
            },
            ExprKind::BoolOp { values, .. } => {
                let first = values.first()?.ty.clone()?;
                values.iter().all(|v| v.ty.as_ref() == Some(&first)).then_some(first)
            }
            ExprKind::Compare { .. } => Some(TypeAnnotation::name("bool")),
            ExprKind::IfExp { body, orelse, .. } => {
                (body.ty == orelse.ty).then(|| body.ty.clone()).flatten()
            }
            ExprKind::Call(call) => self.call_type(scope, call),
            ExprKind::List { elts } => {
                let elt = elts.first()?.ty.clone()?;
                Some(TypeAnnotation::generic("List", vec![elt]))
            }
            ExprKind::Set { elts } => {
                let elt = elts.first()?.ty.clone()?;
                Some(TypeAnnotation::generic("Set", vec![elt]))
            }
            ExprKind::Dict { keys, values } => {
                let key = keys.first()?.ty.clone()?;
                let value = values.first()?.ty.clone()?;
                Some(TypeAnnotation::generic("Dict", vec![key, value]))
            }
            ExprKind::Tuple { elts } => {
                let args: Option<Vec<_>> = elts.iter().map(|e| e.ty.clone()).collect();
                Some(TypeAnnotation::generic("Tuple", args?))
            }
            ExprKind::Subscript { value, slice } => {
                let value_ty = value.ty.as_ref()?;
                if matches!(slice.kind, ExprKind::Slice { .. }) {
                    return Some(value_ty.clone());
                }
                match value_ty {
                    TypeAnnotation::Generic { base, args } if base == "List" => args.first().cloned(),
                    TypeAnnotation::Generic { base, args } if base == "Dict" => args.get(1).cloned(),
                    TypeAnnotation::Name(name) if name == "str" => Some(value_ty.clone()),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn call_type(&self, scope: ScopeId, call: &CallExpr) -> Option<TypeAnnotation> {
        if let Some(stdlib) = call.stdlib {
            let name = match stdlib {
                StdlibFunction::Int | StdlibFunction::Len | StdlibFunction::MathFloor => "int",
                StdlibFunction::Float | StdlibFunction::TimeTime | StdlibFunction::RandomRandom => "float",
                StdlibFunction::Str => "str",
                StdlibFunction::Bool => "bool",
                StdlibFunction::Range | StdlibFunction::Xrange => {
                    return Some(TypeAnnotation::generic("List", vec![TypeAnnotation::name("int")]));
                }
                StdlibFunction::Abs | StdlibFunction::Min | StdlibFunction::Max => {
                    return call.args.first()?.ty.clone();
                }
                StdlibFunction::Print | StdlibFunction::SysExit | StdlibFunction::RandomSeed => return None,
            };
            return Some(TypeAnnotation::name(name));
        }
        let callee = call.func.as_name()?;
        let binding = self.model.find(scope, callee)?;
        match binding.kind {
            BindingKind::Function(_) | BindingKind::Class(_) => binding.ty.clone(),
            _ => None,
        }
    }

    // ========================================================================
    // Call targets
    // ========================================================================

    /// Resolve a callee to a standard-library operation, honouring user
    /// shadowing and import aliases.
    fn resolve_callee(&self, scope: ScopeId, func: &Expr) -> Option<StdlibFunction> {
        let dotted = func.dotted_name()?;
        let (root, rest) = match dotted.split_once('.') {
            Some((root, rest)) => (root, Some(rest)),
            None => (dotted.as_str(), None),
        };
        let qualified = match self.model.find(scope, root) {
            None => dotted.clone(),
            Some(binding) => match (&binding.kind, rest) {
                (BindingKind::Import { qualified }, Some(rest)) => format!("{}.{}", qualified, rest),
                (BindingKind::Import { qualified }, None) => qualified.clone(),
                _ => return None,
            },
        };
        StdlibFunction::from_qualified_name(&qualified)
    }
}

impl MutVisitor for Resolver<'_> {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Assign(assign) => {
                self.visit_expr_mut(&mut assign.value);
                let ty = assign.value.ty.clone();
                for target in &mut assign.targets {
                    self.visit_expr_mut(target);
                    self.mark_assignment_target(target);
                    self.propagate(target, ty.clone());
                }
            }
            Stmt::AnnAssign(assign) => {
                if let Some(value) = &mut assign.value {
                    self.visit_expr_mut(value);
                }
                self.visit_expr_mut(&mut assign.target);
                self.mark_assignment_target(&assign.target);
                self.propagate(&mut assign.target, Some(assign.annotation.clone()));
            }
            Stmt::AugAssign(assign) => {
                self.visit_expr_mut(&mut assign.value);
                self.visit_expr_mut(&mut assign.target);
                self.mark_root_mutable(&assign.target);
            }
            Stmt::For(for_) => {
                self.visit_expr_mut(&mut for_.iter);
                let element = for_.iter.ty.as_ref().and_then(|ty| ty.list_element().cloned());
                self.propagate(&mut for_.target, element);
                self.visit_expr_mut(&mut for_.target);
                for stmt in for_.body.iter_mut().chain(for_.orelse.iter_mut()) {
                    self.visit_stmt_mut(stmt);
                }
            }
            _ => walk_stmt_mut(self, stmt),
        }
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);

        let scope = expr.data.scope;
        if let ExprKind::Call(call) = &mut expr.kind {
            if call.stdlib.is_none() {
                call.stdlib = self.resolve_callee(scope, &call.func);
            }
            if let ExprKind::Attribute { value, attr } = &call.func.kind {
                if MUTATING_METHODS.contains(&attr.as_str()) {
                    self.mark_root_mutable(value);
                }
            }
        }

        if expr.ty.is_none() {
            expr.ty = self.infer(expr);
        }
    }
}

/// Result type of `left op right` for equal or mixed numeric operands.
fn binop_type(left: &TypeAnnotation, op: BinOpKind, right: &TypeAnnotation) -> Option<TypeAnnotation> {
    let name = |ty: &TypeAnnotation| match ty {
        TypeAnnotation::Name(n) => Some(n.clone()),
        _ => None,
    };
    let numeric = |n: &str| n == "int" || n == "float";
    match (name(left), name(right)) {
        (Some(l), Some(r)) if numeric(&l) && numeric(&r) => {
            if op == BinOpKind::Div || l == "float" || r == "float" {
                Some(TypeAnnotation::name("float"))
            } else {
                Some(TypeAnnotation::name("int"))
            }
        }
        (Some(l), Some(r)) if op == BinOpKind::Mult && (l == "str" && r == "int") => {
            Some(TypeAnnotation::name("str"))
        }
        _ if left == right => Some(left.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binop_numeric_promotion() {
        let int = TypeAnnotation::name("int");
        let float = TypeAnnotation::name("float");
        assert_eq!(binop_type(&int, BinOpKind::Add, &int), Some(int.clone()));
        assert_eq!(binop_type(&int, BinOpKind::Add, &float), Some(float.clone()));
        assert_eq!(binop_type(&int, BinOpKind::Div, &int), Some(float));
    }

    #[test]
    fn test_binop_mismatch_is_unknown() {
        let int = TypeAnnotation::name("int");
        let s = TypeAnnotation::name("str");
        assert_eq!(binop_type(&s, BinOpKind::Add, &s), Some(s.clone()));
        assert_eq!(binop_type(&s, BinOpKind::Add, &int), None);
        assert_eq!(binop_type(&s, BinOpKind::Mult, &int), Some(s));
    }
}
