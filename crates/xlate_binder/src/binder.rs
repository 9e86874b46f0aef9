//! The binder implementation.
//!
//! Runs in two passes over the module:
//! - declaration: node ids, scopes, one binding per name and scope, rebinding
//!   mutability, function and class facts;
//! - resolution (see `resolver`): in-place mutation marks, standard-library
//!   call targets, inferred types.

use crate::binding::{Binding, BindingKind, ClassFacts, FunctionFacts, MemberDeclaration};
use crate::model::SemanticModel;
use crate::resolver::Resolver;
use crate::scope::{Scope, ScopeKind};
use tracing::debug;
use xlate_ast::visitor::{walk_expr, walk_expr_mut, walk_stmt, walk_stmt_mut, AstVisitor, MutVisitor};
use xlate_ast::*;
use xlate_core::{OrderedMap, TextPos};

/// The name that marks a pre-condition guard: `if smt_pre:`.
const PRECONDITION_GUARD: &str = "smt_pre";

/// Builds the [`SemanticModel`] for a module.
pub struct Binder {
    model: SemanticModel,
    /// Innermost scope last.
    scope_stack: Vec<ScopeId>,
    next_node_id: u32,
}

impl Binder {
    pub fn new() -> Self {
        Self {
            model: SemanticModel::default(),
            scope_stack: Vec::new(),
            next_node_id: 0,
        }
    }

    /// Bind a module, stamping ids, scopes and inferred types onto the tree.
    pub fn bind_module(mut self, module: &mut Module) -> SemanticModel {
        let mut scan = IdScan::default();
        scan.visit_module(module);
        if let Some(max) = scan.max {
            self.next_node_id = max + 1;
        }

        let root = self.push_scope(ScopeKind::Module, &module.name);
        self.stamp(&mut module.data);
        module.data.scope = root;
        self.visit_module_mut(module);
        self.pop_scope();

        let mut model = self.model;
        model.node_count = self.next_node_id;
        Resolver::new(&mut model).visit_module_mut(module);

        debug!(
            module = %module.name,
            scopes = model.scopes.len(),
            bindings = model.scopes.iter().map(|s| s.bindings.len()).sum::<usize>(),
            "bound module"
        );
        model
    }

    // ========================================================================
    // Scope management
    // ========================================================================

    fn current_scope(&self) -> ScopeId {
        self.scope_stack.last().copied().unwrap_or(ScopeId::INVALID)
    }

    /// Create a scope nested in the current one, without entering it.
    fn open_scope(&mut self, kind: ScopeKind, name: &str) -> ScopeId {
        let id = ScopeId(self.model.scopes.len() as u32);
        let parent = self.scope_stack.last().copied();
        self.model.scopes.push(Scope::new(id, kind, name, parent));
        id
    }

    fn push_scope(&mut self, kind: ScopeKind, name: &str) -> ScopeId {
        let id = self.open_scope(kind, name);
        self.scope_stack.push(id);
        id
    }

    fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    fn stamp(&mut self, data: &mut NodeData) {
        if !data.id.is_valid() {
            data.id = NodeId(self.next_node_id);
            self.next_node_id += 1;
        }
        data.scope = self.current_scope();
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Scope that receives a binding for `name` declared from the current scope.
    fn target_scope(&self, name: &str) -> ScopeId {
        let current = self.current_scope();
        match self.model.scope(current) {
            Some(scope) if scope.is_global(name) => self.model.root(),
            _ => current,
        }
    }

    fn declare(
        &mut self,
        name: &str,
        definition: NodeId,
        defined_at: TextPos,
        ty: Option<TypeAnnotation>,
        kind: BindingKind,
    ) {
        let scope_id = self.target_scope(name);
        let Some(scope) = self.model.scope_mut(scope_id) else {
            return;
        };
        if let Some(existing) = scope.bindings.get_mut(name) {
            existing.mutable |= name != "_";
            if existing.ty.is_none() {
                existing.ty = ty;
            }
            return;
        }
        scope.bindings.insert(
            name.to_string(),
            Binding {
                name: name.to_string(),
                definition,
                defined_at,
                mutable: false,
                ty,
                kind,
            },
        );
    }

    /// Declare every name bound by an assignment or loop target.
    fn declare_target(&mut self, target: &Expr, annotation: Option<TypeAnnotation>) {
        match &target.kind {
            ExprKind::Name { id } => self.declare(
                id,
                target.data.id,
                target.data.range.pos,
                annotation,
                BindingKind::Variable,
            ),
            ExprKind::Tuple { elts } | ExprKind::List { elts } => {
                for elt in elts {
                    self.declare_target(elt, None);
                }
            }
            ExprKind::Starred { value } => self.declare_target(value, None),
            // Subscript and attribute targets mutate an existing binding.
            _ => {}
        }
    }

    fn bind_function(&mut self, func: &mut FunctionDef) {
        self.stamp(&mut func.data);
        for decorator in &mut func.decorators {
            self.visit_expr_mut(decorator);
        }

        let scope = self.open_scope(ScopeKind::Function, &func.name);
        let facts = FunctionFacts {
            precondition: has_precondition_guard(&func.body),
            returns_value: returns_value(&func.body),
            scope,
        };
        if facts.precondition {
            func.data.flags |= NodeFlags::PRECONDITION;
        }
        self.declare(
            &func.name,
            func.data.id,
            func.data.range.pos,
            func.returns.clone(),
            BindingKind::Function(facts),
        );

        self.scope_stack.push(scope);
        for arg in &mut func.args {
            self.stamp(&mut arg.data);
            self.declare(
                &arg.name,
                arg.data.id,
                arg.data.range.pos,
                arg.annotation.clone(),
                BindingKind::Parameter,
            );
        }
        for stmt in &mut func.body {
            self.visit_stmt_mut(stmt);
        }
        self.pop_scope();
    }

    fn bind_class(&mut self, class: &mut ClassDef) {
        self.stamp(&mut class.data);
        for decorator in &mut class.decorators {
            self.visit_expr_mut(decorator);
        }
        for base in &mut class.bases {
            self.visit_expr_mut(base);
        }

        let scope = self.open_scope(ScopeKind::Class, &class.name);
        let facts = class_facts(class, scope);
        if facts.is_sealed() {
            class.data.flags |= NodeFlags::SEALED;
        }
        self.declare(
            &class.name,
            class.data.id,
            class.data.range.pos,
            Some(TypeAnnotation::name(class.name.as_str())),
            BindingKind::Class(facts),
        );

        self.scope_stack.push(scope);
        for stmt in &mut class.body {
            self.visit_stmt_mut(stmt);
        }
        self.pop_scope();
    }

    fn bind_import(&mut self, data: &NodeData, module: Option<&str>, names: &[Alias]) {
        for alias in names {
            let (local, qualified) = match (module, &alias.asname) {
                (Some(module), _) => (alias.local_name().to_string(), format!("{}.{}", module, alias.name)),
                (None, Some(asname)) => (asname.clone(), alias.name.clone()),
                (None, None) => {
                    let root = alias.name.split('.').next().unwrap_or(&alias.name).to_string();
                    (root.clone(), root)
                }
            };
            self.declare(
                &local,
                data.id,
                data.range.pos,
                None,
                BindingKind::Import { qualified },
            );
        }
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl MutVisitor for Binder {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::FunctionDef(func) => self.bind_function(func),
            Stmt::ClassDef(class) => self.bind_class(class),
            Stmt::Assign(assign) => {
                self.stamp(&mut assign.data);
                self.visit_expr_mut(&mut assign.value);
                for target in &mut assign.targets {
                    self.visit_expr_mut(target);
                    self.declare_target(target, None);
                }
            }
            Stmt::AnnAssign(assign) => {
                self.stamp(&mut assign.data);
                if let Some(value) = &mut assign.value {
                    self.visit_expr_mut(value);
                }
                self.visit_expr_mut(&mut assign.target);
                self.declare_target(&assign.target, Some(assign.annotation.clone()));
            }
            Stmt::For(for_) => {
                self.stamp(&mut for_.data);
                self.visit_expr_mut(&mut for_.iter);
                self.visit_expr_mut(&mut for_.target);
                self.declare_target(&for_.target, None);
                for stmt in for_.body.iter_mut().chain(for_.orelse.iter_mut()) {
                    self.visit_stmt_mut(stmt);
                }
            }
            Stmt::Import(import) => {
                self.stamp(&mut import.data);
                self.bind_import(&import.data, None, &import.names);
            }
            Stmt::ImportFrom(import) => {
                self.stamp(&mut import.data);
                let module = import.module.clone();
                self.bind_import(&import.data, Some(&module), &import.names);
            }
            Stmt::Global(global) => {
                self.stamp(&mut global.data);
                let current = self.current_scope();
                if let Some(scope) = self.model.scope_mut(current) {
                    scope.globals.extend(global.names.iter().cloned());
                }
            }
            Stmt::Try(try_) => {
                self.stamp(&mut try_.data);
                for handler in &mut try_.handlers {
                    self.stamp(&mut handler.data);
                    if let Some(name) = &handler.name {
                        self.declare(
                            name,
                            handler.data.id,
                            handler.data.range.pos,
                            None,
                            BindingKind::Variable,
                        );
                    }
                }
                walk_stmt_mut(self, stmt);
            }
            _ => {
                self.stamp(stmt.data_mut());
                walk_stmt_mut(self, stmt);
            }
        }
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        self.stamp(&mut expr.data);
        walk_expr_mut(self, expr);
    }

    fn visit_arg_mut(&mut self, arg: &mut Arg) {
        self.stamp(&mut arg.data);
    }
}

// ============================================================================
// Syntactic facts
// ============================================================================

fn has_precondition_guard(body: &[Stmt]) -> bool {
    match body.first() {
        Some(Stmt::If(if_)) => if_.test.as_name() == Some(PRECONDITION_GUARD),
        _ => false,
    }
}

fn returns_value(body: &[Stmt]) -> bool {
    let mut scan = ReturnScan::default();
    for stmt in body {
        scan.visit_stmt(stmt);
    }
    scan.found
}

/// Decorator name without call arguments (`sealed`, `dataclass`).
fn decorator_name(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Call(call) => call.func.dotted_name(),
        _ => expr.dotted_name(),
    }
}

fn class_facts(class: &ClassDef, scope: ScopeId) -> ClassFacts {
    let mut declarations = OrderedMap::default();
    for stmt in &class.body {
        match stmt {
            Stmt::AnnAssign(assign) => {
                if let Some(name) = assign.target.as_name() {
                    declarations.insert(
                        name.to_string(),
                        MemberDeclaration {
                            annotation: Some(assign.annotation.clone()),
                            has_default: assign.value.is_some(),
                        },
                    );
                }
            }
            Stmt::Assign(assign) => {
                for name in assign.targets.iter().filter_map(Expr::as_name) {
                    declarations.entry(name.to_string()).or_insert(MemberDeclaration {
                        annotation: assign.value.ty.clone(),
                        has_default: true,
                    });
                }
            }
            _ => {}
        }
    }
    ClassFacts {
        decorators: class.decorators.iter().filter_map(decorator_name).collect(),
        bases: class.bases.iter().filter_map(Expr::dotted_name).collect(),
        declarations,
        scope,
    }
}

#[derive(Default)]
struct ReturnScan {
    found: bool,
}

impl AstVisitor for ReturnScan {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(_) | Stmt::ClassDef(_) => {}
            Stmt::Return(ret) => self.found |= ret.value.is_some(),
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, _expr: &Expr) {}
}

/// Highest node id the front-end already assigned.
#[derive(Default)]
struct IdScan {
    max: Option<u32>,
}

impl IdScan {
    fn note(&mut self, data: &NodeData) {
        if data.id.is_valid() {
            self.max = Some(self.max.map_or(data.id.0, |m| m.max(data.id.0)));
        }
    }
}

impl AstVisitor for IdScan {
    fn visit_module(&mut self, module: &Module) {
        self.note(&module.data);
        xlate_ast::visitor::walk_module(self, module);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.note(stmt.data());
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.note(&expr.data);
        walk_expr(self, expr);
    }

    fn visit_arg(&mut self, arg: &Arg) {
        self.note(&arg.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard_body() -> Vec<Stmt> {
        let test = Expr {
            data: NodeData::new(0, 7),
            ty: None,
            kind: ExprKind::Name {
                id: "smt_pre".to_string(),
            },
        };
        vec![Stmt::If(If {
            data: NodeData::new(0, 20),
            test,
            body: vec![Stmt::Pass(NodeData::new(10, 14))],
            orelse: vec![],
        })]
    }

    #[test]
    fn test_precondition_guard_detection() {
        assert!(has_precondition_guard(&guard_body()));
        assert!(!has_precondition_guard(&[Stmt::Pass(NodeData::new(0, 4))]));
    }

    #[test]
    fn test_bare_return_is_not_a_value() {
        let body = vec![Stmt::Return(Return {
            data: NodeData::new(0, 6),
            value: None,
        })];
        assert!(!returns_value(&body));
    }
}
