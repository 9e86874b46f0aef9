//! AST visitor traits for traversing the syntax tree.
//!
//! `AstVisitor` walks a tree read-only; `MutVisitor` walks it in place and is
//! what the pre-pass rewriters and the binder build on. Default methods call
//! the matching `walk_*` function, so an implementation overrides only the
//! node kinds it cares about and calls `walk_*` to keep descending.

use crate::node::*;

// ============================================================================
// Read-only traversal
// ============================================================================

pub trait AstVisitor {
    fn visit_module(&mut self, module: &Module) {
        walk_module(self, module);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_arg(&mut self, _arg: &Arg) {}
}

pub fn walk_module<V: AstVisitor + ?Sized>(visitor: &mut V, module: &Module) {
    for stmt in &module.body {
        visitor.visit_stmt(stmt);
    }
}

fn walk_body<V: AstVisitor + ?Sized>(visitor: &mut V, body: &[Stmt]) {
    for stmt in body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: AstVisitor + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::FunctionDef(n) => {
            for decorator in &n.decorators {
                visitor.visit_expr(decorator);
            }
            for arg in &n.args {
                visitor.visit_arg(arg);
            }
            walk_body(visitor, &n.body);
        }
        Stmt::ClassDef(n) => {
            for decorator in &n.decorators {
                visitor.visit_expr(decorator);
            }
            for base in &n.bases {
                visitor.visit_expr(base);
            }
            walk_body(visitor, &n.body);
        }
        Stmt::Return(n) => {
            if let Some(value) = &n.value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Delete(n) => {
            for target in &n.targets {
                visitor.visit_expr(target);
            }
        }
        Stmt::Assign(n) => {
            visitor.visit_expr(&n.value);
            for target in &n.targets {
                visitor.visit_expr(target);
            }
        }
        Stmt::AugAssign(n) => {
            visitor.visit_expr(&n.value);
            visitor.visit_expr(&n.target);
        }
        Stmt::AnnAssign(n) => {
            if let Some(value) = &n.value {
                visitor.visit_expr(value);
            }
            visitor.visit_expr(&n.target);
        }
        Stmt::For(n) => {
            visitor.visit_expr(&n.iter);
            visitor.visit_expr(&n.target);
            walk_body(visitor, &n.body);
            walk_body(visitor, &n.orelse);
        }
        Stmt::While(n) => {
            visitor.visit_expr(&n.test);
            walk_body(visitor, &n.body);
            walk_body(visitor, &n.orelse);
        }
        Stmt::If(n) => {
            visitor.visit_expr(&n.test);
            walk_body(visitor, &n.body);
            walk_body(visitor, &n.orelse);
        }
        Stmt::With(n) => {
            for item in &n.items {
                visitor.visit_expr(item);
            }
            walk_body(visitor, &n.body);
        }
        Stmt::Raise(n) => {
            if let Some(exc) = &n.exc {
                visitor.visit_expr(exc);
            }
        }
        Stmt::Try(n) => {
            walk_body(visitor, &n.body);
            for handler in &n.handlers {
                if let Some(ty) = &handler.type_ {
                    visitor.visit_expr(ty);
                }
                walk_body(visitor, &handler.body);
            }
            walk_body(visitor, &n.orelse);
            walk_body(visitor, &n.finalbody);
        }
        Stmt::Assert(n) => {
            visitor.visit_expr(&n.test);
            if let Some(msg) = &n.msg {
                visitor.visit_expr(msg);
            }
        }
        Stmt::Expr(n) => visitor.visit_expr(&n.value),
        Stmt::Import(_)
        | Stmt::ImportFrom(_)
        | Stmt::Global(_)
        | Stmt::Pass(_)
        | Stmt::Break(_)
        | Stmt::Continue(_) => {}
    }
}

pub fn walk_expr<V: AstVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::BoolOp { values, .. } => {
            for value in values {
                visitor.visit_expr(value);
            }
        }
        ExprKind::BinOp { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::UnaryOp { operand, .. } => visitor.visit_expr(operand),
        ExprKind::Lambda { args, body } => {
            for arg in args {
                visitor.visit_arg(arg);
            }
            visitor.visit_expr(body);
        }
        ExprKind::IfExp { test, body, orelse } => {
            visitor.visit_expr(test);
            visitor.visit_expr(body);
            visitor.visit_expr(orelse);
        }
        ExprKind::Dict { keys, values } => {
            for (key, value) in keys.iter().zip(values) {
                visitor.visit_expr(key);
                visitor.visit_expr(value);
            }
        }
        ExprKind::Set { elts } | ExprKind::List { elts } | ExprKind::Tuple { elts } => {
            for elt in elts {
                visitor.visit_expr(elt);
            }
        }
        ExprKind::ListComp { elt, generators } | ExprKind::GeneratorExp { elt, generators } => {
            for generator in generators {
                walk_comprehension(visitor, generator);
            }
            visitor.visit_expr(elt);
        }
        ExprKind::DictComp { key, value, generators } => {
            for generator in generators {
                walk_comprehension(visitor, generator);
            }
            visitor.visit_expr(key);
            visitor.visit_expr(value);
        }
        ExprKind::Await { value } | ExprKind::Starred { value } => visitor.visit_expr(value),
        ExprKind::Yield { value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        ExprKind::Compare { left, comparators, .. } => {
            visitor.visit_expr(left);
            for comparator in comparators {
                visitor.visit_expr(comparator);
            }
        }
        ExprKind::Call(call) => {
            visitor.visit_expr(&call.func);
            for arg in &call.args {
                visitor.visit_expr(arg);
            }
            for keyword in &call.keywords {
                visitor.visit_expr(&keyword.value);
            }
        }
        ExprKind::Attribute { value, .. } => visitor.visit_expr(value),
        ExprKind::Subscript { value, slice } => {
            visitor.visit_expr(value);
            visitor.visit_expr(slice);
        }
        ExprKind::Slice { lower, upper, step } => {
            for part in [lower, upper, step].into_iter().flatten() {
                visitor.visit_expr(part);
            }
        }
        ExprKind::Constant(_) | ExprKind::Name { .. } => {}
    }
}

fn walk_comprehension<V: AstVisitor + ?Sized>(visitor: &mut V, generator: &Comprehension) {
    visitor.visit_expr(&generator.iter);
    visitor.visit_expr(&generator.target);
    for cond in &generator.ifs {
        visitor.visit_expr(cond);
    }
}

// ============================================================================
// In-place traversal
// ============================================================================

pub trait MutVisitor {
    fn visit_module_mut(&mut self, module: &mut Module) {
        walk_module_mut(self, module);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_arg_mut(&mut self, _arg: &mut Arg) {}
}

pub fn walk_module_mut<V: MutVisitor + ?Sized>(visitor: &mut V, module: &mut Module) {
    for stmt in &mut module.body {
        visitor.visit_stmt_mut(stmt);
    }
}

fn walk_body_mut<V: MutVisitor + ?Sized>(visitor: &mut V, body: &mut [Stmt]) {
    for stmt in body {
        visitor.visit_stmt_mut(stmt);
    }
}

pub fn walk_stmt_mut<V: MutVisitor + ?Sized>(visitor: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::FunctionDef(n) => {
            for decorator in &mut n.decorators {
                visitor.visit_expr_mut(decorator);
            }
            for arg in &mut n.args {
                visitor.visit_arg_mut(arg);
            }
            walk_body_mut(visitor, &mut n.body);
        }
        Stmt::ClassDef(n) => {
            for decorator in &mut n.decorators {
                visitor.visit_expr_mut(decorator);
            }
            for base in &mut n.bases {
                visitor.visit_expr_mut(base);
            }
            walk_body_mut(visitor, &mut n.body);
        }
        Stmt::Return(n) => {
            if let Some(value) = &mut n.value {
                visitor.visit_expr_mut(value);
            }
        }
        Stmt::Delete(n) => {
            for target in &mut n.targets {
                visitor.visit_expr_mut(target);
            }
        }
        Stmt::Assign(n) => {
            visitor.visit_expr_mut(&mut n.value);
            for target in &mut n.targets {
                visitor.visit_expr_mut(target);
            }
        }
        Stmt::AugAssign(n) => {
            visitor.visit_expr_mut(&mut n.value);
            visitor.visit_expr_mut(&mut n.target);
        }
        Stmt::AnnAssign(n) => {
            if let Some(value) = &mut n.value {
                visitor.visit_expr_mut(value);
            }
            visitor.visit_expr_mut(&mut n.target);
        }
        Stmt::For(n) => {
            visitor.visit_expr_mut(&mut n.iter);
            visitor.visit_expr_mut(&mut n.target);
            walk_body_mut(visitor, &mut n.body);
            walk_body_mut(visitor, &mut n.orelse);
        }
        Stmt::While(n) => {
            visitor.visit_expr_mut(&mut n.test);
            walk_body_mut(visitor, &mut n.body);
            walk_body_mut(visitor, &mut n.orelse);
        }
        Stmt::If(n) => {
            visitor.visit_expr_mut(&mut n.test);
            walk_body_mut(visitor, &mut n.body);
            walk_body_mut(visitor, &mut n.orelse);
        }
        Stmt::With(n) => {
            for item in &mut n.items {
                visitor.visit_expr_mut(item);
            }
            walk_body_mut(visitor, &mut n.body);
        }
        Stmt::Raise(n) => {
            if let Some(exc) = &mut n.exc {
                visitor.visit_expr_mut(exc);
            }
        }
        Stmt::Try(n) => {
            walk_body_mut(visitor, &mut n.body);
            for handler in &mut n.handlers {
                if let Some(ty) = &mut handler.type_ {
                    visitor.visit_expr_mut(ty);
                }
                walk_body_mut(visitor, &mut handler.body);
            }
            walk_body_mut(visitor, &mut n.orelse);
            walk_body_mut(visitor, &mut n.finalbody);
        }
        Stmt::Assert(n) => {
            visitor.visit_expr_mut(&mut n.test);
            if let Some(msg) = &mut n.msg {
                visitor.visit_expr_mut(msg);
            }
        }
        Stmt::Expr(n) => visitor.visit_expr_mut(&mut n.value),
        Stmt::Import(_)
        | Stmt::ImportFrom(_)
        | Stmt::Global(_)
        | Stmt::Pass(_)
        | Stmt::Break(_)
        | Stmt::Continue(_) => {}
    }
}

pub fn walk_expr_mut<V: MutVisitor + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    match &mut expr.kind {
        ExprKind::BoolOp { values, .. } => {
            for value in values {
                visitor.visit_expr_mut(value);
            }
        }
        ExprKind::BinOp { left, right, .. } => {
            visitor.visit_expr_mut(left);
            visitor.visit_expr_mut(right);
        }
        ExprKind::UnaryOp { operand, .. } => visitor.visit_expr_mut(operand),
        ExprKind::Lambda { args, body } => {
            for arg in args {
                visitor.visit_arg_mut(arg);
            }
            visitor.visit_expr_mut(body);
        }
        ExprKind::IfExp { test, body, orelse } => {
            visitor.visit_expr_mut(test);
            visitor.visit_expr_mut(body);
            visitor.visit_expr_mut(orelse);
        }
        ExprKind::Dict { keys, values } => {
            for (key, value) in keys.iter_mut().zip(values.iter_mut()) {
                visitor.visit_expr_mut(key);
                visitor.visit_expr_mut(value);
            }
        }
        ExprKind::Set { elts } | ExprKind::List { elts } | ExprKind::Tuple { elts } => {
            for elt in elts {
                visitor.visit_expr_mut(elt);
            }
        }
        ExprKind::ListComp { elt, generators } | ExprKind::GeneratorExp { elt, generators } => {
            for generator in generators {
                walk_comprehension_mut(visitor, generator);
            }
            visitor.visit_expr_mut(elt);
        }
        ExprKind::DictComp { key, value, generators } => {
            for generator in generators {
                walk_comprehension_mut(visitor, generator);
            }
            visitor.visit_expr_mut(key);
            visitor.visit_expr_mut(value);
        }
        ExprKind::Await { value } | ExprKind::Starred { value } => visitor.visit_expr_mut(value),
        ExprKind::Yield { value } => {
            if let Some(value) = value {
                visitor.visit_expr_mut(value);
            }
        }
        ExprKind::Compare { left, comparators, .. } => {
            visitor.visit_expr_mut(left);
            for comparator in comparators {
                visitor.visit_expr_mut(comparator);
            }
        }
        ExprKind::Call(call) => {
            visitor.visit_expr_mut(&mut call.func);
            for arg in &mut call.args {
                visitor.visit_expr_mut(arg);
            }
            for keyword in &mut call.keywords {
                visitor.visit_expr_mut(&mut keyword.value);
            }
        }
        ExprKind::Attribute { value, .. } => visitor.visit_expr_mut(value),
        ExprKind::Subscript { value, slice } => {
            visitor.visit_expr_mut(value);
            visitor.visit_expr_mut(slice);
        }
        ExprKind::Slice { lower, upper, step } => {
            for part in [lower, upper, step].into_iter().flatten() {
                visitor.visit_expr_mut(part);
            }
        }
        ExprKind::Constant(_) | ExprKind::Name { .. } => {}
    }
}

fn walk_comprehension_mut<V: MutVisitor + ?Sized>(visitor: &mut V, generator: &mut Comprehension) {
    visitor.visit_expr_mut(&mut generator.iter);
    visitor.visit_expr_mut(&mut generator.target);
    for cond in &mut generator.ifs {
        visitor.visit_expr_mut(cond);
    }
}
