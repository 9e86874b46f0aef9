//! xlate_nodebuilder: Synthetic AST node construction.
//!
//! Builds trees for the pre-pass rewriters and for tests. Every node gets a
//! fresh position from a running counter, and a node's range starts at its
//! earliest child, so positions follow construction order. Build statements
//! in program order and the defined-before relation falls out of the ranges.
//!
//! Node ids are left unset; the binder numbers the tree.

use std::cell::Cell;
use xlate_ast::*;
use xlate_core::TextPos;

/// Child positions of a node without children.
const LEAF: [TextPos; 0] = [];

pub struct NodeBuilder {
    next: Cell<TextPos>,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// A builder whose first node sits at `pos`.
    pub fn starting_at(pos: TextPos) -> Self {
        Self { next: Cell::new(pos) }
    }

    /// The position the next node will receive.
    pub fn position(&self) -> TextPos {
        self.next.get()
    }

    fn tick(&self) -> TextPos {
        let pos = self.next.get();
        self.next.set(pos + 1);
        pos
    }

    /// Node data covering the given children and a fresh position of its own.
    fn data(&self, children: impl IntoIterator<Item = TextPos>) -> NodeData {
        let own = self.tick();
        let start = children.into_iter().fold(own, TextPos::min);
        NodeData::new(start, own + 1)
    }

    fn expr(&self, children: impl IntoIterator<Item = TextPos>, kind: ExprKind) -> Expr {
        Expr {
            data: self.data(children),
            ty: None,
            kind,
        }
    }

    // ========================================================================
    // Module
    // ========================================================================

    pub fn module(&self, name: &str, body: Vec<Stmt>) -> Module {
        let own = self.tick();
        Module {
            data: NodeData::new(0, own + 1),
            name: name.to_string(),
            body,
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// A bare identifier.
    ///
    /// # Example
    /// ```
    /// use xlate_nodebuilder::NodeBuilder;
    /// let b = NodeBuilder::new();
    /// let x = b.name("x");
    /// assert_eq!(x.as_name(), Some("x"));
    /// assert_eq!(x.data.range.pos, 0);
    /// ```
    pub fn name(&self, id: &str) -> Expr {
        self.expr(LEAF, ExprKind::Name { id: id.to_string() })
    }

    pub fn constant(&self, value: Constant) -> Expr {
        self.expr(LEAF, ExprKind::Constant(value))
    }

    pub fn int(&self, value: i64) -> Expr {
        self.constant(Constant::Int(value))
    }

    pub fn float(&self, value: f64) -> Expr {
        self.constant(Constant::Float(value))
    }

    pub fn str(&self, value: &str) -> Expr {
        self.constant(Constant::Str(value.to_string()))
    }

    pub fn bool(&self, value: bool) -> Expr {
        self.constant(Constant::Bool(value))
    }

    pub fn none(&self) -> Expr {
        self.constant(Constant::None)
    }

    pub fn ellipsis(&self) -> Expr {
        self.constant(Constant::Ellipsis)
    }

    /// Attach an inferred type to an expression.
    pub fn typed(&self, mut expr: Expr, ty: TypeAnnotation) -> Expr {
        expr.ty = Some(ty);
        expr
    }

    pub fn call(&self, func: Expr, args: Vec<Expr>) -> Expr {
        self.call_kw(func, args, Vec::new())
    }

    pub fn call_kw(&self, func: Expr, args: Vec<Expr>, keywords: Vec<(&str, Expr)>) -> Expr {
        let children: Vec<TextPos> = std::iter::once(func.pos())
            .chain(args.iter().map(Expr::pos))
            .chain(keywords.iter().map(|(_, v)| v.pos()))
            .collect();
        let keywords = keywords
            .into_iter()
            .map(|(arg, value)| Keyword {
                arg: Some(arg.to_string()),
                value,
            })
            .collect();
        self.expr(
            children,
            ExprKind::Call(CallExpr {
                func: Box::new(func),
                args,
                keywords,
                stdlib: None,
            }),
        )
    }

    /// `callee(args...)` where the callee is a dotted path such as `math.floor`.
    pub fn call_path(&self, path: &str, args: Vec<Expr>) -> Expr {
        let func = self.path(path);
        self.call(func, args)
    }

    /// A name or attribute chain from a dotted path.
    pub fn path(&self, path: &str) -> Expr {
        let mut parts = path.split('.');
        let first = parts.next().unwrap_or_default();
        parts.fold(self.name(first), |value, attr| self.attribute(value, attr))
    }

    pub fn attribute(&self, value: Expr, attr: &str) -> Expr {
        self.expr(
            [value.pos()],
            ExprKind::Attribute {
                value: Box::new(value),
                attr: attr.to_string(),
            },
        )
    }

    /// `receiver.method(args...)`
    pub fn method_call(&self, receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
        let func = self.attribute(receiver, method);
        self.call(func, args)
    }

    pub fn subscript(&self, value: Expr, slice: Expr) -> Expr {
        self.expr(
            [value.pos(), slice.pos()],
            ExprKind::Subscript {
                value: Box::new(value),
                slice: Box::new(slice),
            },
        )
    }

    pub fn slice(&self, lower: Option<Expr>, upper: Option<Expr>, step: Option<Expr>) -> Expr {
        let children: Vec<TextPos> = [&lower, &upper, &step]
            .into_iter()
            .flatten()
            .map(Expr::pos)
            .collect();
        self.expr(
            children,
            ExprKind::Slice {
                lower: lower.map(Box::new),
                upper: upper.map(Box::new),
                step: step.map(Box::new),
            },
        )
    }

    pub fn binop(&self, left: Expr, op: BinOpKind, right: Expr) -> Expr {
        self.expr(
            [left.pos(), right.pos()],
            ExprKind::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
        )
    }

    pub fn unary(&self, op: UnaryOpKind, operand: Expr) -> Expr {
        self.expr(
            [operand.pos()],
            ExprKind::UnaryOp {
                op,
                operand: Box::new(operand),
            },
        )
    }

    pub fn bool_op(&self, op: BoolOpKind, values: Vec<Expr>) -> Expr {
        let children: Vec<TextPos> = values.iter().map(Expr::pos).collect();
        self.expr(children, ExprKind::BoolOp { op, values })
    }

    /// A single comparison `left op right`.
    pub fn compare(&self, left: Expr, op: CmpOpKind, right: Expr) -> Expr {
        self.compare_chain(left, vec![(op, right)])
    }

    pub fn compare_chain(&self, left: Expr, rest: Vec<(CmpOpKind, Expr)>) -> Expr {
        let children: Vec<TextPos> = std::iter::once(left.pos())
            .chain(rest.iter().map(|(_, e)| e.pos()))
            .collect();
        let (ops, comparators) = rest.into_iter().unzip();
        self.expr(
            children,
            ExprKind::Compare {
                left: Box::new(left),
                ops,
                comparators,
            },
        )
    }

    pub fn if_exp(&self, test: Expr, body: Expr, orelse: Expr) -> Expr {
        self.expr(
            [test.pos(), body.pos(), orelse.pos()],
            ExprKind::IfExp {
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
            },
        )
    }

    pub fn list(&self, elts: Vec<Expr>) -> Expr {
        let children: Vec<TextPos> = elts.iter().map(Expr::pos).collect();
        self.expr(children, ExprKind::List { elts })
    }

    pub fn tuple(&self, elts: Vec<Expr>) -> Expr {
        let children: Vec<TextPos> = elts.iter().map(Expr::pos).collect();
        self.expr(children, ExprKind::Tuple { elts })
    }

    pub fn set(&self, elts: Vec<Expr>) -> Expr {
        let children: Vec<TextPos> = elts.iter().map(Expr::pos).collect();
        self.expr(children, ExprKind::Set { elts })
    }

    pub fn dict(&self, entries: Vec<(Expr, Expr)>) -> Expr {
        let children: Vec<TextPos> = entries
            .iter()
            .flat_map(|(k, v)| [k.pos(), v.pos()])
            .collect();
        let (keys, values) = entries.into_iter().unzip();
        self.expr(children, ExprKind::Dict { keys, values })
    }

    pub fn lambda(&self, args: Vec<Arg>, body: Expr) -> Expr {
        let children: Vec<TextPos> = args
            .iter()
            .map(|a| a.data.range.pos)
            .chain([body.pos()])
            .collect();
        self.expr(
            children,
            ExprKind::Lambda {
                args,
                body: Box::new(body),
            },
        )
    }

    pub fn comprehension(&self, target: Expr, iter: Expr, ifs: Vec<Expr>) -> Comprehension {
        Comprehension { target, iter, ifs }
    }

    pub fn list_comp(&self, elt: Expr, generators: Vec<Comprehension>) -> Expr {
        let children = comprehension_positions(&generators).chain([elt.pos()]).collect::<Vec<_>>();
        self.expr(
            children,
            ExprKind::ListComp {
                elt: Box::new(elt),
                generators,
            },
        )
    }

    pub fn dict_comp(&self, key: Expr, value: Expr, generators: Vec<Comprehension>) -> Expr {
        let children = comprehension_positions(&generators)
            .chain([key.pos(), value.pos()])
            .collect::<Vec<_>>();
        self.expr(
            children,
            ExprKind::DictComp {
                key: Box::new(key),
                value: Box::new(value),
                generators,
            },
        )
    }

    pub fn generator_exp(&self, elt: Expr, generators: Vec<Comprehension>) -> Expr {
        let children = comprehension_positions(&generators).chain([elt.pos()]).collect::<Vec<_>>();
        self.expr(
            children,
            ExprKind::GeneratorExp {
                elt: Box::new(elt),
                generators,
            },
        )
    }

    pub fn starred(&self, value: Expr) -> Expr {
        self.expr([value.pos()], ExprKind::Starred { value: Box::new(value) })
    }

    pub fn await_(&self, value: Expr) -> Expr {
        self.expr([value.pos()], ExprKind::Await { value: Box::new(value) })
    }

    pub fn yield_(&self, value: Option<Expr>) -> Expr {
        let children: Vec<TextPos> = value.iter().map(Expr::pos).collect();
        self.expr(
            children,
            ExprKind::Yield {
                value: value.map(Box::new),
            },
        )
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn arg(&self, name: &str, annotation: Option<TypeAnnotation>) -> Arg {
        Arg {
            data: self.data(LEAF),
            name: name.to_string(),
            annotation,
        }
    }

    /// `target = value`
    pub fn assign(&self, target: Expr, value: Expr) -> Stmt {
        self.assign_many(vec![target], value)
    }

    /// `t1 = t2 = ... = value`
    pub fn assign_many(&self, targets: Vec<Expr>, value: Expr) -> Stmt {
        let children: Vec<TextPos> = targets
            .iter()
            .map(Expr::pos)
            .chain([value.pos()])
            .collect();
        Stmt::Assign(Assign {
            data: self.data(children),
            targets,
            value,
        })
    }

    pub fn ann_assign(&self, target: Expr, annotation: TypeAnnotation, value: Option<Expr>) -> Stmt {
        let children: Vec<TextPos> = std::iter::once(target.pos())
            .chain(value.iter().map(Expr::pos))
            .collect();
        Stmt::AnnAssign(AnnAssign {
            data: self.data(children),
            target,
            annotation,
            value,
        })
    }

    pub fn aug_assign(&self, target: Expr, op: BinOpKind, value: Expr) -> Stmt {
        Stmt::AugAssign(AugAssign {
            data: self.data([target.pos(), value.pos()]),
            target,
            op,
            value,
        })
    }

    pub fn expr_stmt(&self, value: Expr) -> Stmt {
        Stmt::Expr(ExprStmt {
            data: self.data([value.pos()]),
            value,
        })
    }

    pub fn ret(&self, value: Option<Expr>) -> Stmt {
        let children: Vec<TextPos> = value.iter().map(Expr::pos).collect();
        Stmt::Return(Return {
            data: self.data(children),
            value,
        })
    }

    pub fn function_def(
        &self,
        name: &str,
        args: Vec<Arg>,
        returns: Option<TypeAnnotation>,
        body: Vec<Stmt>,
    ) -> Stmt {
        self.decorated_function_def(name, Vec::new(), args, returns, body)
    }

    pub fn decorated_function_def(
        &self,
        name: &str,
        decorators: Vec<Expr>,
        args: Vec<Arg>,
        returns: Option<TypeAnnotation>,
        body: Vec<Stmt>,
    ) -> Stmt {
        let children: Vec<TextPos> = decorators
            .iter()
            .map(Expr::pos)
            .chain(args.iter().map(|a| a.data.range.pos))
            .chain(body.iter().map(Stmt::pos))
            .collect();
        Stmt::FunctionDef(FunctionDef {
            data: self.data(children),
            name: name.to_string(),
            args,
            body,
            decorators,
            returns,
            is_async: false,
        })
    }

    pub fn async_function_def(&self, name: &str, args: Vec<Arg>, body: Vec<Stmt>) -> Stmt {
        let mut stmt = self.function_def(name, args, None, body);
        if let Stmt::FunctionDef(func) = &mut stmt {
            func.is_async = true;
        }
        stmt
    }

    pub fn class_def(&self, name: &str, bases: Vec<Expr>, decorators: Vec<Expr>, body: Vec<Stmt>) -> Stmt {
        let children: Vec<TextPos> = decorators
            .iter()
            .chain(bases.iter())
            .map(Expr::pos)
            .chain(body.iter().map(Stmt::pos))
            .collect();
        Stmt::ClassDef(ClassDef {
            data: self.data(children),
            name: name.to_string(),
            bases,
            decorators,
            body,
        })
    }

    pub fn if_(&self, test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
        let children = block_positions(test.pos(), &body, &orelse);
        Stmt::If(If {
            data: self.data(children),
            test,
            body,
            orelse,
        })
    }

    pub fn while_(&self, test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
        let children = block_positions(test.pos(), &body, &orelse);
        Stmt::While(While {
            data: self.data(children),
            test,
            body,
            orelse,
        })
    }

    pub fn for_(&self, target: Expr, iter: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Stmt {
        let mut children = block_positions(target.pos(), &body, &orelse);
        children.push(iter.pos());
        Stmt::For(For {
            data: self.data(children),
            target,
            iter,
            body,
            orelse,
        })
    }

    pub fn with_(&self, items: Vec<Expr>, body: Vec<Stmt>) -> Stmt {
        let children: Vec<TextPos> = items
            .iter()
            .map(Expr::pos)
            .chain(body.iter().map(Stmt::pos))
            .collect();
        Stmt::With(With {
            data: self.data(children),
            items,
            body,
        })
    }

    pub fn raise(&self, exc: Option<Expr>) -> Stmt {
        let children: Vec<TextPos> = exc.iter().map(Expr::pos).collect();
        Stmt::Raise(Raise {
            data: self.data(children),
            exc,
        })
    }

    pub fn try_(&self, body: Vec<Stmt>, handler_body: Vec<Stmt>) -> Stmt {
        let handler = ExceptHandler {
            data: self.data(handler_body.iter().map(Stmt::pos)),
            type_: None,
            name: None,
            body: handler_body,
        };
        let children: Vec<TextPos> = body
            .iter()
            .map(Stmt::pos)
            .chain([handler.data.range.pos])
            .collect();
        Stmt::Try(Try {
            data: self.data(children),
            body,
            handlers: vec![handler],
            orelse: Vec::new(),
            finalbody: Vec::new(),
        })
    }

    pub fn assert_(&self, test: Expr, msg: Option<Expr>) -> Stmt {
        let children: Vec<TextPos> = std::iter::once(test.pos())
            .chain(msg.iter().map(Expr::pos))
            .collect();
        Stmt::Assert(Assert {
            data: self.data(children),
            test,
            msg,
        })
    }

    pub fn delete(&self, targets: Vec<Expr>) -> Stmt {
        let children: Vec<TextPos> = targets.iter().map(Expr::pos).collect();
        Stmt::Delete(Delete {
            data: self.data(children),
            targets,
        })
    }

    pub fn global(&self, names: &[&str]) -> Stmt {
        Stmt::Global(Global {
            data: self.data(LEAF),
            names: names.iter().map(|n| n.to_string()).collect(),
        })
    }

    /// `import a, b as c`
    pub fn import(&self, names: &[(&str, Option<&str>)]) -> Stmt {
        Stmt::Import(Import {
            data: self.data(LEAF),
            names: aliases(names),
        })
    }

    /// `from module import a, b as c`
    pub fn import_from(&self, module: &str, names: &[(&str, Option<&str>)]) -> Stmt {
        Stmt::ImportFrom(ImportFrom {
            data: self.data(LEAF),
            module: module.to_string(),
            names: aliases(names),
            level: 0,
        })
    }

    pub fn pass(&self) -> Stmt {
        Stmt::Pass(self.data(LEAF))
    }

    pub fn break_(&self) -> Stmt {
        Stmt::Break(self.data(LEAF))
    }

    pub fn continue_(&self) -> Stmt {
        Stmt::Continue(self.data(LEAF))
    }
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn aliases(names: &[(&str, Option<&str>)]) -> Vec<Alias> {
    names
        .iter()
        .map(|(name, asname)| Alias {
            name: name.to_string(),
            asname: asname.map(str::to_string),
        })
        .collect()
}

fn block_positions(head: TextPos, body: &[Stmt], orelse: &[Stmt]) -> Vec<TextPos> {
    std::iter::once(head)
        .chain(body.iter().map(Stmt::pos))
        .chain(orelse.iter().map(Stmt::pos))
        .collect()
}

fn comprehension_positions(generators: &[Comprehension]) -> impl Iterator<Item = TextPos> + '_ {
    generators
        .iter()
        .flat_map(|g| [g.target.pos(), g.iter.pos()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_construction_order() {
        let b = NodeBuilder::new();
        let first = b.assign(b.name("x"), b.int(1));
        let second = b.expr_stmt(b.name("x"));
        assert!(first.pos() < second.pos());
        assert!(first.end() <= second.pos());
    }

    #[test]
    fn test_statement_range_covers_children() {
        let b = NodeBuilder::new();
        let stmt = b.assign(b.name("x"), b.binop(b.int(1), BinOpKind::Add, b.int(2)));
        let Stmt::Assign(assign) = &stmt else {
            panic!("expected assignment");
        };
        assert_eq!(stmt.pos(), assign.targets[0].pos());
        assert!(assign.value.data.range.end <= stmt.end());
    }

    #[test]
    fn test_for_target_precedes_body() {
        let b = NodeBuilder::new();
        let stmt = b.for_(
            b.name("i"),
            b.call_path("range", vec![b.int(3)]),
            vec![b.expr_stmt(b.name("i"))],
            vec![],
        );
        let Stmt::For(for_) = &stmt else {
            panic!("expected for");
        };
        assert!(for_.target.pos() < for_.body[0].pos());
    }

    #[test]
    fn test_path_builds_attribute_chain() {
        let b = NodeBuilder::new();
        let path = b.path("math.floor");
        assert_eq!(path.dotted_name().as_deref(), Some("math.floor"));
        assert_eq!(path.kind(), SyntaxKind::Attribute);
    }

    #[test]
    fn test_ids_left_unset() {
        let b = NodeBuilder::new();
        let module = b.module("m", vec![b.pass()]);
        assert!(!module.data.id.is_valid());
        assert!(!module.body[0].data().id.is_valid());
    }
}
