//! The SMT-LIB backend.
//!
//! Statements become top-level commands (`define-fun`, `declare-const`,
//! `assert`, `declare-datatypes`) and expressions prefix terms. Classes
//! become algebraic datatypes: a `sealed` class is a closed set of
//! constructors, any other class a single-constructor record.
//!
//! A function whose body opens with `if smt_pre:` gets a separate
//! `<name>-pre` predicate built from that first statement only, and every
//! call to it becomes `(and (<name>-pre args) (<name> args))`.

pub mod plugins;

use crate::join_lines;
use tracing::debug;
use xlate_ast::*;
use xlate_binder::{BindingKind, ClassFacts, ScopeKind, SemanticModel};
use xlate_codegen::assign::{self, BindingForm, TargetPlan};
use xlate_codegen::base::IGNORED_MODULES;
use xlate_codegen::{CallSite, CodegenContext, TargetLanguage, Transpiler};
use xlate_diagnostics::{messages, NodeContext, Result, TranspileError};

/// Member types that make a sealed variant a plain constructor.
const CALLABLE: &str = "Callable";

pub struct SmtTranspiler<'m> {
    ctx: CodegenContext<'m>,
    /// Generating the body of a `-pre` predicate.
    in_precondition: bool,
}

impl<'m> SmtTranspiler<'m> {
    pub fn new(model: &'m SemanticModel) -> Self {
        Self {
            ctx: CodegenContext::new(model, plugins::registry(), plugins::type_map()),
            in_precondition: false,
        }
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.ctx = self.ctx.with_indent_width(width);
        self
    }

    fn block(&mut self, body: &[Stmt]) -> Result<String> {
        let mut lines = Vec::with_capacity(body.len());
        for stmt in body {
            lines.push(self.visit_stmt(stmt)?);
        }
        Ok(join_lines(lines))
    }

    fn sort(&self, ty: Option<&TypeAnnotation>, node: NodeContext) -> Result<String> {
        self.resolve_type_name(ty, node)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<String> {
        match stmt {
            Stmt::FunctionDef(func) => self.visit_function_def(func, stmt.context()),
            Stmt::ClassDef(class) => self.visit_class_def(class, stmt.context()),
            Stmt::Return(ret) => match &ret.value {
                Some(value) => self.visit_expr(value),
                None => Ok(String::new()),
            },
            Stmt::Delete(_) => Err(self.unsupported(&messages::DELETE_NOT_SUPPORTED, &[], stmt.context())),
            Stmt::Assign(assign) => self.visit_assign(assign),
            Stmt::AugAssign(assign) => {
                let target = self.visit_expr(&assign.target)?;
                let value = self.visit_expr(&assign.value)?;
                let op = self.arith_operator(assign.op, stmt.context())?;
                Ok(format!("(assert (= {t} ({} {t} {})))", op, value, t = target))
            }
            Stmt::AnnAssign(assign) => self.visit_ann_assign(assign, stmt.context()),
            Stmt::For(_) | Stmt::While(_) | Stmt::Break(_) | Stmt::Continue(_) => {
                Err(self.unsupported(&messages::LOOPS_NOT_SUPPORTED, &[], stmt.context()))
            }
            Stmt::If(if_) => self.visit_if(if_),
            Stmt::With(_) => Err(self.unsupported(&messages::WITH_NOT_SUPPORTED, &[], stmt.context())),
            Stmt::Raise(_) | Stmt::Try(_) => {
                Err(self.unsupported(&messages::EXCEPTIONS_NOT_SUPPORTED, &[], stmt.context()))
            }
            Stmt::Assert(assert) => {
                let test = self.visit_expr(&assert.test)?;
                if self.in_precondition {
                    Ok(test)
                } else {
                    Ok(format!("(assert {})", test))
                }
            }
            Stmt::Import(import) => {
                for alias in &import.names {
                    if alias.asname.is_none() {
                        self.record_using(&alias.name);
                    }
                }
                let aliased: Vec<String> = import
                    .names
                    .iter()
                    .filter(|a| a.asname.is_some() && !IGNORED_MODULES.contains(&a.name.as_str()))
                    .map(|a| self.format_import(&a.name))
                    .collect();
                Ok(aliased.join("\n"))
            }
            Stmt::ImportFrom(import) => {
                if IGNORED_MODULES.contains(&import.module.as_str()) {
                    return Ok(String::new());
                }
                let names: Vec<String> = import.names.iter().map(|a| a.name.clone()).collect();
                Ok(self.format_import_from(&import.module, &names))
            }
            Stmt::Global(_) => Err(self.unsupported(&messages::GLOBALS_NOT_SUPPORTED, &[], stmt.context())),
            Stmt::Expr(expr_stmt) => match expr_stmt.value.as_constant() {
                Some(Constant::Str(doc)) => Ok(self.format_comment(doc)),
                Some(Constant::Ellipsis) => Ok(String::new()),
                _ => self.visit_expr(&expr_stmt.value),
            },
            Stmt::Pass(_) => Ok(String::new()),
        }
    }

    fn visit_function_def(&mut self, func: &FunctionDef, context: NodeContext) -> Result<String> {
        if func.is_async {
            return Err(self.unsupported(&messages::COROUTINES_NOT_SUPPORTED, &[], context));
        }
        let model = self.ctx.model;
        if model.scope(func.data.scope).is_some_and(|s| s.kind == ScopeKind::Class) {
            return Err(self.unsupported(&messages::CLASS_METHODS_NOT_SUPPORTED, &[], context));
        }
        let facts = model.function_facts(func.data.scope, &func.name);
        let name = function_name(&func.name);

        let mut sorts = Vec::with_capacity(func.args.len());
        for arg in &func.args {
            sorts.push(self.sort(arg.annotation.as_ref(), arg.context())?);
        }
        let returns_value = func.is_declaration_only() || facts.map_or(true, |f| f.returns_value);
        let returns = match (&func.returns, returns_value) {
            (Some(returns), true) => format!(" {}", self.sort(Some(returns), context)?),
            _ => String::new(),
        };

        if func.is_declaration_only() {
            return Ok(format!("(declare-fun {} ({}){})", name, sorts.join(" "), returns));
        }

        let params: Vec<String> = func
            .args
            .iter()
            .zip(&sorts)
            .map(|(arg, sort)| format!("({} {})", arg.name, sort))
            .collect();
        let params = params.join(" ");
        let body = self.block(&func.body)?;
        let definition = format!("(define-fun {} ({}){}\n{})", name, params, returns, self.ctx.indent(&body));

        if !facts.is_some_and(|f| f.precondition) {
            return Ok(definition);
        }
        self.in_precondition = true;
        let guard = self.block(&func.body[..1]);
        self.in_precondition = false;
        let guard = guard?;
        Ok(format!(
            "(define-fun {}-pre ({}) Bool\n{})\n\n{}",
            name,
            params,
            self.ctx.indent(&guard),
            definition
        ))
    }

    fn visit_class_def(&mut self, class: &ClassDef, context: NodeContext) -> Result<String> {
        if class.bases.len() > 1 {
            return Err(self.unsupported(
                &messages::MULTIPLE_INHERITANCE_NOT_SUPPORTED,
                &[&class.name, &class.bases.len().to_string()],
                context,
            ));
        }
        if let Some(method) = class.body.iter().find(|s| matches!(s, Stmt::FunctionDef(_))) {
            return Err(self.unsupported(&messages::CLASS_METHODS_NOT_SUPPORTED, &[], method.context()));
        }
        let model = self.ctx.model;
        let facts = model.class_facts(class.data.scope, &class.name).ok_or_else(|| {
            TranspileError::malformed(&messages::MISSING_CLASS_FACTS, &[&class.name], context)
        })?;
        if facts.is_sealed() {
            return self.sealed_datatype(&class.name, facts, context);
        }

        let mut constructor = format!("mk-{}", class.name.to_lowercase());
        for (member, declaration) in &facts.declarations {
            let sort = self.sort(declaration.annotation.as_ref(), context)?;
            constructor.push_str(&format!(" ({} {})", member, sort));
        }
        Ok(format!("(declare-datatypes (({} 0)) ((({}))))", class.name, constructor))
    }

    /// A closed set of variants. Members typed with another class inline
    /// that class's fields as constructor arguments, one level deep.
    fn sealed_datatype(&self, name: &str, facts: &ClassFacts, context: NodeContext) -> Result<String> {
        enum Variant {
            Nullary(String),
            Constructor(String, Vec<String>),
        }

        let model = self.ctx.model;
        let mut variants = Vec::with_capacity(facts.declarations.len());
        for (member, declaration) in &facts.declarations {
            let member_type = match &declaration.annotation {
                Some(ty) if !self.is_plain_member(ty) => ty,
                _ => {
                    variants.push(Variant::Nullary(member.clone()));
                    continue;
                }
            };
            let type_name = member_type.base_name();
            let Some(referenced) = model.find_from_parent(facts.scope, type_name).and_then(|b| b.class_facts()) else {
                return Err(TranspileError::malformed(
                    &messages::SEALED_MEMBER_UNDECLARED_TYPE,
                    &[name, member.as_str(), type_name],
                    context,
                ));
            };
            let mut fields = Vec::with_capacity(referenced.declarations.len());
            for (field, field_declaration) in &referenced.declarations {
                fields.push(format!("({} {})", field, self.sort(field_declaration.annotation.as_ref(), context)?));
            }
            variants.push(Variant::Constructor(type_name.to_lowercase(), fields));
        }

        let complex = variants.iter().any(|v| matches!(v, Variant::Constructor(..)));
        if !complex {
            let names: Vec<String> = variants
                .into_iter()
                .filter_map(|v| match v {
                    Variant::Nullary(name) => Some(name),
                    Variant::Constructor(..) => None,
                })
                .collect();
            return Ok(format!("(declare-datatypes () (({} {})))", name, names.join(" ")));
        }
        let constructors: Vec<String> = variants
            .into_iter()
            .map(|v| match v {
                Variant::Nullary(name) => format!("({})", name),
                Variant::Constructor(cons, fields) => format!("({} {})", cons, fields.join(" ")),
            })
            .collect();
        Ok(format!("(declare-datatypes (({} 0)) (({})))", name, constructors.join(" ")))
    }

    /// Primitive or callable member types add no constructor fields.
    fn is_plain_member(&self, ty: &TypeAnnotation) -> bool {
        match ty {
            TypeAnnotation::Name(name) => self.ctx.type_map.is_primitive(name) || name == CALLABLE,
            TypeAnnotation::Generic { base, .. } => base == CALLABLE,
        }
    }

    fn visit_assign(&mut self, stmt: &Assign) -> Result<String> {
        let plan = assign::plan_assign(self.ctx.model, self.name(), stmt)?;
        let mut lines = Vec::with_capacity(plan.targets.len() + 1);
        let value = if plan.temporary {
            let sort = self.sort(stmt.value.ty.as_ref(), stmt.value.context())?;
            let temporary = self.ctx.fresh_temporary();
            lines.push(format!("(define-fun {} () {} {})", temporary, sort, self.visit_expr(&stmt.value)?));
            temporary
        } else {
            self.visit_expr(&stmt.value)?
        };

        for target in &plan.targets {
            let line = match target {
                TargetPlan::Mutate(target) => self.bind_one(target, BindingForm::Mutate, &value, None)?,
                TargetPlan::Declare { target, mutable } => match &stmt.value.kind {
                    ExprKind::List { elts } if !plan.temporary => self.declare_list(target, &stmt.value, elts)?,
                    _ => self.bind_one(target, BindingForm::Declare { mutable: *mutable }, &value, stmt.value.ty.as_ref())?,
                },
                TargetPlan::Pattern { elts, form } => {
                    let values = match &stmt.value.kind {
                        ExprKind::Tuple { elts: values } | ExprKind::List { elts: values }
                            if !plan.temporary && values.len() == elts.len() =>
                        {
                            values
                        }
                        _ => {
                            return Err(self.unsupported(
                                &messages::ASSIGNMENT_TARGET_NOT_SUPPORTED,
                                &["a pattern from a non-literal value"],
                                stmt.value.context(),
                            ))
                        }
                    };
                    let mut parts = Vec::with_capacity(elts.len());
                    for ((elt, element), value) in elts.iter().zip(&form.elements).zip(values) {
                        let text = self.visit_expr(value)?;
                        parts.push(self.bind_one(elt, *element, &text, value.ty.as_ref())?);
                    }
                    parts.join("\n")
                }
            };
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    /// One classified target: an equality assertion, a constant definition,
    /// or a declaration plus assertion for a name assigned again later.
    fn bind_one(&mut self, target: &Expr, form: BindingForm, value: &str, value_ty: Option<&TypeAnnotation>) -> Result<String> {
        let name = self.visit_expr(target)?;
        match form {
            BindingForm::Mutate => Ok(format!("(assert (= {} {}))", name, value)),
            BindingForm::Declare { mutable } => {
                let sort = self.sort(target.ty.as_ref().or(value_ty), target.context())?;
                if mutable {
                    Ok(format!("(declare-const {n} {})\n(assert (= {n} {}))", sort, value, n = name))
                } else {
                    Ok(format!("(define-fun {} () {} {})", name, sort, value))
                }
            }
        }
    }

    /// A list literal bound to a new name: an array constant constrained
    /// element by element.
    fn declare_list(&mut self, target: &Expr, list: &Expr, elts: &[Expr]) -> Result<String> {
        let name = self.visit_expr(target)?;
        let element = self.element_sort(list.ty.as_ref().or(target.ty.as_ref()), list.context())?;
        let mut lines = vec![format!("(declare-const {} (Array Int {}))", name, element)];
        for (i, elt) in elts.iter().enumerate() {
            lines.push(format!("(assert (= (select {} {}) {}))", name, i, self.visit_expr(elt)?));
        }
        Ok(lines.join("\n"))
    }

    fn element_sort(&self, list_ty: Option<&TypeAnnotation>, node: NodeContext) -> Result<String> {
        match list_ty.and_then(TypeAnnotation::list_element) {
            Some(element) => self.sort(Some(element), node),
            None => Ok("Int".to_string()),
        }
    }

    fn visit_ann_assign(&mut self, stmt: &AnnAssign, context: NodeContext) -> Result<String> {
        if !assign::is_default_initializer(&stmt.annotation, stmt.value.as_ref()) {
            let value = match &stmt.value {
                Some(value) => self.visit_expr(value)?,
                None => String::new(),
            };
            return Err(self.unsupported(&messages::ANNOTATION_VALUE_NOT_SUPPORTED, &[value.as_str()], context));
        }
        let name = self.visit_expr(&stmt.target)?;
        let sort = self.sort(Some(&stmt.annotation), context)?;
        Ok(format!("(declare-const {} {})", name, sort))
    }

    fn visit_if(&mut self, if_: &If) -> Result<String> {
        if if_.test.as_name() == Some(PRECONDITION_GUARD) {
            if !self.in_precondition {
                return Ok(String::new());
            }
            let body = self.block(&if_.body)?;
            return Ok(format!("(and\n{})", self.ctx.indent(&body)));
        }
        let test = self.visit_expr(&if_.test)?;
        let body = self.block(&if_.body)?;
        let orelse = match self.block(&if_.orelse)? {
            empty if empty.is_empty() => "0".to_string(),
            orelse => orelse,
        };
        Ok(format!("(ite {}\n{}\n{})", test, self.ctx.indent(&body), self.ctx.indent(&orelse)))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn visit_expr(&mut self, expr: &Expr) -> Result<String> {
        match &expr.kind {
            ExprKind::BoolOp { op, values } => {
                if values.is_empty() {
                    return Err(TranspileError::malformed(&messages::EMPTY_OPERAND_LIST, &["BoolOp"], expr.context()));
                }
                let op = match op {
                    BoolOpKind::And => "and",
                    BoolOpKind::Or => "or",
                };
                Ok(format!("({} {})", op, self.visit_terms(values)?))
            }
            ExprKind::BinOp { left, op, right } => {
                let op = self.arith_operator(*op, expr.context())?;
                Ok(format!("({} {} {})", op, self.visit_expr(left)?, self.visit_expr(right)?))
            }
            ExprKind::UnaryOp { op, operand } => {
                let operand = self.visit_expr(operand)?;
                match op {
                    UnaryOpKind::Not => Ok(format!("(not {})", operand)),
                    UnaryOpKind::USub => Ok(format!("(- {})", operand)),
                    UnaryOpKind::UAdd => Ok(operand),
                    UnaryOpKind::Invert => {
                        Err(self.unsupported(&messages::OPERATOR_NOT_SUPPORTED, &[op.symbol()], expr.context()))
                    }
                }
            }
            ExprKind::Lambda { .. } => Err(self.unsupported(&messages::LAMBDAS_NOT_SUPPORTED, &[], expr.context())),
            ExprKind::IfExp { test, body, orelse } => Ok(format!(
                "(ite {} {} {})",
                self.visit_expr(test)?,
                self.visit_expr(body)?,
                self.visit_expr(orelse)?
            )),
            ExprKind::Dict { .. } => Err(self.unsupported(&messages::DICTS_NOT_SUPPORTED, &[], expr.context())),
            ExprKind::Set { .. } => Err(self.unsupported(&messages::SETS_NOT_SUPPORTED, &[], expr.context())),
            ExprKind::ListComp { .. } => {
                Err(self.unsupported(&messages::COMPREHENSIONS_NOT_SUPPORTED, &["List"], expr.context()))
            }
            ExprKind::DictComp { .. } => {
                Err(self.unsupported(&messages::COMPREHENSIONS_NOT_SUPPORTED, &["Dict"], expr.context()))
            }
            ExprKind::GeneratorExp { .. } => {
                Err(self.unsupported(&messages::COMPREHENSIONS_NOT_SUPPORTED, &["Generator"], expr.context()))
            }
            ExprKind::Await { .. } => Err(self.unsupported(&messages::COROUTINES_NOT_SUPPORTED, &[], expr.context())),
            ExprKind::Yield { .. } => Err(self.unsupported(&messages::GENERATORS_NOT_SUPPORTED, &[], expr.context())),
            ExprKind::Compare { left, ops, comparators } => self.visit_compare(expr, left, ops, comparators),
            ExprKind::Call(call) => self.visit_call(expr, call),
            ExprKind::Constant(constant) => self.visit_constant(expr, constant),
            ExprKind::Attribute { value, attr } => {
                if self.is_sealed_class(value) {
                    return Ok(attr.clone());
                }
                Ok(format!("({} {})", attr, self.visit_expr(value)?))
            }
            ExprKind::Subscript { value, slice } => {
                if matches!(slice.kind, ExprKind::Slice { .. }) {
                    return Err(self.unsupported(&messages::SLICES_NOT_SUPPORTED, &[], slice.context()));
                }
                let is_array = value
                    .ty
                    .as_ref()
                    .is_some_and(|ty| ty.is_container("List") || ty.is_container("Dict") || ty.is_container("Set"));
                let value = self.visit_expr(value)?;
                let index = self.visit_expr(slice)?;
                if is_array {
                    Ok(format!("(select {} {})", value, index))
                } else {
                    Ok(self.ctx.default_subscript(&value, &index))
                }
            }
            ExprKind::Starred { .. } => Err(self.unsupported(&messages::STARRED_NOT_SUPPORTED, &[], expr.context())),
            ExprKind::Name { id } => Ok(id.clone()),
            ExprKind::List { elts } => self.visit_list(expr, elts),
            ExprKind::Tuple { elts } => Ok(format!("({})", self.visit_terms(elts)?)),
            ExprKind::Slice { .. } => Err(self.unsupported(&messages::SLICES_NOT_SUPPORTED, &[], expr.context())),
        }
    }

    fn visit_terms(&mut self, exprs: &[Expr]) -> Result<String> {
        let mut terms = Vec::with_capacity(exprs.len());
        for expr in exprs {
            terms.push(self.visit_expr(expr)?);
        }
        Ok(terms.join(" "))
    }

    fn arith_operator(&self, op: BinOpKind, node: NodeContext) -> Result<&'static str> {
        match op {
            BinOpKind::Add => Ok("+"),
            BinOpKind::Sub => Ok("-"),
            BinOpKind::Mult => Ok("*"),
            BinOpKind::Div => Ok("/"),
            BinOpKind::FloorDiv => Ok("div"),
            BinOpKind::Mod => Ok("mod"),
            BinOpKind::Pow => Ok("^"),
            BinOpKind::MatMult
            | BinOpKind::LShift
            | BinOpKind::RShift
            | BinOpKind::BitOr
            | BinOpKind::BitXor
            | BinOpKind::BitAnd => Err(self.unsupported(&messages::OPERATOR_NOT_SUPPORTED, &[op.symbol()], node)),
        }
    }

    fn visit_compare(&mut self, expr: &Expr, left: &Expr, ops: &[CmpOpKind], comparators: &[Expr]) -> Result<String> {
        if ops.is_empty() || ops.len() != comparators.len() {
            return Err(TranspileError::malformed(&messages::EMPTY_OPERAND_LIST, &["Compare"], expr.context()));
        }
        let mut parts = Vec::with_capacity(ops.len());
        let mut lhs = self.visit_expr(left)?;
        for (op, comparator) in ops.iter().zip(comparators) {
            let rhs = self.visit_expr(comparator)?;
            parts.push(match op {
                CmpOpKind::Eq | CmpOpKind::Is => format!("(= {} {})", lhs, rhs),
                CmpOpKind::NotEq | CmpOpKind::IsNot => format!("(not (= {} {}))", lhs, rhs),
                CmpOpKind::Lt | CmpOpKind::LtE | CmpOpKind::Gt | CmpOpKind::GtE => {
                    format!("({} {} {})", op.symbol(), lhs, rhs)
                }
                CmpOpKind::In | CmpOpKind::NotIn => {
                    return Err(self.unsupported(&messages::OPERATOR_NOT_SUPPORTED, &[op.symbol()], expr.context()))
                }
            });
            lhs = rhs;
        }
        if parts.len() == 1 {
            return Ok(parts.remove(0));
        }
        Ok(format!("(and {})", parts.join(" ")))
    }

    fn visit_call(&mut self, expr: &Expr, call: &CallExpr) -> Result<String> {
        let mut vargs = Vec::with_capacity(call.args.len() + call.keywords.len());
        for arg in &call.args {
            vargs.push(self.visit_expr(arg)?);
        }
        for keyword in &call.keywords {
            if keyword.arg.is_none() {
                return Err(self.unsupported(&messages::KEYWORD_ARGUMENTS_NOT_SUPPORTED, &["**"], expr.context()));
            }
            vargs.push(self.visit_expr(&keyword.value)?);
        }

        let source_callee = match call.func.dotted_name() {
            Some(dotted) => dotted,
            None => self.visit_expr(&call.func)?,
        };
        let site = CallSite {
            expr,
            call,
            callee: &source_callee,
            receiver: None,
            shadowed: self.ctx.shadows_builtin(&call.func),
        };
        if let Some(rewritten) = self.dispatch_call(&site, &vargs)? {
            return Ok(rewritten);
        }

        let args = vargs.join(" ");
        let apply = |callee: &str| {
            if args.is_empty() {
                callee.to_string()
            } else {
                format!("({} {})", callee, args)
            }
        };
        let ExprKind::Name { id } = &call.func.kind else {
            let callee = self.visit_expr(&call.func)?;
            if matches!(call.func.kind, ExprKind::Attribute { .. }) {
                return Ok(apply(&callee));
            }
            // Higher-order callee.
            return Ok(format!("({})", [format!("apply {}", callee), args].join(" ").trim_end()));
        };

        let model = self.ctx.model;
        match model.find(call.func.data.scope, id).map(|b| &b.kind) {
            Some(BindingKind::Class(facts)) if !facts.is_sealed() => Ok(apply(&format!("mk-{}", id.to_lowercase()))),
            Some(BindingKind::Function(facts)) if facts.precondition => {
                let name = function_name(id);
                Ok(format!("(and {} {})", apply(&format!("{}-pre", name)), apply(&name)))
            }
            Some(BindingKind::Function(_)) => Ok(apply(&function_name(id))),
            _ => Ok(apply(id)),
        }
    }

    fn visit_constant(&mut self, expr: &Expr, constant: &Constant) -> Result<String> {
        match constant {
            Constant::None => Err(self.unsupported(&messages::NONE_NOT_SUPPORTED, &[], expr.context())),
            Constant::Bool(b) => Ok(b.to_string()),
            Constant::Int(i) if *i < 0 => Ok(format!("(- {})", i.unsigned_abs())),
            Constant::Int(i) => Ok(i.to_string()),
            Constant::Float(f) if *f < 0.0 => Ok(format!("(- {:?})", -f)),
            Constant::Float(f) => Ok(format!("{:?}", f)),
            Constant::Str(s) => Ok(format!("\"{}\"", s.replace('"', "\"\""))),
            Constant::Bytes(_) => Err(self.unsupported(&messages::BYTES_NOT_SUPPORTED, &[], expr.context())),
            Constant::Ellipsis => Ok(String::new()),
        }
    }

    /// A list literal as `store`s over a constant array.
    fn visit_list(&mut self, expr: &Expr, elts: &[Expr]) -> Result<String> {
        let element = self.element_sort(expr.ty.as_ref(), expr.context())?;
        let mut array = format!("((as const (Array Int {})) {})", element, zero_of(&element));
        for (i, elt) in elts.iter().enumerate() {
            array = format!("(store {} {} {})", array, i, self.visit_expr(elt)?);
        }
        Ok(array)
    }

    fn is_sealed_class(&self, expr: &Expr) -> bool {
        let Some(name) = expr.as_name() else {
            return false;
        };
        self.ctx
            .model
            .class_facts(expr.data.scope, name)
            .is_some_and(ClassFacts::is_sealed)
    }
}

/// The name that marks a pre-condition guard.
const PRECONDITION_GUARD: &str = "smt_pre";

impl<'m> TargetLanguage<'m> for SmtTranspiler<'m> {
    fn name(&self) -> &'static str {
        "SMT"
    }

    fn context(&self) -> &CodegenContext<'m> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut CodegenContext<'m> {
        &mut self.ctx
    }

    fn comment_marker(&self) -> &'static str {
        ";"
    }

    // SMT-LIB has no module system; imports are kept as comments.
    fn format_import(&self, module: &str) -> String {
        format!("; import {}", module)
    }

    fn format_import_from(&self, module: &str, names: &[String]) -> String {
        format!("; from {} import {}", module, names.join(", "))
    }
}

impl Transpiler for SmtTranspiler<'_> {
    fn target_name(&self) -> &'static str {
        self.name()
    }

    fn transpile_module(&mut self, module: &Module) -> Result<String> {
        debug!(module = %module.name, backend = "smt", "generating module");
        let mut parts = Vec::with_capacity(module.body.len());
        for stmt in &module.body {
            parts.push(self.visit_stmt(stmt)?);
        }
        Ok(join_lines(parts))
    }

    fn usings(&self) -> String {
        self.usings_block()
    }

    fn comment(&self, text: &str) -> String {
        self.format_comment(text)
    }

    fn reset(&mut self) {
        self.ctx.reset();
        self.in_precondition = false;
    }
}

/// SMT spelling of a user function name.
fn function_name(name: &str) -> String {
    name.replace('_', "-")
}

fn zero_of(sort: &str) -> &'static str {
    match sort {
        "Real" => "0.0",
        "Bool" => "false",
        "String" => "\"\"",
        _ => "0",
    }
}
