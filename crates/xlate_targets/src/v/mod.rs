//! The V backend.

pub mod plugins;

use crate::join_lines;
use tracing::debug;
use xlate_ast::*;
use xlate_binder::{BindingKind, ScopeKind, SemanticModel};
use xlate_codegen::assign::{self, BindingForm, TargetPlan};
use xlate_codegen::{CallSite, CodegenContext, TargetLanguage, Transpiler};
use xlate_diagnostics::{messages, NodeContext, Result, TranspileError};

/// Numeric V types a list literal's first element is cast to, so the
/// literal takes the declared element type.
const NUMERIC_TYPES: &[&str] = &["i8", "i16", "int", "i64", "u8", "u16", "u32", "u64", "f32", "f64"];

const GENERIC_NAMES: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub struct VTranspiler<'m> {
    ctx: CodegenContext<'m>,
}

impl<'m> VTranspiler<'m> {
    pub fn new(model: &'m SemanticModel) -> Self {
        Self {
            ctx: CodegenContext::new(model, plugins::registry(), plugins::type_map()),
        }
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.ctx = self.ctx.with_indent_width(width);
        self
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    fn block(&mut self, body: &[Stmt]) -> Result<String> {
        let mut lines = Vec::with_capacity(body.len());
        for stmt in body {
            lines.push(self.visit_stmt(stmt)?);
        }
        Ok(self.ctx.indent(&join_lines(lines)))
    }

    /// `header {` + indented body + `}`.
    fn braced(&mut self, header: &str, body: &[Stmt]) -> Result<String> {
        let body = self.block(body)?;
        if body.is_empty() {
            Ok(format!("{} {{\n}}", header))
        } else {
            Ok(format!("{} {{\n{}\n}}", header, body))
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<String> {
        match stmt {
            Stmt::FunctionDef(func) => self.visit_function_def(func),
            Stmt::ClassDef(class) => self.visit_class_def(class),
            Stmt::Return(ret) => self.visit_return(ret),
            Stmt::Delete(_) => Err(self.unsupported(&messages::DELETE_NOT_SUPPORTED, &[], stmt.context())),
            Stmt::Assign(assign) => self.visit_assign(assign),
            Stmt::AugAssign(assign) => {
                let target = self.visit_expr(&assign.target)?;
                let value = self.visit_expr(&assign.value)?;
                let op = self.binop_symbol(assign.op, &assign.value)?;
                Ok(self.ctx.default_aug_assign(&target, op, &value))
            }
            Stmt::AnnAssign(assign) => self.visit_ann_assign(assign),
            Stmt::For(for_) => self.visit_for(for_),
            Stmt::While(while_) => {
                if !while_.orelse.is_empty() {
                    return Err(self.unsupported(&messages::LOOP_ELSE_NOT_SUPPORTED, &[], stmt.context()));
                }
                let header = match while_.test.as_constant() {
                    Some(Constant::Bool(true)) => "for".to_string(),
                    _ => format!("for {}", self.visit_expr(&while_.test)?),
                };
                self.braced(&header, &while_.body)
            }
            Stmt::If(if_) => self.visit_if(if_),
            Stmt::With(_) => Err(self.unsupported(&messages::WITH_NOT_SUPPORTED, &[], stmt.context())),
            Stmt::Raise(_) | Stmt::Try(_) => {
                Err(self.unsupported(&messages::EXCEPTIONS_NOT_SUPPORTED, &[], stmt.context()))
            }
            Stmt::Assert(assert) => {
                let test = self.visit_expr(&assert.test)?;
                match &assert.msg {
                    Some(msg) => Ok(format!("assert {}, {}", test, self.visit_expr(msg)?)),
                    None => Ok(format!("assert {}", test)),
                }
            }
            Stmt::Import(import) => Ok(self.visit_import(import)),
            Stmt::ImportFrom(import) => {
                if IGNORED.contains(&import.module.as_str()) {
                    return Ok(String::new());
                }
                let names: Vec<String> = import.names.iter().map(|a| a.name.clone()).collect();
                Ok(self.format_import_from(&import.module, &names))
            }
            Stmt::Global(_) => Err(self.unsupported(&messages::GLOBALS_NOT_SUPPORTED, &[], stmt.context())),
            Stmt::Expr(stmt) => match stmt.value.as_constant() {
                Some(Constant::Str(doc)) => Ok(self.format_comment(doc)),
                Some(Constant::Ellipsis) => Ok(String::new()),
                _ => self.visit_expr(&stmt.value),
            },
            Stmt::Pass(_) => Ok(String::new()),
            Stmt::Break(_) => Ok("break".to_string()),
            Stmt::Continue(_) => Ok("continue".to_string()),
        }
    }

    fn visit_return(&mut self, ret: &Return) -> Result<String> {
        match &ret.value {
            // V returns several values without a tuple.
            Some(Expr { kind: ExprKind::Tuple { elts }, .. }) => Ok(format!("return {}", self.visit_list(elts)?)),
            Some(value) => Ok(format!("return {}", self.visit_expr(value)?)),
            None => Ok("return".to_string()),
        }
    }

    fn visit_function_def(&mut self, func: &FunctionDef) -> Result<String> {
        let context = func_context(func);
        if func.is_async {
            return Err(self.unsupported(&messages::COROUTINES_NOT_SUPPORTED, &[], context));
        }
        let model = self.ctx.model;
        if model.scope(func.data.scope).is_some_and(|s| s.kind == ScopeKind::Class) {
            return Err(self.unsupported(&messages::CLASS_METHODS_NOT_SUPPORTED, &[], context));
        }
        let facts = model.function_facts(func.data.scope, &func.name);
        let body_scope = facts.map(|f| f.scope).unwrap_or(func.data.scope);

        let mut generics = 0;
        let mut params = Vec::with_capacity(func.args.len());
        for arg in &func.args {
            let ty = match &arg.annotation {
                Some(annotation) => self.resolve_type_name(Some(annotation), arg.context())?,
                None => {
                    let letter = GENERIC_NAMES.get(generics).copied().unwrap_or(b'T');
                    generics += 1;
                    char::from(letter).to_string()
                }
            };
            let kw = if model.is_mutable(body_scope, &arg.name) { "mut " } else { "" };
            params.push(format!("{}{} {}", kw, arg.name, ty));
        }

        let mut signature = format!("fn {}", func.name);
        if generics > 0 {
            let names: Vec<String> = GENERIC_NAMES[..generics.min(GENERIC_NAMES.len())]
                .iter()
                .map(|&c| char::from(c).to_string())
                .collect();
            signature.push_str(&format!("<{}>", names.join(", ")));
        }
        signature.push_str(&format!("({})", params.join(", ")));
        let returns_value = func.is_declaration_only() || facts.map(|f| f.returns_value).unwrap_or(true);
        if let (true, Some(returns)) = (returns_value, &func.returns) {
            signature.push(' ');
            signature.push_str(&self.resolve_type_name(Some(returns), context)?);
        }

        if func.is_declaration_only() {
            return Ok(signature);
        }
        self.braced(&signature, &func.body)
    }

    fn visit_class_def(&mut self, class: &ClassDef) -> Result<String> {
        let context = class_context(class);
        if class.bases.len() > 1 {
            return Err(self.unsupported(
                &messages::MULTIPLE_INHERITANCE_NOT_SUPPORTED,
                &[&class.name, &class.bases.len().to_string()],
                context,
            ));
        }
        if class.data.flags.contains(NodeFlags::SEALED) {
            return Err(self.unsupported(&messages::SEALED_CLASSES_NOT_SUPPORTED, &[], context));
        }
        if let Some(method) = class.body.iter().find(|s| matches!(s, Stmt::FunctionDef(_))) {
            return Err(self.unsupported(&messages::CLASS_METHODS_NOT_SUPPORTED, &[], method.context()));
        }
        let model = self.ctx.model;
        let facts = model.class_facts(class.data.scope, &class.name).ok_or_else(|| {
            TranspileError::malformed(&messages::MISSING_CLASS_FACTS, &[&class.name], context)
        })?;

        let mut fields = Vec::new();
        for base in &class.bases {
            fields.push(self.visit_expr(base)?);
        }
        for (member, declaration) in &facts.declarations {
            let ty = self.resolve_type_name(declaration.annotation.as_ref(), context)?;
            fields.push(format!("{} {}", member, ty));
        }
        if fields.is_empty() {
            return Ok(format!("struct {} {{\n}}", class.name));
        }
        Ok(format!("struct {} {{\n{}\n}}", class.name, self.ctx.indent(&fields.join("\n"))))
    }

    fn visit_assign(&mut self, stmt: &Assign) -> Result<String> {
        let plan = assign::plan_assign(self.ctx.model, self.name(), stmt)?;
        let mut lines = Vec::with_capacity(plan.targets.len() + 1);
        let value = if plan.temporary {
            let temporary = self.ctx.fresh_temporary();
            lines.push(format!("mut {} := {}", temporary, self.visit_expr(&stmt.value)?));
            temporary
        } else {
            self.visit_expr(&stmt.value)?
        };

        for target in &plan.targets {
            let line = match target {
                TargetPlan::Mutate(target) => format!("{} = {}", self.visit_expr(target)?, value),
                TargetPlan::Declare { target, mutable } => {
                    let kw = if *mutable { "mut " } else { "" };
                    format!("{}{} := {}", kw, self.visit_expr(target)?, value)
                }
                TargetPlan::Pattern { elts, form } => {
                    let mut names = Vec::with_capacity(elts.len());
                    for (elt, element) in elts.iter().zip(&form.elements) {
                        let kw = match element {
                            BindingForm::Declare { mutable: true } => "mut ",
                            _ => "",
                        };
                        names.push(format!("{}{}", kw, self.visit_expr(elt)?));
                    }
                    let values = match &stmt.value.kind {
                        ExprKind::Tuple { elts } | ExprKind::List { elts } if !plan.temporary => self.visit_list(elts)?,
                        _ => value.clone(),
                    };
                    let op = if form.declare { ":=" } else { "=" };
                    format!("{} {} {}", names.join(", "), op, values)
                }
            };
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    fn visit_ann_assign(&mut self, stmt: &AnnAssign) -> Result<String> {
        let type_name = self.resolve_type_name(Some(&stmt.annotation), stmt_context_of(&stmt.data, "AnnAssign"))?;
        let form = assign::classify_target(self.ctx.model, self.name(), &stmt.data, &stmt.target)?;
        let target = self.visit_expr(&stmt.target)?;

        let value = if assign::is_default_initializer(&stmt.annotation, stmt.value.as_ref()) {
            zero_value(&stmt.annotation, &type_name)
        } else {
            match stmt.value.as_ref().map(|v| &v.kind) {
                Some(ExprKind::List { elts }) if elts.is_empty() => format!("{}{{}}", type_name),
                Some(ExprKind::List { elts }) => {
                    let element_type = type_name.strip_prefix("[]").unwrap_or_default();
                    let mut values = self.visit_list_items(elts)?;
                    if NUMERIC_TYPES.contains(&element_type) {
                        values[0] = format!("{}({})", element_type, values[0]);
                    }
                    format!("[{}]", values.join(", "))
                }
                _ => match &stmt.value {
                    Some(value) => self.visit_expr(value)?,
                    None => zero_value(&stmt.annotation, &type_name),
                },
            }
        };

        Ok(match form {
            BindingForm::Mutate => format!("{} = {}", target, value),
            BindingForm::Declare { mutable } => {
                let kw = if mutable { "mut " } else { "" };
                format!("{}{} := {}", kw, target, value)
            }
        })
    }

    fn visit_for(&mut self, for_: &For) -> Result<String> {
        if !for_.orelse.is_empty() {
            return Err(self.unsupported(&messages::LOOP_ELSE_NOT_SUPPORTED, &[], stmt_context_of(&for_.data, "For")));
        }
        let target = self.loop_target(for_)?;
        let header = match stepped_range(&for_.iter) {
            Some([start, end, step]) => {
                let start = self.visit_expr(start)?;
                let end = self.visit_expr(end)?;
                let step = self.visit_expr(step)?;
                format!("for {t} := {}; {t} < {}; {t} += {}", start, end, step, t = target)
            }
            None => format!("for {} in {}", target, self.visit_expr(&for_.iter)?),
        };
        self.braced(&header, &for_.body)
    }

    fn visit_if(&mut self, if_: &If) -> Result<String> {
        let test = self.visit_expr(&if_.test)?;
        let mut out = self.braced(&format!("if {}", test), &if_.body)?;
        match if_.orelse.as_slice() {
            [] => {}
            [Stmt::If(elif)] => {
                out.push_str(" else ");
                out.push_str(&self.visit_if(elif)?);
            }
            orelse => {
                out.push(' ');
                out.push_str(&self.braced("else", orelse)?);
            }
        }
        Ok(out)
    }

    fn visit_import(&mut self, import: &Import) -> String {
        let mut lines = Vec::new();
        for alias in &import.names {
            if IGNORED.contains(&alias.name.as_str()) {
                continue;
            }
            match &alias.asname {
                Some(asname) => lines.push(format!("{} as {}", self.format_import(&alias.name), asname)),
                None => self.record_using(&alias.name),
            }
        }
        lines.join("\n")
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
                let sep = match op {
                    BoolOpKind::And => " && ",
                    BoolOpKind::Or => " || ",
                };
                let mut parts = Vec::with_capacity(values.len());
                for value in values {
                    parts.push(self.visit_operand(value)?);
                }
                Ok(parts.join(sep))
            }
            ExprKind::BinOp { left, op, right } => {
                let l = self.visit_operand(left)?;
                let r = self.visit_operand(right)?;
                if *op == BinOpKind::Pow {
                    self.record_using("math");
                    return Ok(format!("math.pow({}, {})", l, r));
                }
                let symbol = self.binop_symbol(*op, expr)?;
                Ok(format!("{} {} {}", l, symbol, r))
            }
            ExprKind::UnaryOp { op, operand } => {
                let text = self.visit_expr(operand)?;
                let simple = matches!(operand.kind, ExprKind::Call(_) | ExprKind::Constant(_) | ExprKind::Name { .. });
                let symbol = match op {
                    UnaryOpKind::Not => "!",
                    UnaryOpKind::USub => "-",
                    UnaryOpKind::UAdd => "+",
                    UnaryOpKind::Invert => "~",
                };
                if simple {
                    Ok(format!("{}{}", symbol, text))
                } else {
                    Ok(format!("{}({})", symbol, text))
                }
            }
            ExprKind::Lambda { .. } => Err(self.unsupported(&messages::LAMBDAS_NOT_SUPPORTED, &[], expr.context())),
            ExprKind::IfExp { test, body, orelse } => Ok(format!(
                "if {} {{ {} }} else {{ {} }}",
                self.visit_expr(test)?,
                self.visit_expr(body)?,
                self.visit_expr(orelse)?
            )),
            ExprKind::Dict { keys, values } => {
                if keys.is_empty() {
                    return Ok(match &expr.ty {
                        Some(ty) => format!("{}{{}}", self.resolve_type_name(Some(ty), expr.context())?),
                        None => "map{}".to_string(),
                    });
                }
                let mut pairs = Vec::with_capacity(keys.len());
                for (key, value) in keys.iter().zip(values) {
                    pairs.push(format!("{}: {}", self.visit_expr(key)?, self.visit_expr(value)?));
                }
                Ok(format!("map{{{}}}", pairs.join(" ")))
            }
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
            ExprKind::Constant(constant) => self.visit_constant(constant),
            ExprKind::Attribute { value, attr } => Ok(format!("{}.{}", self.visit_expr(value)?, attr)),
            ExprKind::Subscript { value, slice } => {
                let value = self.visit_expr(value)?;
                let index = self.visit_expr(slice)?;
                Ok(self.ctx.default_subscript(&value, &index))
            }
            ExprKind::Starred { .. } => Err(self.unsupported(&messages::STARRED_NOT_SUPPORTED, &[], expr.context())),
            ExprKind::Name { id } => Ok(id.clone()),
            ExprKind::List { elts } => {
                if elts.is_empty() {
                    if let Some(ty) = &expr.ty {
                        return Ok(format!("{}{{}}", self.resolve_type_name(Some(ty), expr.context())?));
                    }
                }
                Ok(format!("[{}]", self.visit_list(elts)?))
            }
            ExprKind::Tuple { elts } => Ok(format!("({})", self.visit_list(elts)?)),
            ExprKind::Slice { lower, upper, step } => {
                if step.is_some() {
                    return Err(self.unsupported(&messages::SLICES_NOT_SUPPORTED, &[], expr.context()));
                }
                let lower = lower.as_deref().map(|e| self.visit_expr(e)).transpose()?.unwrap_or_default();
                let upper = upper.as_deref().map(|e| self.visit_expr(e)).transpose()?.unwrap_or_default();
                Ok(format!("{}..{}", lower, upper))
            }
        }
    }

    /// A V loop variable is scoped to the loop body, so a name target binds
    /// afresh even when the name is defined before the loop. Targets the
    /// emitter classifies as in-place mutations have no loop-header form.
    fn loop_target(&mut self, for_: &For) -> Result<String> {
        let elts = match &for_.target.kind {
            ExprKind::Tuple { elts } => elts.as_slice(),
            _ => std::slice::from_ref(&for_.target),
        };
        let model = self.ctx.model;
        for elt in elts {
            let form = assign::classify_target(model, self.name(), &for_.data, elt)?;
            if form == BindingForm::Mutate && elt.as_name().is_none() {
                return Err(self.unsupported(
                    &messages::ASSIGNMENT_TARGET_NOT_SUPPORTED,
                    &[elt.kind().as_str()],
                    elt.context(),
                ));
            }
        }
        self.visit_list(elts)
    }

    fn visit_list_items(&mut self, elts: &[Expr]) -> Result<Vec<String>> {
        elts.iter().map(|e| self.visit_expr(e)).collect()
    }

    fn visit_list(&mut self, elts: &[Expr]) -> Result<String> {
        Ok(self.visit_list_items(elts)?.join(", "))
    }

    /// An operand of a binary or boolean operator, parenthesized when it is
    /// itself an operator expression.
    fn visit_operand(&mut self, expr: &Expr) -> Result<String> {
        let text = self.visit_expr(expr)?;
        match expr.kind {
            ExprKind::BinOp { .. } | ExprKind::BoolOp { .. } | ExprKind::Compare { .. } | ExprKind::IfExp { .. } => {
                Ok(format!("({})", text))
            }
            _ => Ok(text),
        }
    }

    fn binop_symbol(&self, op: BinOpKind, at: &Expr) -> Result<&'static str> {
        match op {
            BinOpKind::FloorDiv => Ok("/"),
            BinOpKind::MatMult | BinOpKind::Pow => {
                Err(self.unsupported(&messages::OPERATOR_NOT_SUPPORTED, &[op.symbol()], at.context()))
            }
            _ => Ok(op.symbol()),
        }
    }

    fn visit_compare(&mut self, expr: &Expr, left: &Expr, ops: &[CmpOpKind], comparators: &[Expr]) -> Result<String> {
        if ops.is_empty() || ops.len() != comparators.len() {
            return Err(TranspileError::malformed(&messages::EMPTY_OPERAND_LIST, &["Compare"], expr.context()));
        }
        let mut parts = Vec::with_capacity(ops.len());
        let mut lhs = self.visit_operand(left)?;
        for (op, comparator) in ops.iter().zip(comparators) {
            let rhs = self.visit_operand(comparator)?;
            let symbol = match op {
                CmpOpKind::Is => "==",
                CmpOpKind::IsNot => "!=",
                CmpOpKind::In => "in",
                CmpOpKind::NotIn => "!in",
                other => other.symbol(),
            };
            parts.push(format!("{} {} {}", lhs, symbol, rhs));
            lhs = rhs;
        }
        Ok(parts.join(" && "))
    }

    fn visit_call(&mut self, expr: &Expr, call: &CallExpr) -> Result<String> {
        if let Some(literal) = self.visit_object_literal(expr, call)? {
            return Ok(literal);
        }

        let (callee, receiver) = match &call.func.kind {
            ExprKind::Attribute { value, attr } => {
                let receiver = self.visit_expr(value)?;
                (format!("{}.{}", receiver, attr), Some(receiver))
            }
            _ => (self.visit_expr(&call.func)?, None),
        };
        let mut vargs = self.visit_list_items(&call.args)?;
        for keyword in &call.keywords {
            if keyword.arg.is_none() {
                return Err(self.unsupported(&messages::KEYWORD_ARGUMENTS_NOT_SUPPORTED, &["**"], expr.context()));
            }
            vargs.push(self.visit_expr(&keyword.value)?);
        }

        let site = CallSite {
            expr,
            call,
            callee: &callee,
            receiver: receiver.as_deref(),
            shadowed: self.ctx.shadows_builtin(&call.func),
        };
        if let Some(rewritten) = self.dispatch_call(&site, &vargs)? {
            return Ok(rewritten);
        }
        match call.func.kind {
            ExprKind::Name { .. } | ExprKind::Attribute { .. } => Ok(format!("{}({})", callee, vargs.join(", "))),
            _ => Ok(format!("({})({})", callee, vargs.join(", "))),
        }
    }

    /// A call to a user class becomes a struct literal with the arguments
    /// matched to the declared members in order.
    fn visit_object_literal(&mut self, expr: &Expr, call: &CallExpr) -> Result<Option<String>> {
        let Some(name) = call.func.as_name() else {
            return Ok(None);
        };
        let model = self.ctx.model;
        let Some(binding) = model.find(call.func.data.scope, name) else {
            return Ok(None);
        };
        let BindingKind::Class(facts) = &binding.kind else {
            return Ok(None);
        };
        let mut fields = Vec::with_capacity(call.args.len() + call.keywords.len());
        for (arg, member) in call.args.iter().zip(facts.declarations.keys()) {
            fields.push(format!("{}: {}", member, self.visit_expr(arg)?));
        }
        for keyword in &call.keywords {
            let Some(member) = &keyword.arg else {
                return Err(self.unsupported(&messages::KEYWORD_ARGUMENTS_NOT_SUPPORTED, &["**"], expr.context()));
            };
            fields.push(format!("{}: {}", member, self.visit_expr(&keyword.value)?));
        }
        Ok(Some(format!("{}{{{}}}", name, fields.join(", "))))
    }

    fn visit_constant(&mut self, constant: &Constant) -> Result<String> {
        Ok(match constant {
            Constant::None => "none".to_string(),
            Constant::Bool(b) => b.to_string(),
            Constant::Int(i) => i.to_string(),
            Constant::Float(f) => format!("{:?}", f),
            Constant::Str(s) => quote(s),
            Constant::Bytes(bytes) => match bytes.split_first() {
                None => "[]byte{}".to_string(),
                Some((first, rest)) => {
                    let mut parts = vec![format!("byte({:#x})", first)];
                    parts.extend(rest.iter().map(|b| format!("{:#x}", b)));
                    format!("[{}]", parts.join(", "))
                }
            },
            Constant::Ellipsis => String::new(),
        })
    }
}

/// Modules that never produce an import.
const IGNORED: &[&str] = xlate_codegen::base::IGNORED_MODULES;

impl<'m> TargetLanguage<'m> for VTranspiler<'m> {
    fn name(&self) -> &'static str {
        "V"
    }

    fn context(&self) -> &CodegenContext<'m> {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut CodegenContext<'m> {
        &mut self.ctx
    }

    fn comment_marker(&self) -> &'static str {
        "//"
    }

    fn format_import(&self, module: &str) -> String {
        match module {
            "sys" => "import os".to_string(),
            _ => format!("import {}", module),
        }
    }

    fn format_import_from(&self, module: &str, names: &[String]) -> String {
        format!("import {} {{{}}}", module, names.join(" "))
    }
}

impl Transpiler for VTranspiler<'_> {
    fn target_name(&self) -> &'static str {
        self.name()
    }

    fn transpile_module(&mut self, module: &Module) -> Result<String> {
        debug!(module = %module.name, backend = "v", "generating module");
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
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Bounds of a three-argument `range` iterable.
fn stepped_range(iter: &Expr) -> Option<[&Expr; 3]> {
    let call = iter.as_call()?;
    let is_range = matches!(call.stdlib, Some(StdlibFunction::Range | StdlibFunction::Xrange));
    match call.args.as_slice() {
        [start, end, step] if is_range => Some([start, end, step]),
        _ => None,
    }
}

/// Zero literal of a declared type; `type_name` is its V spelling.
fn zero_value(annotation: &TypeAnnotation, type_name: &str) -> String {
    match annotation.base_name() {
        "int" => "0".to_string(),
        "float" => "0.0".to_string(),
        "str" => "''".to_string(),
        "bool" => "false".to_string(),
        "Optional" => "none".to_string(),
        _ => format!("{}{{}}", type_name),
    }
}

/// Single-quoted V string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '$' => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn func_context(func: &FunctionDef) -> NodeContext {
    stmt_context_of(&func.data, "FunctionDef")
}

fn class_context(class: &ClassDef) -> NodeContext {
    stmt_context_of(&class.data, "ClassDef")
}

fn stmt_context_of(data: &NodeData, kind: &'static str) -> NodeContext {
    NodeContext::new(data.id.0, kind, data.range)
}
