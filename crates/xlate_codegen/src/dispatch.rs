//! Dispatch registry for built-in and standard-library calls.
//!
//! A registry is a plain value built once per backend instance. Lookup goes
//! through four tables in order:
//! 1. `small`: callee text to a pure function of the argument texts;
//! 2. `node`: callee text to a handler that also sees the call node;
//! 3. `functions`: resolved [`StdlibFunction`] to a node handler;
//! 4. `attributes`: receiver kind and method name to a rewrite of
//!    `receiver.method(args)`.
//!
//! A miss in every table means "use the default call syntax".

use xlate_ast::{CallExpr, Expr, ExprKind, StdlibFunction, TypeAnnotation};
use xlate_core::FxMap;
use xlate_diagnostics::{messages, Result, TranspileError};

/// Single-expression builtins: a pure function of the argument texts.
pub type SmallHandler = fn(&[String]) -> String;

/// Builtins that need the call node, e.g. to branch on argument count.
pub type NodeHandler = fn(&CallSite<'_>, &[String]) -> Result<String>;

/// Rewrite of `receiver.method(args)`; gets the receiver text and the
/// argument texts.
pub type AttributeHandler = fn(&str, &[String]) -> String;

/// A call being generated.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// The whole call expression.
    pub expr: &'a Expr,
    pub call: &'a CallExpr,
    /// Generated callee text (`print`, `xs.append`).
    pub callee: &'a str,
    /// Generated receiver text when the callee is an attribute.
    pub receiver: Option<&'a str>,
    /// The callee names a user definition that hides any builtin of the
    /// same name.
    pub shadowed: bool,
}

impl<'a> CallSite<'a> {
    pub fn arg_count(&self) -> usize {
        self.call.args.len() + self.call.keywords.len()
    }

    /// Method name when the callee is an attribute.
    pub fn method(&self) -> Option<&'a str> {
        match &self.call.func.kind {
            ExprKind::Attribute { attr, .. } => Some(attr),
            _ => None,
        }
    }

    /// Kind of the receiver, from its inferred type.
    pub fn receiver_kind(&self) -> ReceiverKind {
        match &self.call.func.kind {
            ExprKind::Attribute { value, .. } => ReceiverKind::of(value.ty.as_ref()),
            _ => ReceiverKind::Any,
        }
    }
}

/// Receiver classes attribute rewrites are keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    List,
    Dict,
    Str,
    /// Matches any receiver; consulted after the specific kind.
    Any,
}

impl ReceiverKind {
    pub fn of(ty: Option<&TypeAnnotation>) -> ReceiverKind {
        match ty {
            Some(TypeAnnotation::Generic { base, .. }) if base == "List" => ReceiverKind::List,
            Some(TypeAnnotation::Generic { base, .. }) if base == "Dict" => ReceiverKind::Dict,
            Some(TypeAnnotation::Name(name)) if name == "str" => ReceiverKind::Str,
            _ => ReceiverKind::Any,
        }
    }
}

/// Key of the usings side-table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallTarget {
    Name(String),
    Stdlib(StdlibFunction),
}

/// The argument shapes `range` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeArgs<'a> {
    /// `range(n)`: 0, 1, ..., n - 1.
    Count(&'a str),
    /// `range(a, b)`: a, ..., b - 1.
    Bounded(&'a str, &'a str),
    /// `range(a, b, s)`: a, a + s, ... while below b.
    Stepped(&'a str, &'a str, &'a str),
}

/// Classify a `range` call by argument count. Any count other than 1, 2 or 3
/// is malformed input.
pub fn range_arity<'a>(site: &CallSite<'_>, vargs: &'a [String]) -> Result<RangeArgs<'a>> {
    match vargs {
        [n] => Ok(RangeArgs::Count(n)),
        [a, b] => Ok(RangeArgs::Bounded(a, b)),
        [a, b, s] => Ok(RangeArgs::Stepped(a, b, s)),
        _ => Err(TranspileError::malformed(
            &messages::RANGE_UNKNOWN_PARAMETERS,
            &[&vargs.join(", ")],
            site.expr.context(),
        )),
    }
}

/// Argument text ready to sit next to an operator or a postfix member:
/// wrapped in parentheses unless it is a single term (a name, literal, call,
/// subscript or bracketed expression).
pub fn operand(text: &str) -> String {
    if is_single_term(text) {
        text.to_string()
    } else {
        format!("({})", text)
    }
}

fn is_single_term(text: &str) -> bool {
    if text.is_empty() || text.starts_with(['-', '+', '!', '~']) {
        return false;
    }
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;
    for c in text.chars() {
        if let Some(q) = quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && c.is_whitespace() => return false,
            _ => {}
        }
    }
    true
}

#[derive(Default)]
pub struct DispatchRegistry {
    small: FxMap<&'static str, SmallHandler>,
    node: FxMap<&'static str, NodeHandler>,
    functions: FxMap<StdlibFunction, NodeHandler>,
    attributes: FxMap<(ReceiverKind, &'static str), AttributeHandler>,
    usings: FxMap<CallTarget, &'static str>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn small(mut self, name: &'static str, handler: SmallHandler) -> Self {
        self.small.insert(name, handler);
        self
    }

    pub fn node(mut self, name: &'static str, handler: NodeHandler) -> Self {
        self.node.insert(name, handler);
        self
    }

    pub fn function(mut self, function: StdlibFunction, handler: NodeHandler) -> Self {
        self.functions.insert(function, handler);
        self
    }

    pub fn attribute(mut self, receiver: ReceiverKind, method: &'static str, handler: AttributeHandler) -> Self {
        self.attributes.insert((receiver, method), handler);
        self
    }

    pub fn using(mut self, target: CallTarget, module: &'static str) -> Self {
        self.usings.insert(target, module);
        self
    }

    /// Module a call requires, from the usings side-table.
    pub fn using_for(&self, site: &CallSite<'_>) -> Option<&'static str> {
        site.call
            .stdlib
            .and_then(|f| self.usings.get(&CallTarget::Stdlib(f)))
            .or_else(|| {
                if site.shadowed {
                    return None;
                }
                self.usings.get(&CallTarget::Name(site.callee.to_string()))
            })
            .copied()
    }

    /// Rewrite a call, or `Ok(None)` to fall through to default call syntax.
    pub fn dispatch(&self, site: &CallSite<'_>, vargs: &[String]) -> Result<Option<String>> {
        if !site.shadowed {
            if let Some(handler) = self.small.get(site.callee) {
                return Ok(Some(handler(vargs)));
            }
            if let Some(handler) = self.node.get(site.callee) {
                return handler(site, vargs).map(Some);
            }
        }
        if let Some(handler) = site.call.stdlib.and_then(|f| self.functions.get(&f)) {
            return handler(site, vargs).map(Some);
        }
        if let (Some(receiver), Some(method)) = (site.receiver, site.method()) {
            let handler = self
                .attributes
                .get(&(site.receiver_kind(), method))
                .or_else(|| self.attributes.get(&(ReceiverKind::Any, method)));
            if let Some(handler) = handler {
                return Ok(Some(handler(receiver, vargs)));
            }
        }
        Ok(None)
    }
}
