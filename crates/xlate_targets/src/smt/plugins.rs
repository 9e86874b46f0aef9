//! SMT-LIB rewrites for built-in calls, and SMT sort names.

use xlate_ast::StdlibFunction;
use xlate_codegen::dispatch::{range_arity, CallSite, DispatchRegistry, RangeArgs};
use xlate_codegen::TypeMap;
use xlate_diagnostics::{messages, Result, TranspileError};

pub fn type_map() -> TypeMap {
    TypeMap::new("T")
        .primitive("int", "Int")
        .primitive("float", "Real")
        .primitive("bool", "Bool")
        .primitive("str", "String")
        .container("List", "(Array Int {0})")
        .container("Dict", "(Array {0} {1})")
        .container("Set", "(Array {0} Bool)")
}

pub fn registry() -> DispatchRegistry {
    DispatchRegistry::new()
        .small("int", |v| unary("to_int", v, "0"))
        .small("float", |v| unary("to_real", v, "0.0"))
        .small("bool", |v| v.first().cloned().unwrap_or_else(|| "false".to_string()))
        .small("str", |v| unary("str.from_int", v, "\"\""))
        .node("range", visit_range)
        .node("xrange", visit_range)
        .function(StdlibFunction::Abs, |_, v| Ok(format!("(abs {})", v.join(" "))))
        .function(StdlibFunction::MathFloor, |_, v| Ok(format!("(to_int {})", v.join(" "))))
        .function(StdlibFunction::Min, |site, v| select(site, v, "<="))
        .function(StdlibFunction::Max, |site, v| select(site, v, ">="))
}

fn unary(function: &str, vargs: &[String], zero: &str) -> String {
    match vargs.first() {
        Some(x) => format!("({} {})", function, x),
        None => zero.to_string(),
    }
}

fn visit_range(site: &CallSite<'_>, vargs: &[String]) -> Result<String> {
    Ok(match range_arity(site, vargs)? {
        RangeArgs::Count(n) => format!("(range 0 {})", n),
        RangeArgs::Bounded(a, b) => format!("(range {} {})", a, b),
        RangeArgs::Stepped(a, b, s) => format!("(range-step {} {} {})", a, b, s),
    })
}

/// `min`/`max` as nested `ite`: `(ite (<= a b) a b)`, folded left over more
/// than two arguments.
fn select(site: &CallSite<'_>, vargs: &[String], cmp: &str) -> Result<String> {
    let Some((first, rest)) = vargs.split_first() else {
        return Err(TranspileError::malformed(
            &messages::EMPTY_OPERAND_LIST,
            &[site.callee],
            site.expr.context(),
        ));
    };
    Ok(rest
        .iter()
        .fold(first.clone(), |acc, next| format!("(ite ({} {} {}) {} {})", cmp, acc, next, acc, next)))
}
