//! V rewrites for built-in and standard-library calls, and V type names.

use xlate_ast::StdlibFunction;
use xlate_codegen::dispatch::{operand, range_arity, CallSite, CallTarget, DispatchRegistry, RangeArgs, ReceiverKind};
use xlate_codegen::TypeMap;
use xlate_diagnostics::Result;

/// Module required by the time and random helpers.
const RUNTIME_SUPPORT: &str = "pylib";

pub fn type_map() -> TypeMap {
    TypeMap::new("any")
        .primitive("int", "int")
        .primitive("float", "f64")
        .primitive("str", "string")
        .primitive("bool", "bool")
        .primitive("bytes", "[]u8")
        .container("List", "[]{0}")
        .container("Dict", "map[{0}]{1}")
        .container("Optional", "?{0}")
        .container("Tuple", "({*})")
}

pub fn registry() -> DispatchRegistry {
    DispatchRegistry::new()
        .small("str", |v| match v.first() {
            Some(x) => format!("{}.str()", operand(x)),
            None => "''".to_string(),
        })
        .small("bool", |v| cast("bool", v, "false"))
        .small("int", |v| cast("int", v, "0"))
        .small("float", |v| cast("f64", v, "0.0"))
        .small("floor", |v| format!("int(math.floor({}))", v.join(", ")))
        .node("range", visit_range)
        .node("xrange", visit_range)
        .node("print", visit_print)
        .function(StdlibFunction::MathFloor, |_, v| Ok(format!("int(math.floor({}))", v.join(", "))))
        .function(StdlibFunction::SysExit, |_, v| {
            Ok(format!("exit({})", v.first().map(String::as_str).unwrap_or("0")))
        })
        .function(StdlibFunction::Len, |_, v| Ok(format!("{}.len", operand(&v.join(", ")))))
        .function(StdlibFunction::Min, |_, v| Ok(format!("math.min({})", v.join(", "))))
        .function(StdlibFunction::Max, |_, v| Ok(format!("math.max({})", v.join(", "))))
        .function(StdlibFunction::Abs, |_, v| Ok(format!("math.abs({})", v.join(", "))))
        .attribute(ReceiverKind::List, "append", |r, v| format!("{} << {}", operand(r), operand(&v.join(", "))))
        .attribute(ReceiverKind::List, "extend", |r, v| format!("{} << {}", operand(r), operand(&v.join(", "))))
        .attribute(ReceiverKind::Str, "upper", |r, _| format!("{}.to_upper()", operand(r)))
        .attribute(ReceiverKind::Str, "lower", |r, _| format!("{}.to_lower()", operand(r)))
        .attribute(ReceiverKind::Str, "strip", |r, _| format!("{}.trim_space()", operand(r)))
        .using(CallTarget::Name("floor".to_string()), "math")
        .using(CallTarget::Stdlib(StdlibFunction::MathFloor), "math")
        .using(CallTarget::Stdlib(StdlibFunction::Min), "math")
        .using(CallTarget::Stdlib(StdlibFunction::Max), "math")
        .using(CallTarget::Stdlib(StdlibFunction::Abs), "math")
        .using(CallTarget::Stdlib(StdlibFunction::TimeTime), RUNTIME_SUPPORT)
        .using(CallTarget::Stdlib(StdlibFunction::RandomSeed), RUNTIME_SUPPORT)
        .using(CallTarget::Stdlib(StdlibFunction::RandomRandom), RUNTIME_SUPPORT)
}

fn cast(to: &str, vargs: &[String], zero: &str) -> String {
    match vargs.first() {
        Some(x) => format!("{}({})", to, x),
        None => zero.to_string(),
    }
}

fn visit_range(site: &CallSite<'_>, vargs: &[String]) -> Result<String> {
    Ok(match range_arity(site, vargs)? {
        RangeArgs::Count(n) => format!("0 .. {}", n),
        RangeArgs::Bounded(a, b) => format!("{} .. {}", a, b),
        RangeArgs::Stepped(a, b, s) => {
            let (a, b, s) = (operand(a), operand(b), operand(s));
            format!("[]int{{len: ({b} - {a} + {s} - 1) / {s}, init: {a} + index * {s}}}")
        }
    })
}

fn visit_print(_site: &CallSite<'_>, vargs: &[String]) -> Result<String> {
    Ok(match vargs {
        [] => "println('')".to_string(),
        [one] => format!("println({})", one),
        many => {
            let parts: Vec<String> = many.iter().map(|v| format!("${{{}}}", v)).collect();
            format!("println('{}')", parts.join(" "))
        }
    })
}
