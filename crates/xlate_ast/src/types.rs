//! Ids, flags and the closed set of recognised standard-library operations.

use serde::{Deserialize, Serialize};
use std::fmt;

bitflags::bitflags! {
    /// Flags for AST nodes.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct NodeFlags: u32 {
        const NONE          = 0;
        /// Created by a pre-pass transform rather than the front-end.
        const SYNTHESIZED   = 1 << 0;
        /// A function whose first statement is an `if smt_pre:` guard.
        const PRECONDITION  = 1 << 1;
        /// A class decorated with `@sealed`.
        const SEALED        = 1 << 2;
    }
}

/// Node ID for referencing AST nodes by index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Scope ID, an index into the analysis model's scope table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const INVALID: ScopeId = ScopeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Standard-library operations the analysis pass recognises at call sites.
///
/// Dispatch keys over this enumeration replace identity-based lookup of the
/// library function itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum StdlibFunction {
    Range,
    Xrange,
    Print,
    Str,
    Bool,
    Int,
    Float,
    Len,
    Min,
    Max,
    Abs,
    MathFloor,
    SysExit,
    TimeTime,
    RandomSeed,
    RandomRandom,
}

impl StdlibFunction {
    pub const ALL: [StdlibFunction; 16] = [
        StdlibFunction::Range,
        StdlibFunction::Xrange,
        StdlibFunction::Print,
        StdlibFunction::Str,
        StdlibFunction::Bool,
        StdlibFunction::Int,
        StdlibFunction::Float,
        StdlibFunction::Len,
        StdlibFunction::Min,
        StdlibFunction::Max,
        StdlibFunction::Abs,
        StdlibFunction::MathFloor,
        StdlibFunction::SysExit,
        StdlibFunction::TimeTime,
        StdlibFunction::RandomSeed,
        StdlibFunction::RandomRandom,
    ];

    /// Fully qualified name (`"sys.exit"`, `"range"`).
    pub fn qualified_name(self) -> &'static str {
        match self {
            StdlibFunction::Range => "range",
            StdlibFunction::Xrange => "xrange",
            StdlibFunction::Print => "print",
            StdlibFunction::Str => "str",
            StdlibFunction::Bool => "bool",
            StdlibFunction::Int => "int",
            StdlibFunction::Float => "float",
            StdlibFunction::Len => "len",
            StdlibFunction::Min => "min",
            StdlibFunction::Max => "max",
            StdlibFunction::Abs => "abs",
            StdlibFunction::MathFloor => "math.floor",
            StdlibFunction::SysExit => "sys.exit",
            StdlibFunction::TimeTime => "time.time",
            StdlibFunction::RandomSeed => "random.seed",
            StdlibFunction::RandomRandom => "random.random",
        }
    }

    pub fn from_qualified_name(name: &str) -> Option<StdlibFunction> {
        StdlibFunction::ALL
            .iter()
            .copied()
            .find(|f| f.qualified_name() == name)
    }

    /// Whether the operation lives in a module rather than the builtins.
    pub fn module(self) -> Option<&'static str> {
        self.qualified_name().split_once('.').map(|(module, _)| module)
    }
}

impl fmt::Display for StdlibFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdlib_name_lookup() {
        assert_eq!(StdlibFunction::from_qualified_name("sys.exit"), Some(StdlibFunction::SysExit));
        assert_eq!(StdlibFunction::from_qualified_name("exit"), None);
        assert_eq!(StdlibFunction::TimeTime.module(), Some("time"));
        assert_eq!(StdlibFunction::Range.module(), None);
    }

    #[test]
    fn test_default_ids_are_invalid() {
        assert!(!NodeId::default().is_valid());
        assert!(!ScopeId::default().is_valid());
        assert!(NodeFlags::default().is_empty());
    }
}
