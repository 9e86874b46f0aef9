//! SyntaxKind enum - every node kind in the source tree.

/// The kind of a node in the syntax tree.
///
/// Used for diagnostics; the visitors themselves match on the node enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    Module,

    // ========================================================================
    // Statements
    // ========================================================================
    FunctionDef,
    ClassDef,
    Return,
    Delete,
    Assign,
    AugAssign,
    AnnAssign,
    For,
    While,
    If,
    With,
    Raise,
    Try,
    Assert,
    Import,
    ImportFrom,
    Global,
    ExprStmt,
    Pass,
    Break,
    Continue,

    // ========================================================================
    // Expressions
    // ========================================================================
    BoolOp,
    BinOp,
    UnaryOp,
    Lambda,
    IfExp,
    Dict,
    Set,
    ListComp,
    DictComp,
    GeneratorExp,
    Await,
    Yield,
    Compare,
    Call,
    Constant,
    Attribute,
    Subscript,
    Starred,
    Name,
    List,
    Tuple,
    Slice,

    // ========================================================================
    // Auxiliary nodes
    // ========================================================================
    Arg,
    ExceptHandler,
}

impl SyntaxKind {
    /// The kind's name as shown in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxKind::Module => "Module",
            SyntaxKind::FunctionDef => "FunctionDef",
            SyntaxKind::ClassDef => "ClassDef",
            SyntaxKind::Return => "Return",
            SyntaxKind::Delete => "Delete",
            SyntaxKind::Assign => "Assign",
            SyntaxKind::AugAssign => "AugAssign",
            SyntaxKind::AnnAssign => "AnnAssign",
            SyntaxKind::For => "For",
            SyntaxKind::While => "While",
            SyntaxKind::If => "If",
            SyntaxKind::With => "With",
            SyntaxKind::Raise => "Raise",
            SyntaxKind::Try => "Try",
            SyntaxKind::Assert => "Assert",
            SyntaxKind::Import => "Import",
            SyntaxKind::ImportFrom => "ImportFrom",
            SyntaxKind::Global => "Global",
            SyntaxKind::ExprStmt => "Expr",
            SyntaxKind::Pass => "Pass",
            SyntaxKind::Break => "Break",
            SyntaxKind::Continue => "Continue",
            SyntaxKind::BoolOp => "BoolOp",
            SyntaxKind::BinOp => "BinOp",
            SyntaxKind::UnaryOp => "UnaryOp",
            SyntaxKind::Lambda => "Lambda",
            SyntaxKind::IfExp => "IfExp",
            SyntaxKind::Dict => "Dict",
            SyntaxKind::Set => "Set",
            SyntaxKind::ListComp => "ListComp",
            SyntaxKind::DictComp => "DictComp",
            SyntaxKind::GeneratorExp => "GeneratorExp",
            SyntaxKind::Await => "Await",
            SyntaxKind::Yield => "Yield",
            SyntaxKind::Compare => "Compare",
            SyntaxKind::Call => "Call",
            SyntaxKind::Constant => "Constant",
            SyntaxKind::Attribute => "Attribute",
            SyntaxKind::Subscript => "Subscript",
            SyntaxKind::Starred => "Starred",
            SyntaxKind::Name => "Name",
            SyntaxKind::List => "List",
            SyntaxKind::Tuple => "Tuple",
            SyntaxKind::Slice => "Slice",
            SyntaxKind::Arg => "Arg",
            SyntaxKind::ExceptHandler => "ExceptHandler",
        }
    }

    pub fn is_statement(self) -> bool {
        self >= SyntaxKind::FunctionDef && self <= SyntaxKind::Continue
    }

    pub fn is_expression(self) -> bool {
        self >= SyntaxKind::BoolOp && self <= SyntaxKind::Slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert!(SyntaxKind::Assign.is_statement());
        assert!(!SyntaxKind::Assign.is_expression());
        assert!(SyntaxKind::Lambda.is_expression());
        assert!(!SyntaxKind::Arg.is_statement());
        assert!(!SyntaxKind::Module.is_expression());
    }
}
