//! Generated helpers for AST nodes.
//!
//! Kind lookup, data access and diagnostic context for statements and
//! expressions.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use xlate_diagnostics::NodeContext;

/// Helper to get the NodeData from any statement.
impl Stmt {
    pub fn data(&self) -> &NodeData {
        match self {
            Stmt::FunctionDef(n) => &n.data,
            Stmt::ClassDef(n) => &n.data,
            Stmt::Return(n) => &n.data,
            Stmt::Delete(n) => &n.data,
            Stmt::Assign(n) => &n.data,
            Stmt::AugAssign(n) => &n.data,
            Stmt::AnnAssign(n) => &n.data,
            Stmt::For(n) => &n.data,
            Stmt::While(n) => &n.data,
            Stmt::If(n) => &n.data,
            Stmt::With(n) => &n.data,
            Stmt::Raise(n) => &n.data,
            Stmt::Try(n) => &n.data,
            Stmt::Assert(n) => &n.data,
            Stmt::Import(n) => &n.data,
            Stmt::ImportFrom(n) => &n.data,
            Stmt::Global(n) => &n.data,
            Stmt::Expr(n) => &n.data,
            Stmt::Pass(d) => d,
            Stmt::Break(d) => d,
            Stmt::Continue(d) => d,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Stmt::FunctionDef(n) => &mut n.data,
            Stmt::ClassDef(n) => &mut n.data,
            Stmt::Return(n) => &mut n.data,
            Stmt::Delete(n) => &mut n.data,
            Stmt::Assign(n) => &mut n.data,
            Stmt::AugAssign(n) => &mut n.data,
            Stmt::AnnAssign(n) => &mut n.data,
            Stmt::For(n) => &mut n.data,
            Stmt::While(n) => &mut n.data,
            Stmt::If(n) => &mut n.data,
            Stmt::With(n) => &mut n.data,
            Stmt::Raise(n) => &mut n.data,
            Stmt::Try(n) => &mut n.data,
            Stmt::Assert(n) => &mut n.data,
            Stmt::Import(n) => &mut n.data,
            Stmt::ImportFrom(n) => &mut n.data,
            Stmt::Global(n) => &mut n.data,
            Stmt::Expr(n) => &mut n.data,
            Stmt::Pass(d) => d,
            Stmt::Break(d) => d,
            Stmt::Continue(d) => d,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match self {
            Stmt::FunctionDef(_) => SyntaxKind::FunctionDef,
            Stmt::ClassDef(_) => SyntaxKind::ClassDef,
            Stmt::Return(_) => SyntaxKind::Return,
            Stmt::Delete(_) => SyntaxKind::Delete,
            Stmt::Assign(_) => SyntaxKind::Assign,
            Stmt::AugAssign(_) => SyntaxKind::AugAssign,
            Stmt::AnnAssign(_) => SyntaxKind::AnnAssign,
            Stmt::For(_) => SyntaxKind::For,
            Stmt::While(_) => SyntaxKind::While,
            Stmt::If(_) => SyntaxKind::If,
            Stmt::With(_) => SyntaxKind::With,
            Stmt::Raise(_) => SyntaxKind::Raise,
            Stmt::Try(_) => SyntaxKind::Try,
            Stmt::Assert(_) => SyntaxKind::Assert,
            Stmt::Import(_) => SyntaxKind::Import,
            Stmt::ImportFrom(_) => SyntaxKind::ImportFrom,
            Stmt::Global(_) => SyntaxKind::Global,
            Stmt::Expr(_) => SyntaxKind::ExprStmt,
            Stmt::Pass(_) => SyntaxKind::Pass,
            Stmt::Break(_) => SyntaxKind::Break,
            Stmt::Continue(_) => SyntaxKind::Continue,
        }
    }

    pub fn pos(&self) -> u32 {
        self.data().range.pos
    }

    pub fn end(&self) -> u32 {
        self.data().range.end
    }

    /// Diagnostic context for errors raised at this statement.
    pub fn context(&self) -> NodeContext {
        let data = self.data();
        NodeContext::new(data.id.0, self.kind().as_str(), data.range)
    }
}

impl Expr {
    pub fn kind(&self) -> SyntaxKind {
        match &self.kind {
            ExprKind::BoolOp { .. } => SyntaxKind::BoolOp,
            ExprKind::BinOp { .. } => SyntaxKind::BinOp,
            ExprKind::UnaryOp { .. } => SyntaxKind::UnaryOp,
            ExprKind::Lambda { .. } => SyntaxKind::Lambda,
            ExprKind::IfExp { .. } => SyntaxKind::IfExp,
            ExprKind::Dict { .. } => SyntaxKind::Dict,
            ExprKind::Set { .. } => SyntaxKind::Set,
            ExprKind::ListComp { .. } => SyntaxKind::ListComp,
            ExprKind::DictComp { .. } => SyntaxKind::DictComp,
            ExprKind::GeneratorExp { .. } => SyntaxKind::GeneratorExp,
            ExprKind::Await { .. } => SyntaxKind::Await,
            ExprKind::Yield { .. } => SyntaxKind::Yield,
            ExprKind::Compare { .. } => SyntaxKind::Compare,
            ExprKind::Call(_) => SyntaxKind::Call,
            ExprKind::Constant(_) => SyntaxKind::Constant,
            ExprKind::Attribute { .. } => SyntaxKind::Attribute,
            ExprKind::Subscript { .. } => SyntaxKind::Subscript,
            ExprKind::Starred { .. } => SyntaxKind::Starred,
            ExprKind::Name { .. } => SyntaxKind::Name,
            ExprKind::List { .. } => SyntaxKind::List,
            ExprKind::Tuple { .. } => SyntaxKind::Tuple,
            ExprKind::Slice { .. } => SyntaxKind::Slice,
        }
    }

    pub fn pos(&self) -> u32 {
        self.data.range.pos
    }

    pub fn context(&self) -> NodeContext {
        NodeContext::new(self.data.id.0, self.kind().as_str(), self.data.range)
    }

    /// The identifier, if this is a bare name.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name { id } => Some(id),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            ExprKind::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_ellipsis(&self) -> bool {
        matches!(self.kind, ExprKind::Constant(Constant::Ellipsis))
    }

    pub fn is_none(&self) -> bool {
        matches!(self.kind, ExprKind::Constant(Constant::None))
    }

    /// Dotted rendering of a name or attribute chain (`math.floor`).
    pub fn dotted_name(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Name { id } => Some(id.clone()),
            ExprKind::Attribute { value, attr } => {
                let base = value.dotted_name()?;
                Some(format!("{}.{}", base, attr))
            }
            _ => None,
        }
    }
}

impl Arg {
    pub fn context(&self) -> NodeContext {
        NodeContext::new(self.data.id.0, SyntaxKind::Arg.as_str(), self.data.range)
    }
}

impl FunctionDef {
    /// Whether the body is a lone `...`, i.e. a declaration without a definition.
    pub fn is_declaration_only(&self) -> bool {
        match self.body.as_slice() {
            [Stmt::Expr(stmt)] => stmt.value.is_ellipsis(),
            _ => false,
        }
    }
}

impl Module {
    pub fn context(&self) -> NodeContext {
        NodeContext::new(self.data.id.0, SyntaxKind::Module.as_str(), self.data.range)
    }
}
