use std::fmt::Display;

use crate::{
    sema::{scope::ScopeId, symbol::SymbolId},
    types::types::TypeId,
    Span,
};

use super::ast::{Expr, Stmt};

// OPERATORS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Minus => write!(f, "-"),
            UnaryOp::Not => write!(f, "not"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    And,
    Or,
}

impl BinaryOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Equals | BinaryOp::NotEquals)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEquals | BinaryOp::Greater | BinaryOp::GreaterEquals
        )
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Concat => "^",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        };
        write!(f, "{}", symbol)
    }
}

// LITERALS

/// Integer Expression
#[derive(Debug, Clone)]
pub struct IntExpr {
    pub value: i32,
    pub span: Span,
    pub ty: Option<TypeId>,
}

/// Float Expression
#[derive(Debug, Clone)]
pub struct FloatExpr {
    pub value: f64,
    pub span: Span,
    pub ty: Option<TypeId>,
}

/// Char Expression
/// Chars are single ASCII bytes.
#[derive(Debug, Clone)]
pub struct CharExpr {
    pub value: u8,
    pub span: Span,
    pub ty: Option<TypeId>,
}

/// String Expression
///
/// `value` has its escapes replaced, `raw` is the text between the quotes
/// exactly as written. The format validator maps directives back to
/// source columns through `raw`.
#[derive(Debug, Clone)]
pub struct StringExpr {
    pub value: String,
    pub raw: String,
    pub span: Span,
    pub ty: Option<TypeId>,
}

/// Bool Expression
#[derive(Debug, Clone)]
pub struct BoolExpr {
    pub value: bool,
    pub span: Span,
    pub ty: Option<TypeId>,
}

// COMPLEX

/// Symbol Expression
/// A use of a variable or parameter. `symbol` is bound by name resolution.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
    pub ty: Option<TypeId>,
    pub symbol: Option<SymbolId>,
}

/// Grouping Expression
/// `(expr)`
#[derive(Debug, Clone)]
pub struct GroupingExpr {
    pub expr: Box<Expr>,
    pub span: Span,
    pub ty: Option<TypeId>,
}

/// Prefix Expression
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: UnaryOp,
    pub right_expr: Box<Expr>,
    pub span: Span,
    pub ty: Option<TypeId>,
}

/// Binary Expression
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    pub span: Span,
    pub ty: Option<TypeId>,
}

/// Call Expression
/// Callees are always plain identifiers.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: String,
    pub callee_span: Span,
    pub arguments: Vec<Expr>,
    pub span: Span,
    pub ty: Option<TypeId>,
    pub symbol: Option<SymbolId>,
}

/// Block Expression
/// `{ stmts }`. Owns a block scope once name resolution has run.
#[derive(Debug, Clone)]
pub struct BlockExpr {
    pub body: Vec<Stmt>,
    pub span: Span,
    pub ty: Option<TypeId>,
    pub scope: Option<ScopeId>,
}

/// If Expression
#[derive(Debug, Clone)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Option<Box<Expr>>,
    pub span: Span,
    pub ty: Option<TypeId>,
}

/// While Expression
/// The body is always a block.
#[derive(Debug, Clone)]
pub struct WhileExpr {
    pub condition: Box<Expr>,
    pub body: Box<Expr>,
    pub span: Span,
    pub ty: Option<TypeId>,
}
