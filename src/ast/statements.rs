use crate::{
    sema::{scope::ScopeId, symbol::SymbolId},
    Span,
};

use super::{ast::Expr, types::TypeAnno};

/// Variable Declaration Statement
/// `[internal] (let|var) id [of T] = value`. `let` declares a constant.
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub is_internal: bool,
    pub is_constant: bool,
    pub identifier: String,
    pub anno: Option<TypeAnno>,
    pub value: Expr,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

/// Assignment Statement
/// `id = value`
#[derive(Debug, Clone)]
pub struct AssignmentStmt {
    pub assignee: String,
    pub assignee_span: Span,
    pub value: Expr,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

/// Expression Statement
#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// A declared function parameter: `a of int`.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub anno: TypeAnno,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

/// Function Signature
///
/// Shared by definitions and external declarations. `symbol` is the
/// function's own symbol, `scope` the function scope holding the
/// parameters (definitions only).
#[derive(Debug, Clone)]
pub struct FnSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_anno: TypeAnno,
    pub is_variadic: bool,
    pub span: Span,
    pub symbol: Option<SymbolId>,
    pub scope: Option<ScopeId>,
}

/// Function Declaration Statement
/// `[internal] fun id(params) of T = body`
#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub is_internal: bool,
    pub signature: FnSignature,
    pub body: Expr,
    pub span: Span,
}

/// External Declaration Statement
/// `external fun id(params[, ...]) of T`
#[derive(Debug, Clone)]
pub struct ExternDeclStmt {
    pub signature: FnSignature,
    pub span: Span,
}
