use crate::{types::types::TypeId, Span};

use super::{expressions::*, statements::*};

/// Expression node. Every variant carries its span and an inferred type
/// slot that stays `None` until the type checker has visited it.
#[derive(Debug, Clone)]
pub enum Expr {
    Int(IntExpr),
    Float(FloatExpr),
    Char(CharExpr),
    String(StringExpr),
    Bool(BoolExpr),
    Symbol(SymbolExpr),
    Grouping(GroupingExpr),
    Prefix(PrefixExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Block(BlockExpr),
    If(IfExpr),
    While(WhileExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Int(expr) => &expr.span,
            Expr::Float(expr) => &expr.span,
            Expr::Char(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Bool(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Grouping(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Block(expr) => &expr.span,
            Expr::If(expr) => &expr.span,
            Expr::While(expr) => &expr.span,
        }
    }

    pub fn get_type(&self) -> Option<TypeId> {
        match self {
            Expr::Int(expr) => expr.ty,
            Expr::Float(expr) => expr.ty,
            Expr::Char(expr) => expr.ty,
            Expr::String(expr) => expr.ty,
            Expr::Bool(expr) => expr.ty,
            Expr::Symbol(expr) => expr.ty,
            Expr::Grouping(expr) => expr.ty,
            Expr::Prefix(expr) => expr.ty,
            Expr::Binary(expr) => expr.ty,
            Expr::Call(expr) => expr.ty,
            Expr::Block(expr) => expr.ty,
            Expr::If(expr) => expr.ty,
            Expr::While(expr) => expr.ty,
        }
    }

    pub fn set_type(&mut self, ty: TypeId) {
        let slot = match self {
            Expr::Int(expr) => &mut expr.ty,
            Expr::Float(expr) => &mut expr.ty,
            Expr::Char(expr) => &mut expr.ty,
            Expr::String(expr) => &mut expr.ty,
            Expr::Bool(expr) => &mut expr.ty,
            Expr::Symbol(expr) => &mut expr.ty,
            Expr::Grouping(expr) => &mut expr.ty,
            Expr::Prefix(expr) => &mut expr.ty,
            Expr::Binary(expr) => &mut expr.ty,
            Expr::Call(expr) => &mut expr.ty,
            Expr::Block(expr) => &mut expr.ty,
            Expr::If(expr) => &mut expr.ty,
            Expr::While(expr) => &mut expr.ty,
        };
        *slot = Some(ty);
    }
}

/// Statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Assignment(AssignmentStmt),
    Expression(ExpressionStmt),
    FnDecl(FnDeclStmt),
    ExternDecl(ExternDeclStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::ExternDecl(stmt) => &stmt.span,
        }
    }
}
