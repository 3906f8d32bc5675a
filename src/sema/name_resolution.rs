use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::CallExpr,
        statements::{ExternDeclStmt, FnDeclStmt},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::format::PRINT_BUILTIN,
    Span,
};

use super::{
    scope::{ScopeId, ScopeKind, ScopeTree},
    symbol::SymbolId,
    ENTRY_POINT,
};

/// Binds every identifier in `ast` to the symbol it refers to, creating a
/// scope for every function and block on the way.
///
/// Expects the module collector to have run over the same statements.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve(ast: &mut [Stmt], scopes: &mut ScopeTree) -> Result<(), Error> {
    let module_scope = scopes.module_scope();

    for stmt in ast.iter_mut() {
        resolve_stmt(scopes, stmt, module_scope)?;
    }

    Ok(())
}

fn resolve_stmt(scopes: &mut ScopeTree, stmt: &mut Stmt, scope: ScopeId) -> Result<(), Error> {
    match stmt {
        Stmt::VarDecl(decl) => {
            // Registered before the initializer so `let x = x` binds to itself.
            let symbol = scopes.add_var(
                scope,
                &decl.identifier,
                decl.is_constant,
                decl.is_internal,
                &decl.span,
            )?;
            decl.symbol = Some(symbol);

            resolve_expr(scopes, &mut decl.value, scope)
        }
        Stmt::Assignment(assignment) => {
            let symbol = lookup_value(
                scopes,
                &assignment.assignee,
                &assignment.assignee_span,
                scope,
            )?;

            if !scopes.can_be_reassigned(symbol) {
                return Err(Error::new(
                    ErrorImpl::NotReassignable {
                        id: assignment.assignee.clone(),
                    },
                    assignment.assignee_span.clone(),
                ));
            }
            assignment.symbol = Some(symbol);

            resolve_expr(scopes, &mut assignment.value, scope)
        }
        Stmt::Expression(stmt) => resolve_expr(scopes, &mut stmt.expression, scope),
        Stmt::FnDecl(decl) => resolve_fn_decl(scopes, decl, scope),
        Stmt::ExternDecl(decl) => resolve_extern_decl(scopes, decl, scope),
    }
}

fn resolve_fn_decl(scopes: &mut ScopeTree, decl: &mut FnDeclStmt, scope: ScopeId) -> Result<(), Error> {
    // Module-level functions were registered by the collector.
    if decl.signature.symbol.is_none() {
        if decl.signature.name == PRINT_BUILTIN {
            return Err(Error::new(
                ErrorImpl::DoubleDefinition {
                    id: decl.signature.name.clone(),
                },
                decl.signature.span.clone(),
            ));
        }

        let symbol = scopes.add_function(scope, &decl.signature, decl.is_internal)?;
        decl.signature.symbol = Some(symbol);
    }

    let function_scope = scopes.push_scope(scope, ScopeKind::Function);
    decl.signature.scope = Some(function_scope);

    for parameter in decl.signature.parameters.iter_mut() {
        let symbol = scopes.add_param(function_scope, &parameter.name, &parameter.span)?;
        parameter.symbol = Some(symbol);
    }

    resolve_expr(scopes, &mut decl.body, function_scope)
}

fn resolve_extern_decl(
    scopes: &mut ScopeTree,
    decl: &mut ExternDeclStmt,
    scope: ScopeId,
) -> Result<(), Error> {
    if decl.signature.name == ENTRY_POINT {
        return Err(Error::new(
            ErrorImpl::ExternalEntryPoint,
            decl.signature.span.clone(),
        ));
    }

    if decl.signature.name == PRINT_BUILTIN || decl.signature.symbol.is_some() {
        return Ok(());
    }

    let symbol = scopes.add_external(scope, &decl.signature)?;
    decl.signature.symbol = Some(symbol);
    Ok(())
}

fn resolve_expr(scopes: &mut ScopeTree, expr: &mut Expr, scope: ScopeId) -> Result<(), Error> {
    match expr {
        Expr::Int(_) | Expr::Float(_) | Expr::Char(_) | Expr::String(_) | Expr::Bool(_) => Ok(()),
        Expr::Symbol(symbol) => {
            symbol.symbol = Some(lookup_value(scopes, &symbol.value, &symbol.span, scope)?);
            Ok(())
        }
        Expr::Grouping(grouping) => resolve_expr(scopes, &mut grouping.expr, scope),
        Expr::Prefix(prefix) => resolve_expr(scopes, &mut prefix.right_expr, scope),
        Expr::Binary(binary) => {
            resolve_expr(scopes, &mut binary.left, scope)?;
            resolve_expr(scopes, &mut binary.right, scope)
        }
        Expr::Call(call) => resolve_call(scopes, call, scope),
        Expr::Block(block) => {
            let block_scope = scopes.push_scope(scope, ScopeKind::Block);
            block.scope = Some(block_scope);

            for stmt in block.body.iter_mut() {
                resolve_stmt(scopes, stmt, block_scope)?;
            }
            Ok(())
        }
        Expr::If(if_expr) => {
            resolve_expr(scopes, &mut if_expr.condition, scope)?;
            resolve_expr(scopes, &mut if_expr.then_branch, scope)?;
            if let Some(else_branch) = if_expr.else_branch.as_mut() {
                resolve_expr(scopes, else_branch, scope)?;
            }
            Ok(())
        }
        Expr::While(while_expr) => {
            resolve_expr(scopes, &mut while_expr.condition, scope)?;
            resolve_expr(scopes, &mut while_expr.body, scope)
        }
    }
}

fn resolve_call(scopes: &mut ScopeTree, call: &mut CallExpr, scope: ScopeId) -> Result<(), Error> {
    if call.callee != PRINT_BUILTIN {
        let symbol = scopes.resolve(scope, &call.callee).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownIdentifier {
                    id: call.callee.clone(),
                },
                call.callee_span.clone(),
            )
        })?;

        if !scopes.is_function(symbol) {
            return Err(Error::new(
                ErrorImpl::WrongSymbolKind {
                    id: call.callee.clone(),
                    kind: scopes.symbol(symbol).kind.name().to_string(),
                },
                call.callee_span.clone(),
            ));
        }

        if call.callee == ENTRY_POINT && scopes.is_global(symbol) {
            return Err(Error::new(
                ErrorImpl::EntryPointCall,
                call.callee_span.clone(),
            ));
        }

        call.symbol = Some(symbol);
    }

    for argument in call.arguments.iter_mut() {
        resolve_expr(scopes, argument, scope)?;
    }

    Ok(())
}

/// Resolves a name used as a value: it has to be a variable or parameter,
/// and locals of an enclosing function are out of reach.
fn lookup_value(scopes: &ScopeTree, name: &str, span: &Span, scope: ScopeId) -> Result<SymbolId, Error> {
    let symbol = scopes.resolve(scope, name).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownIdentifier {
                id: name.to_string(),
            },
            span.clone(),
        )
    })?;

    let declared = scopes.symbol(symbol);
    if !declared.is_value() {
        return Err(Error::new(
            ErrorImpl::WrongSymbolKind {
                id: name.to_string(),
                kind: declared.kind.name().to_string(),
            },
            span.clone(),
        ));
    }

    if !scopes.is_global(symbol) && scopes.crosses_function(scope, declared.scope) {
        return Err(Error::new(
            ErrorImpl::IllegalCapture {
                id: name.to_string(),
            },
            span.clone(),
        ));
    }

    Ok(symbol)
}
