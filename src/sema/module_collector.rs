use crate::{
    ast::ast::Stmt,
    errors::errors::{Error, ErrorImpl},
    type_checker::format::PRINT_BUILTIN,
};

use super::{scope::ScopeTree, ENTRY_POINT};

/// Registers the signature of every module-level function definition and
/// external declaration, so bodies can call functions declared later on.
///
/// Only declarations may appear at the module level: expression statements
/// and assignments are rejected. Variable declarations are left to name
/// resolution.
#[tracing::instrument(level = "debug", skip_all)]
pub fn collect(ast: &mut [Stmt], scopes: &mut ScopeTree) -> Result<(), Error> {
    let module_scope = scopes.module_scope();

    for stmt in ast.iter_mut() {
        match stmt {
            Stmt::FnDecl(decl) => {
                if decl.signature.name == PRINT_BUILTIN {
                    return Err(Error::new(
                        ErrorImpl::DoubleDefinition {
                            id: decl.signature.name.clone(),
                        },
                        decl.signature.span.clone(),
                    ));
                }

                let symbol = scopes.add_function(module_scope, &decl.signature, decl.is_internal)?;
                decl.signature.symbol = Some(symbol);
            }
            Stmt::ExternDecl(decl) => {
                if decl.signature.name == ENTRY_POINT {
                    return Err(Error::new(
                        ErrorImpl::ExternalEntryPoint,
                        decl.signature.span.clone(),
                    ));
                }

                // The builtin is always declared, redeclaring it changes nothing.
                if decl.signature.name == PRINT_BUILTIN {
                    continue;
                }

                let symbol = scopes.add_external(module_scope, &decl.signature)?;
                decl.signature.symbol = Some(symbol);
            }
            Stmt::Expression(_) | Stmt::Assignment(_) => {
                return Err(Error::new(
                    ErrorImpl::ModuleCollectorError,
                    stmt.get_span().clone(),
                ));
            }
            Stmt::VarDecl(_) => {}
        }
    }

    Ok(())
}
