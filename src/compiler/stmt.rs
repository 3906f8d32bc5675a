use inkwell::{module::Linkage, values::BasicValueEnum};

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::UnaryOp,
        statements::{AssignmentStmt, FnDeclStmt, VarDeclStmt},
    },
    errors::errors::Error,
    sema::{bound, symbol::SymbolId, ENTRY_POINT},
    types::types::{TypeId, TypeUniverse},
};

use super::{
    compiler::{Compiler, LlvmResultExt},
    expr::gen_expression,
};

/// Generates a statement. Only expression statements produce a value; a
/// block keeps the value of its last statement.
pub fn gen_statement<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    stmt: &Stmt,
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    match stmt {
        Stmt::VarDecl(decl) => {
            gen_var_decl(compiler, decl)?;
            Ok(None)
        }
        Stmt::Assignment(assignment) => {
            gen_assignment(compiler, assignment)?;
            Ok(None)
        }
        Stmt::Expression(stmt) => gen_expression(compiler, &stmt.expression),
        Stmt::FnDecl(decl) => {
            gen_fn_decl(compiler, decl)?;
            Ok(None)
        }
        Stmt::ExternDecl(decl) => {
            // printf is declared up front and never gets a symbol.
            if let Some(symbol) = decl.signature.symbol {
                compiler.get_function(symbol);
            }
            Ok(None)
        }
    }
}

fn gen_var_decl(compiler: &mut Compiler<'_, '_>, decl: &VarDeclStmt) -> Result<(), Error> {
    let symbol = bound(decl.symbol, &decl.identifier);

    if compiler.scopes.is_global(symbol) {
        return gen_global_var(compiler, decl, symbol);
    }

    let Some(value) = gen_expression(compiler, &decl.value)? else {
        // Unit values have no storage.
        return Ok(());
    };

    let alloca = compiler.create_entry_block_alloca(value.get_type(), &decl.identifier, &decl.span)?;
    compiler.builder.build_store(alloca, value).at(&decl.span)?;
    compiler.named_allocas.insert(symbol, alloca);

    Ok(())
}

/// Module-level variables become LLVM globals with constant initializers.
fn gen_global_var(
    compiler: &mut Compiler<'_, '_>,
    decl: &VarDeclStmt,
    symbol: SymbolId,
) -> Result<(), Error> {
    let initializer = constant_initializer(compiler, &decl.value)?;

    let name = compiler.symbol_name(symbol);
    let global = compiler
        .module
        .add_global(initializer.get_type(), None, &name);
    global.set_initializer(&initializer);
    global.set_constant(decl.is_constant);
    if decl.is_internal {
        global.set_linkage(Linkage::Internal);
    }

    tracing::trace!(global = %decl.identifier, "emitted global");
    compiler.named_allocas.insert(symbol, global.as_pointer_value());
    Ok(())
}

/// A literal, or `+`/`-` applied to a numeric literal.
fn constant_initializer<'ctx>(
    compiler: &Compiler<'_, 'ctx>,
    expr: &Expr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let context = compiler.context;

    let value = match expr {
        Expr::Int(int) => context.i32_type().const_int(int.value as u64, true).into(),
        Expr::Float(float) => context.f64_type().const_float(float.value).into(),
        Expr::Char(character) => context.i8_type().const_int(character.value as u64, false).into(),
        Expr::Bool(boolean) => context.bool_type().const_int(boolean.value as u64, false).into(),
        Expr::String(string) => compiler.const_string_ptr(&string.value).into(),
        Expr::Prefix(prefix) if prefix.operator != UnaryOp::Not => {
            let negate = prefix.operator == UnaryOp::Minus;

            match prefix.right_expr.as_ref() {
                Expr::Int(int) => {
                    let value = if negate { int.value.wrapping_neg() } else { int.value };
                    context.i32_type().const_int(value as u64, true).into()
                }
                Expr::Float(float) => {
                    let value = if negate { -float.value } else { float.value };
                    context.f64_type().const_float(value).into()
                }
                _ => return Err(non_constant(expr)),
            }
        }
        _ => return Err(non_constant(expr)),
    };

    Ok(value)
}

fn non_constant(expr: &Expr) -> Error {
    Error::codegen_error("module-level initializers must be constant", expr.get_span())
}

fn gen_assignment(compiler: &mut Compiler<'_, '_>, assignment: &AssignmentStmt) -> Result<(), Error> {
    let symbol = bound(assignment.symbol, &assignment.assignee);

    if let Some(value) = gen_expression(compiler, &assignment.value)? {
        let pointer = compiler.storage(symbol);
        compiler.builder.build_store(pointer, value).at(&assignment.span)?;
    }

    Ok(())
}

fn gen_fn_decl(compiler: &mut Compiler<'_, '_>, decl: &FnDeclStmt) -> Result<(), Error> {
    let signature = &decl.signature;
    let symbol = bound(signature.symbol, &signature.name);
    let function = compiler.get_function(symbol);

    // Nested functions are generated in the middle of their parent.
    let previous_block = compiler.builder.get_insert_block();

    let entry = compiler.context.append_basic_block(function, "entry");
    compiler.builder.position_at_end(entry);

    for (parameter, value) in signature.parameters.iter().zip(function.get_param_iter()) {
        if TypeUniverse::from_anno(parameter.anno.kind) == TypeId::UNIT {
            continue;
        }

        let parameter_symbol = bound(parameter.symbol, &parameter.name);
        let alloca =
            compiler.create_entry_block_alloca(value.get_type(), &parameter.name, &parameter.span)?;
        compiler.builder.build_store(alloca, value).at(&parameter.span)?;
        compiler.named_allocas.insert(parameter_symbol, alloca);
    }

    let body = gen_expression(compiler, &decl.body)?;

    if compiler.current_block().get_terminator().is_none() {
        let return_type = TypeUniverse::from_anno(signature.return_anno.kind);
        let is_entry_point = signature.name == ENTRY_POINT && compiler.scopes.is_global(symbol);

        match body {
            Some(value) => compiler.builder.build_return(Some(&value)).at(&decl.span)?,
            None if return_type == TypeId::UNIT => compiler.builder.build_return(None).at(&decl.span)?,
            None if is_entry_point => {
                let zero = compiler.context.i32_type().const_zero();
                compiler.builder.build_return(Some(&zero)).at(&decl.span)?
            }
            None => {
                return Err(Error::codegen_error(
                    "Missing Function terminator outside a main function",
                    &signature.span,
                ))
            }
        };
    }

    if !function.verify(false) {
        return Err(Error::codegen_error(
            format!("The generated code for {} is invalid", signature.name),
            &signature.span,
        ));
    }

    if let Some(block) = previous_block {
        compiler.builder.position_at_end(block);
    }

    tracing::debug!(function = %signature.name, "generated function");
    Ok(())
}
