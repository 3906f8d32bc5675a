use inkwell::{
    values::{BasicMetadataValueEnum, BasicValueEnum, IntValue},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryExpr, BinaryOp, BlockExpr, CallExpr, IfExpr, PrefixExpr, UnaryOp, WhileExpr},
    },
    errors::errors::Error,
    sema::bound,
    types::types::TypeId,
    Span,
};

use super::{
    compiler::{Compiler, LlvmResultExt, RuntimeFunction},
    stmt::gen_statement,
};

/// # Panics
///
/// Panics if the type checker never visited the expression.
fn expr_type(expr: &Expr) -> TypeId {
    expr.get_type()
        .unwrap_or_else(|| panic!("expression at {:?} was not type checked", expr.get_span().start))
}

/// Generates LLVM IR for an expression. Unit expressions produce no value.
pub fn gen_expression<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    expr: &Expr,
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    let ty = expr_type(expr);
    let context = compiler.context;

    let value: Option<BasicValueEnum<'ctx>> = match expr {
        Expr::Int(int) => Some(context.i32_type().const_int(int.value as u64, true).into()),
        Expr::Float(float) => Some(context.f64_type().const_float(float.value).into()),
        Expr::Char(character) => Some(context.i8_type().const_int(character.value as u64, false).into()),
        Expr::Bool(boolean) => Some(context.bool_type().const_int(boolean.value as u64, false).into()),
        Expr::String(string) => Some(
            compiler
                .builder
                .build_global_string_ptr(&string.value, ".str")
                .at(&string.span)?
                .as_pointer_value()
                .into(),
        ),
        Expr::Symbol(symbol) => {
            if ty == TypeId::UNIT {
                None
            } else {
                let pointer = compiler.storage(bound(symbol.symbol, &symbol.value));
                Some(
                    compiler
                        .builder
                        .build_load(pointer, &symbol.value)
                        .at(&symbol.span)?,
                )
            }
        }
        Expr::Grouping(grouping) => gen_expression(compiler, &grouping.expr)?,
        Expr::Prefix(prefix) => Some(gen_prefix(compiler, prefix)?),
        Expr::Binary(binary) => Some(gen_binary(compiler, binary)?),
        Expr::Call(call) => gen_call(compiler, call)?,
        Expr::Block(block) => gen_block(compiler, block)?,
        Expr::If(if_expr) => gen_if(compiler, if_expr, ty)?,
        Expr::While(while_expr) => {
            gen_while(compiler, while_expr)?;
            None
        }
    };

    if ty == TypeId::UNIT {
        return Ok(None);
    }
    Ok(value)
}

/// Like [`gen_expression`] for operands that must carry a value.
fn gen_value<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    expr: &Expr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    gen_expression(compiler, expr)?
        .ok_or_else(|| Error::codegen_error("Expected an expression with a value", expr.get_span()))
}

/// Lowers a bool to a branch condition.
fn gen_condition<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    expr: &Expr,
    name: &str,
) -> Result<IntValue<'ctx>, Error> {
    let condition = gen_value(compiler, expr)?.into_int_value();
    let zero = compiler.context.bool_type().const_zero();

    compiler
        .builder
        .build_int_compare(IntPredicate::NE, condition, zero, name)
        .at(expr.get_span())
}

fn gen_prefix<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    prefix: &PrefixExpr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let operand_type = expr_type(&prefix.right_expr);
    let value = gen_value(compiler, &prefix.right_expr)?;
    let builder = &compiler.builder;

    let result = match prefix.operator {
        UnaryOp::Plus => value,
        UnaryOp::Minus if operand_type == TypeId::FLOAT => builder
            .build_float_neg(value.into_float_value(), "negtmp")
            .at(&prefix.span)?
            .into(),
        UnaryOp::Minus => builder
            .build_int_neg(value.into_int_value(), "negtmp")
            .at(&prefix.span)?
            .into(),
        UnaryOp::Not => builder
            .build_not(value.into_int_value(), "nottmp")
            .at(&prefix.span)?
            .into(),
    };

    Ok(result)
}

fn int_predicate(operator: BinaryOp, signed: bool) -> Option<IntPredicate> {
    let predicate = match (operator, signed) {
        (BinaryOp::Equals, _) => IntPredicate::EQ,
        (BinaryOp::NotEquals, _) => IntPredicate::NE,
        (BinaryOp::Less, true) => IntPredicate::SLT,
        (BinaryOp::LessEquals, true) => IntPredicate::SLE,
        (BinaryOp::Greater, true) => IntPredicate::SGT,
        (BinaryOp::GreaterEquals, true) => IntPredicate::SGE,
        (BinaryOp::Less, false) => IntPredicate::ULT,
        (BinaryOp::LessEquals, false) => IntPredicate::ULE,
        (BinaryOp::Greater, false) => IntPredicate::UGT,
        (BinaryOp::GreaterEquals, false) => IntPredicate::UGE,
        _ => return None,
    };
    Some(predicate)
}

fn float_predicate(operator: BinaryOp) -> Option<FloatPredicate> {
    let predicate = match operator {
        BinaryOp::Equals => FloatPredicate::OEQ,
        BinaryOp::NotEquals => FloatPredicate::ONE,
        BinaryOp::Less => FloatPredicate::OLT,
        BinaryOp::LessEquals => FloatPredicate::OLE,
        BinaryOp::Greater => FloatPredicate::OGT,
        BinaryOp::GreaterEquals => FloatPredicate::OGE,
        _ => return None,
    };
    Some(predicate)
}

fn unsupported(binary: &BinaryExpr, compiler: &Compiler<'_, '_>, operand_type: TypeId) -> Error {
    Error::codegen_error(
        format!(
            "{} can't be applied to expressions of type {}",
            binary.operator,
            compiler.types.display(operand_type)
        ),
        &binary.span,
    )
}

/// Operator lowering picks the instruction from the static operand type.
/// Both operands of every operator have the same type after type checking.
fn gen_binary<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    binary: &BinaryExpr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let operand_type = expr_type(&binary.left);
    let operator = binary.operator;
    let span = &binary.span;

    // Unit has a single value, so its equality is known statically.
    if operand_type == TypeId::UNIT {
        gen_expression(compiler, &binary.left)?;
        gen_expression(compiler, &binary.right)?;

        let result = match operator {
            BinaryOp::Equals => true,
            BinaryOp::NotEquals => false,
            _ => return Err(unsupported(binary, compiler, operand_type)),
        };
        return Ok(compiler
            .context
            .bool_type()
            .const_int(result as u64, false)
            .into());
    }

    let left = gen_value(compiler, &binary.left)?;
    let right = gen_value(compiler, &binary.right)?;
    let builder = &compiler.builder;

    let result: BasicValueEnum<'ctx> = match operand_type {
        TypeId::INT => {
            let (left, right) = (left.into_int_value(), right.into_int_value());

            let value = match operator {
                BinaryOp::Add => builder.build_int_add(left, right, "addtmp").at(span)?,
                BinaryOp::Sub => builder.build_int_sub(left, right, "subtmp").at(span)?,
                BinaryOp::Mul => builder.build_int_mul(left, right, "multmp").at(span)?,
                BinaryOp::Div => builder.build_int_signed_div(left, right, "divtmp").at(span)?,
                BinaryOp::Mod => builder.build_int_signed_rem(left, right, "modtmp").at(span)?,
                _ => {
                    let predicate = int_predicate(operator, true)
                        .ok_or_else(|| unsupported(binary, compiler, operand_type))?;
                    builder.build_int_compare(predicate, left, right, "cmptmp").at(span)?
                }
            };
            value.into()
        }
        TypeId::FLOAT => {
            let (left, right) = (left.into_float_value(), right.into_float_value());

            match operator {
                BinaryOp::Add => builder.build_float_add(left, right, "addtmp").at(span)?.into(),
                BinaryOp::Sub => builder.build_float_sub(left, right, "subtmp").at(span)?.into(),
                BinaryOp::Mul => builder.build_float_mul(left, right, "multmp").at(span)?.into(),
                BinaryOp::Div => builder.build_float_div(left, right, "divtmp").at(span)?.into(),
                BinaryOp::Mod => builder.build_float_rem(left, right, "modtmp").at(span)?.into(),
                _ => {
                    let predicate = float_predicate(operator)
                        .ok_or_else(|| unsupported(binary, compiler, operand_type))?;
                    builder
                        .build_float_compare(predicate, left, right, "cmptmp")
                        .at(span)?
                        .into()
                }
            }
        }
        // Chars are unsigned bytes.
        TypeId::CHAR => {
            let predicate = int_predicate(operator, false)
                .ok_or_else(|| unsupported(binary, compiler, operand_type))?;
            builder
                .build_int_compare(predicate, left.into_int_value(), right.into_int_value(), "cmptmp")
                .at(span)?
                .into()
        }
        TypeId::BOOL => {
            let (left, right) = (left.into_int_value(), right.into_int_value());

            let value = match operator {
                BinaryOp::And => builder.build_and(left, right, "andtmp").at(span)?,
                BinaryOp::Or => builder.build_or(left, right, "ortmp").at(span)?,
                BinaryOp::Equals | BinaryOp::NotEquals => {
                    let predicate = int_predicate(operator, false)
                        .ok_or_else(|| unsupported(binary, compiler, operand_type))?;
                    builder.build_int_compare(predicate, left, right, "cmptmp").at(span)?
                }
                _ => return Err(unsupported(binary, compiler, operand_type)),
            };
            value.into()
        }
        TypeId::STRING => {
            if operator == BinaryOp::Concat {
                gen_concat(compiler, left, right, span)?
            } else {
                let predicate = int_predicate(operator, true)
                    .ok_or_else(|| unsupported(binary, compiler, operand_type))?;

                // strcmp orders the strings the way the operator orders 0.
                let order = compiler
                    .call_runtime(RuntimeFunction::Strcmp, &[left.into(), right.into()], span)?
                    .into_int_value();
                let zero = compiler.context.i32_type().const_zero();

                compiler
                    .builder
                    .build_int_compare(predicate, order, zero, "cmptmp")
                    .at(span)?
                    .into()
            }
        }
        _ => return Err(unsupported(binary, compiler, operand_type)),
    };

    Ok(result)
}

/// `a ^ b` copies both strings into a fresh heap buffer.
fn gen_concat<'ctx>(
    compiler: &Compiler<'_, 'ctx>,
    left: BasicValueEnum<'ctx>,
    right: BasicValueEnum<'ctx>,
    span: &Span,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let left_length = compiler
        .call_runtime(RuntimeFunction::Strlen, &[left.into()], span)?
        .into_int_value();
    let right_length = compiler
        .call_runtime(RuntimeFunction::Strlen, &[right.into()], span)?
        .into_int_value();

    let length = compiler
        .builder
        .build_int_add(left_length, right_length, "")
        .at(span)?;
    // One more byte for the terminator.
    let one = compiler.context.i64_type().const_int(1, false);
    let size = compiler.builder.build_int_add(length, one, "").at(span)?;

    let buffer = compiler.call_runtime(RuntimeFunction::Malloc, &[size.into()], span)?;
    compiler.call_runtime(RuntimeFunction::Strcpy, &[buffer.into(), left.into()], span)?;
    compiler.call_runtime(RuntimeFunction::Strcat, &[buffer.into(), right.into()], span)?;

    Ok(buffer)
}

fn gen_call<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    call: &CallExpr,
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    // Only the print builtin is called without a symbol.
    let (function, function_type) = match call.symbol {
        Some(symbol) => (compiler.get_function(symbol), compiler.declared_type(symbol)),
        None => (compiler.printf, compiler.printf.get_type()),
    };
    let fixed_parameters = function_type.count_param_types() as usize;

    let mut arguments: Vec<BasicMetadataValueEnum<'ctx>> = vec![];
    for (index, argument) in call.arguments.iter().enumerate() {
        let value = match gen_expression(compiler, argument)? {
            // Variadic arguments get the C default promotions.
            Some(value) if index >= fixed_parameters && expr_type(argument) == TypeId::CHAR => compiler
                .builder
                .build_int_s_extend(value.into_int_value(), compiler.context.i32_type(), "")
                .at(argument.get_span())?
                .into(),
            Some(value) if index >= fixed_parameters && expr_type(argument) == TypeId::BOOL => compiler
                .builder
                .build_int_z_extend(value.into_int_value(), compiler.context.i32_type(), "")
                .at(argument.get_span())?
                .into(),
            Some(value) => value,
            None => compiler.unit_struct_type().const_zero().into(),
        };
        arguments.push(value.into());
    }

    let call_site = compiler.build_call_as(function, function_type, &arguments, &call.span)?;

    Ok(call_site.try_as_basic_value().left())
}

fn gen_block<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    block: &BlockExpr,
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    let mut value = None;

    for stmt in block.body.iter() {
        value = gen_statement(compiler, stmt)?;
    }

    Ok(value)
}

/// Both arms jump to a shared `ifcont` block; a phi joins their values
/// unless the expression is of type unit.
fn gen_if<'ctx>(
    compiler: &mut Compiler<'_, 'ctx>,
    if_expr: &IfExpr,
    ty: TypeId,
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    let condition = gen_condition(compiler, &if_expr.condition, "ifcond")?;

    let function = compiler.current_function();
    let then_block = compiler.context.append_basic_block(function, "then");
    let else_block = if_expr
        .else_branch
        .as_ref()
        .map(|_| compiler.context.append_basic_block(function, "else"));
    let merge_block = compiler.context.append_basic_block(function, "ifcont");

    compiler
        .builder
        .build_conditional_branch(condition, then_block, else_block.unwrap_or(merge_block))
        .at(&if_expr.span)?;

    compiler.builder.position_at_end(then_block);
    let then_value = gen_expression(compiler, &if_expr.then_branch)?;
    // The branch may have moved the cursor into blocks of its own.
    let then_end = compiler.current_block();
    compiler.branch_if_open(merge_block, &if_expr.span)?;

    let mut else_value = None;
    let mut else_end = None;
    if let (Some(else_branch), Some(else_block)) = (&if_expr.else_branch, else_block) {
        compiler.builder.position_at_end(else_block);
        else_value = gen_expression(compiler, else_branch)?;
        else_end = Some(compiler.current_block());
        compiler.branch_if_open(merge_block, &if_expr.span)?;
    }

    compiler.builder.position_at_end(merge_block);

    let (Some(phi_type), Some(then_value), Some(else_value), Some(else_end)) =
        (compiler.basic_type(ty), then_value, else_value, else_end)
    else {
        return Ok(None);
    };

    let phi = compiler
        .builder
        .build_phi(phi_type, "iftmp")
        .at(&if_expr.span)?;
    phi.add_incoming(&[(&then_value, then_end), (&else_value, else_end)]);

    Ok(Some(phi.as_basic_value()))
}

/// `while.cond` is re-entered after every iteration of `while.body`.
fn gen_while(compiler: &mut Compiler<'_, '_>, while_expr: &WhileExpr) -> Result<(), Error> {
    let function = compiler.current_function();
    let cond_block = compiler.context.append_basic_block(function, "while.cond");
    let body_block = compiler.context.append_basic_block(function, "while.body");
    let end_block = compiler.context.append_basic_block(function, "while.end");

    compiler.branch_if_open(cond_block, &while_expr.span)?;

    compiler.builder.position_at_end(cond_block);
    let condition = gen_condition(compiler, &while_expr.condition, "whilecond")?;
    compiler
        .builder
        .build_conditional_branch(condition, body_block, end_block)
        .at(&while_expr.span)?;

    compiler.builder.position_at_end(body_block);
    gen_expression(compiler, &while_expr.body)?;
    compiler.branch_if_open(cond_block, &while_expr.span)?;

    compiler.builder.position_at_end(end_block);
    Ok(())
}
