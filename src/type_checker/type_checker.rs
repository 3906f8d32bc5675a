use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{BinaryExpr, BinaryOp, CallExpr, IfExpr, PrefixExpr, UnaryOp, WhileExpr},
        statements::{AssignmentStmt, FnDeclStmt, FnSignature, VarDeclStmt},
    },
    errors::errors::{Error, ErrorImpl},
    sema::{bound, scope::ScopeTree, symbol::SymbolId, ENTRY_POINT},
    types::types::{TypeId, TypeUniverse},
    Span,
};

use super::format::{check_printf, PRINT_BUILTIN};

pub struct TypeChecker<'a> {
    scopes: &'a mut ScopeTree,
    types: &'a mut TypeUniverse,
}

/// Types every node of a resolved AST.
///
/// Every expression ends up with its `ty` filled in and every symbol with
/// its type slot set. Running it again over the same tree changes nothing.
#[tracing::instrument(level = "debug", skip_all)]
pub fn type_check(ast: &mut [Stmt], scopes: &mut ScopeTree, types: &mut TypeUniverse) -> Result<(), Error> {
    let mut checker = TypeChecker { scopes, types };

    for stmt in ast.iter_mut() {
        checker.type_check_stmt(stmt)?;
    }

    tracing::debug!(types = checker.types.len(), "type checked module");
    Ok(())
}

impl<'a> TypeChecker<'a> {
    /// Returns the type of the statement: the expression's type for an
    /// expression statement, unit for everything else.
    pub fn type_check_stmt(&mut self, stmt: &mut Stmt) -> Result<TypeId, Error> {
        match stmt {
            Stmt::VarDecl(decl) => self.type_check_var_decl(decl),
            Stmt::Assignment(assignment) => self.type_check_assignment(assignment),
            Stmt::Expression(stmt) => self.type_check_expr(&mut stmt.expression),
            Stmt::FnDecl(decl) => self.type_check_fn_decl(decl),
            Stmt::ExternDecl(decl) => {
                if decl.signature.name != PRINT_BUILTIN {
                    self.type_check_signature(&mut decl.signature);
                }
                Ok(TypeId::UNIT)
            }
        }
    }

    fn type_check_var_decl(&mut self, decl: &mut VarDeclStmt) -> Result<TypeId, Error> {
        let value_type = self.type_check_expr(&mut decl.value)?;

        if let Some(anno) = decl.anno.as_mut() {
            let anno_type = TypeUniverse::from_anno(anno.kind);
            anno.ty = Some(anno_type);

            if anno_type != value_type {
                return Err(Error::new(ErrorImpl::AnnoMismatch, decl.span.clone()));
            }
        }

        let symbol = bound(decl.symbol, &decl.identifier);
        self.scopes.set_symbol_type(symbol, value_type);
        Ok(TypeId::UNIT)
    }

    fn type_check_assignment(&mut self, assignment: &mut AssignmentStmt) -> Result<TypeId, Error> {
        let value_type = self.type_check_expr(&mut assignment.value)?;
        let symbol = bound(assignment.symbol, &assignment.assignee);

        let target_type = self.initialized_type(symbol, &assignment.assignee, &assignment.assignee_span)?;
        if target_type != value_type {
            return Err(Error::type_error(
                format!(
                    "{} has type {}",
                    assignment.assignee,
                    self.types.display(target_type)
                ),
                &assignment.span,
            ));
        }

        Ok(TypeId::UNIT)
    }

    fn type_check_fn_decl(&mut self, decl: &mut FnDeclStmt) -> Result<TypeId, Error> {
        self.type_check_signature(&mut decl.signature);
        let body_type = self.type_check_expr(&mut decl.body)?;
        let return_type = TypeUniverse::from_anno(decl.signature.return_anno.kind);

        let symbol = bound(decl.signature.symbol, &decl.signature.name);
        if decl.signature.name == ENTRY_POINT
            && self.scopes.is_global(symbol)
            && return_type != TypeId::INT
        {
            return Err(Error::type_error(
                "The main function has to have a return type of int",
                &decl.signature.return_anno.span,
            ));
        }

        if body_type != return_type {
            return Err(Error::type_error(
                "Type of function body doesn't match type annotation",
                &decl.signature.span,
            ));
        }

        Ok(TypeId::UNIT)
    }

    /// Fills in the annotation and parameter types of a signature and
    /// records the resulting function type on its symbol.
    fn type_check_signature(&mut self, signature: &mut FnSignature) -> TypeId {
        for parameter in signature.parameters.iter_mut() {
            let ty = TypeUniverse::from_anno(parameter.anno.kind);
            parameter.anno.ty = Some(ty);

            // External declarations have no parameter symbols.
            if let Some(symbol) = parameter.symbol {
                self.scopes.set_symbol_type(symbol, ty);
            }
        }
        signature.return_anno.ty = Some(TypeUniverse::from_anno(signature.return_anno.kind));

        let function_type = self.signature_type(signature);
        if let Some(symbol) = signature.symbol {
            self.scopes.set_symbol_type(symbol, function_type);
        }

        function_type
    }

    fn signature_type(&mut self, signature: &FnSignature) -> TypeId {
        let parameters = signature
            .parameters
            .iter()
            .map(|parameter| TypeUniverse::from_anno(parameter.anno.kind))
            .collect();

        self.types.function(
            parameters,
            TypeUniverse::from_anno(signature.return_anno.kind),
        )
    }

    /// The type of a function symbol, derived from its signature if its
    /// declaration hasn't been checked yet.
    fn function_type(&mut self, symbol: SymbolId) -> TypeId {
        if let Some(ty) = self.scopes.symbol(symbol).get_type() {
            return ty;
        }

        let signature = match self.scopes.symbol(symbol).signature() {
            Some(signature) => signature.clone(),
            None => panic!("{} is not a function", self.scopes.symbol(symbol).name),
        };

        let ty = self.signature_type(&signature);
        self.scopes.set_symbol_type(symbol, ty);
        ty
    }

    fn initialized_type(
        &self,
        symbol: SymbolId,
        name: &str,
        span: &Span,
    ) -> Result<TypeId, Error> {
        self.scopes.symbol(symbol).get_type().ok_or_else(|| {
            Error::type_error(
                format!("{} is used before it has been initialized", name),
                span,
            )
        })
    }

    pub fn type_check_expr(&mut self, expr: &mut Expr) -> Result<TypeId, Error> {
        let ty = match expr {
            Expr::Int(_) => TypeId::INT,
            Expr::Float(_) => TypeId::FLOAT,
            Expr::Char(_) => TypeId::CHAR,
            Expr::String(_) => TypeId::STRING,
            Expr::Bool(_) => TypeId::BOOL,
            Expr::Symbol(symbol) => {
                let id = bound(symbol.symbol, &symbol.value);
                self.initialized_type(id, &symbol.value, &symbol.span)?
            }
            Expr::Grouping(grouping) => self.type_check_expr(&mut grouping.expr)?,
            Expr::Prefix(prefix) => self.type_check_prefix(prefix)?,
            Expr::Binary(binary) => self.type_check_binary(binary)?,
            Expr::Call(call) => self.type_check_call(call)?,
            Expr::Block(block) => {
                let count = block.body.len();
                let mut ty = TypeId::UNIT;

                for (index, stmt) in block.body.iter_mut().enumerate() {
                    ty = self.type_check_stmt(stmt)?;

                    if index + 1 < count && ty != TypeId::UNIT {
                        return Err(Error::type_error(
                            "Non unit expressions can only come at the end of a block. Consider using \"let\" or \"var\"",
                            stmt.get_span(),
                        ));
                    }
                }

                ty
            }
            Expr::If(if_expr) => self.type_check_if(if_expr)?,
            Expr::While(while_expr) => self.type_check_while(while_expr)?,
        };

        expr.set_type(ty);
        Ok(ty)
    }

    fn type_check_prefix(&mut self, prefix: &mut PrefixExpr) -> Result<TypeId, Error> {
        let operand = self.type_check_expr(&mut prefix.right_expr)?;

        match prefix.operator {
            UnaryOp::Not if operand != TypeId::BOOL => Err(Error::type_error(
                "Expected an expression of type bool!",
                prefix.right_expr.get_span(),
            )),
            UnaryOp::Plus | UnaryOp::Minus if !operand.is_numeric() => Err(Error::type_error(
                "Expected an expression of type int or float!",
                prefix.right_expr.get_span(),
            )),
            _ => Ok(operand),
        }
    }

    fn type_check_binary(&mut self, binary: &mut BinaryExpr) -> Result<TypeId, Error> {
        let left = self.type_check_expr(&mut binary.left)?;
        let right = self.type_check_expr(&mut binary.right)?;
        let operator = binary.operator;

        if operator == BinaryOp::Concat {
            if left != TypeId::STRING || right != TypeId::STRING {
                return Err(Error::type_error(
                    "'^' expects two expressions of type string!",
                    &binary.span,
                ));
            }
            return Ok(TypeId::STRING);
        }

        if operator.is_equality() {
            if left != right {
                return Err(Error::type_error(
                    "Only expressions of the same type can be checked for (in)equality!",
                    &binary.span,
                ));
            }
            return Ok(TypeId::BOOL);
        }

        if operator.is_arithmetic() {
            if left != right || !left.is_numeric() {
                return Err(Error::type_error(
                    "Arithmetic operations only work on expressions of type int or float!",
                    &binary.span,
                ));
            }
            return Ok(left);
        }

        if operator.is_ordering() {
            if left != right {
                return Err(Error::type_error(
                    "Only expressions of the same type can be compared",
                    &binary.span,
                ));
            }
            if left == TypeId::UNIT || left == TypeId::BOOL {
                return Err(Error::type_error(
                    format!("Expressions of type {} can't be compared", self.types.display(left)),
                    &binary.span,
                ));
            }
            return Ok(TypeId::BOOL);
        }

        // and / or
        if left != TypeId::BOOL || right != TypeId::BOOL {
            return Err(Error::type_error(
                format!("{} expects two expressions of type bool", operator),
                &binary.span,
            ));
        }
        Ok(TypeId::BOOL)
    }

    fn type_check_call(&mut self, call: &mut CallExpr) -> Result<TypeId, Error> {
        let argument_types = call
            .arguments
            .iter_mut()
            .map(|argument| self.type_check_expr(argument))
            .collect::<Result<Vec<TypeId>, Error>>()?;

        if call.callee == PRINT_BUILTIN {
            check_printf(call)?;
            return Ok(TypeId::UNIT);
        }

        let symbol = bound(call.symbol, &call.callee);
        let function_type = self.function_type(symbol);
        let is_variadic = self
            .scopes
            .symbol(symbol)
            .signature()
            .map(|signature| signature.is_variadic)
            .unwrap_or(false);

        let (parameters, return_type) = match self.types.as_function(function_type) {
            Some((parameters, return_type)) => (parameters.to_vec(), return_type),
            None => panic!("{} has a non-function type", call.callee),
        };

        if is_variadic {
            if argument_types.len() < parameters.len() {
                return Err(Error::type_error(
                    format!(
                        "{} expects at least {} arguments, found {}",
                        call.callee,
                        parameters.len(),
                        argument_types.len()
                    ),
                    &call.span,
                ));
            }
        } else if argument_types.len() != parameters.len() {
            return Err(Error::type_error(
                format!(
                    "{} expects {} arguments, found {}",
                    call.callee,
                    parameters.len(),
                    argument_types.len()
                ),
                &call.span,
            ));
        }

        for (index, argument) in argument_types.iter().enumerate() {
            let span = call.arguments[index].get_span();

            match parameters.get(index) {
                Some(parameter) if parameter != argument => {
                    return Err(Error::type_error(
                        format!("Expected an argument of type {}", self.types.display(*parameter)),
                        span,
                    ))
                }
                None if *argument == TypeId::UNIT => {
                    return Err(Error::type_error(
                        "Variadic arguments can't be of type unit",
                        span,
                    ))
                }
                _ => {}
            }
        }

        Ok(return_type)
    }

    fn type_check_if(&mut self, if_expr: &mut IfExpr) -> Result<TypeId, Error> {
        let condition = self.type_check_expr(&mut if_expr.condition)?;
        if condition != TypeId::BOOL {
            return Err(Error::type_error(
                "The condition of an if expression has to be of type bool",
                if_expr.condition.get_span(),
            ));
        }

        let then_type = self.type_check_expr(&mut if_expr.then_branch)?;

        match if_expr.else_branch.as_mut() {
            None if then_type != TypeId::UNIT => Err(Error::type_error(
                "if branch isn't of type unit but there is no else branch!",
                &if_expr.span,
            )),
            None => Ok(TypeId::UNIT),
            Some(else_branch) => {
                let else_type = self.type_check_expr(else_branch)?;
                if else_type != then_type {
                    return Err(Error::type_error(
                        "Both branches need to have the same type!",
                        &if_expr.span,
                    ));
                }
                Ok(then_type)
            }
        }
    }

    fn type_check_while(&mut self, while_expr: &mut WhileExpr) -> Result<TypeId, Error> {
        let condition = self.type_check_expr(&mut while_expr.condition)?;
        if condition != TypeId::BOOL {
            return Err(Error::type_error(
                "The condition of a while loop has to be of type bool",
                while_expr.condition.get_span(),
            ));
        }

        if self.type_check_expr(&mut while_expr.body)? != TypeId::UNIT {
            return Err(Error::type_error(
                "The body of a while loop has to be of type unit",
                while_expr.body.get_span(),
            ));
        }

        Ok(TypeId::UNIT)
    }
}
