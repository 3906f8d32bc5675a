use crate::{
    ast::{
        ast::Stmt,
        statements::{
            AssignmentStmt, ExpressionStmt, ExternDeclStmt, FnDeclStmt, FnSignature, Parameter,
            VarDeclStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::{parser::Parser, types::parse_type_anno};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind() == TokenKind::Assignment
    {
        return parse_assignment_stmt(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Expression(ExpressionStmt {
        span: expr.get_span().clone(),
        expression: expr,
    }))
}

pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let assignee = parser.advance().clone();
    parser.expect(TokenKind::Assignment)?;
    parser.skip_newlines();

    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Assignment(AssignmentStmt {
        span: assignee.span.to(value.get_span()),
        assignee: assignee.value,
        assignee_span: assignee.span,
        value,
        symbol: None,
    }))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.clone();
    parse_var_decl(parser, start, false)
}

fn parse_var_decl(parser: &mut Parser, start: Span, is_internal: bool) -> Result<Stmt, Error> {
    let is_constant = parser.advance().kind == TokenKind::Let;

    let identifier = parser
        .expect_error(
            TokenKind::Identifier,
            "Expected an identifier in the variable declaration",
        )?
        .value;

    let anno = if parser.current_token_kind() == TokenKind::Of {
        Some(parse_type_anno(parser)?)
    } else {
        None
    };

    parser.expect_error(TokenKind::Assignment, "Expected `=` in the variable declaration")?;
    parser.skip_newlines();
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        span: start.to(value.get_span()),
        is_internal,
        is_constant,
        identifier,
        anno,
        value,
        symbol: None,
    }))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.clone();
    parse_fn_decl(parser, start, false)
}

fn parse_fn_decl(parser: &mut Parser, start: Span, is_internal: bool) -> Result<Stmt, Error> {
    let signature = parse_signature(parser, false)?;

    parser.expect_error(TokenKind::Assignment, "Expected `=` before the function body")?;
    parser.skip_newlines();
    let body = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        span: start.to(body.get_span()),
        is_internal,
        signature,
        body,
    }))
}

/// `internal` in front of a variable or function declaration.
pub fn parse_internal_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.clone();

    match parser.current_token_kind() {
        TokenKind::Let | TokenKind::Var => parse_var_decl(parser, start, true),
        TokenKind::Fun => parse_fn_decl(parser, start, true),
        _ => Err(parser.unexpected("Expected a declaration after `internal`")),
    }
}

pub fn parse_extern_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.clone();
    let signature = parse_signature(parser, true)?;

    Ok(Stmt::ExternDecl(ExternDeclStmt {
        span: start.to(&signature.span),
        signature,
    }))
}

/// `fun id(a of T, ...) of R`. Only external declarations may end their
/// parameter list with `...`.
fn parse_signature(parser: &mut Parser, allow_variadic: bool) -> Result<FnSignature, Error> {
    let start = parser.expect(TokenKind::Fun)?.span;
    let name = parser
        .expect_error(TokenKind::Identifier, "Expected a function name")?
        .value;

    parser.expect_error(TokenKind::OpenParen, "Expected `(` after the function name")?;

    let mut parameters = vec![];
    let mut is_variadic = false;

    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::Ellipsis {
            if !allow_variadic {
                return Err(parser.unexpected("Only external functions can be variadic"));
            }
            parser.advance();
            is_variadic = true;

            if parser.current_token_kind() != TokenKind::CloseParen {
                return Err(parser.unexpected("`...` has to be the last parameter"));
            }
            break;
        }

        let token = parser.expect_error(TokenKind::Identifier, "Expected a parameter name")?;
        let anno = parse_type_anno(parser)?;

        parameters.push(Parameter {
            span: token.span.to(&anno.span),
            name: token.value,
            anno,
            symbol: None,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected("Expected `,` or `)` in parameter list"));
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    let return_anno = parse_type_anno(parser)?;

    Ok(FnSignature {
        span: start.to(&return_anno.span),
        name,
        parameters,
        return_anno,
        is_variadic,
        symbol: None,
        scope: None,
    })
}
