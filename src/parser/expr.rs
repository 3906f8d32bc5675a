use crate::{
    ast::{
        ast::Expr,
        expressions::{
            BinaryExpr, BinaryOp, BlockExpr, BoolExpr, CallExpr, CharExpr, FloatExpr, GroupingExpr,
            IfExpr, IntExpr, PrefixExpr, StringExpr, SymbolExpr, UnaryOp, WhileExpr,
        },
    },
    errors::errors::Error,
    lexer::{lexer::unescape, tokens::TokenKind},
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_stmt};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected("Expected an expression")),
    };

    let mut left = nud(parser)?;

    // Keep extending the left side while the next operator binds tighter.
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };
        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let span = token.span.clone();

    match token.kind {
        TokenKind::Int => {
            let value = token
                .value
                .parse::<i32>()
                .map_err(|_| Error::syntax_error("Integer constant is out of range", &span))?;
            Ok(Expr::Int(IntExpr {
                value,
                span,
                ty: None,
            }))
        }
        TokenKind::Float => {
            let value = token
                .value
                .parse::<f64>()
                .map_err(|_| Error::syntax_error("Malformed float constant", &span))?;
            Ok(Expr::Float(FloatExpr {
                value,
                span,
                ty: None,
            }))
        }
        TokenKind::Char => {
            // The lexer already checked for a single ASCII character.
            let value = unescape(&token.value, &span)?.bytes().next().unwrap_or_default();
            Ok(Expr::Char(CharExpr {
                value,
                span,
                ty: None,
            }))
        }
        TokenKind::String => Ok(Expr::String(StringExpr {
            value: unescape(&token.value, &span)?,
            raw: token.value,
            span,
            ty: None,
        })),
        TokenKind::True | TokenKind::False => Ok(Expr::Bool(BoolExpr {
            value: token.kind == TokenKind::True,
            span,
            ty: None,
        })),
        _ => Err(Error::syntax_error(
            format!("Expected a literal, found {}", token.describe()),
            &span,
        )),
    }
}

/// `id` or `id(args)`. Only plain identifiers can be called.
pub fn parse_symbol_or_call_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Expr::Symbol(SymbolExpr {
            value: token.value,
            span: token.span,
            ty: None,
            symbol: None,
        }));
    }

    parser.advance();
    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected("Expected `,` or `)` in argument list"));
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        callee: token.value,
        span: token.span.to(&close.span),
        callee_span: token.span,
        arguments,
        ty: None,
        symbol: None,
    }))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    let operator = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Dash => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Caret => BinaryOp::Concat,
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEquals => BinaryOp::LessEquals,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        _ => return None,
    };
    Some(operator)
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = binary_operator(operator_token.kind).ok_or_else(|| {
        Error::syntax_error(
            format!("Expected a binary operator, found {}", operator_token.describe()),
            &operator_token.span,
        )
    })?;

    // An operator at the end of a line continues the expression.
    parser.skip_newlines();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
        ty: None,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Dash => UnaryOp::Minus,
        _ => UnaryOp::Not,
    };

    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: operator_token.span.to(rhs.get_span()),
        operator,
        right_expr: Box::new(rhs),
        ty: None,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let expr = parse_expr(parser, BindingPower::Default)?;
    let close = parser.expect_error(TokenKind::CloseParen, "Expected `)`")?;

    Ok(Expr::Grouping(GroupingExpr {
        expr: Box::new(expr),
        span: open.span.to(&close.span),
        ty: None,
    }))
}

pub fn parse_block_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.expect(TokenKind::OpenCurly)?;
    let mut body = vec![];

    loop {
        while matches!(
            parser.current_token_kind(),
            TokenKind::Newline | TokenKind::Semicolon
        ) {
            parser.advance();
        }

        match parser.current_token_kind() {
            TokenKind::CloseCurly => break,
            TokenKind::EOF => return Err(parser.unexpected("Expected `}`")),
            _ => {}
        }

        body.push(parse_stmt(parser)?);
        parser.expect_stmt_end()?;
    }

    let close = parser.advance().clone();

    Ok(Expr::Block(BlockExpr {
        body,
        span: open.span.to(&close.span),
        ty: None,
        scope: None,
    }))
}

/// `if c then e [else e]`. Newlines may surround the branches; when no
/// `else` follows, the newlines after the then branch are left in place.
pub fn parse_if_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.skip_newlines();
    parser.expect_error(TokenKind::Then, "Expected `then` after the if condition")?;
    parser.skip_newlines();

    let then_branch = parse_expr(parser, BindingPower::Default)?;

    let before_else = parser.get_position();
    parser.skip_newlines();

    let else_branch = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        parser.skip_newlines();
        Some(Box::new(parse_expr(parser, BindingPower::Default)?))
    } else {
        parser.reset_position(before_else);
        None
    };

    let end = else_branch
        .as_ref()
        .map(|branch| branch.get_span().clone())
        .unwrap_or_else(|| then_branch.get_span().clone());

    Ok(Expr::If(IfExpr {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch,
        span: start.to(&end),
        ty: None,
    }))
}

/// `while c { ... }`
pub fn parse_while_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.skip_newlines();

    if parser.current_token_kind() != TokenKind::OpenCurly {
        return Err(parser.unexpected("Expected `{` after the while condition"));
    }
    let body = parse_block_expr(parser)?;

    Ok(Expr::While(WhileExpr {
        span: start.to(body.get_span()),
        condition: Box::new(condition),
        body: Box::new(body),
        ty: None,
    }))
}
