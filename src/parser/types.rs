use crate::{
    ast::types::{TypeAnno, TypeAnnoKind},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Parses `of <type>`.
pub fn parse_type_anno(parser: &mut Parser) -> Result<TypeAnno, Error> {
    parser.expect_error(TokenKind::Of, "Expected a type annotation starting with `of`")?;

    let kind = match parser.current_token_kind() {
        TokenKind::IntType => TypeAnnoKind::Int,
        TokenKind::FloatType => TypeAnnoKind::Float,
        TokenKind::CharType => TypeAnnoKind::Char,
        TokenKind::StringType => TypeAnnoKind::String,
        TokenKind::BoolType => TypeAnnoKind::Bool,
        TokenKind::UnitType => TypeAnnoKind::Unit,
        _ => return Err(parser.unexpected("Expected a type")),
    };

    let span = parser.advance().span.clone();
    Ok(TypeAnno::new(kind, span))
}
