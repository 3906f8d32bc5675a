use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("let", TokenKind::Let);
        map.insert("fun", TokenKind::Fun);
        map.insert("internal", TokenKind::Internal);
        map.insert("external", TokenKind::External);
        map.insert("of", TokenKind::Of);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("int", TokenKind::IntType);
        map.insert("float", TokenKind::FloatType);
        map.insert("char", TokenKind::CharType);
        map.insert("string", TokenKind::StringType);
        map.insert("bool", TokenKind::BoolType);
        map.insert("unit", TokenKind::UnitType);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Newline,
    Identifier,

    Int,
    Float,
    Char,
    String,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Ellipsis,
    Semicolon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
    Caret,

    // Reserved
    Var,
    Let,
    Fun,
    Internal,
    External,
    Of,
    True,
    False,
    And,
    Or,
    Not,
    IntType,
    FloatType,
    CharType,
    StringType,
    BoolType,
    UnitType,
    If,
    Then,
    Else,
    While,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// The matched text. For char and string literals this is the raw text
    /// between the quotes, escapes included.
    pub value: String,
    pub span: Span,
}

impl Token {
    fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// Human readable form used in syntax errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => String::from("end of file"),
            TokenKind::Newline => String::from("new line"),
            TokenKind::Char => format!("'{}'", self.value),
            TokenKind::String => format!("\"{}\"", self.value),
            _ if self.is_one_of_many(&[TokenKind::Identifier, TokenKind::Int, TokenKind::Float]) => {
                format!("{} `{}`", self.kind, self.value)
            }
            _ => format!("`{}`", self.value),
        }
    }
}
