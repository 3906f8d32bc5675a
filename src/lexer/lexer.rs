use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::Error, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(source).expect("lexer patterns are valid regular expressions"),
        handler,
    }
}

lazy_static! {
    // First match wins, so longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern(r"^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern(r"^[0-9]+(\.[0-9]*)?", number_handler),
        pattern(r"^[ \t\r]+", skip_handler),
        pattern(r"^#[^\n]*", skip_handler),
        pattern(r"^\n", newline_handler),
        pattern("^\"", string_handler),
        pattern("^'", char_handler),
        pattern(r"^\(", open_paren_handler),
        pattern(r"^\)", close_paren_handler),
        pattern(r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern(r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern(r"^\.\.\.", MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...")),
        pattern(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern(r"^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern(r"^\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    line_start: usize,
    paren_depth: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Rc<String>) -> Lexer {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            line_start: 0,
            paren_depth: 0,
            file,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        let column = self.source[self.line_start..self.pos].chars().count() as u32 + 1;
        Position::new(self.line, column)
    }

    /// Span of `lexeme` starting at the current position.
    pub fn span_for(&self, lexeme: &str) -> Span {
        let start = self.position();
        let end = Position::new(start.line, start.column + lexeme.chars().count() as u32);
        Span::new(Rc::clone(&self.file), start, end)
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|found| found.as_str().to_string())
            .unwrap_or_default()
    }
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let span = lexer.span_for(&value);
    lexer.advance_n(value.len());
    lexer.push(MK_TOKEN!(kind, value, span));
    Ok(())
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let kind = if value.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Int
    };

    let span = lexer.span_for(&value);
    lexer.advance_n(value.len());
    lexer.push(MK_TOKEN!(kind, value, span));
    Ok(())
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
    Ok(())
}

fn newline_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    // Newlines end statements, except inside parentheses.
    if lexer.paren_depth == 0 {
        let span = lexer.span_for("\n");
        lexer.push(MK_TOKEN!(TokenKind::Newline, String::from("\n"), span));
    }

    lexer.advance_n(1);
    lexer.line += 1;
    lexer.line_start = lexer.pos;
    Ok(())
}

fn open_paren_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let span = lexer.span_for("(");
    lexer.push(MK_TOKEN!(TokenKind::OpenParen, String::from("("), span));
    lexer.paren_depth += 1;
    lexer.advance_n(1);
    Ok(())
}

fn close_paren_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let span = lexer.span_for(")");
    lexer.push(MK_TOKEN!(TokenKind::CloseParen, String::from(")"), span));
    lexer.paren_depth = lexer.paren_depth.saturating_sub(1);
    lexer.advance_n(1);
    Ok(())
}

fn string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let raw = scan_quoted(lexer, '"', "Unterminated string literal")?;
    let lexeme = format!("\"{}\"", raw);
    let span = lexer.span_for(&lexeme);

    unescape(&raw, &span)?;

    lexer.advance_n(lexeme.len());
    lexer.push(MK_TOKEN!(TokenKind::String, raw, span));
    Ok(())
}

fn char_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    let raw = scan_quoted(lexer, '\'', "Unterminated char literal")?;
    let lexeme = format!("'{}'", raw);
    let span = lexer.span_for(&lexeme);

    let value = unescape(&raw, &span)?;
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (None, _) => return Err(Error::syntax_error("Empty char literal", &span)),
        (Some(ch), None) if !ch.is_ascii() => {
            return Err(Error::syntax_error(
                "Char literals can only hold ASCII characters",
                &span,
            ))
        }
        (Some(_), None) => {}
        (Some(_), Some(_)) => {
            return Err(Error::syntax_error(
                "Char literals can only hold a single character",
                &span,
            ))
        }
    }

    lexer.advance_n(lexeme.len());
    lexer.push(MK_TOKEN!(TokenKind::Char, raw, span));
    Ok(())
}

/// Returns the raw text between the opening quote at the current position
/// and its closing quote. Literals can't span lines.
fn scan_quoted(lexer: &Lexer, quote: char, message: &str) -> Result<String, Error> {
    let remainder = lexer.remainder();
    let mut chars = remainder.char_indices().skip(1);

    while let Some((index, ch)) = chars.next() {
        if ch == quote {
            return Ok(remainder[1..index].to_string());
        }

        match ch {
            '\n' => break,
            '\\' => {
                if matches!(chars.next(), None | Some((_, '\n'))) {
                    break;
                }
            }
            _ => {}
        }
    }

    Err(Error::syntax_error(message, &lexer.span_for(&quote.to_string())))
}

/// Replaces escape sequences in the raw text of a char or string literal.
pub fn unescape(raw: &str, span: &Span) -> Result<String, Error> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('\'') => '\'',
            Some('"') => '"',
            Some('\\') => '\\',
            Some('0') => '\0',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('v') => '\u{b}',
            _ => return Err(Error::syntax_error("Unknown escape character", span)),
        };
        result.push(escaped);
    }

    Ok(result)
}

#[tracing::instrument(level = "debug", skip_all, fields(file = %file))]
pub fn tokenize(source: &str, file: Rc<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source.to_string(), file);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
            None => {
                let unknown = lex.at().unwrap_or_default().to_string();
                return Err(Error::syntax_error(
                    format!("Unrecognised character '{}'", unknown),
                    &lex.span_for(&unknown),
                ));
            }
        }
    }

    let span = lex.span_for("");
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), span));

    tracing::trace!(count = lex.tokens.len(), "tokenized source");
    Ok(lex.tokens)
}
