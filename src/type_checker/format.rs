use crate::{
    ast::expressions::{CallExpr, StringExpr},
    ast::ast::Expr,
    errors::errors::Error,
    types::types::TypeId,
    Span,
};

/// The one builtin function: C's `printf`, checked against its format string.
pub const PRINT_BUILTIN: &str = "printf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Integer,
    Float,
    Char,
    String,
}

impl FormatKind {
    fn from_char(c: char) -> Option<FormatKind> {
        match c {
            'd' | 'i' => Some(FormatKind::Integer),
            'f' => Some(FormatKind::Float),
            'c' => Some(FormatKind::Char),
            's' => Some(FormatKind::String),
            _ => None,
        }
    }

    pub fn matches(&self, ty: TypeId) -> bool {
        match self {
            FormatKind::Integer => ty == TypeId::INT,
            FormatKind::Float => ty == TypeId::FLOAT,
            FormatKind::Char => ty == TypeId::CHAR,
            FormatKind::String => ty == TypeId::STRING,
        }
    }
}

/// A `%` directive and the two columns it occupies in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: FormatKind,
    pub span: Span,
}

/// Collects the directives of a format string.
///
/// Scans the literal as written so every directive maps back to its exact
/// source column. `%%` prints a percent sign and takes no argument.
pub fn parse_format(literal: &StringExpr) -> Result<Vec<Directive>, Error> {
    let mut directives = vec![];
    let mut chars = literal.raw.chars().enumerate();

    while let Some((index, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '%' => {
                // +1 skips the opening quote.
                let offset = index as u32 + 1;

                match chars.next() {
                    None => {
                        return Err(Error::type_error(
                            "'%' expects a format specifier",
                            &literal.span.slice(offset, 1),
                        ))
                    }
                    Some((_, '%')) => {}
                    Some((_, directive)) => match FormatKind::from_char(directive) {
                        Some(kind) => directives.push(Directive {
                            kind,
                            span: literal.span.slice(offset, 2),
                        }),
                        None => {
                            return Err(Error::type_error(
                                "Unknown format specifier",
                                &literal.span.slice(offset, 2),
                            ))
                        }
                    },
                }
            }
            _ => {}
        }
    }

    Ok(directives)
}

/// Validates a `printf` call whose arguments have already been typed.
pub fn check_printf(call: &CallExpr) -> Result<(), Error> {
    let Some(first) = call.arguments.first() else {
        return Err(Error::type_error(
            "printf expects at least one string literal",
            &call.span,
        ));
    };

    let Expr::String(literal) = first else {
        return Err(Error::type_error(
            "printf expects a string literal as its first argument!",
            first.get_span(),
        ));
    };

    let directives = parse_format(literal)?;
    let rest = &call.arguments[1..];

    if directives.len() != rest.len() {
        return Err(Error::type_error(
            format!(
                "printf expected {} arguments after the string literal, but found {}",
                directives.len(),
                rest.len()
            ),
            &call.span,
        ));
    }

    for (directive, argument) in directives.iter().zip(rest) {
        let matches = argument
            .get_type()
            .map(|ty| directive.kind.matches(ty))
            .unwrap_or(false);

        if !matches {
            return Err(Error::type_error(
                "Format specifier and expression type don't match!",
                &directive.span,
            ));
        }
    }

    tracing::trace!(directives = directives.len(), "checked printf call");
    Ok(())
}
