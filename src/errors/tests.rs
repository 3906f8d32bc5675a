//! Unit tests for error messages and diagnostic rendering.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::errors::errors::{Error, ErrorImpl};
use crate::{display_error, Position, SourceFile, Span};

fn span(line: u32, start: u32, end: u32) -> Span {
    Span::new(
        Rc::new("test.arco".to_string()),
        Position::new(line, start),
        Position::new(line, end),
    )
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnknownIdentifier {
            id: "foo".to_string(),
        },
        span(1, 5, 8),
    );

    assert_eq!(error.get_error_name(), "UnknownIdentifier");
    assert_eq!(error.get_message(), "Unknown Identifier: foo");
    assert_eq!(error.get_span().start, Position::new(1, 5));
}

#[test]
fn test_double_definition_message() {
    let error = Error::new(
        ErrorImpl::DoubleDefinition {
            id: "x".to_string(),
        },
        span(1, 1, 2),
    );

    assert_eq!(error.get_message(), "x has already been defined");
}

#[test]
fn test_wrong_symbol_kind_message() {
    let error = Error::new(
        ErrorImpl::WrongSymbolKind {
            id: "add".to_string(),
            kind: "function".to_string(),
        },
        span(1, 1, 4),
    );

    assert_eq!(
        error.get_message(),
        "add is a function and can't be used in this context"
    );
}

#[test]
fn test_prefixed_messages() {
    let type_error = Error::type_error("Expected an expression of type bool!", &span(1, 1, 2));
    assert_eq!(type_error.get_error_name(), "TypeError");
    assert_eq!(
        type_error.get_message(),
        "Type Error: Expected an expression of type bool!"
    );

    let syntax_error = Error::syntax_error("Unterminated string literal", &span(1, 1, 2));
    assert_eq!(
        syntax_error.get_message(),
        "Syntax Error: Unterminated string literal"
    );

    let codegen_error = Error::codegen_error(
        "Missing Function terminator outside a main function",
        &span(1, 1, 2),
    );
    assert_eq!(codegen_error.get_error_name(), "CodegenError");
}

#[test]
fn test_fixed_messages() {
    let cases = [
        (
            ErrorImpl::EntryPointCall,
            "The \"main\" function can't be called",
        ),
        (
            ErrorImpl::ExternalEntryPoint,
            "function \"main\" can't be declared as external",
        ),
        (
            ErrorImpl::ModuleCollectorError,
            "Can't declare this at the module level",
        ),
        (
            ErrorImpl::AnnoMismatch,
            "The type annotation and the assigned expression don't have the same type",
        ),
    ];

    for (error_impl, message) in cases {
        assert_eq!(Error::new(error_impl, span(1, 1, 2)).get_message(), message);
    }
}

#[test]
fn test_error_display_prefix() {
    let error = Error::new(
        ErrorImpl::NotReassignable {
            id: "x".to_string(),
        },
        span(3, 5, 6),
    );

    assert_eq!(error.to_string(), "test.arco:3:5: x can't be reassigned!");
}

#[test]
fn test_display_error_layout() {
    let source = SourceFile::new("test.arco", "let a = 1\nlet x = y + 1\n");
    let error = Error::new(
        ErrorImpl::UnknownIdentifier {
            id: "y".to_string(),
        },
        span(2, 9, 10),
    );

    assert_eq!(
        display_error(&error, &source),
        "test.arco:2:9: Unknown Identifier: y\n 2 | let x = y + 1\n   |         ^\n"
    );
}

#[test]
fn test_display_error_wide_span() {
    let source = SourceFile::new("test.arco", "fun main() of int = 1.5");
    let error = Error::type_error(
        "Type of function body doesn't match type annotation",
        &span(1, 21, 24),
    );

    assert_eq!(
        display_error(&error, &source),
        "test.arco:1:21: Type Error: Type of function body doesn't match type annotation\n 1 | fun main() of int = 1.5\n   |                     ^^^\n"
    );
}

#[test]
fn test_display_error_multi_line_span() {
    let source = SourceFile::new("test.arco", "let a = {\n  1\n}\n");
    let error = Error::new(
        ErrorImpl::AnnoMismatch,
        Span::new(
            Rc::new("test.arco".to_string()),
            Position::new(1, 9),
            Position::new(3, 2),
        ),
    );

    let rendered = display_error(&error, &source);
    assert!(rendered.ends_with("   |         ^\n"), "{}", rendered);
}

#[test]
fn test_display_error_multi_line_span_counts_chars() {
    let source = SourceFile::new("test.arco", "let s = { \"é\"\n}\n");
    let error = Error::new(
        ErrorImpl::AnnoMismatch,
        Span::new(
            Rc::new("test.arco".to_string()),
            Position::new(1, 9),
            Position::new(2, 2),
        ),
    );

    let rendered = display_error(&error, &source);
    assert!(rendered.ends_with("   |         ^^^^^\n"), "{}", rendered);
}

#[test]
fn test_display_error_wide_line_number() {
    let mut text = String::new();
    for _ in 0..11 {
        text.push_str("let a = 1\n");
    }
    let source = SourceFile::new("test.arco", &text);
    let error = Error::new(
        ErrorImpl::DoubleDefinition {
            id: "a".to_string(),
        },
        span(11, 5, 6),
    );

    assert_eq!(
        display_error(&error, &source),
        "test.arco:11:5: a has already been defined\n 11 | let a = 1\n    |     ^\n"
    );
}
