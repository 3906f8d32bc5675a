use std::fmt::Display;

use thiserror::Error;

use crate::Span;

/// A compilation failure together with the source range it points at.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn syntax_error(message: impl Into<String>, span: &Span) -> Self {
        Error::new(
            ErrorImpl::SyntaxError {
                message: message.into(),
            },
            span.clone(),
        )
    }

    pub fn type_error(message: impl Into<String>, span: &Span) -> Self {
        Error::new(
            ErrorImpl::TypeError {
                message: message.into(),
            },
            span.clone(),
        )
    }

    pub fn codegen_error(message: impl Into<String>, span: &Span) -> Self {
        Error::new(
            ErrorImpl::CodegenError {
                message: message.into(),
            },
            span.clone(),
        )
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::SyntaxError { .. } => "SyntaxError",
            ErrorImpl::DoubleDefinition { .. } => "DoubleDefinition",
            ErrorImpl::UnknownIdentifier { .. } => "UnknownIdentifier",
            ErrorImpl::WrongSymbolKind { .. } => "WrongSymbolKind",
            ErrorImpl::NotReassignable { .. } => "NotReassignable",
            ErrorImpl::EntryPointCall => "EntryPointCall",
            ErrorImpl::ExternalEntryPoint => "ExternalEntryPoint",
            ErrorImpl::IllegalCapture { .. } => "IllegalCapture",
            ErrorImpl::ModuleCollectorError => "ModuleCollectorError",
            ErrorImpl::TypeError { .. } => "TypeError",
            ErrorImpl::AnnoMismatch => "AnnoMismatch",
            ErrorImpl::CodegenError { .. } => "CodegenError",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.span.file, self.span.start.line, self.span.start.column, self.internal_error
        )
    }
}

impl std::error::Error for Error {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    #[error("Syntax Error: {message}")]
    SyntaxError { message: String },
    #[error("{id} has already been defined")]
    DoubleDefinition { id: String },
    #[error("Unknown Identifier: {id}")]
    UnknownIdentifier { id: String },
    #[error("{id} is a {kind} and can't be used in this context")]
    WrongSymbolKind { id: String, kind: String },
    #[error("{id} can't be reassigned!")]
    NotReassignable { id: String },
    #[error("The \"main\" function can't be called")]
    EntryPointCall,
    #[error("function \"main\" can't be declared as external")]
    ExternalEntryPoint,
    #[error("{id} belongs to an enclosing function and can't be captured")]
    IllegalCapture { id: String },
    #[error("Can't declare this at the module level")]
    ModuleCollectorError,
    #[error("Type Error: {message}")]
    TypeError { message: String },
    #[error("The type annotation and the assigned expression don't have the same type")]
    AnnoMismatch,
    #[error("Codegen Error: {message}")]
    CodegenError { message: String },
}
