use std::fmt::Display;

use crate::{types::types::TypeId, Span};

/// The primitive type named by an `of <type>` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeAnnoKind {
    Int,
    Float,
    Char,
    String,
    Bool,
    Unit,
}

impl Display for TypeAnnoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeAnnoKind::Int => "int",
            TypeAnnoKind::Float => "float",
            TypeAnnoKind::Char => "char",
            TypeAnnoKind::String => "string",
            TypeAnnoKind::Bool => "bool",
            TypeAnnoKind::Unit => "unit",
        };
        write!(f, "{}", name)
    }
}

/// Type Annotation
/// `of int` in `let a of int = 1`. `ty` is filled in by the type checker.
#[derive(Debug, Clone)]
pub struct TypeAnno {
    pub kind: TypeAnnoKind,
    pub span: Span,
    pub ty: Option<TypeId>,
}

impl TypeAnno {
    pub fn new(kind: TypeAnnoKind, span: Span) -> Self {
        TypeAnno {
            kind,
            span,
            ty: None,
        }
    }
}
