use crate::{ast::statements::FnSignature, types::types::TypeId, Span};

use super::scope::ScopeId;

/// Handle to a symbol stored in a [`super::scope::ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub enum SymbolKind {
    Variable { is_constant: bool, is_internal: bool },
    /// Holds a copy of the declaring signature so forward calls can be
    /// typed and lowered before the definition itself is visited.
    Function {
        signature: FnSignature,
        is_internal: bool,
        /// Bound to a C symbol; the body lives outside the module.
        is_external: bool,
    },
    Parameter,
    Module,
}

impl SymbolKind {
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Variable { .. } => "variable",
            SymbolKind::Function { .. } => "function",
            SymbolKind::Parameter => "function parameter",
            SymbolKind::Module => "module",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// The scope the symbol was declared in.
    pub scope: ScopeId,
    /// Span of the declaring node.
    pub span: Span,
    ty: Option<TypeId>,
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind, scope: ScopeId, span: Span) -> Self {
        Symbol {
            name: name.to_string(),
            kind,
            scope,
            span,
            ty: None,
        }
    }

    pub fn get_type(&self) -> Option<TypeId> {
        self.ty
    }

    /// Fills the type slot. The slot is write-once: writing the same type
    /// again is a no-op, writing a different one is a compiler bug.
    pub fn set_type(&mut self, ty: TypeId) {
        match self.ty {
            Some(existing) if existing != ty => {
                panic!("type of symbol {} is already set", self.name)
            }
            _ => self.ty = Some(ty),
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. })
    }

    /// Variables and parameters are the only symbols usable as values.
    pub fn is_value(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable { .. } | SymbolKind::Parameter)
    }

    pub fn can_be_reassigned(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Variable {
                is_constant: false,
                ..
            } | SymbolKind::Parameter
        )
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Variable {
                is_internal: true,
                ..
            } | SymbolKind::Function {
                is_internal: true,
                ..
            }
        )
    }

    pub fn is_external(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Function {
                is_external: true,
                ..
            }
        )
    }

    pub fn signature(&self) -> Option<&FnSignature> {
        match &self.kind {
            SymbolKind::Function { signature, .. } => Some(signature),
            _ => None,
        }
    }
}
