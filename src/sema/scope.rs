use std::collections::HashMap;

use crate::{
    ast::statements::FnSignature,
    errors::errors::{Error, ErrorImpl},
    types::types::TypeId,
    Span,
};

use super::symbol::{Symbol, SymbolId, SymbolKind};

/// Handle to a scope stored in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    symbols: HashMap<String, SymbolId>,
}

impl Scope {
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Arena owning every scope and symbol of one module.
///
/// Scope 0 is the module scope. Scopes never move or get removed, so a
/// `ScopeId` or `SymbolId` handed out once stays valid for the whole
/// compilation.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
    module_symbol: SymbolId,
}

impl ScopeTree {
    pub fn new(module_name: &str) -> Self {
        let module_scope = Scope {
            kind: ScopeKind::Module,
            parent: None,
            symbols: HashMap::new(),
        };

        // The module's own symbol isn't reachable by name from inside it.
        let module_symbol = Symbol::new(
            module_name,
            SymbolKind::Module,
            ScopeId(0),
            Span::null(),
        );

        ScopeTree {
            scopes: vec![module_scope],
            symbols: vec![module_symbol],
            module_symbol: SymbolId(0),
        }
    }

    pub fn module_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn module_name(&self) -> &str {
        &self.symbol(self.module_symbol).name
    }

    pub fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            symbols: HashMap::new(),
        });

        tracing::trace!(scope = id.index(), parent = parent.index(), ?kind, "pushed scope");
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn set_symbol_type(&mut self, id: SymbolId, ty: TypeId) {
        self.symbol_mut(id).set_type(ty);
    }

    /// Searches `scope` and then its ancestors, innermost first.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);

        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(*symbol);
            }
            current = scope.parent;
        }

        None
    }

    /// Like [`ScopeTree::resolve`], for lookups that name resolution has
    /// already proven to succeed.
    ///
    /// # Panics
    ///
    /// Panics if `name` isn't visible from `scope`.
    pub fn get_symbol(&self, scope: ScopeId, name: &str) -> SymbolId {
        self.resolve(scope, name)
            .unwrap_or_else(|| panic!("symbol {} looked up before name resolution", name))
    }

    pub fn add_function(
        &mut self,
        scope: ScopeId,
        signature: &FnSignature,
        is_internal: bool,
    ) -> Result<SymbolId, Error> {
        self.insert_function(scope, signature, is_internal, false)
    }

    pub fn add_external(&mut self, scope: ScopeId, signature: &FnSignature) -> Result<SymbolId, Error> {
        self.insert_function(scope, signature, false, true)
    }

    fn insert_function(
        &mut self,
        scope: ScopeId,
        signature: &FnSignature,
        is_internal: bool,
        is_external: bool,
    ) -> Result<SymbolId, Error> {
        self.insert(
            scope,
            Symbol::new(
                &signature.name,
                SymbolKind::Function {
                    signature: signature.clone(),
                    is_internal,
                    is_external,
                },
                scope,
                signature.span.clone(),
            ),
        )
    }

    pub fn add_var(
        &mut self,
        scope: ScopeId,
        name: &str,
        is_constant: bool,
        is_internal: bool,
        span: &Span,
    ) -> Result<SymbolId, Error> {
        self.insert(
            scope,
            Symbol::new(
                name,
                SymbolKind::Variable {
                    is_constant,
                    is_internal,
                },
                scope,
                span.clone(),
            ),
        )
    }

    pub fn add_param(&mut self, scope: ScopeId, name: &str, span: &Span) -> Result<SymbolId, Error> {
        self.insert(
            scope,
            Symbol::new(name, SymbolKind::Parameter, scope, span.clone()),
        )
    }

    pub fn is_function(&self, id: SymbolId) -> bool {
        self.symbol(id).is_function()
    }

    pub fn can_be_reassigned(&self, id: SymbolId) -> bool {
        self.symbol(id).can_be_reassigned()
    }

    /// Whether the symbol lives in the module scope.
    pub fn is_global(&self, id: SymbolId) -> bool {
        self.symbol(id).scope == self.module_scope()
    }

    /// Whether walking from `from` up to `owner` leaves a function scope,
    /// i.e. whether a use in `from` would reach into an enclosing function.
    pub fn crosses_function(&self, from: ScopeId, owner: ScopeId) -> bool {
        let mut current = Some(from);

        while let Some(id) = current {
            if id == owner {
                return false;
            }

            let scope = self.scope(id);
            if scope.kind == ScopeKind::Function {
                return true;
            }
            current = scope.parent;
        }

        false
    }

    fn insert(&mut self, scope: ScopeId, symbol: Symbol) -> Result<SymbolId, Error> {
        if self.scope(scope).contains(&symbol.name) {
            return Err(Error::new(
                ErrorImpl::DoubleDefinition { id: symbol.name },
                symbol.span,
            ));
        }

        let id = SymbolId(self.symbols.len() as u32);
        tracing::debug!(name = %symbol.name, kind = symbol.kind.name(), scope = scope.index(), "registered symbol");

        self.scopes[scope.index()]
            .symbols
            .insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        Ok(id)
    }
}
