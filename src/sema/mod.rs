//! Semantic analysis: scopes, symbols and name binding.
//!
//! - scope: the arena-backed scope tree (module, function and block scopes)
//! - symbol: symbols and their lazily filled type slots
//! - module_collector: registers module-level signatures before any body is resolved
//! - name_resolution: binds every identifier to its symbol

pub mod module_collector;
pub mod name_resolution;
pub mod scope;
pub mod symbol;

#[cfg(test)]
mod tests;

/// Name of the function execution starts in.
pub const ENTRY_POINT: &str = "main";

/// Unwraps a binding left by name resolution.
///
/// # Panics
///
/// Panics if the node was never visited by name resolution.
pub fn bound(symbol: Option<symbol::SymbolId>, name: &str) -> symbol::SymbolId {
    symbol.unwrap_or_else(|| panic!("{} was not bound by name resolution", name))
}
