//! Parser module for building the AST.
//!
//! Statements are dispatched on their first token. Expressions go through a
//! Pratt parser: NUD (null denotation) handlers start an expression, LED
//! (left denotation) handlers extend it, and binding powers decide how far.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
