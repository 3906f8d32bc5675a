//! Type checking.
//!
//! Assigns a type to every expression of a resolved AST and records the
//! type of every symbol in the scope tree. Calls to the `printf` builtin
//! are checked against their format string in `format`.

pub mod format;
pub mod type_checker;
