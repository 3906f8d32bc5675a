//! LLVM code generation.
//!
//! Lowers the type checked AST into an LLVM module through `inkwell`. Every
//! function gets its own control flow graph; module-level variables become
//! globals.
//!
//! - compiler: the generator state, type mapping and function declarations
//! - stmt: declarations, assignments and function bodies
//! - expr: expressions and operator lowering

pub mod compiler;
pub mod expr;
pub mod stmt;

#[cfg(test)]
mod tests;
