//! Lexical analysis module for the compiler.
//!
//! Converts source text into a stream of tokens. It handles:
//!
//! - Tokenization using a table of anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Line/column tracking for diagnostics
//! - Significant newlines (ignored inside parentheses) and `#` comments

pub mod lexer;
pub mod tokens;
