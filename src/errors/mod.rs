//! Error types and error handling for the compiler.
//!
//! Every pass returns `Result<_, Error>` and stops at the first failure.
//! An [`errors::Error`] pairs an [`errors::ErrorImpl`] variant with the
//! span it points at; `display_error` in the crate root renders it.

pub mod errors;

#[cfg(test)]
mod tests;
