//! The Type Universe.
//!
//! Types are interned into a [`types::TypeUniverse`] and referred to by
//! [`types::TypeId`] handles, so comparing two types is comparing two ids.

pub mod types;

#[cfg(test)]
mod tests;
