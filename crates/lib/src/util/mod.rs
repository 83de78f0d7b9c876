//! Shared utilities.
//!
//! Text helpers used for diagnostics and indentation, plus test helpers.

pub mod text;

#[cfg(test)]
pub mod testutil;
