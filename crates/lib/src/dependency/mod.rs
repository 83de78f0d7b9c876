//! Dependency descriptors.
//!
//! A descriptor names one Swift package to add: where it lives, which
//! version constraint to record, and which of its products the app target
//! links against.
//!
//! # Modules
//!
//! - [`types`] - The validated descriptor and requirement types
//! - [`load`] - Parsing and validating descriptor JSON files

pub mod load;
mod types;

pub use load::{DescriptorError, load_descriptors, parse_descriptors};
pub use types::*;
