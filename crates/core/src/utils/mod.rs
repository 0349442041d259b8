//! Small helpers shared across the crate

pub mod serde_helpers;
pub mod identifiers;
