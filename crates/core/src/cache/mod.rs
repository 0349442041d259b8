//! Caching of generated units across passes

pub mod generation_cache;

// Re-export the main cache type
pub use generation_cache::{GenerationCache, fingerprint};
