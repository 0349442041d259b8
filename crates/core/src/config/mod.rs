//! Configuration management for implgen

mod settings;

// Re-export main types
pub use settings::{CONFIG_FILE_NAMES, CacheConfig, Config};
