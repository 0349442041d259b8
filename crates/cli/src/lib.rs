pub mod cli;
pub mod commands;
pub mod display;
pub mod sink;
pub mod utils;

// Re-export commonly used items
pub use cli::{Cli, Commands};
pub use sink::DirectorySink;
