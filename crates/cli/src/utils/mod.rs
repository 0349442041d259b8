pub mod config;
pub mod file;

pub use config::load_config;
pub use file::{find_source_files, is_source_file, read_sources};
