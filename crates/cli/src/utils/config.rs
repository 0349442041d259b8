use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use implgen_core::Config;
use tracing::debug;

/// The explicit file when given, otherwise the nearest one above the working directory
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        debug!("Loading config from {}", path.display());
        return Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let cwd = env::current_dir().context("Failed to get current directory")?;
    Config::load_or_default(&cwd).context("Failed to load configuration")
}
