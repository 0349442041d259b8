use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use implgen_core::{Config, config::CONFIG_FILE_NAMES};
use tracing::info;

/// Write a default `.implgen.json` into the working directory. Returns the
/// path when a file was written.
pub fn init_command(cwd: Option<&Path>, force: bool) -> Result<Option<PathBuf>> {
    let project_root = match cwd {
        Some(cwd) => cwd.to_path_buf(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    let project_root = project_root
        .canonicalize()
        .context("Failed to canonicalize project root")?;

    let config_path = project_root.join(CONFIG_FILE_NAMES[0]);
    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(None);
    }

    Config::default()
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    info!("Created config: {}", config_path.display());

    println!("✅ Created config: {}", config_path.display());
    println!("\n📌 Mark a type to generate its implementation:");
    println!("   [AddImplementation<IMyService>]");
    println!("   public partial class MyService {{ }}");
    Ok(Some(config_path))
}
