use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use implgen_core::{CancellationToken, Generator};
use tracing::debug;

use crate::display::{print_report, print_units};
use crate::sink::DirectorySink;
use crate::utils::{find_source_files, load_config, read_sources};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub paths: Vec<PathBuf>,
    pub out: PathBuf,
    pub dry_run: bool,
    pub json: bool,
    pub config: Option<PathBuf>,
}

pub fn generate_command(options: &GenerateOptions) -> Result<()> {
    let config = load_config(options.config.as_deref())?;
    let files = find_source_files(&options.paths, &config.output_extension)?;
    if files.is_empty() {
        bail!("No C# source files found");
    }
    debug!("Generating from {} files", files.len());

    let sources = read_sources(&files)?;
    let mut generator = Generator::new(config).context("Invalid configuration")?;
    let semantic = generator
        .semantic_model(&sources)
        .context("Failed to parse sources")?;
    let token = CancellationToken::new();

    if options.dry_run {
        let report = generator.generate(&semantic, &token);
        if options.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_units(&report.units);
        }
        return Ok(());
    }

    let mut sink = DirectorySink::new(&options.out)
        .with_context(|| format!("Failed to create {}", options.out.display()))?;
    let report = generator.generate_into(&semantic, &mut sink, &token);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, Some(&sink));
    }

    if !report.emission.sink_failures.is_empty() {
        bail!(
            "{} units could not be written",
            report.emission.sink_failures.len()
        );
    }
    Ok(())
}
