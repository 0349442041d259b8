use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    GenerateOptions, generate_command, init_command, inspect_command, watch_command,
};

#[derive(Parser, Debug)]
#[command(name = "implgen")]
#[command(version, about, long_about = None, propagate_version = true)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate implementation units for marked types
    #[command(visible_alias = "g")]
    Generate {
        /// C# files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Directory receiving the generated files
        #[arg(short, long, default_value = "Generated")]
        out: PathBuf,

        /// Print units instead of writing them
        #[arg(short, long)]
        dry_run: bool,

        /// Print the generation report as JSON
        #[arg(long)]
        json: bool,

        /// Use this configuration file instead of searching for one
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List marked types, their interfaces and member signatures
    #[command(visible_alias = "i")]
    Inspect {
        /// C# files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Use this configuration file instead of searching for one
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Regenerate whenever a C# file changes
    #[command(visible_alias = "w")]
    Watch {
        /// C# files or directories to watch
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Directory receiving the generated files
        #[arg(short, long, default_value = "Generated")]
        out: PathBuf,

        /// Use this configuration file instead of searching for one
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write a default .implgen.json
    Init {
        /// Specify the current working directory
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Generate {
                paths,
                out,
                dry_run,
                json,
                config,
            } => generate_command(&GenerateOptions {
                paths,
                out,
                dry_run,
                json,
                config,
            }),
            Commands::Inspect {
                paths,
                json,
                config,
            } => inspect_command(&paths, json, config.as_deref()),
            Commands::Watch { paths, out, config } => {
                watch_command(&paths, &out, config.as_deref())
            }
            Commands::Init { cwd, force } => init_command(cwd.as_deref(), force).map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::parse_from([
            "implgen", "generate", "src", "lib/Contracts.cs", "--out", "gen", "--dry-run",
        ]);
        match cli.command {
            Commands::Generate {
                paths,
                out,
                dry_run,
                json,
                config,
            } => {
                assert_eq!(paths, vec![PathBuf::from("src"), PathBuf::from("lib/Contracts.cs")]);
                assert_eq!(out, PathBuf::from("gen"));
                assert!(dry_run);
                assert!(!json);
                assert!(config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_generate_requires_paths() {
        assert!(Cli::try_parse_from(["implgen", "generate"]).is_err());
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::parse_from(["implgen", "i", "src", "--json"]);
        assert!(matches!(cli.command, Commands::Inspect { json: true, .. }));
    }
}
