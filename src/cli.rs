//! CLI argument parsing with clap

use crate::config::{ConflictPolicy, Config, NamingScheme};
use clap::Parser;
use std::path::PathBuf;

/// Photo Categorizer - sort photos into folders with single keypresses
///
/// Shows each image of the input directory in turn; pressing a bound key
/// moves it (with its RAW file and sidecars) into the matching category
/// folder under the output directory.
#[derive(Parser, Debug, Default)]
#[command(name = "photo-categorizer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When omitted, `config.toml` in the working directory is used if it
    /// exists. CLI arguments override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Input directory to review
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory receiving the category folders
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Destination naming scheme
    #[arg(long, value_enum)]
    pub naming: Option<NamingScheme>,

    /// What to do when a destination file already exists
    #[arg(long, value_enum)]
    pub conflict: Option<ConflictPolicy>,

    /// External viewer command, started with each image path
    #[arg(long)]
    pub viewer: Option<String>,

    /// Do not write the commit journal
    #[arg(long)]
    pub no_journal: bool,

    /// Dry run mode - show where files would go without moving them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,

    /// Write a commented sample configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    pub init_config: Option<PathBuf>,

    /// Print the key map and the queue, then exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref input) = self.input {
            config.input_dir = input.clone();
        }
        if let Some(ref output) = self.output {
            config.output_dir = output.clone();
        }
        if let Some(naming) = self.naming {
            config.naming = naming;
        }
        if let Some(conflict) = self.conflict {
            config.conflict = conflict;
        }
        if let Some(ref viewer) = self.viewer {
            config.viewer = Some(viewer.clone());
        }
        if self.no_journal {
            config.journal = false;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }
}
