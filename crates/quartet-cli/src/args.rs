use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quartet_core::env::Environment;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "quartet",
    version,
    about = "Validate puzzle files and sync them to the dev/prod buckets"
)]
pub struct Cli {
    /// Emit JSON output on stdout (and JSON log lines on stderr).
    #[arg(long, global = true)]
    pub json: bool,

    /// Log progress to stderr. RUST_LOG takes precedence.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Repository root containing content/puzzles.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Use a local directory as the object store (one subdirectory per bucket)
    /// instead of S3.
    #[arg(long, global = true)]
    pub store_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check puzzle files against the content schema.
    Validate {
        /// Puzzle file to check; repeatable. Defaults to every file in content/puzzles.
        #[arg(long = "file", value_name = "PATH")]
        files: Vec<String>,
    },

    /// Upload puzzles missing from an environment and rewrite its manifest.
    Upload {
        #[arg(long, default_value = "dev")]
        env: Environment,

        /// Puzzle file to upload; repeatable. Defaults to every file in content/puzzles.
        #[arg(long = "file", value_name = "PATH")]
        files: Vec<String>,

        /// Plan only; write nothing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy puzzles and the manifest from one environment to another.
    Promote {
        #[arg(long, default_value = "dev")]
        source: Environment,

        #[arg(long, default_value = "prod")]
        target: Environment,

        /// Plan only; copy nothing.
        #[arg(long)]
        dry_run: bool,

        /// Copy puzzles even if the target already has them.
        #[arg(long)]
        overwrite: bool,
    },
}
