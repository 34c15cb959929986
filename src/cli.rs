// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use edgeship::output::OutputMode;

#[derive(Parser)]
#[command(name = "edgeship")]
#[command(about = "Deploy pre-built web apps to object storage, serverless functions, and an edge CDN")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an edgeship.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Package, upload, publish, bind, and invalidate
    Deploy {
        /// Configuration file (default: discovered in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail on the first asset upload error
        #[arg(long)]
        strict: bool,

        /// Do not invalidate the edge cache
        #[arg(long)]
        skip_invalidation: bool,
    },

    /// Stage and zip the server bundle without deploying
    Package {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Archive destination (default: <output_dir>/function.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Invalidate cached edge responses
    Invalidate {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path patterns such as /index.html or /blog/* (default: configured paths)
        paths: Vec<String>,
    },

    /// Show deployment targets and the currently bound triggers
    Status {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
