// ABOUTME: Entry point for the edgeship CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use edgeship::config::{self, Config};
use edgeship::error::Result;
use edgeship::output::Output;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode());

    if let Err(e) = run(cli.command, &mut output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, output: &mut Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match command {
        Commands::Init { force } => {
            let path = config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Deploy {
            config,
            strict,
            skip_invalidation,
        } => {
            let mut config = load_config(&cwd, config.as_deref())?;
            if strict {
                config.publish.strict = true;
            }
            if skip_invalidation {
                config.invalidation.enabled = false;
            }
            commands::deploy(config, &cwd, output).await
        }
        Commands::Package {
            config,
            output: destination,
        } => {
            let config = load_config(&cwd, config.as_deref())?;
            commands::package(config, destination, output).await
        }
        Commands::Invalidate { config, paths } => {
            let config = load_config(&cwd, config.as_deref())?;
            commands::invalidate(config, paths, output).await
        }
        Commands::Status { config } => {
            let config = load_config(&cwd, config.as_deref())?;
            commands::status(config, output).await
        }
    }
}

fn load_config(cwd: &Path, explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => Config::discover(cwd),
    }
}
