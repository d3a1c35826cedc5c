// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging; RUST_LOG takes precedence
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Publish {
            file,
            repo,
            storage,
            timeout,
        } => {
            // Storage calls run one after another; no worker threads needed
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(commands::cmd_publish(
                &config, &file, repo, storage, timeout,
            ))
        }
        Commands::Inspect { file, repo } => commands::cmd_inspect(&config, &file, repo),
        Commands::Completions { shell } => {
            commands::cmd_completions(shell);
            Ok(())
        }
    }
}
