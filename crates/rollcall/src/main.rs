// SPDX-FileCopyrightText: 2026 Rollcall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rollcall - a stateless SMS RSVP coordinator.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rollcall_config::RollcallConfig;

/// Rollcall - SMS RSVP coordination over a distribution list.
#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the webhook server (default).
    Serve,
    /// Validate configuration and print a summary.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Option<RollcallConfig> {
    let loaded = match path {
        Some(path) => rollcall_config::load_and_validate_path(path),
        None => rollcall_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            rollcall_config::render_errors(&errors);
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(config) = load_config(cli.config.as_ref()) else {
        std::process::exit(1);
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => {
            print!("{}", check::summary(&config));
            if let Err(errors) = rollcall_config::validate_credentials(&config) {
                rollcall_config::render_errors(&errors);
                std::process::exit(1);
            }
            println!("configuration OK");
        }
    }
}
