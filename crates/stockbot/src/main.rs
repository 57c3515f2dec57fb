// SPDX-FileCopyrightText: 2026 Stockbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stockbot - a WhatsApp inventory assistant.
//!
//! This is the binary entry point.

mod check;
mod init;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stockbot_config::StockbotConfig;

/// Stockbot - a WhatsApp inventory assistant.
#[derive(Parser, Debug)]
#[command(name = "stockbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve,
    /// Check configuration, credentials, inventory and cache.
    Check {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Write a sample inventory and config template.
    Init {
        /// Directory to write into.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

fn load_config_or_exit() -> StockbotConfig {
    match stockbot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            stockbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let config = load_config_or_exit();
            if let Err(errors) = stockbot_config::require_credentials(&config) {
                stockbot_config::render_errors(&errors);
                std::process::exit(1);
            }
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("stockbot: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Check { plain }) => {
            let config = load_config_or_exit();
            if !check::run_check(&config, plain).await {
                std::process::exit(1);
            }
        }
        Some(Commands::Init { dir }) => {
            if let Err(e) = init::run_init(&dir).await {
                eprintln!("stockbot: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("stockbot: use --help for available commands");
        }
    }
}
