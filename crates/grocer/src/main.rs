// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grocer - a Telegram grocery-list bot that learns what you buy.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use grocer_config::model::GrocerConfig;

/// Grocer - a grocery-list bot that learns what you buy.
#[derive(Parser, Debug)]
#[command(name = "grocer", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Run the bot: poll Telegram and fire the weekly suggestions.
    Serve,
    /// Send suggestions once and exit.
    Suggest {
        /// Only this chat; every registered chat when omitted.
        #[arg(long, allow_negative_numbers = true)]
        chat_id: Option<i64>,
    },
    /// Validate the configuration and print a summary.
    CheckConfig,
}

fn load_config(path: Option<&std::path::Path>) -> GrocerConfig {
    let loaded = match path {
        Some(path) => grocer_config::load_and_validate_path(path),
        None => grocer_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            grocer_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Suggest { chat_id }) => serve::run_suggest(config, chat_id).await,
        Some(Commands::CheckConfig) => {
            check::print_summary(&config);
            Ok(())
        }
        None => {
            println!("grocer: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("grocer: {e}");
        std::process::exit(1);
    }
}
