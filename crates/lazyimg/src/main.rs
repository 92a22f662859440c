//! lazyimg CLI - deferred image loading for HTML content.
//!
//! Provides commands for:
//! - `rewrite`: Rewrite one HTML fragment (file or stdin)
//! - `batch`: Rewrite every file matching a glob pattern in place

mod commands;
mod error;
mod output;
mod script;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BatchArgs, RewriteArgs};
use output::Output;

/// lazyimg - deferred image loading for HTML content.
#[derive(Parser)]
#[command(name = "lazyimg", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite image tags in one HTML fragment.
    Rewrite(RewriteArgs),
    /// Rewrite image tags in every matching file, in place.
    Batch(BatchArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Rewrite(args) => args.settings.verbose,
            Self::Batch(args) => args.settings.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Rewrite(args) => args.execute(),
        Commands::Batch(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
