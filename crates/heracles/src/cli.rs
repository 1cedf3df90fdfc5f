use std::io::{self, Write};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::check::{CheckArgs, run_check};
use crate::error::Result;
use crate::hyphenate::{HyphenateArgs, run_hyphenate};
use crate::train::{TrainArgs, run_train};

#[derive(Debug, Parser)]
#[command(
    name = "heracles",
    about = "Generate, apply and check Liang hyphenation patterns",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Learn patterns from a hyphenated word list.
    Train(TrainArgs),

    /// Hyphenate words with a pattern file.
    Hyphenate(HyphenateArgs),

    /// Compare a pattern file against a hyphenated word list.
    Check(CheckArgs),
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run_from_env() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Train(args) => run_train(args, out),
        Commands::Hyphenate(args) => run_hyphenate(args, out),
        Commands::Check(args) => run_check(args, out),
    }
}
