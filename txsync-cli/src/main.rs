//! txsync: sync review metadata and tags from the main Transifex project
//! into a release project.
//!
//! # Usage
//!
//! ```text
//! txsync sync <release_name> [--resource <slug>] [--language <code>] [--dry-run] [--json]
//! txsync plan <release_name> [--resource <slug>] [--language <code>]
//! ```
//!
//! The API token comes from `TRANSIFEX_API_TOKEN` or `~/.transifexrc`.
//! Log verbosity follows `RUST_LOG` (default `info`), written to stderr.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{plan::PlanArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "txsync",
    version,
    about = "Sync review status and tags from the main Transifex project into a release project",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Propagate reviewed/proofread flags and tags into the release project.
    Sync(SyncArgs),

    /// Resolve projects, languages and resource pairs without syncing.
    Plan(PlanArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Plan(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
