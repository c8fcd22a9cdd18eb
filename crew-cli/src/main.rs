//! crew: keep agent workspaces and the runtime config in line with a roster.
//!
//! # Usage
//!
//! ```text
//! crew sync   --agents <roster> [--workspace-root <dir>] [--config-path <file>]
//!             [--config-workspace-root <dir>] [--agents-md <file>] [--dry-run] [--json]
//! crew diff   --agents <roster> [same path flags as sync]
//! crew agents --agents <roster> [--json]
//! ```
//!
//! Set `VERCEL_AI_GATEWAY_API_KEY` or `AI_GATEWAY_API_KEY` to route model ids
//! through the AI gateway. Log verbosity follows `RUST_LOG` (default `info`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{agents::AgentsArgs, diff::DiffArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "crew",
    version,
    about = "Materialize agent workspaces and generate the agent runtime config",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write agent workspaces and the runtime config.
    Sync(SyncArgs),

    /// Show unified diff of what sync would write.
    Diff(DiffArgs),

    /// List roster entries with slug and model checks.
    Agents(AgentsArgs),
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

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Agents(args) => args.run(),
    }
}
