//! objsync CLI
//!
//! Runs sync scenarios against an in-process tally API.
//!
//! # Commands
//!
//! - `demo-currency` - Sync a read-only currency by lookup
//! - `demo-vendor` - Sync a vendor after its read-only location
//! - `sync-bill` - Sync a vendor bill and all its references
//!
//! Set `OBJSYNC_SLOWMO` to a number of milliseconds to pause after every
//! progress event.

mod commands;

use clap::{Parser, Subcommand};
use commands::Output;
use objsync_engine::{FailurePolicy, SyncConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the pause after each event, in milliseconds.
const SLOWMO_VAR: &str = "OBJSYNC_SLOWMO";

/// objsync command-line demos.
#[derive(Parser)]
#[command(name = "objsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(global = true, short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the CAD currency, a read-only entity found by ISO code
    DemoCurrency,

    /// Sync the Staples vendor, which depends on a read-only location
    DemoVendor,

    /// Sync a vendor bill with its vendor, accounts and line items
    SyncBill {
        /// Read the local bill from this JSON file instead of the sample
        #[arg(long)]
        file: Option<PathBuf>,

        /// Stop at the first failed entity
        #[arg(short, long)]
        abort: bool,

        /// Skip seeding the API's reference data
        #[arg(long)]
        no_seed: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let output: Output = cli.format.parse()?;
    let config = SyncConfig::new().with_step_delay(slowmo()?);

    match cli.command {
        Commands::DemoCurrency => commands::demo::currency(config, output)?,
        Commands::DemoVendor => commands::demo::vendor(config, output)?,
        Commands::SyncBill {
            file,
            abort,
            no_seed,
        } => {
            let config = if abort {
                config.with_failure_policy(FailurePolicy::Abort)
            } else {
                config
            };
            commands::sync_bill::run(file.as_deref(), !no_seed, config, output)?;
        }
        Commands::Version => {
            println!("objsync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn slowmo() -> Result<Duration, Box<dyn std::error::Error>> {
    match std::env::var(SLOWMO_VAR) {
        Ok(value) if !value.trim().is_empty() => {
            let millis: u64 = value
                .trim()
                .parse()
                .map_err(|_| format!("{SLOWMO_VAR} must be a number of milliseconds, got '{value}'"))?;
            Ok(Duration::from_millis(millis))
        }
        _ => Ok(Duration::ZERO),
    }
}
