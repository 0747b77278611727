//! GPU Scout CLI
//!
//! Searches the vast.ai marketplace for on-demand and interruptible GPU
//! offers, ranks them by an estimated hourly cost and rents the one the
//! operator picks.

mod commands;
mod config;
mod output;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{list, pick, rent};
use scout_lib::{SearchProfile, VastCli};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// GPU Scout CLI
#[derive(Parser)]
#[command(name = "gpu-scout")]
#[command(author, version, about = "Find, rank and rent GPU offers on vast.ai", long_about = None)]
pub struct Cli {
    /// Search profile (default, h100)
    #[arg(long, short, global = true, default_value = "default", value_parser = parse_profile)]
    pub profile: SearchProfile,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pick an offer interactively and rent it
    Pick,

    /// Print the ranked offers
    List {
        /// Number of offers to show (defaults to the profile's limit)
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// Rent a known offer directly
    Rent {
        /// Offer ID to rent
        id: String,

        /// Bid price in $/h, required for interruptible offers
        #[arg(long)]
        bid_price: Option<f64>,

        /// Disk size in GB (defaults to the profile's disk size)
        #[arg(long)]
        disk: Option<u32>,
    },
}

fn parse_profile(name: &str) -> std::result::Result<SearchProfile, String> {
    SearchProfile::from_name(name).ok_or_else(|| format!("unknown profile `{}` (expected default or h100)", name))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };

    // Logs go to stderr so tables and JSON on stdout stay clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tui::install_panic_hook();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::ScoutConfig::load()?;
    debug!(program = %config.vastai_bin, profile = cli.profile.name, "Configured");

    let source = VastCli::new(&config.template_hash).with_program(&config.vastai_bin);

    match cli.command {
        Commands::Pick => {
            pick::pick_offer(&source, &cli.profile).await?;
        }
        Commands::List { limit } => {
            list::list_offers(&source, &cli.profile, limit, cli.format).await?;
        }
        Commands::Rent { id, bid_price, disk } => {
            rent::rent_offer(&source, &cli.profile, id, bid_price, disk).await?;
        }
    }

    Ok(())
}
