//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use scout_lib::format::{offer_rows, OfferRow};
use scout_lib::{PricedOffer, SearchProfile};
use tabled::{settings::Style, Table};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print ranked offers as a table or JSON
pub fn print_offers(offers: &[PricedOffer], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            if offers.is_empty() {
                println!("{}", "No offers found".yellow());
                return Ok(());
            }
            let rows: Vec<OfferRow> = offer_rows(offers);
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(offers)?);
        }
    }
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Print a progress message to stderr
pub fn print_status(message: &str) {
    eprintln!("{} {}", "…".cyan().bold(), message);
}

/// Explanatory lines shown under the offer table
pub fn legend_lines(profile: &SearchProfile) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Est$/h = base rental (1h) + storage ({}GB for 1h) + download ({}GB one-time)",
            profile.container_size_gb, profile.download_volume_gb
        ),
        format!(
            "BID offers are rented with --bid_price = base + {:.2}",
            profile.bid_increment
        ),
    ];
    if !profile.target_gpu_keywords.is_empty() {
        lines.push(format!(
            "Only GPUs matching: {}",
            profile.target_gpu_keywords.join(", ")
        ));
    }
    if !profile.exclude_gpu_names.is_empty() {
        lines.push(format!(
            "Filtered out: {}",
            profile.exclude_gpu_names.join(", ")
        ));
    }
    lines
}

/// Format a bid price for messages
pub fn format_bid(bid_price: Option<f64>) -> String {
    match bid_price {
        Some(bid) => format!("bid ${:.4}/h", bid),
        None => "on-demand price".to_string(),
    }
}
