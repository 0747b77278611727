//! Non-interactive offer listing

use anyhow::Result;
use colored::Colorize;
use scout_lib::{OfferSource, SearchProfile};

use super::discover_offers;
use crate::output::{legend_lines, print_offers, OutputFormat};

/// Print the cheapest offers for `profile`
pub async fn list_offers(
    source: &dyn OfferSource,
    profile: &SearchProfile,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let discovery = discover_offers(source, profile).await?;
    let top = discovery.top(limit.unwrap_or(profile.result_limit));

    match format {
        OutputFormat::Json => print_offers(top, format)?,
        OutputFormat::Table => {
            println!(
                "{}",
                format!(
                    "Top {} of {} offers (sorted by estimated hourly cost)",
                    top.len(),
                    discovery.ranked.len()
                )
                .bold()
            );
            print_offers(top, format)?;
            println!();
            for line in legend_lines(profile) {
                println!("{}", line.dimmed());
            }
        }
    }

    Ok(())
}
