//! CLI subcommands

pub mod list;
pub mod pick;
pub mod rent;

use anyhow::Result;
use scout_lib::{discover, Discovery, OfferSource, SearchProfile};

use crate::output::print_status;

/// Search both categories and rank the results, reporting progress on stderr
pub async fn discover_offers(source: &dyn OfferSource, profile: &SearchProfile) -> Result<Discovery> {
    print_status(&format!(
        "Searching on-demand and interruptible offers (profile: {})...",
        profile.name
    ));

    let discovery = discover(source, profile).await?;

    print_status(&format!(
        "Found {} total offers ({} on-demand, {} interruptible)",
        discovery.ranked.len(),
        discovery.on_demand,
        discovery.interruptible
    ));

    Ok(discovery)
}
