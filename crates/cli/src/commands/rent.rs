//! Instance creation

use anyhow::{Context, Result};
use scout_lib::{OfferSource, RentRequest, SearchProfile};

use crate::output::{format_bid, print_info, print_success};

/// Rent an offer by ID without searching first
pub async fn rent_offer(
    source: &dyn OfferSource,
    profile: &SearchProfile,
    id: String,
    bid_price: Option<f64>,
    disk: Option<u32>,
) -> Result<()> {
    let request = RentRequest {
        offer_id: id,
        disk_gb: disk.unwrap_or(profile.instance_disk_gb),
        bid_price,
    };
    commit(source, &request).await?;
    Ok(())
}

/// Issue one instance-creation call; failures are reported, never retried
///
/// Echoes and returns the marketplace's reply.
pub async fn commit(source: &dyn OfferSource, request: &RentRequest) -> Result<String> {
    print_info(&format!(
        "Creating instance for offer {} ({}, {}GB disk)...",
        request.offer_id,
        format_bid(request.bid_price),
        request.disk_gb
    ));

    let reply = source
        .create_instance(request)
        .await
        .with_context(|| format!("Failed to create instance for offer {}", request.offer_id))?;

    if !reply.is_empty() {
        println!("{}", reply);
    }
    print_success(&format!("Instance created from offer {}", request.offer_id));
    Ok(reply)
}
