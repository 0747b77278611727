//! Hourly total-cost-of-ownership estimate
//!
//! The estimate is a single-hour heuristic used only to order offers:
//! base rental, plus the container's storage price amortized from a monthly
//! rate, plus the full price of a one-time download charged to that hour.

use crate::models::{non_negative, Offer, PricedOffer};
use crate::profile::HOURS_PER_MONTH;

/// Workload constants the estimate depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostParams {
    pub container_size_gb: f64,
    pub download_volume_gb: f64,
}

/// Estimated cost of the first rental hour, always finite and non-negative
pub fn estimate_hourly_cost(offer: &Offer, params: &CostParams) -> f64 {
    let base = offer.base_price();
    let storage = non_negative(params.container_size_gb) * non_negative(offer.storage_cost)
        / HOURS_PER_MONTH;
    let download = non_negative(params.download_volume_gb) * non_negative(offer.inet_down_cost);

    // Components are non-negative, so the only degenerate sum is an overflow
    (base + storage + download).min(f64::MAX)
}

/// Attach the estimate to every offer, keeping input order
pub fn price(offers: Vec<Offer>, params: &CostParams) -> Vec<PricedOffer> {
    offers
        .into_iter()
        .map(|offer| {
            let estimated_total_cost = estimate_hourly_cost(&offer, params);
            PricedOffer {
                offer,
                estimated_total_cost,
            }
        })
        .collect()
}
