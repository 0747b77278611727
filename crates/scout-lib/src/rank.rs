//! Offer ranking

use crate::models::PricedOffer;

/// Sort ascending by estimated cost
///
/// The sort is stable: offers with equal cost keep their merged order.
pub fn rank(mut offers: Vec<PricedOffer>) -> Vec<PricedOffer> {
    offers.sort_by(|a, b| a.estimated_total_cost.total_cmp(&b.estimated_total_cost));
    offers
}

/// The first `n` ranked offers, or all of them if there are fewer
pub fn top_n(ranked: &[PricedOffer], n: usize) -> &[PricedOffer] {
    &ranked[..n.min(ranked.len())]
}
