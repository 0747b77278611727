//! Search → price → rank

use tracing::info;

use crate::cost::price;
use crate::error::ScoutError;
use crate::models::PricedOffer;
use crate::profile::SearchProfile;
use crate::rank::{rank, top_n};
use crate::source::{search_all, OfferSource};

/// Ranked offers from both categories
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Every offer, cheapest first
    pub ranked: Vec<PricedOffer>,
    pub on_demand: usize,
    pub interruptible: usize,
}

impl Discovery {
    /// The cheapest `limit` offers
    pub fn top(&self, limit: usize) -> &[PricedOffer] {
        top_n(&self.ranked, limit)
    }
}

/// Query both categories, estimate costs and rank
///
/// Fails with [`ScoutError::NoOffers`] when nothing survives, whether both
/// queries failed or both came back empty.
pub async fn discover(source: &dyn OfferSource, profile: &SearchProfile) -> Result<Discovery, ScoutError> {
    let results = search_all(source, profile).await;
    let on_demand = results.on_demand.offers.len();
    let interruptible = results.interruptible.offers.len();

    if results.total() == 0 {
        if results.all_failed() {
            info!("Both marketplace queries failed");
        }
        return Err(ScoutError::NoOffers);
    }

    info!(
        total = on_demand + interruptible,
        on_demand, interruptible, "Ranking offers"
    );

    let priced = price(results.merged(), &profile.cost_params());
    Ok(Discovery {
        ranked: rank(priced),
        on_demand,
        interruptible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstanceCategory;
    use crate::source::testing::{offer, StaticSource};

    #[tokio::test]
    async fn test_both_categories_failing_is_no_offers() {
        let source = StaticSource::default()
            .failing(InstanceCategory::OnDemand)
            .failing(InstanceCategory::Interruptible);

        let result = discover(&source, &SearchProfile::general()).await;
        assert!(matches!(result, Err(ScoutError::NoOffers)));
        assert_eq!(
            ScoutError::NoOffers.to_string(),
            "No offers found matching criteria"
        );
    }

    #[tokio::test]
    async fn test_one_failing_category_still_ranks() {
        let source = StaticSource::default()
            .failing(InstanceCategory::OnDemand)
            .with(
                InstanceCategory::Interruptible,
                vec![offer("a", "RTX 4090", 0.9), offer("b", "RTX 3090", 0.3)],
            );

        let discovery = discover(&source, &SearchProfile::general()).await.unwrap();
        assert_eq!(discovery.on_demand, 0);
        assert_eq!(discovery.interruptible, 2);
        assert_eq!(discovery.ranked[0].offer.id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_ranks_across_categories_with_stable_ties() {
        let source = StaticSource::default()
            .with(
                InstanceCategory::OnDemand,
                vec![offer("od-1", "A100", 0.5), offer("od-2", "A100", 0.2)],
            )
            .with(
                InstanceCategory::Interruptible,
                vec![offer("bid-1", "A100", 0.5), offer("bid-2", "A100", 0.1)],
            );

        let discovery = discover(&source, &SearchProfile::general()).await.unwrap();
        let ids: Vec<_> = discovery
            .ranked
            .iter()
            .map(|p| p.offer.id.clone().unwrap())
            .collect();
        assert_eq!(ids, ["bid-2", "od-2", "od-1", "bid-1"]);
        assert_eq!(discovery.top(2).len(), 2);
        assert_eq!(discovery.top(10).len(), 4);
    }
}
