//! Offer sources
//!
//! The marketplace is reached through an external tool. `OfferSource` is the
//! seam between that tool and the rest of the pipeline: `VastCli` shells out
//! to `vastai`, tests substitute an in-memory source.

mod vastai;

pub use vastai::{parse_offers, VastCli, DEFAULT_PROGRAM};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::SourceError;
use crate::models::{InstanceCategory, Offer};
use crate::profile::SearchProfile;

/// Marketplace query and instance-creation capability
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Run one categorical query and return every offer it produced
    async fn fetch(&self, category: InstanceCategory, query: &str) -> Result<Vec<Offer>, SourceError>;

    /// Ask the marketplace to create an instance; never retried
    ///
    /// Returns what the marketplace reported back, such as the new contract id.
    async fn create_instance(&self, request: &RentRequest) -> Result<String, SourceError>;
}

/// Arguments for instance creation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentRequest {
    pub offer_id: String,
    pub disk_gb: u32,
    /// Required for interruptible offers, absent for on-demand ones
    pub bid_price: Option<f64>,
}

impl RentRequest {
    /// Build the request for a listed offer
    ///
    /// Interruptible offers bid `base price + bid increment`.
    pub fn for_offer(offer: &Offer, profile: &SearchProfile) -> Result<Self, SourceError> {
        let offer_id = offer.id.clone().ok_or(SourceError::MissingId)?;
        Ok(Self {
            offer_id,
            disk_gb: profile.instance_disk_gb,
            bid_price: bid_price_for(offer, profile.bid_increment),
        })
    }
}

/// Bid for an interruptible offer, `None` for on-demand
pub fn bid_price_for(offer: &Offer, increment: f64) -> Option<f64> {
    match offer.instance_type {
        InstanceCategory::Interruptible => Some(offer.base_price() + increment),
        InstanceCategory::OnDemand => None,
    }
}

/// Result of one categorical query after recovery
#[derive(Debug, Clone)]
pub struct CategoryResult {
    pub category: InstanceCategory,
    pub offers: Vec<Offer>,
    /// Set when the query failed and was treated as empty
    pub error: Option<String>,
}

impl CategoryResult {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Both categories, joined
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub on_demand: CategoryResult,
    pub interruptible: CategoryResult,
}

impl SearchResults {
    /// On-demand offers first, then interruptible ones
    pub fn merged(self) -> Vec<Offer> {
        let mut offers = self.on_demand.offers;
        offers.extend(self.interruptible.offers);
        offers
    }

    pub fn total(&self) -> usize {
        self.on_demand.offers.len() + self.interruptible.offers.len()
    }

    pub fn all_failed(&self) -> bool {
        self.on_demand.failed() && self.interruptible.failed()
    }
}

/// Query one category and apply the profile's GPU filters
///
/// A failed query is logged and yields no offers, so the other category can
/// still be used.
pub async fn search(
    source: &dyn OfferSource,
    category: InstanceCategory,
    profile: &SearchProfile,
) -> CategoryResult {
    info!(%category, profile = profile.name, "Searching offers");

    match source.fetch(category, &profile.query()).await {
        Ok(offers) => {
            let fetched = offers.len();
            let offers: Vec<Offer> = offers
                .into_iter()
                .filter(|offer| profile.allows_gpu(offer.gpu_name.as_deref().unwrap_or("")))
                .map(|offer| Offer {
                    instance_type: category,
                    ..offer
                })
                .collect();

            info!(%category, fetched, kept = offers.len(), "Search complete");
            CategoryResult {
                category,
                offers,
                error: None,
            }
        }
        Err(e) => {
            warn!(%category, error = %e, "Search failed, treating category as empty");
            CategoryResult {
                category,
                offers: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Query both categories concurrently and wait for both
pub async fn search_all(source: &dyn OfferSource, profile: &SearchProfile) -> SearchResults {
    let (on_demand, interruptible) = tokio::join!(
        search(source, InstanceCategory::OnDemand, profile),
        search(source, InstanceCategory::Interruptible, profile),
    );

    SearchResults {
        on_demand,
        interruptible,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory source for pipeline tests

    use super::*;
    use crate::models::RawOffer;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct StaticSource {
        pub responses: HashMap<InstanceCategory, Result<Vec<Offer>, String>>,
        pub queries: Mutex<Vec<(InstanceCategory, String)>>,
        pub rentals: Mutex<Vec<RentRequest>>,
        pub fail_rent: Option<String>,
    }

    impl StaticSource {
        pub fn with(mut self, category: InstanceCategory, offers: Vec<Offer>) -> Self {
            self.responses.insert(category, Ok(offers));
            self
        }

        pub fn failing(mut self, category: InstanceCategory) -> Self {
            self.responses
                .insert(category, Err("exit status: 1".to_string()));
            self
        }
    }

    #[async_trait]
    impl OfferSource for StaticSource {
        async fn fetch(&self, category: InstanceCategory, query: &str) -> Result<Vec<Offer>, SourceError> {
            self.queries
                .lock()
                .unwrap()
                .push((category, query.to_string()));

            match self.responses.get(&category) {
                Some(Ok(offers)) => Ok(offers.clone()),
                Some(Err(stderr)) => Err(SourceError::ExitStatus {
                    program: "vastai".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: stderr.clone(),
                }),
                None => Ok(Vec::new()),
            }
        }

        async fn create_instance(&self, request: &RentRequest) -> Result<String, SourceError> {
            self.rentals.lock().unwrap().push(request.clone());
            match &self.fail_rent {
                Some(stderr) => Err(SourceError::ExitStatus {
                    program: "vastai".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: stderr.clone(),
                }),
                None => Ok(format!("Started. new_contract {}", request.offer_id)),
            }
        }
    }

    pub fn offer(id: &str, gpu_name: &str, dph: f64) -> Offer {
        let raw = RawOffer {
            id: Some(id.to_string()),
            gpu_name: Some(gpu_name.to_string()),
            dph: Some(dph),
            ..RawOffer::default()
        };
        Offer::from_raw(raw, InstanceCategory::OnDemand)
    }
}
