//! Interactive offer selection

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};
use scout_lib::source::bid_price_for;
use scout_lib::{OfferSource, PricedOffer, SearchProfile};

use super::discover_offers;
use super::rent::commit;
use crate::output::{format_bid, print_info, print_warning};
use crate::tui;

/// Search, let the operator pick an offer, then rent it
pub async fn pick_offer(source: &dyn OfferSource, profile: &SearchProfile) -> Result<()> {
    let discovery = discover_offers(source, profile).await?;
    let offers = discovery.top(profile.result_limit);

    let selector = tui::run_picker(offers, profile, |priced| confirm_offer(priced, profile))?;

    match selector.rent_request(offers, profile) {
        Some(request) => {
            commit(source, &request?).await?;
            Ok(())
        }
        None => {
            print_warning("Selection cancelled");
            Ok(())
        }
    }
}

/// Line-mode yes/no prompt for the chosen offer
///
/// `None` means the operator quit with `q` or Esc.
fn confirm_offer(priced: &PricedOffer, profile: &SearchProfile) -> Result<Option<bool>> {
    let offer = &priced.offer;
    print_info(&format!(
        "Selected offer {} ({} x{} {}, est ${:.4}/h)",
        offer.id.as_deref().unwrap_or("N/A"),
        offer.display_gpu_name(),
        offer.num_gpus,
        offer.instance_type,
        priced.estimated_total_cost
    ));

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Rent this instance at {}? (q to quit)",
            format_bid(bid_price_for(offer, profile.bid_increment))
        ))
        .default(false)
        .wait_for_newline(true)
        .interact_opt()
        .map_err(Into::into)
}
