//! GPU offer discovery library
//!
//! This crate provides the core functionality for:
//! - Querying the marketplace for on-demand and interruptible offers
//! - Estimating an hourly total cost of ownership per offer
//! - Ranking and formatting offers for display
//! - The keyboard selection state machine used by the interactive picker

pub mod cost;
pub mod error;
pub mod format;
pub mod models;
pub mod pipeline;
pub mod profile;
pub mod rank;
pub mod selection;
pub mod source;

pub use cost::{estimate_hourly_cost, price, CostParams};
pub use error::{ScoutError, SourceError};
pub use models::*;
pub use pipeline::{discover, Discovery};
pub use profile::SearchProfile;
pub use rank::{rank, top_n};
pub use selection::{Key, SelectionState, Selector};
pub use source::{OfferSource, RentRequest, VastCli};
