//! Offer selection state machine
//!
//! Drives the interactive picker. The state machine only knows the number of
//! listed offers; the offers themselves stay owned by the caller and are
//! passed in by reference when a bid price has to be computed.

use crate::error::SourceError;
use crate::models::PricedOffer;
use crate::profile::SearchProfile;
use crate::source::{bid_price_for, RentRequest};

/// Keys the picker reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Quit,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    /// Moving through the list
    Browsing { cursor: usize },
    /// Waiting for the yes/no prompt on `offers[index]`
    Confirming { index: usize },
    /// Operator quit; terminal
    Cancelled,
    /// Operator confirmed; terminal
    Committed { index: usize, bid_price: Option<f64> },
}

impl SelectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Committed { .. })
    }
}

/// Cursor and confirmation state over `len` offers
#[derive(Debug, Clone)]
pub struct Selector {
    len: usize,
    state: SelectionState,
}

impl Selector {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            state: SelectionState::Browsing { cursor: 0 },
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Row to highlight
    pub fn cursor(&self) -> usize {
        match self.state {
            SelectionState::Browsing { cursor } => cursor,
            SelectionState::Confirming { index } | SelectionState::Committed { index, .. } => index,
            SelectionState::Cancelled => 0,
        }
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: Key) -> &SelectionState {
        if self.state.is_terminal() {
            return &self.state;
        }

        let next = match (&self.state, key) {
            (_, Key::Quit) => SelectionState::Cancelled,
            (SelectionState::Browsing { cursor }, Key::Up) => SelectionState::Browsing {
                cursor: cursor.saturating_sub(1),
            },
            (SelectionState::Browsing { cursor }, Key::Down) => SelectionState::Browsing {
                cursor: (cursor + 1).min(self.len.saturating_sub(1)),
            },
            (SelectionState::Browsing { cursor }, Key::Enter) if self.len > 0 => {
                SelectionState::Confirming { index: *cursor }
            }
            (state, _) => state.clone(),
        };

        self.state = next;
        &self.state
    }

    /// Resolve the yes/no prompt
    ///
    /// Yes commits, bidding `base + increment` for interruptible offers.
    /// No returns to browsing with the cursor on the same offer.
    pub fn confirm(&mut self, accepted: bool, offers: &[PricedOffer], bid_increment: f64) -> &SelectionState {
        if let SelectionState::Confirming { index } = self.state {
            self.state = match (accepted, offers.get(index)) {
                (true, Some(priced)) => SelectionState::Committed {
                    index,
                    bid_price: bid_price_for(&priced.offer, bid_increment),
                },
                _ => SelectionState::Browsing { cursor: index },
            };
        }

        &self.state
    }

    /// Instance-creation request for a committed selection
    ///
    /// `None` unless the selection was committed; a cancelled picker never
    /// produces a request.
    pub fn rent_request(
        &self,
        offers: &[PricedOffer],
        profile: &SearchProfile,
    ) -> Option<Result<RentRequest, SourceError>> {
        match self.state {
            SelectionState::Committed { index, bid_price } => {
                let priced = offers.get(index)?;
                Some(RentRequest::for_offer(&priced.offer, profile).map(|request| RentRequest {
                    bid_price,
                    ..request
                }))
            }
            _ => None,
        }
    }
}
