//! A single negotiation record

use crate::catalog::Listing;
use crate::error::{HaggleError, Result};
use crate::types::{AgentId, ItemId, NegotiationId, Party};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{FailureReason, NegotiationStatus, Offer, OfferAction};

/// The full exchange between one buyer and one seller over one item
///
/// Every offer goes through [`Negotiation::record`], which enforces the price
/// bounds: buyer prices never exceed `buyer_max_offer`, seller prices never
/// fall below `seller_min_price`, and an accepted price lies between both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Negotiation {
    id: NegotiationId,
    item_id: ItemId,
    item_title: String,
    asking_price: u64,
    buyer_id: AgentId,
    seller_id: AgentId,
    buyer_max_offer: u64,
    seller_min_price: u64,
    #[serde(default)]
    seller_urgency: f64,
    round: u32,
    status: NegotiationStatus,
    #[serde(default)]
    history: Vec<Offer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    final_price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_reason: Option<FailureReason>,
    started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ended_at: Option<DateTime<Utc>>,
}

impl Negotiation {
    /// Create an active negotiation over `listing`
    pub fn new(
        id: NegotiationId,
        listing: &Listing,
        buyer_id: AgentId,
        seller_id: AgentId,
        buyer_max_offer: u64,
    ) -> Self {
        Self {
            id,
            item_id: listing.id.clone(),
            item_title: listing.title.clone(),
            asking_price: listing.asking_price,
            buyer_id,
            seller_id,
            buyer_max_offer,
            seller_min_price: listing.minimum_price,
            seller_urgency: listing.urgency,
            round: 0,
            status: NegotiationStatus::Active,
            history: Vec::new(),
            final_price: None,
            failure_reason: None,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn id(&self) -> &NegotiationId {
        &self.id
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn item_title(&self) -> &str {
        &self.item_title
    }

    pub fn asking_price(&self) -> u64 {
        self.asking_price
    }

    pub fn buyer_max_offer(&self) -> u64 {
        self.buyer_max_offer
    }

    pub fn seller_min_price(&self) -> u64 {
        self.seller_min_price
    }

    /// How keen the seller is to close, in [0, 1]
    pub fn seller_urgency(&self) -> f64 {
        self.seller_urgency
    }

    /// Index of the round in progress, 0 before the first round
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn status(&self) -> NegotiationStatus {
        self.status
    }

    pub fn history(&self) -> &[Offer] {
        &self.history
    }

    pub fn final_price(&self) -> Option<u64> {
        self.final_price
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        self.failure_reason
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Latest offer made by `party`
    pub fn latest_from(&self, party: Party) -> Option<&Offer> {
        self.history.iter().rev().find(|o| o.party == party)
    }

    /// The buyer's standing bid
    pub fn current_offer(&self) -> Option<u64> {
        self.latest_from(Party::Buyer).map(|o| o.price)
    }

    /// The seller's standing ask
    pub fn current_ask(&self) -> Option<u64> {
        self.latest_from(Party::Seller).map(|o| o.price)
    }

    /// Advance to the next round and return its index
    pub fn begin_round(&mut self) -> Result<u32> {
        self.ensure_active("begin a round")?;
        self.round += 1;
        Ok(self.round)
    }

    /// Append an offer to the history
    ///
    /// An accepting offer closes the negotiation as agreed at its price.
    pub fn record(&mut self, offer: Offer) -> Result<()> {
        self.ensure_active("record an offer")?;
        if offer.action == OfferAction::End {
            return Err(HaggleError::InvalidStateTransition(format!(
                "{}: closing offers are recorded by fail_with",
                self.id
            )));
        }
        self.check_bounds(&offer)?;

        if offer.is_accept() {
            let standing = match offer.party.counterparty() {
                Party::Seller => self.current_ask().unwrap_or(self.asking_price),
                Party::Buyer => self.current_offer().ok_or_else(|| {
                    HaggleError::MissingOffer(format!("{}: no buyer bid to accept", self.id))
                })?,
            };
            if standing != offer.price {
                return Err(HaggleError::InvalidStateTransition(format!(
                    "{}: accepted {} but the standing {} price is {}",
                    self.id,
                    offer.price,
                    offer.party.counterparty(),
                    standing
                )));
            }

            self.status = NegotiationStatus::Agreed;
            self.final_price = Some(offer.price);
            self.ended_at = Some(offer.timestamp);
        }

        self.history.push(offer);
        Ok(())
    }

    /// Close the negotiation without a deal
    pub fn fail(&mut self, reason: FailureReason) -> Result<()> {
        self.ensure_active("fail")?;
        self.status = NegotiationStatus::Failed;
        self.failure_reason = Some(reason);
        self.ended_at = Some(Utc::now());
        Ok(())
    }

    /// Close the negotiation without a deal, recording `closing` as the last
    /// entry of the history
    pub fn fail_with(&mut self, reason: FailureReason, closing: Offer) -> Result<()> {
        self.ensure_active("fail")?;
        if closing.action != OfferAction::End {
            return Err(HaggleError::InvalidStateTransition(format!(
                "{}: closing offer must be an end, got {}",
                self.id, closing.action
            )));
        }
        self.check_bounds(&closing)?;

        self.history.push(closing);
        self.fail(reason)
    }

    /// True when neither party moved its price over the last full round
    pub fn is_stalled(&self) -> bool {
        let stuck = |party: Party| {
            let mut prices = self
                .history
                .iter()
                .rev()
                .filter(|o| o.party == party)
                .filter(|o| matches!(o.action, OfferAction::Open | OfferAction::Counter))
                .map(|o| o.price);
            match (prices.next(), prices.next()) {
                (Some(last), Some(previous)) => last == previous,
                _ => false,
            }
        };
        stuck(Party::Buyer) && stuck(Party::Seller)
    }

    fn ensure_active(&self, what: &str) -> Result<()> {
        if self.status.is_terminal() {
            return Err(HaggleError::InvalidStateTransition(format!(
                "{}: cannot {} once {:?}",
                self.id, what, self.status
            )));
        }
        Ok(())
    }

    fn check_bounds(&self, offer: &Offer) -> Result<()> {
        let violation = |bound| HaggleError::BoundViolation {
            party: offer.party,
            price: offer.price,
            bound,
        };

        match offer.party {
            Party::Buyer if offer.price > self.buyer_max_offer => {
                return Err(violation(self.buyer_max_offer))
            }
            Party::Seller if offer.price < self.seller_min_price => {
                return Err(violation(self.seller_min_price))
            }
            _ => {}
        }

        if offer.is_accept() {
            if offer.price > self.buyer_max_offer {
                return Err(violation(self.buyer_max_offer));
            }
            if offer.price < self.seller_min_price {
                return Err(violation(self.seller_min_price));
            }
        }
        Ok(())
    }
}
