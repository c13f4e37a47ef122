//! Buyer agent
//!
//! Opens low, concedes a fixed fraction of the remaining distance to its
//! maximum each round, and accepts any ask at or under that maximum.

use crate::catalog::Listing;
use crate::config::BuyerConfig;
use crate::error::{HaggleError, Result};
use crate::negotiation::{FailureReason, Negotiation, Offer, OfferAction};
use crate::types::{AgentId, Party};
use rand::RngCore;

use super::{midpoint, pick, share_of, step_up, Negotiator};

pub struct BuyerAgent {
    config: BuyerConfig,
}

impl BuyerAgent {
    pub fn new(config: BuyerConfig) -> Self {
        Self { config }
    }

    pub fn budget(&self) -> u64 {
        self.config.budget
    }

    /// Highest price the buyer will pay for `listing` with the given budget
    pub fn max_offer(&self, listing: &Listing, budget: u64) -> u64 {
        let limit = self
            .config
            .category_limits
            .get(&listing.category)
            .copied()
            .unwrap_or(self.config.default_limit);

        share_of(listing.asking_price, limit).min(budget)
    }

    fn opening_bid(&self, negotiation: &Negotiation) -> u64 {
        share_of(negotiation.asking_price(), self.config.opening_fraction)
            .min(negotiation.buyer_max_offer())
    }

    /// The buyer's parting entry when a negotiation fails, at its standing bid
    ///
    /// `None` if the buyer never bid.
    pub fn closing_offer(
        &self,
        negotiation: &Negotiation,
        reason: FailureReason,
        rng: &mut dyn RngCore,
    ) -> Option<Offer> {
        let bid = negotiation.current_offer()?;
        let message = match reason {
            FailureReason::TimedOut => format!(
                "I'm out of time on this {}. Thanks for negotiating with me.",
                negotiation.item_title()
            ),
            FailureReason::RoundLimit | FailureReason::Stalemate => {
                self.message(negotiation, OfferAction::End, bid, rng)
            }
        };
        let offer = Offer::new(negotiation.round(), Party::Buyer, OfferAction::End, bid);
        Some(offer.with_message(message))
    }

    fn message(
        &self,
        negotiation: &Negotiation,
        action: OfferAction,
        price: u64,
        rng: &mut dyn RngCore,
    ) -> String {
        let title = negotiation.item_title();
        let templates = match action {
            OfferAction::Open => vec![format!(
                "Hi! I'm interested in your {}. Would you consider ${}?",
                title, price
            )],
            OfferAction::Counter => vec![
                format!("I can go up to ${}. That's a fair price!", price),
                format!("How about ${}? That's the best I can do.", price),
                format!("Meet me halfway at ${}?", price),
                format!("${} is my final offer for this quality item.", price),
            ],
            OfferAction::Accept => vec![format!(
                "Deal! I'll take it for ${}. When can we complete the transaction?",
                price
            )],
            OfferAction::End => vec![
                "I think we're too far apart on price. Thanks for negotiating with me.".to_string(),
                format!(
                    "${} was as high as I could go. Thanks for negotiating with me.",
                    price
                ),
            ],
        };
        pick(templates, rng)
    }
}

impl Negotiator for BuyerAgent {
    fn id(&self) -> &AgentId {
        &self.config.agent_id
    }

    fn party(&self) -> Party {
        Party::Buyer
    }

    fn act(
        &self,
        negotiation: &Negotiation,
        final_round: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Offer> {
        let max = negotiation.buyer_max_offer();
        // The listing is the seller's standing ask until it counters
        let ask = negotiation
            .current_ask()
            .unwrap_or(negotiation.asking_price());

        let (action, price) = if ask <= max {
            (OfferAction::Accept, ask)
        } else {
            match negotiation.current_offer() {
                None if final_round => (OfferAction::Open, max),
                None => (OfferAction::Open, self.opening_bid(negotiation)),
                Some(_) if negotiation.current_ask().is_none() => {
                    return Err(HaggleError::MissingOffer(format!(
                        "{}: no seller ask to respond to",
                        negotiation.id()
                    )))
                }
                Some(bid) => {
                    let next = if final_round {
                        max
                    } else {
                        step_up(bid, max, self.config.step_fraction)
                    };
                    let band = share_of(negotiation.asking_price(), self.config.convergence_band);
                    let next = if next.abs_diff(ask) <= band {
                        midpoint(next, ask).min(max)
                    } else {
                        next
                    };
                    (OfferAction::Counter, next)
                }
            }
        };

        let message = self.message(negotiation, action, price, rng);
        Ok(Offer::new(negotiation.round(), Party::Buyer, action, price).with_message(message))
    }
}
