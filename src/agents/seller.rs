//! Seller agent
//!
//! Opens at the listing's asking price, concedes toward its minimum by a
//! fraction of the remaining gap each round, and accepts any bid at or over
//! that minimum. Urgent listings concede faster.

use crate::catalog::Catalog;
use crate::config::SellerConfig;
use crate::error::{HaggleError, Result};
use crate::negotiation::{Negotiation, Offer, OfferAction};
use crate::types::{AgentId, Party};
use rand::RngCore;

use super::{midpoint, pick, share_of, step_down, Negotiator};

/// Sellers above this urgency use the motivated-seller phrasing
const URGENT: f64 = 0.6;

pub struct SellerAgent {
    config: SellerConfig,
    catalog: Catalog,
}

impl SellerAgent {
    pub fn new(config: SellerConfig, catalog: Catalog) -> Self {
        Self { config, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Share of the remaining gap conceded per round for this listing
    fn step_fraction(&self, negotiation: &Negotiation) -> f64 {
        let urgency = negotiation.seller_urgency();
        (self.config.step_fraction + urgency * self.config.urgency_weight).min(1.0)
    }

    fn message(
        &self,
        negotiation: &Negotiation,
        action: OfferAction,
        price: u64,
        bid: u64,
        rng: &mut dyn RngCore,
    ) -> String {
        let title = negotiation.item_title();
        let mut templates = if action == OfferAction::Accept {
            vec![
                format!("You've got a deal at ${}! When would you like to pick it up?", price),
                format!("${} works for me. This {} is yours!", price, title),
                format!("Sold! ${} it is. I'll hold it for you.", price),
            ]
        } else if price as f64 > bid as f64 * 1.1 {
            vec![
                format!(
                    "I appreciate the offer, but ${} is the best I can do. \
                     This {} is worth every penny!",
                    price, title
                ),
                format!(
                    "I can come down to ${}, but that's really pushing it for such a quality item.",
                    price
                ),
                format!("How about ${}? I've had a lot of interest in this {}.", price, title),
            ]
        } else {
            vec![
                format!("You're getting closer! I could do ${}. What do you think?", price),
                format!("Let's meet at ${} - that's a fair price for both of us.", price),
                format!(
                    "I'm willing to go to ${}. This {} won't last long at this price!",
                    price, title
                ),
            ]
        };

        if negotiation.seller_urgency() > URGENT && negotiation.round() >= 2 {
            templates.extend([
                format!("I'm motivated to sell, so ${} works for me.", price),
                format!("I need to move this quickly - ${} and it's yours today!", price),
                format!("${} and we have a deal. I'm ready to close this now.", price),
            ]);
        }

        pick(templates, rng)
    }
}

impl Negotiator for SellerAgent {
    fn id(&self) -> &AgentId {
        &self.config.agent_id
    }

    fn party(&self) -> Party {
        Party::Seller
    }

    fn act(
        &self,
        negotiation: &Negotiation,
        final_round: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Offer> {
        let min = negotiation.seller_min_price();
        let bid = negotiation.current_offer().ok_or_else(|| {
            HaggleError::MissingOffer(format!("{}: no buyer bid to respond to", negotiation.id()))
        })?;

        let (action, price) = if bid >= min {
            (OfferAction::Accept, bid)
        } else {
            let next = match negotiation.current_ask() {
                _ if final_round => min,
                None => negotiation.asking_price().max(min),
                Some(ask) => step_down(ask, min, self.step_fraction(negotiation)),
            };
            let band = share_of(negotiation.asking_price(), self.config.convergence_band);
            let next = if next.abs_diff(bid) <= band {
                midpoint(next, bid).max(min)
            } else {
                next
            };
            (OfferAction::Counter, next)
        };

        let message = self.message(negotiation, action, price, bid, rng);
        Ok(Offer::new(negotiation.round(), Party::Seller, action, price).with_message(message))
    }
}
