//! Negotiation runner: alternates buyer and seller turns over the shared state

use crate::agents::{BuyerAgent, Negotiator, SellerAgent};
use crate::catalog::Listing;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::state::StateStore;
use crate::types::{ItemId, NegotiationId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tokio::time::Instant;

use super::session::Negotiation;
use super::types::{FailureReason, NegotiationStatus};

/// Drives negotiations round by round, persisting after every round
pub struct NegotiationRunner {
    store: StateStore,
    buyer: BuyerAgent,
    seller: SellerAgent,
    max_rounds: u32,
    round_delay: Duration,
    rng: StdRng,
}

impl NegotiationRunner {
    /// Create a runner from configuration
    pub fn new(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            store: StateStore::new(&config.state_file),
            buyer: BuyerAgent::new(config.buyer.clone()),
            seller: SellerAgent::new(config.seller.clone(), config.catalog.clone()),
            max_rounds: config.max_rounds,
            round_delay: config.round_delay(),
            rng,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn buyer(&self) -> &BuyerAgent {
        &self.buyer
    }

    pub fn seller(&self) -> &SellerAgent {
        &self.seller
    }

    /// Register a negotiation for a catalogue item with the given budget
    pub fn start(&mut self, item_id: &ItemId, budget: u64) -> Result<NegotiationId> {
        let listing = self.seller.catalog().get(item_id)?.clone();
        let buyer_max = self.buyer.max_offer(&listing, budget);
        self.register(&listing, buyer_max)
    }

    /// Register a negotiation with an explicit buyer maximum
    pub fn register(&mut self, listing: &Listing, buyer_max: u64) -> Result<NegotiationId> {
        listing.validate()?;

        let id = NegotiationId::generate(&listing.id, self.buyer.id());
        let negotiation = Negotiation::new(
            id.clone(),
            listing,
            self.buyer.id().clone(),
            self.seller.id().clone(),
            buyer_max,
        );

        let mut state = self.store.load();
        state.put(negotiation);
        self.store.save(&state)?;

        tracing::info!(
            "Started negotiation {} for {}: asking ${}, buyer max ${}",
            id,
            listing.title,
            listing.asking_price,
            buyer_max
        );

        Ok(id)
    }

    /// Play one round of `id` and persist the result
    pub fn step(&mut self, id: &NegotiationId) -> Result<Negotiation> {
        let mut state = self.store.load();
        let mut negotiation = state.take_active(id)?;

        self.play_round(&mut negotiation)?;

        state.put(negotiation.clone());
        self.store.save(&state)?;
        Ok(negotiation)
    }

    /// Force an active negotiation to end without a deal
    pub fn expire(&mut self, id: &NegotiationId, reason: FailureReason) -> Result<Negotiation> {
        let mut state = self.store.load();
        let mut negotiation = state.take_active(id)?;

        self.close(&mut negotiation, reason)?;

        state.put(negotiation.clone());
        self.store.save(&state)?;
        Ok(negotiation)
    }

    /// Step `id` until it terminates or `deadline` passes
    pub async fn run(&mut self, id: &NegotiationId, deadline: Instant) -> Result<Negotiation> {
        loop {
            if Instant::now() >= deadline {
                return self.expire(id, FailureReason::TimedOut);
            }

            let negotiation = self.step(id)?;
            if !negotiation.is_active() {
                return Ok(negotiation);
            }

            tokio::time::sleep(self.round_delay).await;
        }
    }

    /// Run every active negotiation, one round each per pass, until none
    /// remain or `deadline` passes
    ///
    /// Errors on individual negotiations are logged and the negotiation is
    /// dropped from the pass; they never abort the run.
    pub async fn run_all(&mut self, deadline: Instant) -> Result<Vec<Negotiation>> {
        let mut finished = Vec::new();
        let mut pending = self.store.load().active_ids();

        while !pending.is_empty() {
            let timed_out = Instant::now() >= deadline;
            let mut still_active = Vec::with_capacity(pending.len());

            for id in pending {
                let result = if timed_out {
                    self.expire(&id, FailureReason::TimedOut)
                } else {
                    self.step(&id)
                };

                match result {
                    Ok(negotiation) if negotiation.is_active() => still_active.push(id),
                    Ok(negotiation) => finished.push(negotiation),
                    Err(e) => tracing::warn!("Dropping negotiation {}: {}", id, e),
                }
            }

            pending = still_active;
            if !pending.is_empty() {
                tokio::time::sleep(self.round_delay).await;
            }
        }

        Ok(finished)
    }

    /// Buyer moves, then seller; then check the stopping conditions
    fn play_round(&mut self, negotiation: &mut Negotiation) -> Result<()> {
        let round = negotiation.begin_round()?;
        let final_round = round >= self.max_rounds;

        let agents: [&dyn Negotiator; 2] = [&self.buyer, &self.seller];
        for agent in agents {
            let offer = match agent.act(negotiation, final_round, &mut self.rng) {
                Ok(offer) => offer,
                Err(e) => {
                    tracing::warn!(
                        "{} skipped round {} of {}: {}",
                        agent.party(),
                        round,
                        negotiation.id(),
                        e
                    );
                    continue;
                }
            };

            let (party, action, price) = (offer.party, offer.action, offer.price);
            tracing::debug!("{}: {}", party, offer.message);

            if let Err(e) = negotiation.record(offer) {
                tracing::warn!("Rejected {} offer on {}: {}", party, negotiation.id(), e);
                continue;
            }

            tracing::info!(
                "{} {} ${} for {} (Round {})",
                party,
                action,
                price,
                negotiation.item_title(),
                round
            );

            if negotiation.status() == NegotiationStatus::Agreed {
                tracing::info!(
                    "Deal on {} at ${} after {} round(s)",
                    negotiation.item_title(),
                    price,
                    round
                );
                return Ok(());
            }
        }

        let reason = if final_round {
            Some(FailureReason::RoundLimit)
        } else if negotiation.is_stalled() {
            Some(FailureReason::Stalemate)
        } else {
            None
        };

        if let Some(reason) = reason {
            self.close(negotiation, reason)?;
        }

        Ok(())
    }

    /// Fail `negotiation`, letting the buyer sign off at its standing bid
    fn close(&mut self, negotiation: &mut Negotiation, reason: FailureReason) -> Result<()> {
        match self.buyer.closing_offer(negotiation, reason, &mut self.rng) {
            Some(closing) => {
                tracing::debug!("{}: {}", closing.party, closing.message);
                negotiation.fail_with(reason, closing)?;
            }
            None => negotiation.fail(reason)?,
        }

        tracing::info!("Ended negotiation for {} - {}", negotiation.item_title(), reason);
        Ok(())
    }
}
