//! Buyer and seller agents

pub mod buyer;
pub mod seller;

pub use buyer::BuyerAgent;
pub use seller::SellerAgent;

use crate::error::Result;
use crate::negotiation::{Negotiation, Offer};
use crate::types::{AgentId, Party};
use rand::seq::SliceRandom;
use rand::RngCore;

/// One side of a negotiation
pub trait Negotiator {
    fn id(&self) -> &AgentId;

    fn party(&self) -> Party;

    /// Produce this side's next offer for the negotiation's current round.
    ///
    /// `final_round` is set on the last round the runner will play; agents
    /// concede to their reservation price there.
    fn act(
        &self,
        negotiation: &Negotiation,
        final_round: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Offer>;
}

/// Move `from` up toward `bound` by `fraction` of the gap, at least one unit
pub(crate) fn step_up(from: u64, bound: u64, fraction: f64) -> u64 {
    if from >= bound {
        return bound;
    }
    let step = ((bound - from) as f64 * fraction).ceil() as u64;
    from.saturating_add(step.max(1)).min(bound)
}

/// Move `from` down toward `bound` by `fraction` of the gap, at least one unit
pub(crate) fn step_down(from: u64, bound: u64, fraction: f64) -> u64 {
    if from <= bound {
        return bound;
    }
    let step = ((from - bound) as f64 * fraction).ceil() as u64;
    from.saturating_sub(step.max(1)).max(bound)
}

/// `fraction` of `price`, rounded to the nearest unit
pub(crate) fn share_of(price: u64, fraction: f64) -> u64 {
    (price as f64 * fraction).round() as u64
}

pub(crate) fn midpoint(a: u64, b: u64) -> u64 {
    a.min(b) + a.abs_diff(b) / 2
}

pub(crate) fn pick(templates: Vec<String>, rng: &mut dyn RngCore) -> String {
    templates.choose(rng).cloned().unwrap_or_default()
}
