//! Human-readable views of the shared state

use crate::negotiation::{FailureReason, NegotiationStatus, OfferAction};
use crate::state::{AgentStatus, SharedState};
use crate::types::Party;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Completed negotiations considered for recent activity
const RECENT_COMPLETED: usize = 5;
/// Offers taken from the tail of each completed negotiation
const RECENT_PER_COMPLETED: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveLine {
    pub title: String,
    pub current_offer: Option<u64>,
    pub round: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Deal {
    pub title: String,
    pub asking_price: u64,
    pub final_price: u64,
}

impl Deal {
    pub fn savings(&self) -> u64 {
        self.asking_price.saturating_sub(self.final_price)
    }

    pub fn savings_pct(&self) -> f64 {
        if self.asking_price == 0 {
            return 0.0;
        }
        self.savings() as f64 / self.asking_price as f64 * 100.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Failure {
    pub title: String,
    pub reason: Option<FailureReason>,
}

/// Snapshot of where every negotiation stands
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub active: Vec<ActiveLine>,
    pub completed: usize,
    pub deals: Vec<Deal>,
    pub failures: Vec<Failure>,
    pub agent_status: BTreeMap<String, AgentStatus>,
}

impl Summary {
    pub fn from_state(state: &SharedState) -> Self {
        let active = state
            .active_negotiations
            .values()
            .map(|n| ActiveLine {
                title: n.item_title().to_string(),
                current_offer: n.current_offer(),
                round: n.round(),
            })
            .collect();

        let mut deals = Vec::new();
        let mut failures = Vec::new();
        for n in &state.completed_negotiations {
            match (n.status(), n.final_price()) {
                (NegotiationStatus::Agreed, Some(final_price)) => deals.push(Deal {
                    title: n.item_title().to_string(),
                    asking_price: n.asking_price(),
                    final_price,
                }),
                _ => failures.push(Failure {
                    title: n.item_title().to_string(),
                    reason: n.failure_reason(),
                }),
            }
        }

        Self {
            active,
            completed: state.completed_negotiations.len(),
            deals,
            failures,
            agent_status: state.agent_status.clone(),
        }
    }

    pub fn total_savings(&self) -> u64 {
        self.deals.iter().map(Deal::savings).sum()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "NEGOTIATION SUMMARY")?;
        writeln!(f, "{}", "=".repeat(60))?;

        writeln!(f, "\nActive Negotiations: {}", self.active.len())?;
        for line in &self.active {
            match line.current_offer {
                Some(offer) => {
                    writeln!(f, "  - {}: ${} (Round {})", line.title, offer, line.round)?
                }
                None => writeln!(f, "  - {}: no offer yet", line.title)?,
            }
        }

        writeln!(f, "\nCompleted Negotiations: {}", self.completed)?;

        writeln!(f, "\nSuccessful Deals: {}", self.deals.len())?;
        for deal in &self.deals {
            writeln!(
                f,
                "  - {}: ${} (was ${}) - Saved ${} ({:.1}%)",
                deal.title,
                deal.final_price,
                deal.asking_price,
                deal.savings(),
                deal.savings_pct()
            )?;
        }
        if !self.deals.is_empty() {
            writeln!(f, "  Total Savings: ${}", self.total_savings())?;
        }

        writeln!(f, "\nFailed Negotiations: {}", self.failures.len())?;
        for failure in &self.failures {
            match failure.reason {
                Some(reason) => writeln!(f, "  - {}: {}", failure.title, reason)?,
                None => writeln!(f, "  - {}", failure.title)?,
            }
        }

        writeln!(f, "\nAgent Status:")?;
        for (agent, status) in &self.agent_status {
            let status = match status {
                AgentStatus::Idle => "idle",
                AgentStatus::Negotiating => "negotiating",
            };
            writeln!(f, "  - {}: {}", agent, status)?;
        }
        Ok(())
    }
}

/// One offer, labelled with the negotiation it belongs to
#[derive(Clone, Debug, PartialEq)]
pub struct Activity {
    pub timestamp: DateTime<Utc>,
    pub party: Party,
    pub action: OfferAction,
    pub price: u64,
    pub negotiation: String,
    pub message: String,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} ${} - {}",
            self.timestamp.format("%H:%M:%S"),
            self.party,
            self.action,
            self.price,
            self.negotiation
        )?;
        if !self.message.is_empty() {
            write!(f, "\n    \"{}\"", self.message)?;
        }
        Ok(())
    }
}

/// Newest offers first: everything from active negotiations plus the tail of
/// the most recently completed ones
pub fn recent_activity(state: &SharedState, limit: usize) -> Vec<Activity> {
    let active = state
        .active_negotiations
        .values()
        .flat_map(|n| n.history().iter().map(move |o| (n, o)));

    let completed = state
        .completed_negotiations
        .iter()
        .rev()
        .take(RECENT_COMPLETED)
        .flat_map(|n| {
            let history = n.history();
            let tail = history.len().saturating_sub(RECENT_PER_COMPLETED);
            history[tail..].iter().map(move |o| (n, o))
        });

    let mut activity: Vec<Activity> = active
        .chain(completed)
        .map(|(n, o)| Activity {
            timestamp: o.timestamp,
            party: o.party,
            action: o.action,
            price: o.price,
            negotiation: n.item_title().to_string(),
            message: o.message.clone(),
        })
        .collect();

    activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activity.truncate(limit);
    activity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Listing;
    use crate::negotiation::{Negotiation, Offer};
    use crate::types::{AgentId, NegotiationId};

    fn negotiation(id: &str, title: &str, asking: u64, min: u64, max: u64) -> Negotiation {
        Negotiation::new(
            NegotiationId::from(id),
            &Listing::new(id, title, "Electronics", asking, min),
            AgentId::from("buyer_001"),
            AgentId::from("seller_001"),
            max,
        )
    }

    fn sample_state() -> SharedState {
        let mut state = SharedState::empty();

        let mut deal = negotiation("a", "Phone", 520, 420, 442);
        deal.begin_round().unwrap();
        deal.record(Offer::new(1, Party::Buyer, OfferAction::Open, 312))
            .unwrap();
        deal.record(Offer::new(1, Party::Seller, OfferAction::Counter, 520))
            .unwrap();
        deal.begin_round().unwrap();
        deal.record(Offer::new(2, Party::Buyer, OfferAction::Counter, 430))
            .unwrap();
        deal.record(Offer::new(2, Party::Seller, OfferAction::Accept, 430))
            .unwrap();
        state.put(deal);

        let mut failed = negotiation("b", "Sofa", 350, 250, 245);
        failed.begin_round().unwrap();
        failed
            .record(Offer::new(1, Party::Buyer, OfferAction::Open, 210))
            .unwrap();
        failed
            .record(Offer::new(1, Party::Seller, OfferAction::Counter, 350))
            .unwrap();
        let closing = Offer::new(1, Party::Buyer, OfferAction::End, 210)
            .with_message("I think we're too far apart on price.");
        failed.fail_with(FailureReason::RoundLimit, closing).unwrap();
        state.put(failed);

        let mut open = negotiation("c", "Bike", 850, 700, 680);
        open.begin_round().unwrap();
        open.record(Offer::new(1, Party::Buyer, OfferAction::Open, 510))
            .unwrap();
        state.put(open);

        state
    }

    #[test]
    fn test_summary_from_state() {
        let summary = Summary::from_state(&sample_state());

        assert_eq!(summary.active.len(), 1);
        assert_eq!(summary.active[0].current_offer, Some(510));
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.deals.len(), 1);
        assert_eq!(summary.total_savings(), 90);
        assert_eq!(summary.failures[0].reason, Some(FailureReason::RoundLimit));
    }

    #[test]
    fn test_summary_display() {
        let text = Summary::from_state(&sample_state()).to_string();

        assert!(text.contains("Phone: $430 (was $520) - Saved $90 (17.3%)"));
        assert!(text.contains("Sofa: Round Limit"));
        assert!(text.contains("Bike: $510 (Round 1)"));
        assert!(text.contains("buyer_agent: negotiating"));
    }

    #[test]
    fn test_recent_activity_order_and_limit() {
        let state = sample_state();

        let all = recent_activity(&state, 10);
        // 1 from the active bike, last 2 each of the phone deal and the sofa
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert!(all.iter().any(|a| a.action == OfferAction::Accept && a.price == 430));
        assert!(!all.iter().any(|a| a.price == 312));
        assert!(all
            .iter()
            .any(|a| a.action == OfferAction::End && a.message.contains("too far apart")));

        assert_eq!(recent_activity(&state, 2).len(), 2);
    }

    #[test]
    fn test_savings_pct_zero_asking() {
        let deal = Deal {
            title: "Free".to_string(),
            asking_price: 0,
            final_price: 0,
        };
        assert_eq!(deal.savings_pct(), 0.0);
    }
}
