//! Shared negotiation state, as read by external observers

pub mod store;

pub use store::StateStore;

use crate::error::{HaggleError, Result};
use crate::negotiation::{Negotiation, NegotiationStatus};
use crate::types::NegotiationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agent name keys used in `agent_status`
pub const BUYER_AGENT: &str = "buyer_agent";
pub const SELLER_AGENT: &str = "seller_agent";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Idle,
    Negotiating,
}

/// Contents of the shared state file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedState {
    #[serde(default)]
    pub active_negotiations: BTreeMap<NegotiationId, Negotiation>,
    #[serde(default)]
    pub completed_negotiations: Vec<Negotiation>,
    #[serde(default)]
    pub agent_status: BTreeMap<String, AgentStatus>,
}

/// Answer to the external "how many negotiations" query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationCounts {
    pub active: usize,
    pub completed: usize,
    pub agreed: usize,
    pub failed: usize,
}

impl SharedState {
    /// Initial state: nothing in flight, both agents idle
    pub fn empty() -> Self {
        let mut state = Self::default();
        state.refresh_agent_status();
        state
    }

    pub fn counts(&self) -> NegotiationCounts {
        let agreed = self
            .completed_negotiations
            .iter()
            .filter(|n| n.status() == NegotiationStatus::Agreed)
            .count();

        NegotiationCounts {
            active: self.active_negotiations.len(),
            completed: self.completed_negotiations.len(),
            agreed,
            failed: self.completed_negotiations.len() - agreed,
        }
    }

    pub fn get(&self, id: &NegotiationId) -> Option<&Negotiation> {
        self.active_negotiations
            .get(id)
            .or_else(|| self.completed_negotiations.iter().find(|n| n.id() == id))
    }

    pub fn active_ids(&self) -> Vec<NegotiationId> {
        self.active_negotiations.keys().cloned().collect()
    }

    /// Remove an active negotiation for mutation
    pub fn take_active(&mut self, id: &NegotiationId) -> Result<Negotiation> {
        self.active_negotiations
            .remove(id)
            .ok_or_else(|| HaggleError::NegotiationNotFound(id.0.clone()))
    }

    /// Put a negotiation back: active ones into the map, finished ones onto
    /// the end of the completed list
    pub fn put(&mut self, negotiation: Negotiation) {
        let id = negotiation.id().clone();
        if negotiation.is_active() {
            self.active_negotiations.insert(id, negotiation);
        } else {
            self.active_negotiations.remove(&id);
            self.completed_negotiations.push(negotiation);
        }
        self.refresh_agent_status();
    }

    pub fn refresh_agent_status(&mut self) {
        let status = if self.active_negotiations.is_empty() {
            AgentStatus::Idle
        } else {
            AgentStatus::Negotiating
        };
        self.agent_status.insert(BUYER_AGENT.to_string(), status);
        self.agent_status.insert(SELLER_AGENT.to_string(), status);
    }
}
