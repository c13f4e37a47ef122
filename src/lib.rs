//! haggle: a buyer/seller price negotiation simulator
//!
//! A buyer agent with a maximum price and a seller agent with a minimum price
//! trade offers round by round. Every round is persisted to a shared JSON state
//! file that outside tooling can poll.
//!
//! - `agents`: buyer and seller concession policies
//! - `negotiation`: the negotiation record, its state machine and the runner
//! - `state`: the shared state file and its atomic store
//! - `report`: summaries and recent activity for observers

pub mod agents;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod negotiation;
pub mod report;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, Listing};
pub use config::SimulationConfig;
pub use error::{HaggleError, Result};
pub use negotiation::{
    FailureReason, Negotiation, NegotiationRunner, NegotiationStatus, Offer, OfferAction,
};
pub use state::{NegotiationCounts, SharedState, StateStore};
pub use types::{AgentId, ItemId, NegotiationId, Party};
