//! Negotiation types and state machine

use crate::types::Party;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Negotiation state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationStatus {
    /// Offers are still being exchanged
    Active,
    /// One party accepted the other's offer
    Agreed,
    /// Stopped without agreement
    Failed,
}

impl NegotiationStatus {
    /// Check if negotiation is in a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NegotiationStatus::Active)
    }

    /// Check if negotiation is active
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// Why a negotiation ended without a deal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    RoundLimit,
    TimedOut,
    Stalemate,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::RoundLimit => write!(f, "Round Limit"),
            FailureReason::TimedOut => write!(f, "Timed Out"),
            FailureReason::Stalemate => write!(f, "Stalemate"),
        }
    }
}

/// What an offer does
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferAction {
    Open,
    Counter,
    Accept,
    /// Walks away at the standing price; only recorded on failure
    End,
}

impl fmt::Display for OfferAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OfferAction::Open => write!(f, "Open"),
            OfferAction::Counter => write!(f, "Counter Offer"),
            OfferAction::Accept => write!(f, "Accept"),
            OfferAction::End => write!(f, "End"),
        }
    }
}

/// A single price proposal, immutable once recorded
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub round: u32,
    #[serde(rename = "from")]
    pub party: Party,
    pub action: OfferAction,
    pub price: u64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Offer {
    pub fn new(round: u32, party: Party, action: OfferAction, price: u64) -> Self {
        Self {
            round,
            party,
            action,
            price,
            message: String::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_accept(&self) -> bool {
        self.action == OfferAction::Accept
    }
}
