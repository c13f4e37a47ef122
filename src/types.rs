//! Core types used throughout haggle

use blake2::{Blake2b512, Digest};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for negotiations
///
/// Rendered as `neg_<item>_<hex8>`, where the suffix is derived from the item,
/// the buyer and the creation time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NegotiationId(pub String);

impl NegotiationId {
    /// Generate a new negotiation ID for an item and buyer
    pub fn generate(item_id: &ItemId, buyer_id: &AgentId) -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self::derive(item_id, buyer_id, nanos)
    }

    /// Deterministic variant of [`NegotiationId::generate`]
    pub fn derive(item_id: &ItemId, buyer_id: &AgentId, nonce: i64) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update(item_id.0.as_bytes());
        hasher.update(buyer_id.0.as_bytes());
        hasher.update(nonce.to_le_bytes());
        let digest = hasher.finalize();
        Self(format!("neg_{}_{}", item_id, hex::encode(&digest[..4])))
    }
}

impl fmt::Display for NegotiationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NegotiationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Catalogue item identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Agent identifier, e.g. `buyer_001`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Side of a negotiation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Buyer,
    Seller,
}

impl Party {
    /// The other side of the table
    pub fn counterparty(self) -> Self {
        match self {
            Party::Buyer => Party::Seller,
            Party::Seller => Party::Buyer,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Buyer => write!(f, "buyer"),
            Party::Seller => write!(f, "seller"),
        }
    }
}
