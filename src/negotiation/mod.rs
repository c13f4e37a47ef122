//! Negotiation module: price-counteroffer state machine and runner

pub mod engine;
pub mod session;
pub mod types;

pub use engine::NegotiationRunner;
pub use session::Negotiation;
pub use types::{FailureReason, NegotiationStatus, Offer, OfferAction};
