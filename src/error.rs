//! Error types for haggle

use crate::types::Party;
use thiserror::Error;

/// Main error type for haggle
#[derive(Error, Debug)]
pub enum HaggleError {
    // Negotiation errors
    #[error("Negotiation not found: {0}")]
    NegotiationNotFound(String),

    #[error("Invalid negotiation state transition: {0}")]
    InvalidStateTransition(String),

    #[error("{party} offer of {price} violates bound {bound}")]
    BoundViolation { party: Party, price: u64, bound: u64 },

    #[error("Missing offer: {0}")]
    MissingOffer(String),

    // Catalogue errors
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid listing: {0}")]
    InvalidListing(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for haggle operations
pub type Result<T> = std::result::Result<T, HaggleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = HaggleError::ItemNotFound("42".to_string());
        assert_eq!(err.to_string(), "Item not found: 42");
    }

    #[test]
    fn test_error_conversion() {
        fn io_error_function() -> Result<()> {
            std::fs::read_to_string("/nonexistent/file")?;
            Ok(())
        }

        let result = io_error_function();
        assert!(matches!(result.unwrap_err(), HaggleError::Io(_)));
    }

    #[test]
    fn test_bound_violation_error() {
        let err = HaggleError::BoundViolation {
            party: Party::Buyer,
            price: 120,
            bound: 100,
        };
        assert_eq!(err.to_string(), "buyer offer of 120 violates bound 100");
    }
}
