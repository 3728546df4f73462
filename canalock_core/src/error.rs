//! Error types for the lock engine.

use thiserror::Error;

/// Configuration hazards of the lock model.
///
/// Operator commands never produce these; a rejected command is a no-op.
/// They surface only when a configuration would drive a derived quantity
/// out of its domain (division by a non-positive open water area).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LockError {
    /// Ship footprint does not leave any open water in the chamber
    #[error("Ship footprint {footprint} m² does not fit a chamber of {chamber} m²")]
    ShipDoesNotFit { footprint: f64, chamber: f64 },
    
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),
    
    /// A quantity that must be finite was NaN or infinite
    #[error("Non-finite {quantity}")]
    NonFinite { quantity: &'static str },
}

impl LockError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result alias for lock engine operations.
pub type LockResult<T> = Result<T, LockError>;
