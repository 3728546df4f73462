//! Error types for the simulation harness.

use canalock_core::LockError;
use canalock_env::EnvError;
use thiserror::Error;

/// Errors that can occur while running or exporting a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// The lock engine rejected its configuration
    #[error("Lock error: {0}")]
    Lock(#[from] LockError),
    
    /// Environment setup failed (frame rate, jitter)
    #[error("Environment error: {0}")]
    Env(#[from] EnvError),
    
    /// Export file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    /// Export serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
