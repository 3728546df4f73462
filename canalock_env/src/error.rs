//! Error types for the environment abstraction.

use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error, PartialEq)]
pub enum EnvError {
    /// Frame rate outside the supported refresh range
    #[error("Invalid frame rate: {0} Hz (expected {min}..={max})", min = crate::types::FrameRate::MIN_HZ, max = crate::types::FrameRate::MAX_HZ)]
    InvalidFrameRate(f64),
    
    /// Context operation failed
    #[error("Context error: {0}")]
    ContextError(String),
}

impl EnvError {
    /// Creates a context error.
    pub fn context(msg: impl Into<String>) -> Self {
        Self::ContextError(msg.into())
    }
}
