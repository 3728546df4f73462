//! Production implementation of LockContext using Tokio.

use crate::LockContext;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Production context backed by Tokio and the monotonic system clock.
///
/// This is the "real" implementation used when a session is driven
/// interactively. Time comes from `Instant`, frames are paced by
/// `tokio::time::sleep`.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl TokioContext {
    /// Creates a new TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
    
    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LockContext for TokioContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
    
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
    
    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}
