//! Core clock context trait for the frame loop.

use async_trait::async_trait;
use std::time::Duration;

/// The central interface for time.
///
/// This trait abstracts the wall clock so that the frame loop can run
/// against real time (production) or a virtual clock (simulation tests).
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `Instant` and `tokio::time`
/// - **Simulation**: `SimContext` - virtual nanosecond counter, optional seeded jitter
///
/// # Determinism
///
/// The simulation session never reads the clock itself. It is handed
/// `now()` values by the frame loop, so swapping the context is enough to
/// make a run reproducible.
#[async_trait]
pub trait LockContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// This is the wall reference the session clock differentiates
    /// between frames. In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;
    
    /// Suspends execution until the next frame is due.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances the virtual clock
    async fn sleep(&self, duration: Duration);
    
    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    /// In simulation, returns the master seed.
    fn seed(&self) -> u64;
}
