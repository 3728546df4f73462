//! Simulation context implementing LockContext for deterministic testing.

use async_trait::async_trait;
use canalock_env::{EnvError, LockContext};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Simulation context backed by a virtual clock and a seeded RNG.
///
/// This implements `LockContext` using:
/// - A virtual clock that only moves when a frame is slept or advanced
/// - A seeded ChaCha8 RNG for frame-timing jitter
///
/// Browsers do not deliver animation frames at a perfectly even cadence.
/// With jitter enabled every frame interval is stretched or shortened by a
/// normally distributed fraction, so the integrator sees uneven `dt`
/// while the run stays reproducible from its seed.
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,
    
    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<Mutex<u64>>,
    
    /// Deterministic RNG for frame jitter
    rng: Arc<Mutex<ChaCha8Rng>>,
    
    /// Relative frame jitter (fraction of the nominal interval)
    jitter: Option<Normal<f64>>,
}

impl SimContext {
    /// Creates a new SimContext with the given seed and no jitter.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            virtual_time_ns: Arc::new(Mutex::new(0)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            jitter: None,
        }
    }
    
    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }
    
    /// Enables frame jitter with the given relative standard deviation.
    ///
    /// `0.1` means a 60 Hz frame lasts 16.7 ms ± 1.7 ms (1σ).
    pub fn with_jitter(mut self, relative_std: f64) -> Result<Self, EnvError> {
        if relative_std == 0.0 {
            self.jitter = None;
            return Ok(self);
        }
        let normal = Normal::new(0.0, relative_std)
            .map_err(|e| EnvError::context(format!("Invalid jitter {}: {}", relative_std, e)))?;
        self.jitter = Some(normal);
        Ok(self)
    }
    
    fn time(&self) -> MutexGuard<'_, u64> {
        self.virtual_time_ns.lock().unwrap_or_else(|e| e.into_inner())
    }
    
    /// Advances virtual time by exactly the given duration.
    pub fn advance_time(&self, duration: Duration) {
        let mut time = self.time();
        *time += duration.as_nanos() as u64;
    }
    
    /// Advances virtual time by one frame of nominal length `interval`,
    /// applying jitter if enabled. Returns the actual frame length.
    pub fn advance_frame(&self, interval: Duration) -> Duration {
        let frame = match &self.jitter {
            Some(normal) => {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                // Frames are never shorter than a tenth of nominal
                let factor = (1.0 + normal.sample(&mut *rng)).max(0.1);
                interval.mul_f64(factor)
            }
            None => interval,
        };
        self.advance_time(frame);
        frame
    }
    
    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *self.time()
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
            rng: Arc::clone(&self.rng),
            jitter: self.jitter,
        }
    }
}

#[async_trait]
impl LockContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }
    
    async fn sleep(&self, duration: Duration) {
        // In simulation, sleeping one frame advances virtual time
        self.advance_frame(duration);
    }
    
    fn seed(&self) -> u64 {
        self.seed
    }
}
