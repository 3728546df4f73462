//! Common types for the environment abstraction.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Display refresh rate driving the frame loop, in Hz.
///
/// Browsers schedule animation frames at the display refresh rate, which
/// is 60 Hz on most hardware. The frame loop mirrors that cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameRate(f64);

impl FrameRate {
    /// Lowest accepted refresh rate.
    pub const MIN_HZ: f64 = 1.0;
    
    /// Highest accepted refresh rate.
    pub const MAX_HZ: f64 = 1000.0;
    
    /// Creates a frame rate, rejecting values outside `MIN_HZ..=MAX_HZ`.
    pub fn new(hz: f64) -> Result<Self, EnvError> {
        if hz.is_finite() && (Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Ok(Self(hz))
        } else {
            Err(EnvError::InvalidFrameRate(hz))
        }
    }
    
    /// Returns the rate in Hz.
    pub fn hz(&self) -> f64 {
        self.0
    }
    
    /// Returns the wall time between two frames.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(60.0)
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = EnvError;
    
    fn try_from(hz: f64) -> Result<Self, Self::Error> {
        Self::new(hz)
    }
}

impl From<FrameRate> for f64 {
    fn from(rate: FrameRate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_frame_rate_interval() {
        let rate = FrameRate::new(50.0).unwrap();
        assert_eq!(rate.interval(), Duration::from_millis(20));
        assert_eq!(FrameRate::default().hz(), 60.0);
    }
    
    #[test]
    fn test_frame_rate_bounds() {
        assert_eq!(FrameRate::new(0.0), Err(EnvError::InvalidFrameRate(0.0)));
        assert!(FrameRate::new(f64::NAN).is_err());
        assert!(FrameRate::new(5000.0).is_err());
        assert!(FrameRate::new(1.0).is_ok());
    }
}
