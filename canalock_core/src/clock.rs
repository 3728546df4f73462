//! Virtual time driven by wall-clock frame deltas.
//!
//! Each frame the ticker hands the clock the current wall reference. The
//! clock turns the delta since the previous frame into virtual seconds by
//! multiplying with the time scale. The wall reference is refreshed the
//! moment the clock starts running, so a pause never shows up as a jump.

use std::ops::RangeInclusive;
use std::time::Duration;

/// Default acceleration factor.
pub const DEFAULT_TIME_SCALE: f64 = 10.0;

/// Accepted acceleration factors.
pub const TIME_SCALE_RANGE: RangeInclusive<f64> = 1.0..=100.0;

/// Elapsed virtual time and the acceleration applied to wall time.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Virtual seconds accumulated while running
    elapsed_secs: f64,
    
    /// Virtual seconds per wall second
    time_scale: f64,
    
    /// Bounds applied by `set_time_scale`
    scale_range: RangeInclusive<f64>,
    
    running: bool,
    
    /// Wall reference of the previous frame
    last_wall: Option<Duration>,
}

impl SimulationClock {
    /// Creates a stopped clock at zero with the given scale (clamped to the default range).
    pub fn new(time_scale: f64) -> Self {
        Self::with_range(time_scale, TIME_SCALE_RANGE)
    }
    
    /// Creates a stopped clock whose scale is clamped to `scale_range`.
    pub fn with_range(time_scale: f64, scale_range: RangeInclusive<f64>) -> Self {
        let mut clock = Self {
            elapsed_secs: 0.0,
            time_scale: *scale_range.start(),
            scale_range,
            running: false,
            last_wall: None,
        };
        clock.set_time_scale(time_scale);
        clock
    }
    
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }
    
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
    
    pub fn is_running(&self) -> bool {
        self.running
    }
    
    /// Sets the acceleration factor, clamped into range. NaN is ignored.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.time_scale = scale.clamp(*self.scale_range.start(), *self.scale_range.end());
    }
    
    /// Starts running and resynchronizes the wall reference to `now`.
    pub fn start(&mut self, now: Duration) {
        self.running = true;
        self.last_wall = Some(now);
    }
    
    /// Freezes time accumulation. State is preserved.
    pub fn pause(&mut self) {
        self.running = false;
    }
    
    /// Consumes the wall time since the previous frame.
    ///
    /// Returns the virtual `dt` to integrate, 0 while paused. A wall clock
    /// that goes backwards yields 0 rather than a negative step.
    pub fn tick(&mut self, now: Duration) -> f64 {
        if !self.running {
            return 0.0;
        }
        let last = self.last_wall.replace(now).unwrap_or(now);
        let wall_delta = now.saturating_sub(last).as_secs_f64();
        
        let dt = wall_delta * self.time_scale;
        self.elapsed_secs += dt;
        dt
    }
    
    /// Zeroes elapsed time, stops, and restores the given scale.
    pub fn reset(&mut self, time_scale: f64, now: Duration) {
        self.elapsed_secs = 0.0;
        self.running = false;
        self.last_wall = Some(now);
        self.set_time_scale(time_scale);
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    
    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }
    
    #[test]
    fn test_tick_scales_wall_delta() {
        let mut clock = SimulationClock::new(10.0);
        clock.start(secs(1.0));
        
        let dt = clock.tick(secs(1.5));
        
        assert_relative_eq!(dt, 5.0, epsilon = 1e-9);
        assert_relative_eq!(clock.elapsed_secs(), 5.0, epsilon = 1e-9);
    }
    
    #[test]
    fn test_paused_clock_does_not_advance() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.tick(secs(3.0)), 0.0);
        
        clock.start(secs(3.0));
        clock.tick(secs(4.0));
        clock.pause();
        assert_eq!(clock.tick(secs(100.0)), 0.0);
        assert_relative_eq!(clock.elapsed_secs(), 10.0, epsilon = 1e-9);
    }
    
    #[test]
    fn test_resume_resynchronizes_reference() {
        let mut clock = SimulationClock::new(1.0);
        clock.start(secs(0.0));
        clock.tick(secs(1.0));
        clock.pause();
        
        // 60 s of wall time pass while paused
        clock.start(secs(61.0));
        let dt = clock.tick(secs(62.0));
        
        assert_relative_eq!(dt, 1.0, epsilon = 1e-9);
        assert_relative_eq!(clock.elapsed_secs(), 2.0, epsilon = 1e-9);
    }
    
    #[test]
    fn test_time_scale_clamped() {
        let mut clock = SimulationClock::new(500.0);
        assert_eq!(clock.time_scale(), 100.0);
        
        clock.set_time_scale(0.1);
        assert_eq!(clock.time_scale(), 1.0);
        
        clock.set_time_scale(f64::NAN);
        assert_eq!(clock.time_scale(), 1.0);
    }
    
    #[test]
    fn test_backwards_wall_clock_yields_zero() {
        let mut clock = SimulationClock::new(10.0);
        clock.start(secs(5.0));
        assert_eq!(clock.tick(secs(4.0)), 0.0);
    }
    
    #[test]
    fn test_reset() {
        let mut clock = SimulationClock::new(50.0);
        clock.start(secs(0.0));
        clock.tick(secs(2.0));
        
        clock.reset(DEFAULT_TIME_SCALE, secs(2.0));
        
        assert_eq!(clock.elapsed_secs(), 0.0);
        assert!(!clock.is_running());
        assert_eq!(clock.time_scale(), DEFAULT_TIME_SCALE);
    }
}
