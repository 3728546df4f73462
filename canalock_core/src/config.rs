//! Run configuration.
//!
//! Defaults reproduce the reference installation: a 33 500 m² chamber
//! between basins at 26 m and 10 m, a 70 000 m³ ship waiting upstream,
//! and a ×10 time scale. A config can be loaded from JSON; missing fields
//! fall back to these defaults.

use crate::chamber::{DEFAULT_CHAMBER_LEVEL, DEFAULT_LOWER_LEVEL, DEFAULT_UPPER_LEVEL};
use crate::clock::DEFAULT_TIME_SCALE;
use crate::constants::PhysicalConstants;
use crate::error::{LockError, LockResult};
use crate::ship::{DEFAULT_DISPLACEMENT, DEFAULT_FOOTPRINT};
use canalock_env::FrameRate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive bounds for an operator control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
    
    /// Clamps `value` into the bounds. Returns `None` for NaN.
    pub fn clamp(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            None
        } else {
            Some(value.clamp(self.min, self.max))
        }
    }
    
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
    
    fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Ship parameters at session start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Displaced volume (m³)
    pub displacement_volume: f64,
    
    /// Waterline footprint (m²)
    pub footprint_area: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            displacement_volume: DEFAULT_DISPLACEMENT,
            footprint_area: DEFAULT_FOOTPRINT,
        }
    }
}

/// Ranges of the operator's sliders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLimits {
    /// Ship displacement (m³)
    pub displacement: Bounds,
    
    /// Ship footprint (m²). Must stay below the chamber area.
    pub footprint: Bounds,
    
    /// Acceleration factor
    pub time_scale: Bounds,
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            displacement: Bounds::new(30_000.0, 100_000.0),
            footprint: Bounds::new(3_000.0, 10_000.0),
            time_scale: Bounds::new(1.0, 100.0),
        }
    }
}

/// Configuration for a simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Installation constants
    pub constants: PhysicalConstants,
    
    /// Upper basin level (m)
    pub upper_level: f64,
    
    /// Lower basin level (m)
    pub lower_level: f64,
    
    /// Chamber baseline level at start and after reset (m)
    pub initial_chamber_level: f64,
    
    /// Ship at start and after reset
    pub ship: ShipConfig,
    
    /// Operator control ranges
    pub limits: ControlLimits,
    
    /// Acceleration factor at start and after reset
    pub time_scale: f64,
    
    /// Frame cadence of the ticker
    pub frame_rate: FrameRate,
    
    /// Level difference under which chamber and basin count as equalized (m)
    pub equalization_tolerance: f64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            upper_level: DEFAULT_UPPER_LEVEL,
            lower_level: DEFAULT_LOWER_LEVEL,
            initial_chamber_level: DEFAULT_CHAMBER_LEVEL,
            ship: ShipConfig::default(),
            limits: ControlLimits::default(),
            time_scale: DEFAULT_TIME_SCALE,
            frame_rate: FrameRate::default(),
            equalization_tolerance: 0.01,
        }
    }
}

impl LockConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> LockResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LockError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
    
    /// Reads and parses a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> LockResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| LockError::config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
    
    /// Checks every invariant the engine relies on.
    ///
    /// A config that passes cannot drive the ship model into a division
    /// by a non-positive area, whatever the operator does with the sliders.
    pub fn validate(&self) -> LockResult<()> {
        let c = &self.constants;
        for (name, value) in [
            ("fluid_density", c.fluid_density),
            ("gravity", c.gravity),
            ("gate_area", c.gate_area),
            ("chamber_area", c.chamber_area),
            ("chamber_height", c.chamber_height),
            ("valve_max_flow", c.valve_max_flow),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LockError::config(format!("{} must be positive, got {}", name, value)));
            }
        }
        
        for (name, value) in [
            ("upper_level", self.upper_level),
            ("lower_level", self.lower_level),
            ("initial_chamber_level", self.initial_chamber_level),
        ] {
            if !(value.is_finite() && (0.0..=c.chamber_height).contains(&value)) {
                return Err(LockError::config(format!(
                    "{} must lie within [0, {}], got {}",
                    name, c.chamber_height, value
                )));
            }
        }
        
        let limits = &self.limits;
        for (name, bounds) in [
            ("displacement", limits.displacement),
            ("footprint", limits.footprint),
            ("time_scale", limits.time_scale),
        ] {
            if !bounds.is_well_formed() {
                return Err(LockError::config(format!("{} limits are malformed: {:?}", name, bounds)));
            }
        }
        if limits.displacement.min < 0.0 || limits.footprint.min < 0.0 {
            return Err(LockError::config("ship limits must be non-negative"));
        }
        if limits.footprint.max >= c.chamber_area {
            return Err(LockError::ShipDoesNotFit {
                footprint: limits.footprint.max,
                chamber: c.chamber_area,
            });
        }
        if limits.time_scale.min < 1.0 {
            return Err(LockError::config("time scale limits must not go below 1"));
        }
        
        if !limits.displacement.contains(self.ship.displacement_volume) {
            return Err(LockError::config(format!(
                "ship displacement {} outside {:?}",
                self.ship.displacement_volume, limits.displacement
            )));
        }
        if !limits.footprint.contains(self.ship.footprint_area) {
            return Err(LockError::config(format!(
                "ship footprint {} outside {:?}",
                self.ship.footprint_area, limits.footprint
            )));
        }
        if !limits.time_scale.contains(self.time_scale) {
            return Err(LockError::config(format!(
                "time scale {} outside {:?}",
                self.time_scale, limits.time_scale
            )));
        }
        
        if !(self.equalization_tolerance.is_finite() && self.equalization_tolerance >= 0.0) {
            return Err(LockError::config("equalization_tolerance must be non-negative"));
        }
        
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_config_is_valid() {
        let config = LockConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.upper_level, 26.0);
        assert_eq!(config.time_scale, 10.0);
        assert_eq!(config.frame_rate.hz(), 60.0);
    }
    
    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LockConfig::from_json_str(r#"{ "upper_level": 20.0, "ship": { "footprint_area": 4000.0 } }"#).unwrap();
        
        assert_eq!(config.upper_level, 20.0);
        assert_eq!(config.lower_level, 10.0);
        assert_eq!(config.ship.footprint_area, 4000.0);
        assert_eq!(config.ship.displacement_volume, 70_000.0);
    }
    
    #[test]
    fn test_footprint_range_must_fit_chamber() {
        let mut config = LockConfig::default();
        config.constants.chamber_area = 8_000.0;
        
        let err = config.validate().unwrap_err();
        assert!(matches!(err, LockError::ShipDoesNotFit { .. }));
    }
    
    #[test]
    fn test_rejects_bad_values() {
        let mut config = LockConfig::default();
        config.upper_level = 35.0;
        assert!(config.validate().is_err());
        
        let mut config = LockConfig::default();
        config.constants.gravity = 0.0;
        assert!(config.validate().is_err());
        
        let mut config = LockConfig::default();
        config.ship.displacement_volume = 5_000.0;
        assert!(config.validate().is_err());
        
        assert!(LockConfig::from_json_str(r#"{ "frame_rate": 0.0 }"#).is_err());
        assert!(LockConfig::from_json_str("not json").is_err());
    }
    
    #[test]
    fn test_time_scale_limits_never_slow_down() {
        let mut config = LockConfig::default();
        config.limits.time_scale = Bounds::new(0.5, 100.0);
        config.time_scale = 0.5;
        assert!(config.validate().is_err());
        
        let config = LockConfig::from_json_str(
            r#"{ "limits": { "time_scale": { "min": 0.25, "max": 10.0 } }, "time_scale": 1.0 }"#,
        );
        assert!(config.is_err());
        
        let mut config = LockConfig::default();
        config.limits.time_scale = Bounds::new(1.0, 20.0);
        assert!(config.validate().is_ok());
    }
    
    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::new(1.0, 100.0);
        assert_eq!(bounds.clamp(250.0), Some(100.0));
        assert_eq!(bounds.clamp(f64::NAN), None);
    }
}
