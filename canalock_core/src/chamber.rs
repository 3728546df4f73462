//! Chamber and basin state.

use crate::gate::GateState;
use serde::{Deserialize, Serialize};

/// Default upper basin level (m).
pub const DEFAULT_UPPER_LEVEL: f64 = 26.0;

/// Default lower basin level (m).
pub const DEFAULT_LOWER_LEVEL: f64 = 10.0;

/// Default chamber baseline level (m).
pub const DEFAULT_CHAMBER_LEVEL: f64 = 10.0;

/// Culvert valve opening, a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct ValveOpening(f64);

impl ValveOpening {
    pub const CLOSED: Self = Self(0.0);
    pub const FULL: Self = Self(100.0);
    
    /// Creates an opening clamped into `[0, 100]`. NaN maps to closed.
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::CLOSED;
        }
        Self(percent.clamp(0.0, 100.0))
    }
    
    pub fn percent(&self) -> f64 {
        self.0
    }
    
    /// Opening as a fraction of full flow.
    pub fn fraction(&self) -> f64 {
        self.0 / 100.0
    }
    
    pub fn is_open(&self) -> bool {
        self.0 > 0.0
    }
}

impl From<f64> for ValveOpening {
    fn from(percent: f64) -> Self {
        Self::new(percent)
    }
}

impl From<ValveOpening> for f64 {
    fn from(opening: ValveOpening) -> Self {
        opening.0
    }
}

/// Levels of the two fixed basins bounding the chamber (m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasinLevels {
    pub upper: f64,
    pub lower: f64,
}

impl Default for BasinLevels {
    fn default() -> Self {
        Self {
            upper: DEFAULT_UPPER_LEVEL,
            lower: DEFAULT_LOWER_LEVEL,
        }
    }
}

/// Mutable state of the chamber and its control equipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChamberState {
    /// Water level excluding any ship's displaced volume (m).
    /// Kept within `[0, chamber_height]`.
    pub baseline_level: f64,
    
    /// Filling valve (upper basin to chamber)
    pub upper_valve: ValveOpening,
    
    /// Emptying valve (chamber to lower basin)
    pub lower_valve: ValveOpening,
    
    pub upper_gate: GateState,
    pub lower_gate: GateState,
}

impl ChamberState {
    /// Creates a chamber at the given baseline with valves shut and gates closed.
    pub fn new(baseline_level: f64) -> Self {
        Self {
            baseline_level,
            upper_valve: ValveOpening::CLOSED,
            lower_valve: ValveOpening::CLOSED,
            upper_gate: GateState::Closed,
            lower_gate: GateState::Closed,
        }
    }
    
    /// Clamps the baseline into `[0, chamber_height]`.
    pub fn clamp_baseline(&mut self, chamber_height: f64) {
        self.baseline_level = self.baseline_level.clamp(0.0, chamber_height);
    }
}

impl Default for ChamberState {
    fn default() -> Self {
        Self::new(DEFAULT_CHAMBER_LEVEL)
    }
}
