//! Read-only view of a session for presentation layers.
//!
//! Everything here is recomputed from the session on each capture; the
//! snapshot is never fed back into the engine.

use crate::controller::MoveDirection;
use crate::gate::{GateForceReading, GateState};
use crate::ship::ShipPosition;
use serde::{Deserialize, Serialize};

/// State of the lock at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockSnapshot {
    /// Chamber level from water alone (m)
    pub baseline_chamber_level: f64,
    /// Chamber level including the ship's rise (m)
    pub displayed_chamber_level: f64,
    pub upper_level: f64,
    pub lower_level: f64,
    pub ship_position: ShipPosition,
    /// Virtual seconds elapsed
    pub elapsed_time: f64,
    pub time_scale: f64,
    pub is_running: bool,
    /// Load on the gate between upper basin and chamber
    pub upper_gate_force: GateForceReading,
    /// Load on the gate between chamber and lower basin
    pub lower_gate_force: GateForceReading,
    /// Open water area of the chamber (m²)
    pub effective_chamber_area: f64,
    
    /// Rise contributed by the ship, 0 outside the chamber (m)
    pub ship_rise: f64,
    pub upper_gate: GateState,
    pub lower_gate: GateState,
    pub upper_valve_percent: f64,
    pub lower_valve_percent: f64,
    /// Displayed chamber level as a share of the wall height (%)
    pub fill_percent: f64,
    pub upper_fill_percent: f64,
    pub lower_fill_percent: f64,
    /// Ship footprint as a share of the chamber footprint (%)
    pub ship_area_ratio_percent: f64,
    /// Displayed level within tolerance of the upper basin
    pub upper_equalized: bool,
    /// Displayed level within tolerance of the lower basin
    pub lower_equalized: bool,
    /// Ship moves admissible right now
    pub available_moves: Vec<MoveDirection>,
}

impl LockSnapshot {
    /// Head across the upper gate (m).
    pub fn upper_head(&self) -> f64 {
        self.upper_gate_force.head_difference_m
    }
    
    /// Head across the lower gate (m).
    pub fn lower_head(&self) -> f64 {
        self.lower_gate_force.head_difference_m
    }
}

/// Level as a percentage of the wall height.
pub fn level_percent(level: f64, chamber_height: f64) -> f64 {
    level / chamber_height * 100.0
}
