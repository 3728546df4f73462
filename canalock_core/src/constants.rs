//! Physical constants of the lock installation.
//!
//! Values follow the simplified metric model used throughout the engine:
//! pressure in kPa multiplied by area in m² is reported directly as kN.

use serde::{Deserialize, Serialize};

/// Density of fresh water (kg/m³)
pub const WATER_DENSITY: f64 = 1000.0;

/// Gravity acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Wetted area of a single gate leaf (m²)
pub const GATE_AREA: f64 = 50.0;

/// Horizontal footprint of the chamber (m²)
pub const CHAMBER_AREA: f64 = 33_500.0;

/// Height of the chamber walls (m)
pub const CHAMBER_HEIGHT: f64 = 30.0;

/// Flow through a fully open culvert valve (m³/s)
pub const VALVE_MAX_FLOW: f64 = 100.0;

/// Fixed parameters of the installation.
///
/// Pure data. The defaults are the module constants above; a
/// [`LockConfig`](crate::LockConfig) may override them for other chambers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Fluid density (kg/m³)
    pub fluid_density: f64,
    
    /// Gravity acceleration (m/s²)
    pub gravity: f64,
    
    /// Gate area (m²)
    pub gate_area: f64,
    
    /// Chamber footprint area (m²)
    pub chamber_area: f64,
    
    /// Chamber wall height (m), the hard upper bound for any level
    pub chamber_height: f64,
    
    /// Maximum valve flow rate (m³/s)
    pub valve_max_flow: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            fluid_density: WATER_DENSITY,
            gravity: GRAVITY,
            gate_area: GATE_AREA,
            chamber_area: CHAMBER_AREA,
            chamber_height: CHAMBER_HEIGHT,
            valve_max_flow: VALVE_MAX_FLOW,
        }
    }
}
