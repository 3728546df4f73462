//! Gate state and hydrostatic load model.
//!
//! A gate separates the chamber from a basin. The load on it comes from the
//! head difference across it: the gate sees the average hydrostatic
//! pressure between zero and the head, acting uniformly over its area.
//!
//! ```text
//!   head      = |level_a - level_b|
//!   pressure  = rho * g * (head / 2) / 1000      [kPa]
//!   force     = pressure * gate_area             [kN]
//! ```

use crate::constants::PhysicalConstants;
use serde::{Deserialize, Serialize};

/// Open/closed state of a mitre gate.
///
/// Ship transitions through a gate require `Open`. Gate state does not
/// enter the level or force computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Open,
    #[default]
    Closed,
}

impl GateState {
    /// Returns the opposite state.
    pub fn toggled(self) -> Self {
        match self {
            GateState::Open => GateState::Closed,
            GateState::Closed => GateState::Open,
        }
    }
    
    pub fn is_open(self) -> bool {
        self == GateState::Open
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateState::Open => write!(f, "open"),
            GateState::Closed => write!(f, "closed"),
        }
    }
}

/// Load on a gate, derived from the two adjacent levels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GateForceReading {
    /// Absolute level difference across the gate (m)
    pub head_difference_m: f64,
    
    /// Average hydrostatic pressure (kPa)
    pub pressure_kpa: f64,
    
    /// Resulting force on the gate (kN)
    pub force_kn: f64,
}

/// Hydrostatic load between two levels. Symmetric in `level_a`/`level_b`.
pub fn compute_force(
    level_a: f64,
    level_b: f64,
    gate_area: f64,
    fluid_density: f64,
    gravity: f64,
) -> GateForceReading {
    let head_difference_m = (level_a - level_b).abs();
    let avg_depth = head_difference_m / 2.0;
    let pressure_kpa = fluid_density * gravity * avg_depth / 1000.0;
    
    GateForceReading {
        head_difference_m,
        pressure_kpa,
        force_kn: pressure_kpa * gate_area,
    }
}

/// [`compute_force`] with the installation's constants.
pub fn gate_force(level_a: f64, level_b: f64, constants: &PhysicalConstants) -> GateForceReading {
    compute_force(
        level_a,
        level_b,
        constants.gate_area,
        constants.fluid_density,
        constants.gravity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    
    #[test]
    fn test_reference_load() {
        let reading = compute_force(20.0, 10.0, 50.0, 1000.0, 9.81);
        
        assert_relative_eq!(reading.head_difference_m, 10.0);
        assert_relative_eq!(reading.pressure_kpa, 49.05, epsilon = 1e-9);
        assert_relative_eq!(reading.force_kn, 2452.5, epsilon = 1e-9);
    }
    
    #[test]
    fn test_equalized_levels_carry_no_load() {
        let reading = gate_force(10.0, 10.0, &PhysicalConstants::default());
        assert_eq!(reading.force_kn, 0.0);
        assert_eq!(reading.pressure_kpa, 0.0);
    }
    
    #[test]
    fn test_gate_toggle() {
        assert_eq!(GateState::default(), GateState::Closed);
        assert_eq!(GateState::Closed.toggled(), GateState::Open);
        assert!(GateState::Closed.toggled().is_open());
        assert_eq!(GateState::Open.toggled().toggled(), GateState::Open);
    }
    
    proptest! {
        #[test]
        fn force_is_symmetric(a in 0.0f64..30.0, b in 0.0f64..30.0) {
            let constants = PhysicalConstants::default();
            prop_assert_eq!(gate_force(a, b, &constants), gate_force(b, a, &constants));
        }
        
        #[test]
        fn force_grows_with_head(a in 0.0f64..15.0, extra in 0.1f64..15.0) {
            let constants = PhysicalConstants::default();
            let small = gate_force(a, 0.0, &constants);
            let large = gate_force(a + extra, 0.0, &constants);
            prop_assert!(large.force_kn > small.force_kn);
        }
    }
}
