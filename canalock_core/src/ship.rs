//! Ship displacement model.
//!
//! A floating ship pushes its displaced volume into the open water around
//! it. Inside the chamber that open water is the chamber footprint minus
//! the ship's own footprint, so the same volume produces a larger rise than
//! it would over the bare chamber.
//!
//! ```text
//!   rise = displacement / (chamber_area - footprint)      (ship in chamber)
//!   rise = 0                                              (otherwise)
//! ```

use crate::error::{LockError, LockResult};
use serde::{Deserialize, Serialize};

/// Default displaced volume (m³), a loaded Panamax-class vessel.
pub const DEFAULT_DISPLACEMENT: f64 = 70_000.0;

/// Default horizontal footprint (m²).
pub const DEFAULT_FOOTPRINT: f64 = 6_000.0;

/// Discrete location of the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipPosition {
    /// Waiting in the upper basin
    #[default]
    Upper,
    /// Inside the chamber, interacting with its water
    Chamber,
    /// In the lower basin
    Lower,
}

impl ShipPosition {
    /// Returns the position name.
    pub fn name(&self) -> &'static str {
        match self {
            ShipPosition::Upper => "upper",
            ShipPosition::Chamber => "chamber",
            ShipPosition::Lower => "lower",
        }
    }
}

impl std::fmt::Display for ShipPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The single ship transiting the lock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipState {
    /// Current location
    pub position: ShipPosition,
    
    /// Displaced volume (m³), proportional to loaded weight
    pub displacement_volume: f64,
    
    /// Horizontal cross-section at the waterline (m²)
    pub footprint_area: f64,
}

impl ShipState {
    /// Creates a ship waiting in the upper basin.
    pub fn new(displacement_volume: f64, footprint_area: f64) -> Self {
        Self {
            position: ShipPosition::Upper,
            displacement_volume,
            footprint_area,
        }
    }
    
    /// Returns true if the ship currently occupies the chamber.
    pub fn in_chamber(&self) -> bool {
        self.position == ShipPosition::Chamber
    }
    
    /// Level rise this ship induces at its current position.
    pub fn water_level_rise(&self, chamber_area: f64) -> LockResult<f64> {
        water_level_rise(self.position, self.displacement_volume, self.footprint_area, chamber_area)
    }
    
    /// Rise the ship would induce if it were inside the chamber.
    ///
    /// Used by the controller when the ship crosses a gate.
    pub fn chamber_rise(&self, chamber_area: f64) -> LockResult<f64> {
        water_level_rise(ShipPosition::Chamber, self.displacement_volume, self.footprint_area, chamber_area)
    }
    
    /// Open water area of the chamber given this ship's position.
    pub fn effective_chamber_area(&self, chamber_area: f64) -> LockResult<f64> {
        effective_chamber_area(self.position, self.footprint_area, chamber_area)
    }
}

impl Default for ShipState {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLACEMENT, DEFAULT_FOOTPRINT)
    }
}

/// Open water area of the chamber.
///
/// Returns `chamber_area - footprint_area` while the ship is in the chamber,
/// `chamber_area` otherwise. Fails if the ship would leave no open water.
pub fn effective_chamber_area(
    position: ShipPosition,
    footprint_area: f64,
    chamber_area: f64,
) -> LockResult<f64> {
    if !chamber_area.is_finite() || chamber_area <= 0.0 {
        return Err(LockError::config(format!("chamber area must be positive, got {}", chamber_area)));
    }
    if position != ShipPosition::Chamber {
        return Ok(chamber_area);
    }
    if !footprint_area.is_finite() {
        return Err(LockError::NonFinite { quantity: "ship footprint area" });
    }
    
    let open = chamber_area - footprint_area;
    if open <= 0.0 {
        return Err(LockError::ShipDoesNotFit {
            footprint: footprint_area,
            chamber: chamber_area,
        });
    }
    Ok(open)
}

/// Water-level rise induced by the ship (m).
pub fn water_level_rise(
    position: ShipPosition,
    displacement_volume: f64,
    footprint_area: f64,
    chamber_area: f64,
) -> LockResult<f64> {
    let area = effective_chamber_area(position, footprint_area, chamber_area)?;
    if position != ShipPosition::Chamber {
        return Ok(0.0);
    }
    if !displacement_volume.is_finite() {
        return Err(LockError::NonFinite { quantity: "ship displacement" });
    }
    Ok(displacement_volume / area)
}

/// Chamber level as seen from outside: baseline plus the ship's rise.
pub fn displayed_chamber_level(
    baseline_level: f64,
    position: ShipPosition,
    displacement_volume: f64,
    footprint_area: f64,
    chamber_area: f64,
) -> LockResult<f64> {
    Ok(baseline_level + water_level_rise(position, displacement_volume, footprint_area, chamber_area)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CHAMBER_AREA;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    
    #[test]
    fn test_rise_only_in_chamber() {
        for position in [ShipPosition::Upper, ShipPosition::Lower] {
            let rise = water_level_rise(position, 70_000.0, 6_000.0, CHAMBER_AREA).unwrap();
            assert_eq!(rise, 0.0);
        }
        
        let rise = water_level_rise(ShipPosition::Chamber, 70_000.0, 6_000.0, CHAMBER_AREA).unwrap();
        // 70000 / 27500
        assert_relative_eq!(rise, 2.545_454_5, epsilon = 1e-6);
    }
    
    #[test]
    fn test_effective_area() {
        assert_eq!(
            effective_chamber_area(ShipPosition::Chamber, 6_000.0, CHAMBER_AREA).unwrap(),
            27_500.0
        );
        assert_eq!(
            effective_chamber_area(ShipPosition::Upper, 6_000.0, CHAMBER_AREA).unwrap(),
            CHAMBER_AREA
        );
    }
    
    #[test]
    fn test_oversized_ship_is_rejected() {
        let err = water_level_rise(ShipPosition::Chamber, 70_000.0, CHAMBER_AREA, CHAMBER_AREA).unwrap_err();
        assert!(matches!(err, LockError::ShipDoesNotFit { .. }));
        
        // Outside the chamber the footprint is irrelevant
        assert_eq!(water_level_rise(ShipPosition::Lower, 70_000.0, 40_000.0, CHAMBER_AREA), Ok(0.0));
    }
    
    #[test]
    fn test_non_finite_inputs() {
        let err = water_level_rise(ShipPosition::Chamber, f64::INFINITY, 6_000.0, CHAMBER_AREA).unwrap_err();
        assert_eq!(err, LockError::NonFinite { quantity: "ship displacement" });
        
        assert!(effective_chamber_area(ShipPosition::Chamber, f64::NAN, CHAMBER_AREA).is_err());
        assert!(effective_chamber_area(ShipPosition::Upper, 6_000.0, 0.0).is_err());
    }
    
    #[test]
    fn test_ship_state_methods() {
        let mut ship = ShipState::default();
        assert_eq!(ship.water_level_rise(CHAMBER_AREA).unwrap(), 0.0);
        assert_relative_eq!(ship.chamber_rise(CHAMBER_AREA).unwrap(), 70_000.0 / 27_500.0);
        
        ship.position = ShipPosition::Chamber;
        assert!(ship.in_chamber());
        assert_eq!(ship.water_level_rise(CHAMBER_AREA), ship.chamber_rise(CHAMBER_AREA));
    }
    
    proptest! {
        #[test]
        fn displayed_level_never_below_baseline(
            baseline in 0.0f64..30.0,
            displacement in 30_000.0f64..100_000.0,
            footprint in 3_000.0f64..10_000.0,
        ) {
            let in_chamber = displayed_chamber_level(
                baseline, ShipPosition::Chamber, displacement, footprint, CHAMBER_AREA,
            ).unwrap();
            prop_assert!(in_chamber >= baseline);
            
            for position in [ShipPosition::Upper, ShipPosition::Lower] {
                let outside = displayed_chamber_level(
                    baseline, position, displacement, footprint, CHAMBER_AREA,
                ).unwrap();
                prop_assert_eq!(outside, baseline);
            }
        }
        
        #[test]
        fn rise_monotone_in_displacement_and_footprint(
            displacement in 30_000.0f64..100_000.0,
            extra_volume in 1.0f64..10_000.0,
            footprint in 3_000.0f64..10_000.0,
            extra_area in 1.0f64..10_000.0,
        ) {
            let base = water_level_rise(ShipPosition::Chamber, displacement, footprint, CHAMBER_AREA).unwrap();
            let heavier = water_level_rise(ShipPosition::Chamber, displacement + extra_volume, footprint, CHAMBER_AREA).unwrap();
            let wider = water_level_rise(ShipPosition::Chamber, displacement, footprint + extra_area, CHAMBER_AREA).unwrap();
            
            prop_assert!(heavier > base);
            prop_assert!(wider > base);
        }
    }
}
