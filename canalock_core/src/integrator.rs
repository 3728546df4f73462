//! The "LEVEL" Engine - chamber water-level integration.
//!
//! Integrates the chamber baseline level forward in time from the culvert
//! valve openings. Each valve fills (or drains) toward its own basin and
//! stops contributing once the ship-inclusive level has reached that basin:
//!
//! ```text
//!   actual = baseline + ship_rise
//!   fill   = min(q_up  * dt / A_eff, upper - actual)    if upper valve open && actual < upper
//!   drain  = min(q_low * dt / A_eff, actual - lower)    if lower valve open && actual > lower
//!   baseline' = baseline + fill - drain
//! ```
//!
//! Both valves may act in the same step. Their conditions are evaluated
//! against the same pre-step level.

use crate::chamber::{BasinLevels, ChamberState};
use crate::constants::PhysicalConstants;
use crate::error::{LockError, LockResult};
use crate::ship::ShipState;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Level change applied by one integration step (m).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowReport {
    /// Rise contributed by the upper (filling) valve
    pub filled_m: f64,
    
    /// Fall contributed by the lower (emptying) valve
    pub drained_m: f64,
}

impl FlowReport {
    /// Net baseline change of the step.
    pub fn net_m(&self) -> f64 {
        self.filled_m - self.drained_m
    }
    
    pub fn is_idle(&self) -> bool {
        self.filled_m == 0.0 && self.drained_m == 0.0
    }
}

/// Integrates the chamber level for a given installation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelIntegrator {
    constants: PhysicalConstants,
}

impl LevelIntegrator {
    pub fn new(constants: PhysicalConstants) -> Self {
        Self { constants }
    }
    
    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }
    
    /// Advances the chamber by `dt` virtual seconds.
    ///
    /// A non-positive or non-finite `dt` leaves the chamber untouched.
    /// The baseline is clamped to `[0, chamber_height]` afterwards.
    pub fn advance(
        &self,
        chamber: &mut ChamberState,
        ship: &ShipState,
        basins: &BasinLevels,
        dt: f64,
    ) -> LockResult<FlowReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Ok(FlowReport::default());
        }
        
        let effective_area = ship.effective_chamber_area(self.constants.chamber_area)?;
        let ship_rise = ship.water_level_rise(self.constants.chamber_area)?;
        let actual_level = chamber.baseline_level + ship_rise;
        
        let mut report = FlowReport::default();
        
        if chamber.upper_valve.is_open() && actual_level < basins.upper {
            let level_change = self.valve_level_change(chamber.upper_valve.fraction(), dt, effective_area);
            report.filled_m = level_change.min(basins.upper - actual_level);
        }
        
        if chamber.lower_valve.is_open() && actual_level > basins.lower {
            let level_change = self.valve_level_change(chamber.lower_valve.fraction(), dt, effective_area);
            report.drained_m = level_change.min(actual_level - basins.lower);
        }
        
        let next = chamber.baseline_level + report.filled_m - report.drained_m;
        if !next.is_finite() {
            return Err(LockError::NonFinite { quantity: "chamber baseline level" });
        }
        chamber.baseline_level = next;
        chamber.clamp_baseline(self.constants.chamber_height);
        
        trace!(
            dt,
            filled = report.filled_m,
            drained = report.drained_m,
            baseline = chamber.baseline_level,
            "level step"
        );
        
        Ok(report)
    }
    
    /// Level change a valve produces over `dt` at the given opening fraction.
    fn valve_level_change(&self, fraction: f64, dt: f64, effective_area: f64) -> f64 {
        let flow_rate = fraction * self.constants.valve_max_flow;
        flow_rate * dt / effective_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chamber::ValveOpening;
    use crate::ship::ShipPosition;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    
    fn setup() -> (LevelIntegrator, ChamberState, ShipState, BasinLevels) {
        (
            LevelIntegrator::default(),
            ChamberState::default(),
            ShipState::default(),
            BasinLevels::default(),
        )
    }
    
    #[test]
    fn test_one_second_fill() {
        let (integrator, mut chamber, ship, basins) = setup();
        chamber.upper_valve = ValveOpening::FULL;
        
        let report = integrator.advance(&mut chamber, &ship, &basins, 1.0).unwrap();
        
        // 100 m³/s over 33500 m²
        assert_relative_eq!(report.filled_m, 100.0 / 33_500.0, epsilon = 1e-12);
        assert_relative_eq!(chamber.baseline_level, 10.002_985, epsilon = 1e-6);
        assert_eq!(report.drained_m, 0.0);
    }
    
    #[test]
    fn test_fill_uses_open_water_area_with_ship() {
        let (integrator, mut chamber, mut ship, basins) = setup();
        ship.position = ShipPosition::Chamber;
        chamber.baseline_level = 5.0;
        chamber.upper_valve = ValveOpening::new(50.0);
        
        let report = integrator.advance(&mut chamber, &ship, &basins, 10.0).unwrap();
        
        assert_relative_eq!(report.filled_m, 50.0 * 10.0 / 27_500.0, epsilon = 1e-12);
    }
    
    #[test]
    fn test_fill_stops_at_upper_level() {
        let (integrator, mut chamber, ship, basins) = setup();
        chamber.baseline_level = 25.99;
        chamber.upper_valve = ValveOpening::FULL;
        
        let report = integrator.advance(&mut chamber, &ship, &basins, 10_000.0).unwrap();
        
        assert_relative_eq!(report.filled_m, 0.01, epsilon = 1e-9);
        assert_relative_eq!(chamber.baseline_level, 26.0, epsilon = 1e-12);
        
        // Equalized: the valve no longer contributes
        let report = integrator.advance(&mut chamber, &ship, &basins, 10.0).unwrap();
        assert!(report.is_idle());
    }
    
    #[test]
    fn test_drain_stops_at_lower_level_counting_ship() {
        let (integrator, mut chamber, mut ship, basins) = setup();
        ship.position = ShipPosition::Chamber;
        let rise = ship.water_level_rise(33_500.0).unwrap();
        chamber.baseline_level = 26.0 - rise;
        chamber.lower_valve = ValveOpening::FULL;
        
        for _ in 0..10_000 {
            integrator.advance(&mut chamber, &ship, &basins, 100.0).unwrap();
        }
        
        assert_relative_eq!(chamber.baseline_level + rise, basins.lower, epsilon = 1e-9);
    }
    
    #[test]
    fn test_both_valves_act_in_same_step() {
        let (integrator, mut chamber, ship, basins) = setup();
        chamber.baseline_level = 18.0;
        chamber.upper_valve = ValveOpening::FULL;
        chamber.lower_valve = ValveOpening::new(50.0);
        
        let report = integrator.advance(&mut chamber, &ship, &basins, 1.0).unwrap();
        
        assert!(report.filled_m > 0.0);
        assert!(report.drained_m > 0.0);
        assert_relative_eq!(report.net_m(), 50.0 / 33_500.0, epsilon = 1e-12);
    }
    
    #[test]
    fn test_non_positive_dt_is_noop() {
        let (integrator, mut chamber, ship, basins) = setup();
        chamber.upper_valve = ValveOpening::FULL;
        let before = chamber;
        
        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let report = integrator.advance(&mut chamber, &ship, &basins, dt).unwrap();
            assert!(report.is_idle());
            assert_eq!(chamber, before);
        }
    }
    
    #[test]
    fn test_oversized_ship_propagates() {
        let (integrator, mut chamber, mut ship, basins) = setup();
        ship.position = ShipPosition::Chamber;
        ship.footprint_area = 40_000.0;
        
        let err = integrator.advance(&mut chamber, &ship, &basins, 1.0).unwrap_err();
        assert!(matches!(err, LockError::ShipDoesNotFit { .. }));
        assert_eq!(chamber.baseline_level, 10.0);
    }
    
    proptest! {
        #[test]
        fn filling_never_overshoots_upper(
            start in 0.0f64..25.9,
            opening in 1.0f64..100.0,
            steps in proptest::collection::vec(0.0f64..5_000.0, 1..50),
            in_chamber in any::<bool>(),
        ) {
            let (integrator, mut chamber, mut ship, basins) = setup();
            if in_chamber {
                ship.position = ShipPosition::Chamber;
            }
            let rise = ship.water_level_rise(33_500.0).unwrap();
            chamber.baseline_level = (start - rise).max(0.0);
            chamber.upper_valve = ValveOpening::new(opening);
            
            for dt in steps {
                integrator.advance(&mut chamber, &ship, &basins, dt).unwrap();
                prop_assert!(chamber.baseline_level + rise <= basins.upper + 1e-9);
            }
        }
        
        #[test]
        fn zero_dt_is_idempotent(baseline in 0.0f64..30.0, up in 0.0f64..100.0, low in 0.0f64..100.0) {
            let (integrator, mut chamber, ship, basins) = setup();
            chamber.baseline_level = baseline;
            chamber.upper_valve = ValveOpening::new(up);
            chamber.lower_valve = ValveOpening::new(low);
            
            integrator.advance(&mut chamber, &ship, &basins, 0.0).unwrap();
            prop_assert_eq!(chamber.baseline_level, baseline);
        }
    }
}
