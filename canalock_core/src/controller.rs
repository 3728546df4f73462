//! Operator actions on the lock.
//!
//! The ship moves along `Upper <-> Chamber <-> Lower`. Every transition
//! needs the gate it passes through to be open; nothing else is checked
//! (matching chamber and basin levels is left to the operator).
//!
//! | Request     | From    | Gate  | To      | Baseline            |
//! |-------------|---------|-------|---------|---------------------|
//! | `ToChamber` | Upper   | upper | Chamber | `max(0, b - rise)`  |
//! | `ToLower`   | Chamber | lower | Lower   | `b + rise`          |
//! | `ToChamber` | Lower   | lower | Chamber | `max(0, b - rise)`  |
//! | `ToUpper`   | Chamber | upper | Upper   | `b + rise`          |
//!
//! The baseline compensation keeps the displayed level continuous across
//! the transition. Any other request is ignored without touching state.

use crate::chamber::{ChamberState, ValveOpening};
use crate::constants::PhysicalConstants;
use crate::error::LockResult;
use crate::gate::GateState;
use crate::ship::{ShipPosition, ShipState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Ship movement requested by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    ToChamber,
    ToLower,
    ToUpper,
}

impl MoveDirection {
    pub fn all() -> [MoveDirection; 3] {
        [MoveDirection::ToUpper, MoveDirection::ToChamber, MoveDirection::ToLower]
    }
    
    pub fn name(&self) -> &'static str {
        match self {
            MoveDirection::ToChamber => "to_chamber",
            MoveDirection::ToLower => "to_lower",
            MoveDirection::ToUpper => "to_upper",
        }
    }
}

impl std::fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for MoveDirection {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "to_chamber" | "tochamber" | "chamber" => Ok(MoveDirection::ToChamber),
            "to_lower" | "tolower" | "lower" => Ok(MoveDirection::ToLower),
            "to_upper" | "toupper" | "upper" => Ok(MoveDirection::ToUpper),
            _ => Err(format!("Unknown move direction: {}", s)),
        }
    }
}

/// Which of the two gates/valves an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockSide {
    Upper,
    Lower,
}

/// Resolves a request into the gate it crosses and the destination.
fn transition(direction: MoveDirection, from: ShipPosition) -> Option<(LockSide, ShipPosition)> {
    match (direction, from) {
        (MoveDirection::ToChamber, ShipPosition::Upper) => Some((LockSide::Upper, ShipPosition::Chamber)),
        (MoveDirection::ToLower, ShipPosition::Chamber) => Some((LockSide::Lower, ShipPosition::Lower)),
        (MoveDirection::ToChamber, ShipPosition::Lower) => Some((LockSide::Lower, ShipPosition::Chamber)),
        (MoveDirection::ToUpper, ShipPosition::Chamber) => Some((LockSide::Upper, ShipPosition::Upper)),
        _ => None,
    }
}

/// Holds the controllable state and validates operator actions against it.
#[derive(Debug, Clone, PartialEq)]
pub struct LockController {
    constants: PhysicalConstants,
    chamber: ChamberState,
    ship: ShipState,
}

impl LockController {
    pub fn new(constants: PhysicalConstants, chamber: ChamberState, ship: ShipState) -> Self {
        Self { constants, chamber, ship }
    }
    
    pub fn chamber(&self) -> &ChamberState {
        &self.chamber
    }
    
    pub(crate) fn chamber_mut(&mut self) -> &mut ChamberState {
        &mut self.chamber
    }
    
    pub fn ship(&self) -> &ShipState {
        &self.ship
    }
    
    pub fn gate(&self, side: LockSide) -> GateState {
        match side {
            LockSide::Upper => self.chamber.upper_gate,
            LockSide::Lower => self.chamber.lower_gate,
        }
    }
    
    // =========================================================================
    // VALVES & GATES
    // =========================================================================
    
    /// Sets the filling valve opening; takes effect on the next step.
    ///
    /// Non-finite input leaves the opening unchanged.
    pub fn set_upper_valve(&mut self, percent: f64) {
        if !percent.is_finite() {
            debug!(percent, "upper valve ignored: non-finite");
            return;
        }
        self.chamber.upper_valve = ValveOpening::new(percent);
        debug!(percent = self.chamber.upper_valve.percent(), "upper valve set");
    }
    
    /// Sets the emptying valve opening; takes effect on the next step.
    pub fn set_lower_valve(&mut self, percent: f64) {
        if !percent.is_finite() {
            debug!(percent, "lower valve ignored: non-finite");
            return;
        }
        self.chamber.lower_valve = ValveOpening::new(percent);
        debug!(percent = self.chamber.lower_valve.percent(), "lower valve set");
    }
    
    pub fn toggle_gate(&mut self, side: LockSide) {
        let gate = match side {
            LockSide::Upper => &mut self.chamber.upper_gate,
            LockSide::Lower => &mut self.chamber.lower_gate,
        };
        *gate = gate.toggled();
        debug!(?side, state = %gate, "gate toggled");
    }
    
    pub fn toggle_upper_gate(&mut self) {
        self.toggle_gate(LockSide::Upper);
    }
    
    pub fn toggle_lower_gate(&mut self) {
        self.toggle_gate(LockSide::Lower);
    }
    
    // =========================================================================
    // SHIP
    // =========================================================================
    
    /// Returns true if `direction` is admissible right now.
    pub fn can_move(&self, direction: MoveDirection) -> bool {
        transition(direction, self.ship.position)
            .map(|(side, _)| self.gate(side).is_open())
            .unwrap_or(false)
    }
    
    /// Directions currently admissible.
    pub fn available_moves(&self) -> Vec<MoveDirection> {
        MoveDirection::all()
            .into_iter()
            .filter(|d| self.can_move(*d))
            .collect()
    }
    
    /// Moves the ship if the crossed gate is open; otherwise does nothing.
    ///
    /// Errors only on a configuration hazard (ship larger than the chamber).
    pub fn move_ship(&mut self, direction: MoveDirection) -> LockResult<()> {
        let Some((side, target)) = transition(direction, self.ship.position) else {
            debug!(%direction, from = %self.ship.position, "move ignored: not adjacent");
            return Ok(());
        };
        if !self.gate(side).is_open() {
            debug!(%direction, ?side, "move ignored: gate closed");
            return Ok(());
        }
        
        let rise = self.ship.chamber_rise(self.constants.chamber_area)?;
        if target == ShipPosition::Chamber {
            self.chamber.baseline_level = (self.chamber.baseline_level - rise).max(0.0);
        } else {
            self.chamber.baseline_level += rise;
        }
        self.chamber.clamp_baseline(self.constants.chamber_height);
        
        info!(
            from = %self.ship.position,
            to = %target,
            baseline = self.chamber.baseline_level,
            "ship moved"
        );
        self.ship.position = target;
        Ok(())
    }
    
    pub(crate) fn set_ship_displacement(&mut self, volume: f64) {
        self.ship.displacement_volume = volume;
    }
    
    pub(crate) fn set_ship_area(&mut self, area: f64) {
        self.ship.footprint_area = area;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    
    fn controller() -> LockController {
        LockController::new(
            PhysicalConstants::default(),
            ChamberState::default(),
            ShipState::default(),
        )
    }
    
    fn displayed(ctl: &LockController) -> f64 {
        ctl.chamber().baseline_level + ctl.ship().water_level_rise(33_500.0).unwrap()
    }
    
    #[test]
    fn test_valve_setters_ignore_non_finite() {
        let mut ctl = controller();
        ctl.set_upper_valve(60.0);
        ctl.set_lower_valve(25.0);
        
        ctl.set_upper_valve(f64::NAN);
        ctl.set_lower_valve(f64::INFINITY);
        
        assert_eq!(ctl.chamber().upper_valve.percent(), 60.0);
        assert_eq!(ctl.chamber().lower_valve.percent(), 25.0);
        
        ctl.set_upper_valve(150.0);
        assert_eq!(ctl.chamber().upper_valve, ValveOpening::FULL);
    }
    
    #[test]
    fn test_entry_keeps_displayed_level_continuous() {
        let mut ctl = controller();
        ctl.toggle_upper_gate();
        let before = displayed(&ctl);
        
        ctl.move_ship(MoveDirection::ToChamber).unwrap();
        
        assert_eq!(ctl.ship().position, ShipPosition::Chamber);
        assert_relative_eq!(ctl.chamber().baseline_level, 10.0 - 70_000.0 / 27_500.0, epsilon = 1e-9);
        assert_relative_eq!(displayed(&ctl), before, epsilon = 1e-9);
    }
    
    #[test]
    fn test_closed_gate_rejects_move() {
        let mut ctl = controller();
        let before = ctl.clone();
        
        // Default gates are closed
        assert!(!ctl.can_move(MoveDirection::ToChamber));
        ctl.move_ship(MoveDirection::ToChamber).unwrap();
        
        assert_eq!(ctl, before);
    }
    
    #[test]
    fn test_non_adjacent_moves_ignored() {
        let mut ctl = controller();
        ctl.toggle_upper_gate();
        ctl.toggle_lower_gate();
        let before = ctl.clone();
        
        ctl.move_ship(MoveDirection::ToLower).unwrap();
        ctl.move_ship(MoveDirection::ToUpper).unwrap();
        
        assert_eq!(ctl, before);
        assert_eq!(ctl.available_moves(), vec![MoveDirection::ToChamber]);
    }
    
    #[test]
    fn test_full_transit_restores_baseline() {
        let mut ctl = controller();
        ctl.toggle_upper_gate();
        ctl.move_ship(MoveDirection::ToChamber).unwrap();
        ctl.toggle_upper_gate();
        
        // Lower gate still closed
        ctl.move_ship(MoveDirection::ToLower).unwrap();
        assert_eq!(ctl.ship().position, ShipPosition::Chamber);
        
        ctl.toggle_lower_gate();
        assert_eq!(ctl.available_moves(), vec![MoveDirection::ToLower]);
        ctl.move_ship(MoveDirection::ToLower).unwrap();
        
        assert_eq!(ctl.ship().position, ShipPosition::Lower);
        assert_relative_eq!(ctl.chamber().baseline_level, 10.0, epsilon = 1e-9);
    }
    
    #[test]
    fn test_entry_floors_baseline_at_zero() {
        let mut ctl = controller();
        ctl.chamber_mut().baseline_level = 1.0;
        ctl.toggle_upper_gate();
        
        ctl.move_ship(MoveDirection::ToChamber).unwrap();
        
        assert_eq!(ctl.chamber().baseline_level, 0.0);
    }
    
    #[test]
    fn test_valves_clamp() {
        let mut ctl = controller();
        ctl.set_upper_valve(120.0);
        ctl.set_lower_valve(-5.0);
        
        assert_eq!(ctl.chamber().upper_valve, ValveOpening::FULL);
        assert_eq!(ctl.chamber().lower_valve, ValveOpening::CLOSED);
    }
    
    #[test]
    fn test_direction_parse() {
        assert_eq!("toChamber".parse::<MoveDirection>(), Ok(MoveDirection::ToChamber));
        assert_eq!("to_lower".parse::<MoveDirection>(), Ok(MoveDirection::ToLower));
        assert!("sideways".parse::<MoveDirection>().is_err());
    }
}
