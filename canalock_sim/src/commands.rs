//! Operator commands and scripted procedure steps.
//!
//! The presentation layer drives a session through the same inbound
//! operations these commands name. Scripts chain them with waits on the
//! observed lock state, the way an operator watches the level gauges.

use canalock_core::{LockResult, LockSnapshot, MoveDirection, ShipPosition, SimulationSession};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One inbound operation on a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum OperatorCommand {
    SetUpperValve(f64),
    SetLowerValve(f64),
    ToggleUpperGate,
    ToggleLowerGate,
    MoveShip(MoveDirection),
    SetShipDisplacement(f64),
    SetShipArea(f64),
    SetTimeScale(f64),
    Start,
    Pause,
    Reset,
}

impl OperatorCommand {
    /// Applies the command; `now` is the current wall reference.
    pub fn apply(&self, session: &mut SimulationSession, now: Duration) -> LockResult<()> {
        match *self {
            OperatorCommand::SetUpperValve(pct) => session.set_upper_valve(pct),
            OperatorCommand::SetLowerValve(pct) => session.set_lower_valve(pct),
            OperatorCommand::ToggleUpperGate => session.toggle_upper_gate(),
            OperatorCommand::ToggleLowerGate => session.toggle_lower_gate(),
            OperatorCommand::MoveShip(direction) => session.move_ship(direction)?,
            OperatorCommand::SetShipDisplacement(volume) => session.set_ship_displacement(volume),
            OperatorCommand::SetShipArea(area) => session.set_ship_area(area),
            OperatorCommand::SetTimeScale(scale) => session.set_time_scale(scale),
            OperatorCommand::Start => session.start(now),
            OperatorCommand::Pause => session.pause(),
            OperatorCommand::Reset => session.reset(now),
        }
        Ok(())
    }
}

impl std::fmt::Display for OperatorCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperatorCommand::SetUpperValve(pct) => write!(f, "upper valve {}%", pct),
            OperatorCommand::SetLowerValve(pct) => write!(f, "lower valve {}%", pct),
            OperatorCommand::ToggleUpperGate => write!(f, "toggle upper gate"),
            OperatorCommand::ToggleLowerGate => write!(f, "toggle lower gate"),
            OperatorCommand::MoveShip(direction) => write!(f, "move ship {}", direction),
            OperatorCommand::SetShipDisplacement(v) => write!(f, "ship displacement {} m³", v),
            OperatorCommand::SetShipArea(a) => write!(f, "ship area {} m²", a),
            OperatorCommand::SetTimeScale(s) => write!(f, "time scale ×{}", s),
            OperatorCommand::Start => write!(f, "start"),
            OperatorCommand::Pause => write!(f, "pause"),
            OperatorCommand::Reset => write!(f, "reset"),
        }
    }
}

/// Observable condition on the lock state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Displayed chamber level matches the upper basin
    UpperEqualized,
    /// Displayed chamber level matches the lower basin
    LowerEqualized,
    ShipAt(ShipPosition),
    /// Displayed chamber level lies between the two basin levels
    LevelWithinBasins,
    /// Baseline level equals the given value (±2 cm)
    BaselineAt(f64),
    /// Baseline level matches the upper basin (±2 cm)
    BaselineAtUpper,
    /// Baseline level matches the lower basin (±2 cm)
    BaselineAtLower,
    /// Virtual time elapsed since session start is at least this many seconds
    ElapsedAtLeast(f64),
}

impl Condition {
    pub fn holds(&self, snapshot: &LockSnapshot) -> bool {
        match *self {
            Condition::UpperEqualized => snapshot.upper_equalized,
            Condition::LowerEqualized => snapshot.lower_equalized,
            Condition::ShipAt(position) => snapshot.ship_position == position,
            Condition::LevelWithinBasins => {
                let (low, high) = if snapshot.lower_level <= snapshot.upper_level {
                    (snapshot.lower_level, snapshot.upper_level)
                } else {
                    (snapshot.upper_level, snapshot.lower_level)
                };
                // Both valves can nudge the level past a basin by one step
                let slack = 1e-3;
                snapshot.displayed_chamber_level >= low - slack
                    && snapshot.displayed_chamber_level <= high + slack
            }
            Condition::BaselineAt(level) => baseline_near(snapshot, level),
            Condition::BaselineAtUpper => baseline_near(snapshot, snapshot.upper_level),
            Condition::BaselineAtLower => baseline_near(snapshot, snapshot.lower_level),
            Condition::ElapsedAtLeast(secs) => snapshot.elapsed_time >= secs,
        }
    }
}

fn baseline_near(snapshot: &LockSnapshot, level: f64) -> bool {
    (snapshot.baseline_chamber_level - level).abs() <= 0.02
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::UpperEqualized => write!(f, "chamber equalized with upper basin"),
            Condition::LowerEqualized => write!(f, "chamber equalized with lower basin"),
            Condition::ShipAt(position) => write!(f, "ship at {}", position),
            Condition::LevelWithinBasins => write!(f, "chamber level between basins"),
            Condition::BaselineAt(level) => write!(f, "baseline at {:.3} m", level),
            Condition::BaselineAtUpper => write!(f, "baseline at upper basin level"),
            Condition::BaselineAtLower => write!(f, "baseline at lower basin level"),
            Condition::ElapsedAtLeast(secs) => write!(f, "{} s elapsed", secs),
        }
    }
}

/// One step of a scripted operator procedure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Apply a command between frames
    Do(OperatorCommand),
    /// Run frames until the condition holds
    WaitUntil(Condition),
    /// Run a fixed number of frames
    Frames(u64),
    /// Fail the scenario unless the condition holds now
    Expect(Condition),
}

#[cfg(test)]
mod tests {
    use super::*;
    use canalock_core::LockConfig;
    
    #[test]
    fn test_commands_apply_to_session() {
        let mut session = SimulationSession::new(LockConfig::default()).unwrap();
        
        for cmd in [
            OperatorCommand::SetUpperValve(40.0),
            OperatorCommand::ToggleUpperGate,
            OperatorCommand::MoveShip(MoveDirection::ToChamber),
            OperatorCommand::SetTimeScale(25.0),
            OperatorCommand::Start,
        ] {
            cmd.apply(&mut session, Duration::ZERO).unwrap();
        }
        
        let snap = session.snapshot().unwrap();
        assert_eq!(snap.upper_valve_percent, 40.0);
        assert_eq!(snap.ship_position, ShipPosition::Chamber);
        assert_eq!(snap.time_scale, 25.0);
        assert!(snap.is_running);
        
        OperatorCommand::Reset.apply(&mut session, Duration::ZERO).unwrap();
        assert_eq!(session.ship().position, ShipPosition::Upper);
    }
    
    #[test]
    fn test_conditions() {
        let session = SimulationSession::new(LockConfig::default()).unwrap();
        let snap = session.snapshot().unwrap();
        
        assert!(Condition::LowerEqualized.holds(&snap));
        assert!(!Condition::UpperEqualized.holds(&snap));
        assert!(Condition::ShipAt(ShipPosition::Upper).holds(&snap));
        assert!(Condition::LevelWithinBasins.holds(&snap));
        assert!(Condition::BaselineAt(10.0).holds(&snap));
        assert!(Condition::BaselineAtLower.holds(&snap));
        assert!(!Condition::BaselineAtUpper.holds(&snap));
        assert!(!Condition::ElapsedAtLeast(1.0).holds(&snap));
    }
    
    #[test]
    fn test_basin_conditions_follow_configured_levels() {
        let config = LockConfig::from_json_str(
            r#"{ "upper_level": 22.0, "lower_level": 8.0, "initial_chamber_level": 8.0 }"#,
        )
        .unwrap();
        let mut session = SimulationSession::new(config).unwrap();
        
        let snap = session.snapshot().unwrap();
        assert!(Condition::BaselineAtLower.holds(&snap));
        assert!(!Condition::BaselineAt(10.0).holds(&snap));
        
        session.set_upper_valve(100.0);
        session.advance(14.0 * 33_500.0 / 100.0 + 10.0).unwrap();
        let snap = session.snapshot().unwrap();
        assert!(Condition::BaselineAtUpper.holds(&snap));
        assert!(!Condition::BaselineAtLower.holds(&snap));
    }
    
    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_string(&OperatorCommand::MoveShip(MoveDirection::ToLower)).unwrap();
        assert_eq!(json, r#"{"command":"move_ship","value":"to_lower"}"#);
        
        let cmd: OperatorCommand = serde_json::from_str(r#"{"command":"toggle_upper_gate"}"#).unwrap();
        assert_eq!(cmd, OperatorCommand::ToggleUpperGate);
    }
}
