//! Scripted lockage scenarios.

use crate::commands::{Condition, OperatorCommand, ScriptStep};
use canalock_core::{MoveDirection, ShipPosition};

use Condition::*;
use OperatorCommand::*;
use ScriptStep::*;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// LCK-001: Fill, enter, drain, leave downstream
    Downbound,
    
    /// LCK-002: Downbound transit followed by the return trip upstream
    RoundTrip,
    
    /// LCK-003: Moves through closed gates and non-adjacent moves are ignored
    GateInterlock,
    
    /// LCK-004: Both valves open at once
    ValveMisuse,
    
    /// LCK-005: Pausing mid-fill does not integrate the paused interval
    PauseResume,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Downbound,
            ScenarioId::RoundTrip,
            ScenarioId::GateInterlock,
            ScenarioId::ValveMisuse,
            ScenarioId::PauseResume,
        ]
    }
    
    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Downbound => "downbound",
            ScenarioId::RoundTrip => "round_trip",
            ScenarioId::GateInterlock => "gate_interlock",
            ScenarioId::ValveMisuse => "valve_misuse",
            ScenarioId::PauseResume => "pause_resume",
        }
    }
    
    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Downbound => "Fill to the upper basin, lock the ship through and release it downstream",
            ScenarioId::RoundTrip => "Downbound lockage, then bring the ship back up to the upper basin",
            ScenarioId::GateInterlock => "Ship commands against closed gates leave the lock untouched",
            ScenarioId::ValveMisuse => "Both culvert valves open together; level stays between the basins",
            ScenarioId::PauseResume => "Pause mid-fill, let wall time pass, resume without a time jump",
        }
    }
    
    /// Operator procedure for this scenario.
    ///
    /// Every script starts from the default session: ship upstream, chamber
    /// at the lower basin level, gates closed, valves shut.
    pub fn script(&self) -> Vec<ScriptStep> {
        match self {
            ScenarioId::Downbound => {
                let mut steps = vec![Do(Start)];
                steps.extend(downbound_transit());
                steps
            }
            ScenarioId::RoundTrip => {
                let mut steps = vec![Do(Start)];
                steps.extend(downbound_transit());
                steps.extend([
                    // Ship turns around in the lower basin
                    Do(MoveShip(MoveDirection::ToChamber)),
                    Expect(ShipAt(ShipPosition::Chamber)),
                    Expect(LowerEqualized),
                    Do(ToggleLowerGate),
                    Do(SetLowerValve(0.0)),
                    Do(SetUpperValve(100.0)),
                    WaitUntil(UpperEqualized),
                    Do(ToggleUpperGate),
                    Do(MoveShip(MoveDirection::ToUpper)),
                    Expect(ShipAt(ShipPosition::Upper)),
                    Expect(BaselineAtUpper),
                ]);
                steps
            }
            ScenarioId::GateInterlock => vec![
                Do(Start),
                Do(MoveShip(MoveDirection::ToChamber)),
                Expect(ShipAt(ShipPosition::Upper)),
                Expect(BaselineAtLower),
                // Opening the wrong gate does not help
                Do(ToggleLowerGate),
                Do(MoveShip(MoveDirection::ToChamber)),
                Do(MoveShip(MoveDirection::ToLower)),
                Expect(ShipAt(ShipPosition::Upper)),
                Do(ToggleLowerGate),
                // Upper gate open but the request is not adjacent
                Do(ToggleUpperGate),
                Do(MoveShip(MoveDirection::ToUpper)),
                Do(MoveShip(MoveDirection::ToLower)),
                Expect(ShipAt(ShipPosition::Upper)),
                Expect(BaselineAtLower),
                Frames(30),
                Expect(BaselineAtLower),
            ],
            ScenarioId::ValveMisuse => vec![
                Do(Start),
                Do(SetUpperValve(100.0)),
                Do(SetLowerValve(100.0)),
                WaitUntil(ElapsedAtLeast(600.0)),
                Expect(LevelWithinBasins),
                Do(SetLowerValve(30.0)),
                WaitUntil(UpperEqualized),
                Frames(600),
                Expect(LevelWithinBasins),
                Do(SetUpperValve(0.0)),
                WaitUntil(LowerEqualized),
                Expect(LevelWithinBasins),
            ],
            ScenarioId::PauseResume => vec![
                Do(Start),
                Do(SetUpperValve(100.0)),
                WaitUntil(ElapsedAtLeast(300.0)),
                Do(Pause),
                Frames(3_600),
                Do(Start),
                WaitUntil(UpperEqualized),
                Expect(BaselineAtUpper),
            ],
        }
    }
}

/// Downbound lockage from the default state, ending with the ship downstream.
fn downbound_transit() -> Vec<ScriptStep> {
    vec![
        Do(SetUpperValve(100.0)),
        WaitUntil(UpperEqualized),
        Do(ToggleUpperGate),
        Do(MoveShip(MoveDirection::ToChamber)),
        Expect(ShipAt(ShipPosition::Chamber)),
        Expect(UpperEqualized),
        Do(ToggleUpperGate),
        Do(SetUpperValve(0.0)),
        Do(SetLowerValve(100.0)),
        WaitUntil(LowerEqualized),
        Do(ToggleLowerGate),
        Do(MoveShip(MoveDirection::ToLower)),
        Expect(ShipAt(ShipPosition::Lower)),
        Expect(BaselineAtLower),
    ]
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "downbound" | "lck-001" => Ok(ScenarioId::Downbound),
            "round_trip" | "roundtrip" | "lck-002" => Ok(ScenarioId::RoundTrip),
            "gate_interlock" | "gateinterlock" | "lck-003" => Ok(ScenarioId::GateInterlock),
            "valve_misuse" | "valvemisuse" | "lck-004" => Ok(ScenarioId::ValveMisuse),
            "pause_resume" | "pauseresume" | "lck-005" => Ok(ScenarioId::PauseResume),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
