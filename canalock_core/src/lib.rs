//! Canalock Core - Canal Lock Simulation Engine
//!
//! Simulates a single lock chamber between two fixed-level basins:
//! 1. **Level**: chamber level integration from culvert valve flows, bounded by the basin levels
//! 2. **Displacement**: the rise a floating ship adds to the chamber's open water
//! 3. **Load**: hydrostatic force on each gate from the head across it
//!
//! All mutable state lives in one [`SimulationSession`]; presentation layers
//! read [`LockSnapshot`]s and issue commands through the session.

pub mod constants;
pub mod error;
pub mod ship;
pub mod gate;
pub mod chamber;
pub mod integrator;
pub mod controller;
pub mod clock;
pub mod config;
pub mod snapshot;
pub mod session;

// Re-export key types for convenience
pub use chamber::{BasinLevels, ChamberState, ValveOpening};
pub use clock::SimulationClock;
pub use config::{Bounds, ControlLimits, LockConfig, ShipConfig};
pub use constants::PhysicalConstants;
pub use controller::{LockController, LockSide, MoveDirection};
pub use error::{LockError, LockResult};
pub use gate::{compute_force, GateForceReading, GateState};
pub use integrator::{FlowReport, LevelIntegrator};
pub use session::SimulationSession;
pub use ship::{ShipPosition, ShipState};
pub use snapshot::LockSnapshot;
