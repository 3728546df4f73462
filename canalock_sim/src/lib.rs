//! Canal Lock Simulation Harness
//!
//! This crate drives a [`canalock_core::SimulationSession`] the way a
//! presentation layer would: once per display frame, with the frame's
//! timestamp taken from a [`canalock_env::LockContext`].
//!
//! # Core Principle: Injected Time
//!
//! The engine never reads a clock on its own. Every frame hands it a
//! monotonic timestamp:
//! - **Tests**: [`SimContext`] advances a virtual clock by one (optionally
//!   jittered) frame per sleep, seeded for reproducibility
//! - **Realtime**: [`canalock_env::TokioContext`] reports real elapsed time
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ScenarioRunner                         │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ SimContext (Virtual Clock + Seeded Frame Jitter)     │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │       │ now()                                               │
//! │  ┌────▼──────────────┐   OperatorCommand   ┌─────────────┐  │
//! │  │ SimulationSession │◄────────────────────│   Script    │  │
//! │  │  clock/integrator │                     │ (ScenarioId)│  │
//! │  └────┬──────────────┘                     └─────────────┘  │
//! │       │ snapshot()                                          │
//! │  ┌────▼──────────────┐                                      │
//! │  │ Conditions + JSON │                                      │
//! │  │ frame export      │                                      │
//! │  └───────────────────┘                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use canalock_sim::{ScenarioRunner, ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::GateInterlock);
//! assert!(result.passed);
//! ```

mod context;
mod error;
mod exporter;
mod runner;
mod ticker;
pub mod commands;
pub mod scenarios;

pub use commands::{Condition, OperatorCommand, ScriptStep};
pub use context::SimContext;
pub use error::SimError;
pub use exporter::{SimEvent, SimExport, SimFrame};
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use scenarios::ScenarioId;
pub use ticker::{FrameTicker, TickerStats};
