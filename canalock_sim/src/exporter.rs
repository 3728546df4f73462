//! JSON exporter for offline plotting of a run.
//!
//! Exports periodic lock snapshots as JSON for external chart tooling.

use canalock_core::LockSnapshot;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single frame of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Frame counter since the run began
    pub tick: u64,
    
    /// Virtual time in seconds
    pub time_sec: f64,
    
    /// Presented lock state
    pub snapshot: LockSnapshot,
    
    /// Operator actions and assertion failures since the previous frame
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SimEvent>,
}

/// Simulation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl SimEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: None,
        }
    }
    
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Some("warn".to_string()),
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,
    
    /// Seed used
    pub seed: u64,
    
    /// Duration in virtual seconds
    pub duration_sec: f64,
    
    /// All frames
    pub frames: Vec<SimFrame>,
    
    /// Final results
    pub passed: bool,
    
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            duration_sec: 0.0,
            frames: Vec::new(),
            passed: false,
            failure_reason: None,
        }
    }
    
    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }
    
    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, failure_reason: Option<String>) {
        self.passed = passed;
        self.failure_reason = failure_reason;
    }
    
    /// Writes to a JSON file.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), crate::SimError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
