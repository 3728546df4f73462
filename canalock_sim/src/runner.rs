//! Scenario runner - executes scripted lockage procedures.

use crate::commands::{Condition, OperatorCommand, ScriptStep};
use crate::context::SimContext;
use crate::exporter::{SimEvent, SimExport, SimFrame};
use crate::scenarios::ScenarioId;

use canalock_core::{LockConfig, LockSnapshot, SimulationSession};
use canalock_env::{FrameRate, LockContext};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,
    
    /// Seed used
    pub seed: u64,
    
    /// Whether scenario passed all assertions
    pub passed: bool,
    
    /// Total frames executed
    pub total_ticks: u64,
    
    /// Final virtual time in seconds
    pub final_time_secs: f64,
    
    /// Lock state when the script ended
    pub final_snapshot: Option<LockSnapshot>,
    
    /// Failure message if any
    pub failure_reason: Option<String>,
    
    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Operator commands applied
    pub commands_applied: u64,
    
    /// Ship moves that were not admissible when requested
    pub rejected_moves: u64,
    
    /// Highest load seen on the upper gate (kN)
    pub peak_upper_gate_force_kn: f64,
    
    /// Highest load seen on the lower gate (kN)
    pub peak_lower_gate_force_kn: f64,
    
    /// Level added through the filling valve (m)
    pub total_filled_m: f64,
    
    /// Level removed through the emptying valve (m)
    pub total_drained_m: f64,
    
    /// Largest virtual step integrated in one frame (s)
    pub max_frame_dt: f64,
}

/// Runs lockage scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,
    
    /// Session configuration (time scale is overridden)
    config: LockConfig,
    
    /// Frame cadence
    frame_rate: FrameRate,
    
    /// Acceleration factor for the run
    time_scale: f64,
    
    /// Relative frame jitter
    jitter: f64,
    
    /// Maximum virtual duration in seconds
    max_duration_secs: f64,
    
    /// Record a frame every N ticks (None = no export)
    export_interval: Option<u64>,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        let config = LockConfig::default();
        Self {
            seed,
            frame_rate: config.frame_rate,
            config,
            time_scale: 100.0,
            jitter: 0.1,
            max_duration_secs: 36_000.0,
            export_interval: None,
        }
    }
    
    /// Uses a custom session configuration.
    pub fn with_config(mut self, config: LockConfig) -> Self {
        self.frame_rate = config.frame_rate;
        self.config = config;
        self
    }
    
    /// Sets the frame rate.
    pub fn with_frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }
    
    /// Sets the time scale.
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }
    
    /// Sets the relative frame jitter (0 = perfectly even frames).
    pub fn with_jitter(mut self, relative_std: f64) -> Self {
        self.jitter = relative_std;
        self
    }
    
    /// Sets the maximum virtual duration.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.max_duration_secs = secs;
        self
    }
    
    /// Records an export frame every `interval` ticks.
    pub fn with_export(mut self, interval: u64) -> Self {
        self.export_interval = Some(interval.max(1));
        self
    }
    
    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.run_with_export(scenario).0
    }
    
    /// Runs a scenario and returns the result together with its export.
    ///
    /// The export is empty unless `with_export` was set.
    pub fn run_with_export(&self, scenario: ScenarioId) -> (ScenarioResult, SimExport) {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        debug!("  {}", scenario.description());
        
        let mut export = SimExport::new(scenario.name(), self.seed);
        let mut metrics = ScenarioMetrics::default();
        
        let mut config = self.config.clone();
        config.time_scale = self.time_scale;
        config.frame_rate = self.frame_rate;
        
        let outcome = SimContext::new(self.seed)
            .with_jitter(self.jitter)
            .map_err(|e| e.to_string())
            .and_then(|ctx| {
                SimulationSession::new(config)
                    .map(|session| Execution::new(self, ctx, session))
                    .map_err(|e| e.to_string())
            });
        
        let mut execution = match outcome {
            Ok(execution) => execution,
            Err(reason) => {
                warn!("✗ {} could not start: {}", scenario.name(), reason);
                export.finalize(false, Some(reason.clone()));
                let result = ScenarioResult {
                    scenario,
                    seed: self.seed,
                    passed: false,
                    total_ticks: 0,
                    final_time_secs: 0.0,
                    final_snapshot: None,
                    failure_reason: Some(reason),
                    metrics,
                };
                return (result, export);
            }
        };
        
        let failure = execution.run_script(&scenario.script(), &mut metrics, &mut export);
        if let Some(reason) = &failure {
            warn!("✗ {}: {}", scenario.name(), reason);
        }
        
        let final_snapshot = execution.session.snapshot().ok();
        let final_time_secs = execution.session.clock().elapsed_secs();
        
        info!(
            "Finished scenario: {} after {} ticks ({:.0} s virtual)",
            scenario.name(),
            execution.ticks,
            final_time_secs
        );
        
        export.finalize(failure.is_none(), failure.clone());
        let result = ScenarioResult {
            scenario,
            seed: self.seed,
            passed: failure.is_none(),
            total_ticks: execution.ticks,
            final_time_secs,
            final_snapshot,
            failure_reason: failure,
            metrics,
        };
        (result, export)
    }
}

/// State of one scenario execution.
struct Execution {
    ctx: SimContext,
    session: SimulationSession,
    interval: Duration,
    max_duration_secs: f64,
    export_interval: Option<u64>,
    ticks: u64,
    pending_events: Vec<SimEvent>,
}

impl Execution {
    fn new(runner: &ScenarioRunner, ctx: SimContext, session: SimulationSession) -> Self {
        Self {
            ctx,
            session,
            interval: runner.frame_rate.interval(),
            max_duration_secs: runner.max_duration_secs,
            export_interval: runner.export_interval,
            ticks: 0,
            pending_events: Vec::new(),
        }
    }
    
    /// Executes every step; returns the first failure.
    fn run_script(
        &mut self,
        script: &[ScriptStep],
        metrics: &mut ScenarioMetrics,
        export: &mut SimExport,
    ) -> Option<String> {
        for (index, step) in script.iter().enumerate() {
            let outcome = match step {
                ScriptStep::Do(command) => self.apply(command, metrics),
                ScriptStep::WaitUntil(condition) => self.wait_until(condition, metrics, export),
                ScriptStep::Frames(frames) => self.frames(*frames, metrics, export),
                ScriptStep::Expect(condition) => self.expect(condition),
            };
            
            match outcome {
                Ok(None) => {}
                Ok(Some(reason)) | Err(reason) => {
                    let reason = format!("step {} ({:?}): {}", index, step, reason);
                    self.pending_events.push(SimEvent::warn(reason.clone()));
                    self.record_frame(export);
                    return Some(reason);
                }
            }
        }
        self.record_frame(export);
        None
    }
    
    fn apply(&mut self, command: &OperatorCommand, metrics: &mut ScenarioMetrics) -> StepOutcome {
        if let OperatorCommand::MoveShip(direction) = command {
            if !self.session.can_move(*direction) {
                metrics.rejected_moves += 1;
            }
        }
        command.apply(&mut self.session, self.ctx.now()).map_err(|e| e.to_string())?;
        
        metrics.commands_applied += 1;
        debug!("  t={:.1}s | {}", self.session.clock().elapsed_secs(), command);
        self.pending_events.push(SimEvent::info(command.to_string()));
        Ok(None)
    }
    
    fn expect(&mut self, condition: &Condition) -> StepOutcome {
        let snapshot = self.session.snapshot().map_err(|e| e.to_string())?;
        if condition.holds(&snapshot) {
            Ok(None)
        } else {
            Ok(Some(format!("expected {}", condition)))
        }
    }
    
    fn wait_until(
        &mut self,
        condition: &Condition,
        metrics: &mut ScenarioMetrics,
        export: &mut SimExport,
    ) -> StepOutcome {
        loop {
            let snapshot = self.session.snapshot().map_err(|e| e.to_string())?;
            if condition.holds(&snapshot) {
                return Ok(None);
            }
            if !snapshot.is_running {
                return Ok(Some(format!("waiting for {} on a paused session", condition)));
            }
            if snapshot.elapsed_time > self.max_duration_secs {
                return Ok(Some(format!(
                    "{} not reached within {} s",
                    condition, self.max_duration_secs
                )));
            }
            if let Some(reason) = self.frame(metrics, export)? {
                return Ok(Some(reason));
            }
        }
    }
    
    fn frames(&mut self, frames: u64, metrics: &mut ScenarioMetrics, export: &mut SimExport) -> StepOutcome {
        for _ in 0..frames {
            if let Some(reason) = self.frame(metrics, export)? {
                return Ok(Some(reason));
            }
        }
        Ok(None)
    }
    
    /// Runs one frame and checks the per-frame invariants.
    fn frame(&mut self, metrics: &mut ScenarioMetrics, export: &mut SimExport) -> StepOutcome {
        let before = self.session.snapshot().map_err(|e| e.to_string())?;
        
        let frame_len = self.ctx.advance_frame(self.interval);
        let report = self.session.tick(self.ctx.now()).map_err(|e| e.to_string())?;
        self.ticks += 1;
        
        let after = self.session.snapshot().map_err(|e| e.to_string())?;
        let dt = after.elapsed_time - before.elapsed_time;
        
        metrics.total_filled_m += report.filled_m;
        metrics.total_drained_m += report.drained_m;
        metrics.max_frame_dt = metrics.max_frame_dt.max(dt);
        metrics.peak_upper_gate_force_kn = metrics.peak_upper_gate_force_kn.max(after.upper_gate_force.force_kn);
        metrics.peak_lower_gate_force_kn = metrics.peak_lower_gate_force_kn.max(after.lower_gate_force.force_kn);
        
        if self.ticks % 600 == 0 {
            debug!(
                "  t={:.0}s | chamber={:.3}m (baseline {:.3}m) | ship={}",
                after.elapsed_time,
                after.displayed_chamber_level,
                after.baseline_chamber_level,
                after.ship_position
            );
        }
        if let Some(interval) = self.export_interval {
            if self.ticks % interval == 0 {
                self.record_frame(export);
            }
        }
        
        let height = self.session.config().constants.chamber_height;
        if !(0.0..=height).contains(&after.baseline_chamber_level) {
            return Ok(Some(format!("baseline {} left [0, {}]", after.baseline_chamber_level, height)));
        }
        if !before.is_running && (after.elapsed_time != before.elapsed_time
            || after.baseline_chamber_level != before.baseline_chamber_level)
        {
            return Ok(Some("lock state changed while paused".to_string()));
        }
        let max_dt = frame_len.as_secs_f64() * after.time_scale + 1e-9;
        if dt > max_dt {
            return Ok(Some(format!("frame integrated {:.3} s, more than one frame ({:.3} s)", dt, max_dt)));
        }
        Ok(None)
    }
    
    fn record_frame(&mut self, export: &mut SimExport) {
        if self.export_interval.is_none() {
            return;
        }
        if let Ok(snapshot) = self.session.snapshot() {
            export.add_frame(SimFrame {
                tick: self.ticks,
                time_sec: snapshot.elapsed_time,
                snapshot,
                events: std::mem::take(&mut self.pending_events),
            });
        }
    }
}

/// `Ok(None)` to continue, `Ok(Some(reason))` on an assertion failure,
/// `Err(reason)` when the engine itself failed.
type StepOutcome = Result<Option<String>, String>;
