//! SimulationSession - the single owner of all mutable lock state.
//!
//! Every operator command and every frame goes through one method here.
//! Derived values (displayed level, gate loads, open water area) are
//! recomputed on request and never stored.
//!
//! # Example
//!
//! ```
//! use canalock_core::{LockConfig, MoveDirection, SimulationSession};
//! use std::time::Duration;
//!
//! let mut session = SimulationSession::new(LockConfig::default())?;
//! session.toggle_upper_gate();
//! session.move_ship(MoveDirection::ToChamber)?;
//! session.set_lower_valve(100.0);
//!
//! session.start(Duration::ZERO);
//! session.tick(Duration::from_millis(16))?;
//!
//! let snapshot = session.snapshot()?;
//! assert!(snapshot.displayed_chamber_level < 10.0 + 2.6);
//! # Ok::<(), canalock_core::LockError>(())
//! ```

use crate::chamber::{BasinLevels, ChamberState};
use crate::clock::SimulationClock;
use crate::config::LockConfig;
use crate::controller::{LockController, MoveDirection};
use crate::error::LockResult;
use crate::gate::{gate_force, GateForceReading};
use crate::integrator::{FlowReport, LevelIntegrator};
use crate::ship::ShipState;
use crate::snapshot::{level_percent, LockSnapshot};
use std::time::Duration;
use tracing::{debug, info};

/// A running (or paused) lock simulation.
#[derive(Debug, Clone)]
pub struct SimulationSession {
    config: LockConfig,
    basins: BasinLevels,
    controller: LockController,
    integrator: LevelIntegrator,
    clock: SimulationClock,
}

impl SimulationSession {
    /// Creates a session in the configured initial state.
    pub fn new(config: LockConfig) -> LockResult<Self> {
        config.validate()?;
        
        let (basins, controller, clock) = Self::initial_state(&config);
        Ok(Self {
            integrator: LevelIntegrator::new(config.constants),
            config,
            basins,
            controller,
            clock,
        })
    }
    
    fn initial_state(config: &LockConfig) -> (BasinLevels, LockController, SimulationClock) {
        let basins = BasinLevels {
            upper: config.upper_level,
            lower: config.lower_level,
        };
        let controller = LockController::new(
            config.constants,
            ChamberState::new(config.initial_chamber_level),
            ShipState::new(config.ship.displacement_volume, config.ship.footprint_area),
        );
        let limits = config.limits.time_scale;
        let clock = SimulationClock::with_range(config.time_scale, limits.min..=limits.max);
        (basins, controller, clock)
    }
    
    pub fn config(&self) -> &LockConfig {
        &self.config
    }
    
    pub fn basins(&self) -> &BasinLevels {
        &self.basins
    }
    
    pub fn chamber(&self) -> &ChamberState {
        self.controller.chamber()
    }
    
    pub fn ship(&self) -> &ShipState {
        self.controller.ship()
    }
    
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }
    
    pub fn controller(&self) -> &LockController {
        &self.controller
    }
    
    // =========================================================================
    // OPERATOR COMMANDS
    // =========================================================================
    
    pub fn set_upper_valve(&mut self, percent: f64) {
        self.controller.set_upper_valve(percent);
    }
    
    pub fn set_lower_valve(&mut self, percent: f64) {
        self.controller.set_lower_valve(percent);
    }
    
    pub fn toggle_upper_gate(&mut self) {
        self.controller.toggle_upper_gate();
    }
    
    pub fn toggle_lower_gate(&mut self) {
        self.controller.toggle_lower_gate();
    }
    
    /// Moves the ship if admissible; see [`LockController::move_ship`].
    pub fn move_ship(&mut self, direction: MoveDirection) -> LockResult<()> {
        self.controller.move_ship(direction)
    }
    
    pub fn can_move(&self, direction: MoveDirection) -> bool {
        self.controller.can_move(direction)
    }
    
    /// Sets the ship displacement, clamped to the configured range.
    pub fn set_ship_displacement(&mut self, volume: f64) {
        if let Some(volume) = self.config.limits.displacement.clamp(volume) {
            self.controller.set_ship_displacement(volume);
        } else {
            debug!("ship displacement ignored: NaN");
        }
    }
    
    /// Sets the ship footprint, clamped to the configured range.
    pub fn set_ship_area(&mut self, area: f64) {
        if let Some(area) = self.config.limits.footprint.clamp(area) {
            self.controller.set_ship_area(area);
        } else {
            debug!("ship area ignored: NaN");
        }
    }
    
    pub fn set_time_scale(&mut self, scale: f64) {
        self.clock.set_time_scale(scale);
    }
    
    /// Sets the upper basin level, clamped to the wall height.
    pub fn set_upper_level(&mut self, level: f64) {
        if let Some(level) = self.wall_bounds(level) {
            self.basins.upper = level;
        }
    }
    
    /// Sets the lower basin level, clamped to the wall height.
    pub fn set_lower_level(&mut self, level: f64) {
        if let Some(level) = self.wall_bounds(level) {
            self.basins.lower = level;
        }
    }
    
    fn wall_bounds(&self, level: f64) -> Option<f64> {
        if level.is_nan() {
            return None;
        }
        Some(level.clamp(0.0, self.config.constants.chamber_height))
    }
    
    // =========================================================================
    // TIME
    // =========================================================================
    
    /// Starts running; `now` becomes the wall reference for the next frame.
    pub fn start(&mut self, now: Duration) {
        self.clock.start(now);
        info!(time_scale = self.clock.time_scale(), "simulation started");
    }
    
    pub fn pause(&mut self) {
        self.clock.pause();
        info!(elapsed = self.clock.elapsed_secs(), "simulation paused");
    }
    
    /// Start/pause toggle.
    pub fn toggle_running(&mut self, now: Duration) {
        if self.clock.is_running() {
            self.pause();
        } else {
            self.start(now);
        }
    }
    
    /// Restores the configured initial state and stops the clock.
    pub fn reset(&mut self, now: Duration) {
        let (basins, controller, mut clock) = Self::initial_state(&self.config);
        clock.reset(self.config.time_scale, now);
        
        self.basins = basins;
        self.controller = controller;
        self.clock = clock;
        info!("simulation reset");
    }
    
    /// Processes one frame at wall reference `now`.
    ///
    /// Does nothing while paused.
    pub fn tick(&mut self, now: Duration) -> LockResult<FlowReport> {
        let dt = self.clock.tick(now);
        self.advance(dt)
    }
    
    /// Integrates `dt` virtual seconds directly, bypassing the clock.
    pub fn advance(&mut self, dt: f64) -> LockResult<FlowReport> {
        let ship = *self.controller.ship();
        self.integrator
            .advance(self.controller.chamber_mut(), &ship, &self.basins, dt)
    }
    
    // =========================================================================
    // DERIVED VALUES
    // =========================================================================
    
    /// Rise induced by the ship at its current position (m).
    pub fn ship_rise(&self) -> LockResult<f64> {
        self.ship().water_level_rise(self.config.constants.chamber_area)
    }
    
    /// Baseline plus the ship's rise (m).
    pub fn displayed_chamber_level(&self) -> LockResult<f64> {
        Ok(self.chamber().baseline_level + self.ship_rise()?)
    }
    
    pub fn effective_chamber_area(&self) -> LockResult<f64> {
        self.ship().effective_chamber_area(self.config.constants.chamber_area)
    }
    
    pub fn upper_gate_force(&self) -> LockResult<GateForceReading> {
        Ok(gate_force(self.basins.upper, self.displayed_chamber_level()?, &self.config.constants))
    }
    
    pub fn lower_gate_force(&self) -> LockResult<GateForceReading> {
        Ok(gate_force(self.displayed_chamber_level()?, self.basins.lower, &self.config.constants))
    }
    
    /// Captures every presented value.
    pub fn snapshot(&self) -> LockResult<LockSnapshot> {
        let constants = &self.config.constants;
        let chamber = self.chamber();
        let ship = self.ship();
        let displayed = self.displayed_chamber_level()?;
        let tolerance = self.config.equalization_tolerance;
        
        Ok(LockSnapshot {
            baseline_chamber_level: chamber.baseline_level,
            displayed_chamber_level: displayed,
            upper_level: self.basins.upper,
            lower_level: self.basins.lower,
            ship_position: ship.position,
            elapsed_time: self.clock.elapsed_secs(),
            time_scale: self.clock.time_scale(),
            is_running: self.clock.is_running(),
            upper_gate_force: gate_force(self.basins.upper, displayed, constants),
            lower_gate_force: gate_force(displayed, self.basins.lower, constants),
            effective_chamber_area: self.effective_chamber_area()?,
            ship_rise: self.ship_rise()?,
            upper_gate: chamber.upper_gate,
            lower_gate: chamber.lower_gate,
            upper_valve_percent: chamber.upper_valve.percent(),
            lower_valve_percent: chamber.lower_valve.percent(),
            fill_percent: level_percent(displayed, constants.chamber_height),
            upper_fill_percent: level_percent(self.basins.upper, constants.chamber_height),
            lower_fill_percent: level_percent(self.basins.lower, constants.chamber_height),
            ship_area_ratio_percent: ship.footprint_area / constants.chamber_area * 100.0,
            upper_equalized: (displayed - self.basins.upper).abs() <= tolerance,
            lower_equalized: (displayed - self.basins.lower).abs() <= tolerance,
            available_moves: self.controller.available_moves(),
        })
    }
}
