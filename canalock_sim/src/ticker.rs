//! FrameTicker - the single owned frame loop.
//!
//! One task owns the session and the clock context. Each frame it waits for
//! the next display refresh, reads the wall reference and hands it to the
//! session. Stopping is just leaving the loop; no frame reschedules itself.

use canalock_core::{FlowReport, LockResult, SimulationSession};
use canalock_env::{FrameRate, LockContext};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Totals for one `run_*` call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickerStats {
    /// Frames processed
    pub frames: u64,
    
    /// Virtual seconds integrated
    pub virtual_seconds: f64,
    
    /// Summed level change over the run (m)
    pub filled_m: f64,
    pub drained_m: f64,
}

impl TickerStats {
    fn record(&mut self, report: &FlowReport, dt: f64) {
        self.frames += 1;
        self.virtual_seconds += dt;
        self.filled_m += report.filled_m;
        self.drained_m += report.drained_m;
    }
}

/// Drives a session at a fixed frame cadence.
pub struct FrameTicker<C: LockContext> {
    ctx: Arc<C>,
    session: SimulationSession,
    frame_rate: FrameRate,
    total_frames: u64,
}

impl<C: LockContext> FrameTicker<C> {
    /// Creates a ticker using the session's configured frame rate.
    pub fn new(ctx: Arc<C>, session: SimulationSession) -> Self {
        let frame_rate = session.config().frame_rate;
        Self {
            ctx,
            session,
            frame_rate,
            total_frames: 0,
        }
    }
    
    /// Overrides the frame rate.
    pub fn with_frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }
    
    pub fn context(&self) -> &Arc<C> {
        &self.ctx
    }
    
    pub fn session(&self) -> &SimulationSession {
        &self.session
    }
    
    /// Mutable access for operator commands between frames.
    pub fn session_mut(&mut self) -> &mut SimulationSession {
        &mut self.session
    }
    
    pub fn into_session(self) -> SimulationSession {
        self.session
    }
    
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
    
    /// Starts the session clock at the context's current time.
    pub fn start(&mut self) {
        self.session.start(self.ctx.now());
    }
    
    pub fn pause(&mut self) {
        self.session.pause();
    }
    
    /// Waits for the next frame and integrates it.
    async fn frame(&mut self, stats: &mut TickerStats) -> LockResult<()> {
        self.ctx.sleep(self.frame_rate.interval()).await;
        
        let elapsed_before = self.session.clock().elapsed_secs();
        let report = self.session.tick(self.ctx.now())?;
        let dt = self.session.clock().elapsed_secs() - elapsed_before;
        
        stats.record(&report, dt);
        self.total_frames += 1;
        Ok(())
    }
    
    /// Runs exactly `frames` frames.
    pub async fn run_frames(&mut self, frames: u64) -> LockResult<TickerStats> {
        let mut stats = TickerStats::default();
        for _ in 0..frames {
            self.frame(&mut stats).await?;
        }
        debug!(frames = stats.frames, virtual_secs = stats.virtual_seconds, "ticker finished");
        Ok(stats)
    }
    
    /// Runs until `stop` turns true or its sender is dropped.
    pub async fn run_until(&mut self, mut stop: watch::Receiver<bool>) -> LockResult<TickerStats> {
        let mut stats = TickerStats::default();
        loop {
            if *stop.borrow() {
                break;
            }
            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                result = self.frame(&mut stats) => result?,
            }
        }
        debug!(frames = stats.frames, virtual_secs = stats.virtual_seconds, "ticker stopped");
        Ok(stats)
    }
}
