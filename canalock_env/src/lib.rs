//! Canal Lock Environment Abstraction Layer
//!
//! This crate provides the clock abstraction allowing the lock simulation
//! to run against **Wall time** (tokio) or **Virtual time** (the
//! deterministic harness in `canalock_sim`).
//!
//! # Core Concept: The Frame Loop
//!
//! The simulation advances once per display frame. Everything the frame
//! loop needs from the outside world goes through [`LockContext`]:
//! - Time (`now()`, `sleep()`)
//! - Seeding (`seed()`) for reproducible frame-timing jitter
//!
//! # Example
//!
//! ```ignore
//! use canalock_env::{FrameRate, LockContext};
//!
//! async fn frame_loop<Ctx: LockContext>(ctx: &Ctx, rate: FrameRate) {
//!     loop {
//!         ctx.sleep(rate.interval()).await;
//!         session.tick(ctx.now())?;
//!     }
//! }
//! ```

mod context;
mod types;
mod error;
mod tokio_impl;

pub use context::LockContext;
pub use types::FrameRate;
pub use error::EnvError;
pub use tokio_impl::TokioContext;
