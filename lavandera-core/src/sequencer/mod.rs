//! Cycle sequencing
//!
//! Two ways to run a recipe against a washer:
//!
//! - [`Sequencer`]: tick-driven, supports pause/resume, stop and the
//!   emergency-stop interlock. Use this on real machines.
//! - [`BatchRunner`]: blocking, waits out each stage with a delay provider.
//!   Pause and emergency stop are not observed, so it is meant for offline
//!   validation against a simulated washer only.
//!
//! Callers that want to run a whole recipe and wait for the result go
//! through [`CycleRunner`], implemented by [`BatchRunner`] and by
//! [`TickedRunner`], which wraps a [`Sequencer`].

pub mod batch;
pub mod commands;
pub mod engine;
pub mod runner;

#[cfg(test)]
mod testing;

pub use batch::{BatchOutcome, BatchRunner};
pub use commands::{apply_stage, safe_stop};
pub use engine::Sequencer;
pub use runner::{CycleRunner, CycleStrategy, TickedRunner};
