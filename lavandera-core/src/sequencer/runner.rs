//! Whole-recipe runners
//!
//! [`CycleRunner`] runs one recipe from start to finish and blocks the
//! caller until it ends. [`BatchRunner`] waits each stage out without
//! looking at the safety inputs; [`TickedRunner`] drives a [`Sequencer`] at
//! a fixed tick, so the emergency stop and every other sequencer rule
//! apply. [`CycleStrategy`] picks one at runtime.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use embedded_hal::delay::DelayNs;

use super::batch::{BatchOutcome, BatchRunner};
use super::engine::Sequencer;
use crate::config::SequencerConfig;
use crate::recipe::Recipe;
use crate::state::RunState;
use crate::traits::{HardwareError, SequencerObserver, WasherIo};

/// Run a recipe to the end, blocking the caller
///
/// Raising `cancel` ends the run with [`BatchOutcome::Cancelled`] after the
/// washer has been stopped and drained. A hardware error stops and drains
/// the washer and is returned as `Err`.
pub trait CycleRunner {
    fn run_cycle<H, O, D>(
        &self,
        recipe: &Recipe,
        washer: &mut H,
        observer: &mut O,
        delay: &mut D,
        cancel: &AtomicBool,
    ) -> Result<BatchOutcome, HardwareError>
    where
        H: WasherIo + ?Sized,
        O: SequencerObserver + ?Sized,
        D: DelayNs + ?Sized;
}

impl CycleRunner for BatchRunner {
    fn run_cycle<H, O, D>(
        &self,
        recipe: &Recipe,
        washer: &mut H,
        observer: &mut O,
        delay: &mut D,
        cancel: &AtomicBool,
    ) -> Result<BatchOutcome, HardwareError>
    where
        H: WasherIo + ?Sized,
        O: SequencerObserver + ?Sized,
        D: DelayNs + ?Sized,
    {
        self.run(recipe, washer, observer, delay, cancel)
    }
}

/// Runner that ticks a [`Sequencer`] until the cycle leaves the active
/// states
#[derive(Debug, Clone, Copy)]
pub struct TickedRunner {
    tick_interval_ms: u32,
}

impl Default for TickedRunner {
    fn default() -> Self {
        Self::new(&SequencerConfig::default())
    }
}

impl TickedRunner {
    /// Create a runner ticking at the configured interval
    pub fn new(config: &SequencerConfig) -> Self {
        Self::with_tick_interval_ms(config.tick_interval_ms)
    }

    /// Create a runner with an explicit tick (clamped to at least 1 ms)
    pub fn with_tick_interval_ms(tick_interval_ms: u32) -> Self {
        Self {
            tick_interval_ms: tick_interval_ms.max(1),
        }
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }
}

impl CycleRunner for TickedRunner {
    fn run_cycle<H, O, D>(
        &self,
        recipe: &Recipe,
        washer: &mut H,
        observer: &mut O,
        delay: &mut D,
        cancel: &AtomicBool,
    ) -> Result<BatchOutcome, HardwareError>
    where
        H: WasherIo + ?Sized,
        O: SequencerObserver + ?Sized,
        D: DelayNs + ?Sized,
    {
        info!("ticked run: {} stages every {} ms", recipe.len(), self.tick_interval_ms);
        let step = Duration::from_millis(u64::from(self.tick_interval_ms));

        let mut sequencer = Sequencer::new(washer, observer);
        sequencer.load_recipe(recipe.clone());
        sequencer.start();

        while sequencer.state().is_active() {
            if cancel.load(Ordering::Relaxed) {
                warn!("ticked run cancelled in stage {}", sequencer.stage_index());
                sequencer.stop();
                return match sequencer.safety().fault() {
                    Some(err) => Err(err.clone()),
                    None => Ok(BatchOutcome::Cancelled),
                };
            }
            delay.delay_ms(self.tick_interval_ms);
            sequencer.tick(step);
        }

        match (sequencer.state(), sequencer.safety().fault()) {
            (RunState::Stopped, Some(err)) => Err(err.clone()),
            (RunState::Stopped, None) => Ok(BatchOutcome::EmergencyStopped),
            _ => Ok(BatchOutcome::Completed),
        }
    }
}

/// Runner chosen at runtime
#[derive(Debug, Clone, Copy)]
pub enum CycleStrategy {
    /// Tick a [`Sequencer`]; honours the emergency stop
    Ticked(TickedRunner),
    /// Wait each stage out; simulated washers only
    Blocking(BatchRunner),
}

impl Default for CycleStrategy {
    fn default() -> Self {
        CycleStrategy::Ticked(TickedRunner::default())
    }
}

impl CycleRunner for CycleStrategy {
    fn run_cycle<H, O, D>(
        &self,
        recipe: &Recipe,
        washer: &mut H,
        observer: &mut O,
        delay: &mut D,
        cancel: &AtomicBool,
    ) -> Result<BatchOutcome, HardwareError>
    where
        H: WasherIo + ?Sized,
        O: SequencerObserver + ?Sized,
        D: DelayNs + ?Sized,
    {
        match self {
            CycleStrategy::Ticked(runner) => runner.run_cycle(recipe, washer, observer, delay, cancel),
            CycleStrategy::Blocking(runner) => runner.run_cycle(recipe, washer, observer, delay, cancel),
        }
    }
}
