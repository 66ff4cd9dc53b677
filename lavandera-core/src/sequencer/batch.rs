//! Blocking batch runner
//!
//! Applies the same stage commands as the [`Sequencer`](super::Sequencer)
//! but waits each stage out with an [`embedded_hal::delay::DelayNs`]
//! provider. The wait is split into short slices so a cancellation flag set
//! from another context is noticed quickly.
//!
//! The emergency-stop input is never read here. Do not point this at a
//! live machine.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use super::commands::{apply_stage, safe_stop};
use crate::config::SequencerConfig;
use crate::recipe::Recipe;
use crate::traits::{HardwareError, SequencerObserver, WasherIo};

/// How a whole-recipe run ended (hardware faults are returned as errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatchOutcome {
    /// Every stage ran to the end
    Completed,
    /// The cancellation flag was raised
    Cancelled,
    /// The emergency-stop input went active; only runners that poll it
    /// report this
    EmergencyStopped,
}

/// Blocking recipe runner
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    slice_ms: u32,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(&SequencerConfig::default())
    }
}

impl BatchRunner {
    /// Create a runner using the configured wait slice
    pub fn new(config: &SequencerConfig) -> Self {
        Self::with_slice_ms(config.batch_slice_ms)
    }

    /// Create a runner with an explicit wait slice (clamped to at least 1 ms)
    pub fn with_slice_ms(slice_ms: u32) -> Self {
        Self {
            slice_ms: slice_ms.max(1),
        }
    }

    /// Wait slice in milliseconds
    pub fn slice_ms(&self) -> u32 {
        self.slice_ms
    }

    /// Run `recipe` to completion, blocking the caller
    ///
    /// Observer events match the tick-driven path: a step change per stage
    /// entered, one tick per elapsed second, and a finish at the end.
    /// Raising `cancel` stops the washer, opens the drain and returns
    /// [`BatchOutcome::Cancelled`]. A hardware error does the same and is
    /// returned as `Err`.
    pub fn run<H, O, D>(
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
        info!("batch run: {} stages", recipe.len());
        let mut total_remaining_s = recipe.total_duration_s();

        for (index, stage) in recipe.stages().iter().enumerate() {
            if stage.duration_s == 0 {
                continue;
            }

            if let Err(e) = apply_stage(washer, stage) {
                return Err(abort(washer, observer, e));
            }
            observer.on_step_change(index);

            let mut stage_remaining_s = stage.duration_s;
            let mut elapsed_ms: u32 = 0;
            while stage_remaining_s > 0 {
                if cancel.load(Ordering::Relaxed) {
                    warn!("batch run cancelled in stage {}", index);
                    if let Err(e) = safe_stop(washer) {
                        return Err(abort(washer, observer, e));
                    }
                    observer.on_status("cancelled");
                    return Ok(BatchOutcome::Cancelled);
                }

                let slice = self.slice_ms.min(1000 - elapsed_ms);
                delay.delay_ms(slice);
                elapsed_ms += slice;

                if elapsed_ms >= 1000 {
                    elapsed_ms = 0;
                    stage_remaining_s -= 1;
                    total_remaining_s = total_remaining_s.saturating_sub(1);
                    observer.on_tick(index, stage_remaining_s, total_remaining_s);
                }
            }
        }

        if let Err(e) = washer.stop_all() {
            return Err(abort(washer, observer, e));
        }
        observer.on_finish();
        observer.on_status("cycle complete");
        Ok(BatchOutcome::Completed)
    }
}

fn abort<H, O>(washer: &mut H, observer: &mut O, err: HardwareError) -> HardwareError
where
    H: WasherIo + ?Sized,
    O: SequencerObserver + ?Sized,
{
    error!("batch run aborted on {}", err.command().unwrap_or("link"));
    if safe_stop(washer).is_err() {
        error!("safe stop incomplete");
    }
    observer.on_status("hardware fault");
    err
}
