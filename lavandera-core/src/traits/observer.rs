//! Sequencer observer
//!
//! The only coupling point between the sequencer and a user interface.
//! Every method has an empty default so callers implement only what they
//! display.

/// Receives progress and status events from the sequencer
pub trait SequencerObserver {
    /// Human-readable status line
    fn on_status(&mut self, _text: &str) {}

    /// Called on every tick while a recipe is loaded
    fn on_tick(&mut self, _stage_index: usize, _stage_remaining_s: u32, _total_remaining_s: u64) {}

    /// A new stage started
    fn on_step_change(&mut self, _stage_index: usize) {}

    /// The last stage finished
    fn on_finish(&mut self) {}
}

/// Observer that discards everything
impl SequencerObserver for () {}

impl<T: SequencerObserver + ?Sized> SequencerObserver for &mut T {
    fn on_status(&mut self, text: &str) {
        (**self).on_status(text)
    }

    fn on_tick(&mut self, stage_index: usize, stage_remaining_s: u32, total_remaining_s: u64) {
        (**self).on_tick(stage_index, stage_remaining_s, total_remaining_s)
    }

    fn on_step_change(&mut self, stage_index: usize) {
        (**self).on_step_change(stage_index)
    }

    fn on_finish(&mut self) {
        (**self).on_finish()
    }
}
