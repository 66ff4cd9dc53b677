//! Tick-driven cycle sequencer
//!
//! The caller owns the clock: it calls [`Sequencer::tick`] every 100-250 ms
//! with the elapsed time, and the sequencer advances through the recipe,
//! drives the washer and reports progress to the observer.
//!
//! Every entry point takes `&mut self`, so one sequencer can only be driven
//! from one place at a time. Callers sharing it across threads must wrap it
//! in their own lock.

use core::fmt::Write;
use core::time::Duration;

use heapless::String;

use super::commands::{apply_stage, safe_stop};
use crate::recipe::Recipe;
use crate::safety::SafetyMonitor;
use crate::state::{Event, RunState};
use crate::traits::{HardwareError, SequencerObserver, WasherIo};

/// Longest status line sent to the observer
pub const MAX_STATUS_LEN: usize = 96;

/// Cycle sequencer
///
/// Owns the washer and the observer for its whole life; use
/// [`Sequencer::washer_mut`] / [`Sequencer::into_parts`] to reach them.
#[derive(Debug)]
pub struct Sequencer<H: WasherIo, O: SequencerObserver> {
    washer: H,
    observer: O,
    safety: SafetyMonitor,
    /// Loaded recipe (never modified)
    recipe: Option<Recipe>,
    /// Current run state
    state: RunState,
    /// Current stage index (0-based)
    stage_index: usize,
    /// Whole seconds left in the current stage
    stage_remaining_s: u32,
    /// Whole seconds left in the whole recipe
    total_remaining_s: u64,
    /// Elapsed time not yet consumed as a whole second
    carry: Duration,
}

impl<H: WasherIo, O: SequencerObserver> Sequencer<H, O> {
    /// Create an idle sequencer with no recipe
    pub fn new(washer: H, observer: O) -> Self {
        Self {
            washer,
            observer,
            safety: SafetyMonitor::new(),
            recipe: None,
            state: RunState::Idle,
            stage_index: 0,
            stage_remaining_s: 0,
            total_remaining_s: 0,
            carry: Duration::ZERO,
        }
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Loaded recipe
    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_ref()
    }

    /// Current stage index
    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    /// Whole seconds left in the current stage
    pub fn stage_remaining_s(&self) -> u32 {
        self.stage_remaining_s
    }

    /// Whole seconds left in the recipe
    pub fn total_remaining_s(&self) -> u64 {
        self.total_remaining_s
    }

    /// Safety monitor state
    pub fn safety(&self) -> &SafetyMonitor {
        &self.safety
    }

    pub fn washer(&self) -> &H {
        &self.washer
    }

    pub fn washer_mut(&mut self) -> &mut H {
        &mut self.washer
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Take back the washer and the observer
    pub fn into_parts(self) -> (H, O) {
        (self.washer, self.observer)
    }

    /// Load a recipe and reset progress
    ///
    /// Allowed in any state; this is the only way out of `Stopped`. A
    /// running cycle has its actuators turned off first.
    pub fn load_recipe(&mut self, recipe: Recipe) {
        if self.state.actuators_allowed() {
            if let Err(e) = self.washer.stop_all() {
                warn!("stop_all failed while loading recipe: {}", e.command().unwrap_or("-"));
            }
        }

        self.transition(Event::Load);
        self.safety.clear();
        self.recipe = Some(recipe);
        self.reset_progress();

        let mut text: String<MAX_STATUS_LEN> = String::new();
        if let Some(recipe) = &self.recipe {
            let (stages, total) = (recipe.len(), recipe.total_duration_s());
            // Long names drop out of the line, the counts stay
            if write!(text, "loaded '{}': {} stages, {} s", recipe.name(), stages, total).is_err() {
                text.clear();
                let _ = write!(text, "loaded recipe: {} stages, {} s", stages, total);
            }
        }
        self.status(&text);
    }

    /// Start the loaded recipe from its first stage
    ///
    /// Only allowed from `Idle` with a non-empty recipe; otherwise a status
    /// line explains why nothing happened.
    pub fn start(&mut self) {
        if self.state != RunState::Idle {
            let mut text: String<MAX_STATUS_LEN> = String::new();
            let _ = write!(text, "cannot start while {}", self.state.as_str());
            self.status(&text);
            return;
        }
        if self.recipe.as_ref().map_or(true, Recipe::is_empty) {
            self.status("no recipe loaded");
            return;
        }

        self.reset_progress();
        self.transition(Event::Start);
        self.enter_stage(0);
    }

    /// Toggle between running and paused
    ///
    /// Pausing turns every actuator off; resuming re-applies the current
    /// stage. The stage timer and any partial second are kept.
    pub fn pause(&mut self) {
        match self.state {
            RunState::Running => {
                self.transition(Event::Pause);
                if let Err(e) = self.washer.stop_all() {
                    self.fault(e);
                    return;
                }
                self.status("paused");
            }
            RunState::Paused => self.resume(),
            _ => debug!("pause ignored in {}", self.state.as_str()),
        }
    }

    /// Resume a paused cycle
    pub fn resume(&mut self) {
        if self.state != RunState::Paused {
            debug!("resume ignored in {}", self.state.as_str());
            return;
        }

        self.transition(Event::Resume);
        if let Err(e) = self.apply_current() {
            self.fault(e);
            return;
        }
        self.status("resumed");
    }

    /// Stop the cycle: everything off, drain open
    ///
    /// Idempotent; calling it again while stopped sends nothing.
    pub fn stop(&mut self) {
        self.shutdown(Event::Stop, "stopped");
    }

    /// Advance time by `delta`
    ///
    /// The emergency-stop input is polled first, before anything else. Only
    /// a running cycle consumes time; whole seconds are taken from the
    /// accumulated time and the remainder carries into the next tick.
    pub fn tick(&mut self, delta: Duration) {
        let emergency = self.washer.is_emergency_stop_active();
        self.safety.update_emergency_stop(emergency);
        if emergency {
            self.shutdown(Event::EmergencyStop, "emergency stop active");
            return;
        }

        if self.state == RunState::Running {
            let suction = self.washer.has_suction();
            self.safety.update_suction(suction);

            self.carry += delta;
            let mut whole = self.carry.as_secs();
            self.carry -= Duration::from_secs(whole);

            while whole > 0 && self.state == RunState::Running {
                let step = whole.min(u64::from(self.stage_remaining_s));
                self.stage_remaining_s -= step as u32;
                self.total_remaining_s = self.total_remaining_s.saturating_sub(step);
                whole -= step;

                if self.stage_remaining_s == 0 {
                    self.enter_stage(self.stage_index + 1);
                }
            }
        }

        if self.recipe.is_some() {
            self.observer
                .on_tick(self.stage_index, self.stage_remaining_s, self.total_remaining_s);
        }
    }

    fn reset_progress(&mut self) {
        self.stage_index = 0;
        self.carry = Duration::ZERO;
        let recipe = self.recipe.as_ref();
        self.stage_remaining_s = recipe.and_then(|r| r.stage(0)).map_or(0, |s| s.duration_s);
        self.total_remaining_s = recipe.map_or(0, Recipe::total_duration_s);
    }

    /// Enter the first stage at or after `index` that has a duration
    ///
    /// Zero-length stages are passed over without issuing commands. Running
    /// off the end finishes the cycle.
    fn enter_stage(&mut self, index: usize) {
        let next = self.recipe.as_ref().and_then(|r| {
            r.stages()
                .iter()
                .enumerate()
                .skip(index)
                .find(|(_, s)| s.duration_s > 0)
                .map(|(i, s)| (i, s.duration_s))
        });

        let Some((index, duration_s)) = next else {
            self.finish();
            return;
        };

        self.stage_index = index;
        self.stage_remaining_s = duration_s;
        debug!("entering stage {} ({} s)", index, duration_s);

        if let Err(e) = self.apply_current() {
            self.fault(e);
            return;
        }
        self.observer.on_step_change(index);
    }

    fn apply_current(&mut self) -> Result<(), HardwareError> {
        match self.recipe.as_ref().and_then(|r| r.stage(self.stage_index)) {
            Some(stage) => apply_stage(&mut self.washer, stage),
            None => Ok(()),
        }
    }

    fn finish(&mut self) {
        if let Err(e) = self.washer.stop_all() {
            self.fault(e);
            return;
        }

        self.stage_remaining_s = 0;
        self.total_remaining_s = 0;
        self.carry = Duration::ZERO;
        self.transition(Event::Finished);
        self.observer.on_finish();
        self.status("cycle complete");
    }

    /// Record a hardware fault and force the safe stop
    fn fault(&mut self, err: HardwareError) {
        error!("hardware fault on {}", err.command().unwrap_or("link"));

        let mut text: String<MAX_STATUS_LEN> = String::new();
        if write!(text, "hardware fault: {}", err).is_err() {
            text.clear();
            let _ = text.push_str("hardware fault");
        }
        self.safety.record_fault(err);
        self.status(&text);
        self.shutdown(Event::Fault, "stopped after fault");
    }

    fn shutdown(&mut self, event: Event, reason: &str) {
        if self.state == RunState::Stopped {
            return;
        }

        if event.is_safety_event() {
            warn!("{:?} in {}", event, self.state.as_str());
        }
        self.transition(event);

        if let Err(e) = safe_stop(&mut self.washer) {
            error!("safe stop incomplete: {}", e.command().unwrap_or("link"));
            self.safety.record_fault(e);
        }
        self.status(reason);
    }

    fn transition(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            info!("{} -> {}", self.state.as_str(), next.as_str());
        }
        self.state = next;
    }

    fn status(&mut self, text: &str) {
        debug!("status: {}", text);
        self.observer.on_status(text);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{Call, RecordingObserver, RecordingWasher};
    use super::*;
    use crate::recipe::{parse, Speed, Stage, StageKind};
    use alloc::string::String as StdString;
    use alloc::vec;
    use alloc::vec::Vec;

    type TestSequencer = Sequencer<RecordingWasher, RecordingObserver>;

    fn recipe(durations: &[u32]) -> Recipe {
        let stages: Vec<Stage> = durations
            .iter()
            .map(|&d| Stage::new(StageKind::Drain, "drenaje", d))
            .collect();
        Recipe::new(StdString::from("test"), stages)
    }

    fn loaded(durations: &[u32]) -> TestSequencer {
        let mut seq = Sequencer::new(RecordingWasher::default(), RecordingObserver::default());
        seq.load_recipe(recipe(durations));
        seq
    }

    fn tick_secs(seq: &mut TestSequencer, n: u32) {
        for _ in 0..n {
            seq.tick(Duration::from_secs(1));
        }
    }

    #[test]
    fn test_load_resets_progress() {
        let seq = loaded(&[5, 0, 3]);
        assert_eq!(seq.state(), RunState::Idle);
        assert_eq!(seq.stage_index(), 0);
        assert_eq!(seq.stage_remaining_s(), 5);
        assert_eq!(seq.total_remaining_s(), 8);
    }

    #[test]
    fn test_zero_stage_skipped_and_eight_ticks_to_idle() {
        let mut seq = loaded(&[5, 0, 3]);
        seq.start();
        assert_eq!(seq.state(), RunState::Running);

        tick_secs(&mut seq, 5);
        assert_eq!(seq.stage_index(), 2);
        assert_eq!(seq.stage_remaining_s(), 3);

        tick_secs(&mut seq, 2);
        assert_eq!(seq.state(), RunState::Running);

        tick_secs(&mut seq, 1);
        assert_eq!(seq.state(), RunState::Idle);
        assert_eq!(seq.observer().finished, 1);
        assert_eq!(seq.observer().steps, vec![0, 2]);
    }

    #[test]
    fn test_sub_second_ticks_carry() {
        let mut seq = loaded(&[2]);
        seq.start();
        for _ in 0..9 {
            seq.tick(Duration::from_millis(200));
        }
        assert_eq!(seq.stage_remaining_s(), 1);
        seq.tick(Duration::from_millis(200));
        assert_eq!(seq.state(), RunState::Idle);
    }

    #[test]
    fn test_long_tick_spans_stages() {
        let mut seq = loaded(&[2, 3, 4]);
        seq.start();
        seq.tick(Duration::from_secs(4));
        assert_eq!(seq.stage_index(), 1);
        assert_eq!(seq.stage_remaining_s(), 1);
        assert_eq!(seq.total_remaining_s(), 5);
    }

    #[test]
    fn test_pause_resume_loses_no_time() {
        let mut seq = loaded(&[10]);
        seq.start();
        tick_secs(&mut seq, 3);
        seq.tick(Duration::from_millis(500));

        seq.pause();
        assert_eq!(seq.state(), RunState::Paused);
        tick_secs(&mut seq, 20);
        assert_eq!(seq.stage_remaining_s(), 7);

        seq.pause();
        assert_eq!(seq.state(), RunState::Running);
        // The half second from before the pause still counts
        seq.tick(Duration::from_millis(500));
        assert_eq!(seq.stage_remaining_s(), 6);
        assert_eq!(seq.total_remaining_s(), 6);
    }

    #[test]
    fn test_pause_clears_outputs_and_resume_reapplies_stage() {
        let text = "accion=centrifugado;duracion=30";
        let mut seq = Sequencer::new(RecordingWasher::default(), RecordingObserver::default());
        seq.load_recipe(parse(text).unwrap());
        seq.start();
        assert_eq!(seq.washer().count(Call::Spin(Speed::High)), 1);

        seq.pause();
        assert_eq!(seq.washer().calls.last(), Some(&Call::StopAll));

        seq.resume();
        assert_eq!(seq.washer().count(Call::Spin(Speed::High)), 2);
        assert_eq!(seq.observer().steps, vec![0]);
    }

    #[test]
    fn test_emergency_stop_forces_stopped() {
        for state in [RunState::Idle, RunState::Running, RunState::Paused] {
            let mut seq = loaded(&[10]);
            if state != RunState::Idle {
                seq.start();
            }
            if state == RunState::Paused {
                seq.pause();
            }
            assert_eq!(seq.state(), state);

            let drains_before = seq.washer().count(Call::Drain(true));
            seq.washer_mut().emergency = true;
            seq.tick(Duration::from_millis(200));

            assert_eq!(seq.state(), RunState::Stopped);
            assert_eq!(seq.washer().count(Call::Drain(true)), drains_before + 1);
        }
    }

    #[test]
    fn test_emergency_stop_preempts_time() {
        let mut seq = loaded(&[1]);
        seq.start();
        seq.washer_mut().emergency = true;
        seq.tick(Duration::from_secs(5));
        assert_eq!(seq.state(), RunState::Stopped);
        assert_eq!(seq.stage_remaining_s(), 1);
        assert_eq!(seq.observer().finished, 0);

        // Still held: nothing more is sent
        let sent = seq.washer().calls.len();
        seq.tick(Duration::from_secs(1));
        assert_eq!(seq.washer().calls.len(), sent);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut seq = loaded(&[10]);
        seq.start();
        seq.stop();
        let sent = seq.washer().calls.len();
        assert_eq!(seq.washer().calls[sent - 2..], [Call::StopAll, Call::Drain(true)]);

        seq.stop();
        assert_eq!(seq.washer().calls.len(), sent);
        assert_eq!(seq.state(), RunState::Stopped);
    }

    #[test]
    fn test_stopped_until_new_recipe() {
        let mut seq = loaded(&[10]);
        seq.stop();
        seq.start();
        assert_eq!(seq.state(), RunState::Stopped);

        seq.load_recipe(recipe(&[4]));
        assert_eq!(seq.state(), RunState::Idle);
        seq.start();
        assert_eq!(seq.state(), RunState::Running);
    }

    #[test]
    fn test_start_without_recipe() {
        let mut seq = Sequencer::new(RecordingWasher::default(), RecordingObserver::default());
        seq.start();
        assert_eq!(seq.state(), RunState::Idle);
        assert_eq!(seq.observer().statuses, vec![StdString::from("no recipe loaded")]);
        assert!(seq.washer().calls.is_empty());
    }

    #[test]
    fn test_start_with_empty_recipe() {
        let mut seq = loaded(&[]);
        seq.start();
        assert_eq!(seq.state(), RunState::Idle);
        assert_eq!(
            seq.observer().statuses.last().map(StdString::as_str),
            Some("no recipe loaded")
        );
    }

    #[test]
    fn test_start_with_all_zero_sectioned_recipe() {
        let text = "[LAVADO]\nLLENADO_S=0\n[ENJUAGUE]\nREPETICIONES=0\n[CENTRIFUGADO]\nCENTRIFUGADO_S=0\n";
        let mut seq = Sequencer::new(RecordingWasher::default(), RecordingObserver::default());
        seq.load_recipe(parse(text).unwrap());
        assert_eq!(seq.total_remaining_s(), 0);
        assert_eq!(seq.stage_remaining_s(), 0);

        seq.start();
        assert_eq!(seq.state(), RunState::Idle);
        assert_eq!(
            seq.observer().statuses.last().map(StdString::as_str),
            Some("no recipe loaded")
        );
        assert!(seq.washer().calls.is_empty());
    }

    #[test]
    fn test_long_recipe_name_keeps_counts_in_status() {
        let mut seq = Sequencer::new(RecordingWasher::default(), RecordingObserver::default());
        let name = "x".repeat(MAX_STATUS_LEN);
        seq.load_recipe(Recipe::new(name, vec![Stage::new(StageKind::Drain, "drenaje", 30)]));
        assert_eq!(
            seq.observer().statuses.last().map(StdString::as_str),
            Some("loaded recipe: 1 stages, 30 s")
        );
    }

    #[test]
    fn test_no_time_passes_while_idle() {
        let mut seq = loaded(&[5]);
        tick_secs(&mut seq, 3);
        assert_eq!(seq.stage_remaining_s(), 5);
        assert_eq!(seq.observer().ticks.len(), 3);
    }

    #[test]
    fn test_hardware_fault_stops_cycle() {
        let mut seq = loaded(&[5, 5]);
        seq.washer_mut().fail_on = Some(Call::Drain(true));
        seq.start();

        assert_eq!(seq.state(), RunState::Stopped);
        assert!(seq.safety().fault().is_some());
        assert!(seq
            .observer()
            .statuses
            .iter()
            .any(|s| s.starts_with("hardware fault")));
    }

    #[test]
    fn test_finish_turns_everything_off() {
        let mut seq = loaded(&[1]);
        seq.start();
        tick_secs(&mut seq, 1);
        assert_eq!(seq.state(), RunState::Idle);
        assert_eq!(seq.washer().calls.last(), Some(&Call::StopAll));
        assert_eq!(seq.total_remaining_s(), 0);

        // A finished recipe can run again
        seq.start();
        assert_eq!(seq.state(), RunState::Running);
        assert_eq!(seq.stage_remaining_s(), 1);
    }

    #[test]
    fn test_all_zero_recipe_finishes_on_start() {
        let mut seq = loaded(&[0, 0]);
        seq.start();
        assert_eq!(seq.state(), RunState::Idle);
        assert_eq!(seq.observer().finished, 1);
        assert!(seq.observer().steps.is_empty());
    }
}
