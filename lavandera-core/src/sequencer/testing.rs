//! Recording doubles shared by the sequencer tests

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use crate::recipe::{ChemicalId, Speed, WaterTemperature};
use crate::traits::{HardwareError, SequencerObserver, WasherIo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Fill(WaterTemperature),
    Dose(Option<ChemicalId>),
    Drain(bool),
    Agitate(Speed),
    Spin(Speed),
    StopAll,
}

#[derive(Debug, Default)]
pub struct RecordingWasher {
    pub calls: Vec<Call>,
    pub emergency: bool,
    pub fail_on: Option<Call>,
}

impl RecordingWasher {
    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn record(&mut self, call: Call) -> Result<(), HardwareError> {
        self.calls.push(call);
        if self.fail_on == Some(call) {
            Err(HardwareError::Timeout { command: "TEST" })
        } else {
            Ok(())
        }
    }
}

impl WasherIo for RecordingWasher {
    fn fill(&mut self, water: WaterTemperature) -> Result<(), HardwareError> {
        self.record(Call::Fill(water))
    }
    fn dose(&mut self, chemical: Option<ChemicalId>) -> Result<(), HardwareError> {
        self.record(Call::Dose(chemical))
    }
    fn drain_open(&mut self, open: bool) -> Result<(), HardwareError> {
        self.record(Call::Drain(open))
    }
    fn agitate(&mut self, speed: Speed) -> Result<(), HardwareError> {
        self.record(Call::Agitate(speed))
    }
    fn spin(&mut self, speed: Speed) -> Result<(), HardwareError> {
        self.record(Call::Spin(speed))
    }
    fn stop_all(&mut self) -> Result<(), HardwareError> {
        self.record(Call::StopAll)
    }
    fn is_emergency_stop_active(&mut self) -> bool {
        self.emergency
    }
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub statuses: Vec<String>,
    pub ticks: Vec<(usize, u32, u64)>,
    pub steps: Vec<usize>,
    pub finished: usize,
}

impl SequencerObserver for RecordingObserver {
    fn on_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }
    fn on_tick(&mut self, stage_index: usize, stage_remaining_s: u32, total_remaining_s: u64) {
        self.ticks.push((stage_index, stage_remaining_s, total_remaining_s));
    }
    fn on_step_change(&mut self, stage_index: usize) {
        self.steps.push(stage_index);
    }
    fn on_finish(&mut self) {
        self.finished += 1;
    }
}

/// Delay double that only adds up the requested time
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub total_ns: u64,
    pub calls: usize,
    /// Raise the flag once this many delays have been requested
    pub cancel_after: Option<(usize, &'static AtomicBool)>,
}

impl CountingDelay {
    fn wait(&mut self, ns: u64) {
        self.total_ns += ns;
        self.calls += 1;
        if let Some((after, flag)) = self.cancel_after {
            if self.calls >= after {
                flag.store(true, Ordering::Relaxed);
            }
        }
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.wait(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.wait(u64::from(ms) * 1_000_000);
    }
}
