//! Simulated washer
//!
//! Records every command and tracks what the outputs would be. Used for dry
//! runs and as the washer in host-side tests.

use alloc::vec::Vec;

use lavandera_core::recipe::{ChemicalId, Speed, WaterTemperature};
use lavandera_core::traits::{HardwareError, WasherIo};

/// A command received by the simulated washer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoCall {
    Fill(WaterTemperature),
    Dose(Option<ChemicalId>),
    DrainOpen(bool),
    Agitate(Speed),
    Spin(Speed),
    StopAll,
}

/// Drum motor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motor {
    #[default]
    Off,
    Agitating(Speed),
    Spinning(Speed),
}

/// Current state of the simulated outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outputs {
    /// Open inlet, `None` when closed
    pub water: Option<WaterTemperature>,
    /// Running dosing pump
    pub dosing: Option<ChemicalId>,
    pub drain_open: bool,
    pub motor: Motor,
}

impl Outputs {
    /// Check if every actuator is off
    pub fn all_off(&self) -> bool {
        *self == Outputs::default()
    }
}

/// Washer that only records commands
#[derive(Debug, Default)]
pub struct SimulatedWasher {
    log: Vec<IoCall>,
    outputs: Outputs,
    emergency_stop: bool,
    suction: Option<bool>,
    fail_next: Option<HardwareError>,
}

impl SimulatedWasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far, oldest first
    pub fn log(&self) -> &[IoCall] {
        &self.log
    }

    /// Forget the recorded commands
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Number of times `call` was received
    pub fn count(&self, call: IoCall) -> usize {
        self.log.iter().filter(|&&c| c == call).count()
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Press or release the simulated emergency-stop button
    pub fn set_emergency_stop(&mut self, active: bool) {
        self.emergency_stop = active;
    }

    /// Set the suction sensor reading; `None` means not wired
    pub fn set_suction(&mut self, suction: Option<bool>) {
        self.suction = suction;
    }

    /// Make the next actuator command fail with `error`
    pub fn fail_next(&mut self, error: HardwareError) {
        self.fail_next = Some(error);
    }

    fn record(&mut self, call: IoCall) -> Result<(), HardwareError> {
        self.log.push(call);
        if let Some(error) = self.fail_next.take() {
            warn!("sim: injected failure");
            return Err(error);
        }

        match call {
            IoCall::Fill(water) => {
                self.outputs.water = Some(match water {
                    WaterTemperature::Hot => WaterTemperature::Hot,
                    _ => WaterTemperature::Cold,
                });
            }
            IoCall::Dose(chemical) => {
                if chemical.is_some() {
                    self.outputs.dosing = chemical;
                }
            }
            IoCall::DrainOpen(open) => self.outputs.drain_open = open,
            IoCall::Agitate(speed) => self.outputs.motor = motor(speed, Motor::Agitating),
            IoCall::Spin(speed) => self.outputs.motor = motor(speed, Motor::Spinning),
            IoCall::StopAll => self.outputs = Outputs::default(),
        }
        Ok(())
    }
}

fn motor(speed: Speed, mode: fn(Speed) -> Motor) -> Motor {
    match speed {
        Speed::None => Motor::Off,
        speed => mode(speed),
    }
}

impl WasherIo for SimulatedWasher {
    fn fill(&mut self, water: WaterTemperature) -> Result<(), HardwareError> {
        debug!("sim: fill {:?}", water);
        self.record(IoCall::Fill(water))
    }

    fn dose(&mut self, chemical: Option<ChemicalId>) -> Result<(), HardwareError> {
        debug!("sim: dose {:?}", chemical);
        self.record(IoCall::Dose(chemical))
    }

    fn drain_open(&mut self, open: bool) -> Result<(), HardwareError> {
        debug!("sim: drain open={}", open);
        self.record(IoCall::DrainOpen(open))
    }

    fn agitate(&mut self, speed: Speed) -> Result<(), HardwareError> {
        debug!("sim: agitate {:?}", speed);
        self.record(IoCall::Agitate(speed))
    }

    fn spin(&mut self, speed: Speed) -> Result<(), HardwareError> {
        debug!("sim: spin {:?}", speed);
        self.record(IoCall::Spin(speed))
    }

    fn stop_all(&mut self) -> Result<(), HardwareError> {
        debug!("sim: stop all");
        self.record(IoCall::StopAll)
    }

    fn is_emergency_stop_active(&mut self) -> bool {
        self.emergency_stop
    }

    fn has_suction(&mut self) -> bool {
        self.suction.unwrap_or(true)
    }
}
