//! GPIO interlocks
//!
//! Many installations wire the emergency-stop button and the suction
//! pressure switch straight to the host instead of through the relay
//! controller. [`InterlockedWasher`] wraps any washer and reads those
//! inputs from pins.

use lavandera_core::recipe::{ChemicalId, Speed, WaterTemperature};
use lavandera_core::traits::{HardwareError, WasherIo};
use lavandera_hal::{ActiveLevel, InputPin};

/// Placeholder for an input that is not wired
pub struct NoPin;

impl InputPin for NoPin {
    fn is_high(&self) -> bool {
        false
    }
}

/// Emergency-stop and suction inputs
pub struct PinInterlocks<E, S = NoPin> {
    emergency_stop: E,
    emergency_level: ActiveLevel,
    suction: Option<(S, ActiveLevel)>,
}

impl<E: InputPin> PinInterlocks<E, NoPin> {
    /// Interlocks with only the emergency-stop input wired
    ///
    /// # Arguments
    /// - `emergency_stop`: The button input
    /// - `level`: Level at which the button counts as pressed; use
    ///   [`ActiveLevel::Low`] for normally-closed contacts
    pub fn new(emergency_stop: E, level: ActiveLevel) -> Self {
        Self {
            emergency_stop,
            emergency_level: level,
            suction: None,
        }
    }
}

impl<E: InputPin, S: InputPin> PinInterlocks<E, S> {
    /// Add the suction pressure switch; `level` is the level at which
    /// suction is present
    pub fn with_suction<S2: InputPin>(self, pin: S2, level: ActiveLevel) -> PinInterlocks<E, S2> {
        PinInterlocks {
            emergency_stop: self.emergency_stop,
            emergency_level: self.emergency_level,
            suction: Some((pin, level)),
        }
    }

    /// Check if the emergency-stop button is pressed
    pub fn emergency_stop_active(&self) -> bool {
        self.emergency_level.is_asserted(&self.emergency_stop)
    }

    /// Check the suction switch; `true` when not wired
    pub fn suction(&self) -> bool {
        match &self.suction {
            Some((pin, level)) => level.is_asserted(pin),
            None => true,
        }
    }
}

/// Washer whose safety inputs are read from GPIO
///
/// Actuator commands go to the inner washer. The emergency stop counts as
/// active when either the pin or the inner washer reports it.
pub struct InterlockedWasher<W, E, S = NoPin> {
    washer: W,
    interlocks: PinInterlocks<E, S>,
}

impl<W: WasherIo, E: InputPin, S: InputPin> InterlockedWasher<W, E, S> {
    pub fn new(washer: W, interlocks: PinInterlocks<E, S>) -> Self {
        Self { washer, interlocks }
    }

    pub fn interlocks(&self) -> &PinInterlocks<E, S> {
        &self.interlocks
    }

    /// Give back the inner washer and the interlocks
    pub fn release(self) -> (W, PinInterlocks<E, S>) {
        (self.washer, self.interlocks)
    }
}

impl<W: WasherIo, E: InputPin, S: InputPin> WasherIo for InterlockedWasher<W, E, S> {
    fn fill(&mut self, water: WaterTemperature) -> Result<(), HardwareError> {
        self.washer.fill(water)
    }

    fn dose(&mut self, chemical: Option<ChemicalId>) -> Result<(), HardwareError> {
        self.washer.dose(chemical)
    }

    fn drain_open(&mut self, open: bool) -> Result<(), HardwareError> {
        self.washer.drain_open(open)
    }

    fn agitate(&mut self, speed: Speed) -> Result<(), HardwareError> {
        self.washer.agitate(speed)
    }

    fn spin(&mut self, speed: Speed) -> Result<(), HardwareError> {
        self.washer.spin(speed)
    }

    fn stop_all(&mut self) -> Result<(), HardwareError> {
        self.washer.stop_all()
    }

    fn is_emergency_stop_active(&mut self) -> bool {
        if self.interlocks.emergency_stop_active() {
            return true;
        }
        self.washer.is_emergency_stop_active()
    }

    fn has_suction(&mut self) -> bool {
        self.interlocks.suction()
    }
}
