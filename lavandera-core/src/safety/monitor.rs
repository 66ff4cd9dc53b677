//! Safety monitor implementation

use crate::traits::HardwareError;

/// Kind of safety fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Emergency-stop input is active
    EmergencyStop,
    /// A hardware command failed
    Hardware,
}

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All conditions normal
    Ok,
    /// Safety condition violated
    Fault(FaultKind),
}

/// Safety monitor for fault detection
///
/// The emergency-stop reading is refreshed every tick. The first hardware
/// fault is latched until [`SafetyMonitor::clear`] (loading a recipe).
#[derive(Debug, Clone, Default)]
pub struct SafetyMonitor {
    /// Last emergency-stop reading
    emergency_stop: bool,
    /// Last suction reading, if ever read
    suction: Option<bool>,
    /// First hardware fault since the last clear
    fault: Option<HardwareError>,
}

impl SafetyMonitor {
    /// Create a new safety monitor
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the emergency-stop reading
    pub fn update_emergency_stop(&mut self, active: bool) {
        self.emergency_stop = active;
    }

    /// Update the suction reading
    ///
    /// Recorded for status display only; loss of suction is not a fault.
    pub fn update_suction(&mut self, present: bool) {
        self.suction = Some(present);
    }

    /// Record a hardware fault (the first one is kept)
    pub fn record_fault(&mut self, err: HardwareError) {
        if self.fault.is_none() {
            self.fault = Some(err);
        }
    }

    /// Clear the latched fault and readings
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check all safety conditions
    ///
    /// The emergency stop takes precedence over a latched hardware fault.
    pub fn check(&self) -> SafetyStatus {
        if self.emergency_stop {
            return SafetyStatus::Fault(FaultKind::EmergencyStop);
        }

        if self.fault.is_some() {
            return SafetyStatus::Fault(FaultKind::Hardware);
        }

        SafetyStatus::Ok
    }

    /// Latched hardware fault, if any
    pub fn fault(&self) -> Option<&HardwareError> {
        self.fault.as_ref()
    }

    /// Last emergency-stop reading
    pub fn is_emergency_stop_active(&self) -> bool {
        self.emergency_stop
    }

    /// Last suction reading
    pub fn suction(&self) -> Option<bool> {
        self.suction
    }
}
