//! Washer hardware abstraction
//!
//! The sequencer drives the machine exclusively through [`WasherIo`].
//! Implementations live in `lavandera-drivers`: a simulated washer that only
//! records commands, and a transport-backed washer that talks to the relay
//! controller over a serial line.

use heapless::String;

use crate::recipe::{ChemicalId, Speed, WaterTemperature};

/// Longest controller reply kept in a [`HardwareError::Rejected`]
pub const MAX_REPLY_LEN: usize = 48;

/// Errors raised by washer hardware commands
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareError {
    /// Controller did not acknowledge the command in time
    #[error("no reply to {command} within the acknowledgement timeout")]
    Timeout { command: &'static str },
    /// Controller answered with an error
    #[error("{command} rejected by controller: {reply}")]
    Rejected {
        command: &'static str,
        reply: String<MAX_REPLY_LEN>,
    },
    /// Link to the controller is unusable
    #[error("controller link failure")]
    Link,
}

impl HardwareError {
    /// Build a rejection, truncating the reply if it is too long
    pub fn rejected(command: &'static str, reply: &str) -> Self {
        let mut kept = String::new();
        for c in reply.chars() {
            if kept.push(c).is_err() {
                break;
            }
        }
        HardwareError::Rejected {
            command,
            reply: kept,
        }
    }

    /// Command that failed, if known
    pub fn command(&self) -> Option<&'static str> {
        match self {
            HardwareError::Timeout { command } | HardwareError::Rejected { command, .. } => {
                Some(command)
            }
            HardwareError::Link => None,
        }
    }
}

/// Washer actuators and safety inputs
///
/// Actuator methods return an error when the command could not be carried
/// out; the sequencer treats any such error as a fault and stops the cycle.
pub trait WasherIo {
    /// Open the water inlet
    ///
    /// [`WaterTemperature::None`] opens the default (cold) inlet.
    fn fill(&mut self, water: WaterTemperature) -> Result<(), HardwareError>;

    /// Start dosing a chemical; `None` does nothing
    fn dose(&mut self, chemical: Option<ChemicalId>) -> Result<(), HardwareError>;

    /// Open (run the drain pump) or close the drain
    fn drain_open(&mut self, open: bool) -> Result<(), HardwareError>;

    /// Run the drum in reversing agitation mode
    fn agitate(&mut self, speed: Speed) -> Result<(), HardwareError>;

    /// Run the drum in fixed spin mode
    fn spin(&mut self, speed: Speed) -> Result<(), HardwareError>;

    /// Turn every actuator off
    fn stop_all(&mut self) -> Result<(), HardwareError>;

    /// Check the emergency-stop input
    ///
    /// Implementations that cannot read the input must report it as active.
    fn is_emergency_stop_active(&mut self) -> bool;

    /// Check the suction sensor
    ///
    /// Defaults to `true` for machines without the sensor wired.
    fn has_suction(&mut self) -> bool {
        true
    }
}

impl<T: WasherIo + ?Sized> WasherIo for &mut T {
    fn fill(&mut self, water: WaterTemperature) -> Result<(), HardwareError> {
        (**self).fill(water)
    }

    fn dose(&mut self, chemical: Option<ChemicalId>) -> Result<(), HardwareError> {
        (**self).dose(chemical)
    }

    fn drain_open(&mut self, open: bool) -> Result<(), HardwareError> {
        (**self).drain_open(open)
    }

    fn agitate(&mut self, speed: Speed) -> Result<(), HardwareError> {
        (**self).agitate(speed)
    }

    fn spin(&mut self, speed: Speed) -> Result<(), HardwareError> {
        (**self).spin(speed)
    }

    fn stop_all(&mut self) -> Result<(), HardwareError> {
        (**self).stop_all()
    }

    fn is_emergency_stop_active(&mut self) -> bool {
        (**self).is_emergency_stop_active()
    }

    fn has_suction(&mut self) -> bool {
        (**self).has_suction()
    }
}
