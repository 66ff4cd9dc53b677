//! Transport-backed washer
//!
//! Drives the relay controller through a [`CommandTransport`]. Every
//! actuator method maps to one or more command lines, each of which must be
//! acknowledged with `OK`.

use lavandera_core::recipe::{ChemicalId, Speed, WaterTemperature};
use lavandera_core::traits::{HardwareError, WasherIo};
use lavandera_protocol::{Command, CommandTransport, MotorSpeed, Reply, TransportError};

/// Commands sent by [`WasherIo::stop_all`], motor first
const STOP_SEQUENCE: [Command; 7] = [
    Command::MotorOff,
    Command::WaterOff,
    Command::DoseOff(ChemicalId::A),
    Command::DoseOff(ChemicalId::B),
    Command::DoseOff(ChemicalId::C),
    Command::DoseOff(ChemicalId::D),
    Command::PumpOff,
];

/// Washer driven over a command transport
pub struct TransportWasher<T: CommandTransport> {
    transport: T,
}

impl<T: CommandTransport> TransportWasher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Give back the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Send an actuator command and require an `OK`
    fn command(&mut self, command: Command) -> Result<(), HardwareError> {
        let name = command.as_str();
        match self.transport.exchange(command) {
            Ok(Reply::Ok) => Ok(()),
            Ok(Reply::Err(reason)) => {
                warn!("{} rejected: {}", name, reason.as_str());
                Err(HardwareError::rejected(name, &reason))
            }
            Ok(Reply::Value { value, .. }) | Ok(Reply::Unexpected(value)) => {
                warn!("{} got unexpected reply: {}", name, value.as_str());
                Err(HardwareError::rejected(name, &value))
            }
            Err(TransportError::Timeout) => Err(HardwareError::Timeout { command: name }),
            Err(_) => Err(HardwareError::Link),
        }
    }

    /// Send a query and read its boolean answer
    ///
    /// Returns `None` when the controller answered with an error or the
    /// exchange failed.
    fn query(&mut self, command: Command) -> Option<bool> {
        let key = command.reply_key()?;
        match self.transport.exchange(command) {
            Ok(reply) => reply.flag(key),
            Err(_) => None,
        }
    }

    fn motor(&mut self, speed: Speed, mode: fn(MotorSpeed) -> Command) -> Result<(), HardwareError> {
        match MotorSpeed::from_speed(speed) {
            Some(speed) => self.command(mode(speed)),
            None => self.command(Command::MotorOff),
        }
    }
}

impl<T: CommandTransport> WasherIo for TransportWasher<T> {
    fn fill(&mut self, water: WaterTemperature) -> Result<(), HardwareError> {
        match water {
            WaterTemperature::Hot => self.command(Command::HotWaterOn),
            WaterTemperature::Cold | WaterTemperature::None => self.command(Command::WaterOn),
        }
    }

    fn dose(&mut self, chemical: Option<ChemicalId>) -> Result<(), HardwareError> {
        match chemical {
            Some(id) => self.command(Command::DoseOn(id)),
            None => Ok(()),
        }
    }

    fn drain_open(&mut self, open: bool) -> Result<(), HardwareError> {
        self.command(if open { Command::PumpOn } else { Command::PumpOff })
    }

    fn agitate(&mut self, speed: Speed) -> Result<(), HardwareError> {
        self.motor(speed, Command::MotorAuto)
    }

    fn spin(&mut self, speed: Speed) -> Result<(), HardwareError> {
        self.motor(speed, Command::MotorFixed)
    }

    fn stop_all(&mut self) -> Result<(), HardwareError> {
        // Every output gets its off command even if an earlier one failed
        let mut first_error = None;
        for command in STOP_SEQUENCE {
            if let Err(e) = self.command(command) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn is_emergency_stop_active(&mut self) -> bool {
        match self.query(Command::QueryEmergencyStop) {
            Some(active) => active,
            None => {
                warn!("emergency-stop input unreadable, assuming active");
                true
            }
        }
    }

    fn has_suction(&mut self) -> bool {
        // Controllers without the sensor answer ERR
        self.query(Command::QuerySuction).unwrap_or(true)
    }
}
