//! Controller command vocabulary

use heapless::Vec;
use lavandera_core::recipe::{ChemicalId, Speed};

use crate::line::MAX_LINE_LEN;

/// Drum motor speed as understood by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorSpeed {
    Low,
    Medium,
    High,
}

impl MotorSpeed {
    /// Map a recipe speed; `Speed::None` means the motor stays off
    pub fn from_speed(speed: Speed) -> Option<Self> {
        match speed {
            Speed::Low => Some(MotorSpeed::Low),
            Speed::Medium => Some(MotorSpeed::Medium),
            Speed::High => Some(MotorSpeed::High),
            Speed::None => None,
        }
    }
}

/// A command line sent to the relay controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Open the cold (default) water inlet
    WaterOn,
    /// Open the hot water inlet
    HotWaterOn,
    /// Close every water inlet
    WaterOff,
    /// Start a dosing pump
    DoseOn(ChemicalId),
    /// Stop a dosing pump
    DoseOff(ChemicalId),
    /// Start the drain pump
    PumpOn,
    /// Stop the drain pump
    PumpOff,
    /// Drum in reversing (agitation) mode
    MotorAuto(MotorSpeed),
    /// Drum in fixed direction (spin) mode
    MotorFixed(MotorSpeed),
    /// Drum off
    MotorOff,
    /// Ask for the emergency-stop input (`PARO=0|1`)
    QueryEmergencyStop,
    /// Ask for the suction sensor (`SUCCION=0|1`)
    QuerySuction,
}

/// Every command, for lookups by text
const ALL: [Command; 22] = [
    Command::WaterOn,
    Command::HotWaterOn,
    Command::WaterOff,
    Command::DoseOn(ChemicalId::A),
    Command::DoseOn(ChemicalId::B),
    Command::DoseOn(ChemicalId::C),
    Command::DoseOn(ChemicalId::D),
    Command::DoseOff(ChemicalId::A),
    Command::DoseOff(ChemicalId::B),
    Command::DoseOff(ChemicalId::C),
    Command::DoseOff(ChemicalId::D),
    Command::PumpOn,
    Command::PumpOff,
    Command::MotorAuto(MotorSpeed::Low),
    Command::MotorAuto(MotorSpeed::Medium),
    Command::MotorAuto(MotorSpeed::High),
    Command::MotorFixed(MotorSpeed::Low),
    Command::MotorFixed(MotorSpeed::Medium),
    Command::MotorFixed(MotorSpeed::High),
    Command::MotorOff,
    Command::QueryEmergencyStop,
    Command::QuerySuction,
];

impl Command {
    /// Command text without the line terminator
    pub fn as_str(&self) -> &'static str {
        use Command::*;
        use MotorSpeed::*;

        match self {
            WaterOn => "VALVULA_AGUA_ON",
            HotWaterOn => "VALVULA_AGUA_CALIENTE_ON",
            WaterOff => "VALVULA_AGUA_OFF",
            DoseOn(ChemicalId::A) => "DOSIF_A_ON",
            DoseOn(ChemicalId::B) => "DOSIF_B_ON",
            DoseOn(ChemicalId::C) => "DOSIF_C_ON",
            DoseOn(ChemicalId::D) => "DOSIF_D_ON",
            DoseOff(ChemicalId::A) => "DOSIF_A_OFF",
            DoseOff(ChemicalId::B) => "DOSIF_B_OFF",
            DoseOff(ChemicalId::C) => "DOSIF_C_OFF",
            DoseOff(ChemicalId::D) => "DOSIF_D_OFF",
            PumpOn => "BOMBA_ON",
            PumpOff => "BOMBA_OFF",
            MotorAuto(Low) => "MOTOR_BAJA_AUTO_ON",
            MotorAuto(Medium) => "MOTOR_MEDIA_AUTO_ON",
            MotorAuto(High) => "MOTOR_ALTA_AUTO_ON",
            MotorFixed(Low) => "MOTOR_BAJA_FIJA_ON",
            MotorFixed(Medium) => "MOTOR_MEDIA_FIJA_ON",
            MotorFixed(High) => "MOTOR_ALTA_FIJA_ON",
            MotorOff => "MOTOR_OFF",
            QueryEmergencyStop => "PARO?",
            QuerySuction => "SUCCION?",
        }
    }

    /// Look a command up by its text (surrounding whitespace ignored)
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        ALL.into_iter().find(|c| c.as_str() == line)
    }

    /// Check if this command expects a `KEY=VALUE` reply
    pub fn is_query(&self) -> bool {
        matches!(self, Command::QueryEmergencyStop | Command::QuerySuction)
    }

    /// Reply key for queries (`PARO`, `SUCCION`)
    pub fn reply_key(&self) -> Option<&'static str> {
        match self {
            Command::QueryEmergencyStop => Some("PARO"),
            Command::QuerySuction => Some("SUCCION"),
            _ => None,
        }
    }

    /// Encode as a `\n`-terminated line
    pub fn encode(&self) -> Vec<u8, MAX_LINE_LEN> {
        let mut out = Vec::new();
        // Every command is far shorter than a line
        let _ = out.extend_from_slice(self.as_str().as_bytes());
        let _ = out.push(b'\n');
        out
    }
}
