//! Configuration type definitions

use alloc::string::String;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration format version understood by this build
pub const CONFIG_VERSION: u32 = 1;

/// Accepted tick interval range (milliseconds)
pub const TICK_INTERVAL_RANGE_MS: (u32, u32) = (100, 250);

/// Accepted batch wait slice range (milliseconds)
pub const BATCH_SLICE_RANGE_MS: (u32, u32) = (1, 1000);

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Document is not valid TOML or has the wrong shape
    #[error("config syntax error: {0}")]
    Toml(String),
    /// A value is outside its accepted range
    #[error("config field {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    /// Document was written for another format version
    #[error("config version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
    /// Binary config could not be decoded
    #[error("binary config is corrupt")]
    Decode,
    /// Config could not be encoded
    #[error("failed to encode config")]
    Encode,
    /// Neither a TOML nor a binary config was supplied
    #[error("no configuration found")]
    NotFound,
}

/// Sequencer timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SequencerConfig {
    /// Interval at which the caller should invoke `tick`
    pub tick_interval_ms: u32,
    /// Wait slice used by the batch runner between cancellation checks
    pub batch_slice_ms: u32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            batch_slice_ms: 50,
        }
    }
}

impl SequencerConfig {
    /// Tick interval as a duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_interval_ms))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = TICK_INTERVAL_RANGE_MS;
        if !(lo..=hi).contains(&self.tick_interval_ms) {
            return Err(ConfigError::Invalid {
                field: "sequencer.tick_interval_ms",
                reason: "must be between 100 and 250",
            });
        }
        let (lo, hi) = BATCH_SLICE_RANGE_MS;
        if !(lo..=hi).contains(&self.batch_slice_ms) {
            return Err(ConfigError::Invalid {
                field: "sequencer.batch_slice_ms",
                reason: "must be between 1 and 1000",
            });
        }
        Ok(())
    }
}

/// Serial command transport timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransportConfig {
    /// How long to wait for a reply line
    pub ack_timeout_ms: u32,
    /// Delay between reads while waiting for a reply
    pub poll_interval_ms: u32,
    /// Delay after opening the link, while the controller boots
    pub boot_delay_ms: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ack_timeout_ms: 1000,
            poll_interval_ms: 5,
            boot_delay_ms: 2000,
        }
    }
}

impl TransportConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ack_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "transport.ack_timeout_ms",
                reason: "must be greater than zero",
            });
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.ack_timeout_ms {
            return Err(ConfigError::Invalid {
                field: "transport.poll_interval_ms",
                reason: "must be between 1 and ack_timeout_ms",
            });
        }
        Ok(())
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MachineConfig {
    /// Format version, must equal [`CONFIG_VERSION`]
    pub version: u32,
    pub sequencer: SequencerConfig,
    pub transport: TransportConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            sequencer: SequencerConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Check the version and every value range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch {
                found: self.version,
                expected: CONFIG_VERSION,
            });
        }
        self.sequencer.validate()?;
        self.transport.validate()
    }
}
