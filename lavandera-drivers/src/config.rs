//! Machine configuration loading
//!
//! Configuration is kept as a TOML document, with a postcard-encoded binary
//! copy as fallback. Either way the result is validated before use.
//!
//! # Example
//!
//! ```toml
//! version = 1
//!
//! [sequencer]
//! tick_interval_ms = 200
//! batch_slice_ms = 50
//!
//! [transport]
//! ack_timeout_ms = 1000
//! poll_interval_ms = 5
//! boot_delay_ms = 2000
//! ```
//!
//! Missing tables and keys take their defaults.

use alloc::string::ToString;
use alloc::vec::Vec;

use lavandera_core::config::{ConfigError, MachineConfig};

/// Parse and validate a TOML config document
pub fn parse_config(text: &str) -> Result<MachineConfig, ConfigError> {
    let config: MachineConfig =
        toml::from_str(text).map_err(|e| ConfigError::Toml(e.to_string()))?;
    config.validate()?;
    log_config_summary(&config);
    Ok(config)
}

/// Encode a config in the binary format
pub fn encode_config(config: &MachineConfig) -> Result<Vec<u8>, ConfigError> {
    postcard::to_allocvec(config).map_err(|_| ConfigError::Encode)
}

/// Decode and validate a binary config
pub fn decode_config(bytes: &[u8]) -> Result<MachineConfig, ConfigError> {
    let config: MachineConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
    config.validate()?;
    log_config_summary(&config);
    Ok(config)
}

/// Load a config, preferring the TOML document over the binary copy
///
/// A TOML document that fails to parse falls back to the binary copy when
/// one is supplied; otherwise its error is returned.
pub fn load_config(toml: Option<&[u8]>, binary: Option<&[u8]>) -> Result<MachineConfig, ConfigError> {
    let toml_result = toml.map(|bytes| {
        core::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Toml("document is not valid UTF-8".to_string()))
            .and_then(parse_config)
    });

    match (toml_result, binary) {
        (Some(Ok(config)), _) => {
            info!("loaded configuration from TOML");
            Ok(config)
        }
        (Some(Err(_)), Some(bytes)) => {
            warn!("TOML config rejected, trying binary");
            decode_config(bytes)
        }
        (Some(Err(e)), None) => Err(e),
        (None, Some(bytes)) => {
            debug!("no TOML config, using binary");
            decode_config(bytes)
        }
        (None, None) => Err(ConfigError::NotFound),
    }
}

fn log_config_summary(config: &MachineConfig) {
    info!(
        "config: tick {} ms, ack timeout {} ms",
        config.sequencer.tick_interval_ms,
        config.transport.ack_timeout_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use lavandera_core::config::CONFIG_VERSION;

    const FULL: &str = r#"
version = 1

[sequencer]
tick_interval_ms = 150
batch_slice_ms = 20

[transport]
ack_timeout_ms = 500
poll_interval_ms = 10
boot_delay_ms = 1500
"#;

    #[test]
    fn test_parse_full_document() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.sequencer.tick_interval_ms, 150);
        assert_eq!(config.sequencer.batch_slice_ms, 20);
        assert_eq!(config.transport.ack_timeout_ms, 500);
        assert_eq!(config.transport.poll_interval_ms, 10);
        assert_eq!(config.transport.boot_delay_ms, 1500);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = parse_config("[transport]\nack_timeout_ms = 800\n").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.sequencer, MachineConfig::default().sequencer);
        assert_eq!(config.transport.ack_timeout_ms, 800);
        assert_eq!(config.transport.poll_interval_ms, 5);

        assert_eq!(parse_config(""), Ok(MachineConfig::default()));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(
            parse_config("[sequencer\ntick_interval_ms = 200"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            parse_config("[sequencer]\ntick_interval_ms = \"rapido\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            parse_config("[sequencer]\ntick_interval_ms = 1000"),
            Err(ConfigError::Invalid {
                field: "sequencer.tick_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_version_mismatch() {
        assert_eq!(
            parse_config("version = 2"),
            Err(ConfigError::VersionMismatch {
                found: 2,
                expected: CONFIG_VERSION
            })
        );
    }

    #[test]
    fn test_binary_round_trip() {
        let config = parse_config(FULL).unwrap();
        let bytes = encode_config(&config).unwrap();
        assert_eq!(decode_config(&bytes), Ok(config));
        assert_eq!(decode_config(&bytes[..2]), Err(ConfigError::Decode));
    }

    #[test]
    fn test_load_prefers_toml() {
        let binary = encode_config(&MachineConfig::default()).unwrap();
        let config = load_config(Some(FULL.as_bytes()), Some(binary.as_slice())).unwrap();
        assert_eq!(config.sequencer.tick_interval_ms, 150);
    }

    #[test]
    fn test_load_falls_back_to_binary() {
        let binary = encode_config(&MachineConfig::default()).unwrap();
        let config = load_config(Some(&b"version = ["[..]), Some(binary.as_slice())).unwrap();
        assert_eq!(config, MachineConfig::default());

        let config = load_config(None, Some(binary.as_slice())).unwrap();
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn test_load_without_sources() {
        assert_eq!(load_config(None, None), Err(ConfigError::NotFound));
        assert!(matches!(
            load_config(Some(&[0xFF, 0xFE][..]), None),
            Err(ConfigError::Toml(_))
        ));
    }
}
