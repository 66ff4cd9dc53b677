//! Controller replies

use heapless::String;

use crate::line::MAX_LINE_LEN;

/// Longest reply key (`SUCCION`)
pub const MAX_KEY_LEN: usize = 16;

/// A reply line from the controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Command accepted
    Ok,
    /// Command refused, with the controller's reason
    Err(String<MAX_LINE_LEN>),
    /// Query answer
    Value {
        key: String<MAX_KEY_LEN>,
        value: String<MAX_LINE_LEN>,
    },
    /// Anything else
    Unexpected(String<MAX_LINE_LEN>),
}

impl Reply {
    /// Classify a received line
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line == "OK" {
            return Reply::Ok;
        }
        if line == "ERR" || line.starts_with("ERR ") {
            return Reply::Err(truncated(line[3..].trim()));
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if !key.is_empty() && key.len() <= MAX_KEY_LEN {
                return Reply::Value {
                    key: truncated(key),
                    value: truncated(value.trim()),
                };
            }
        }
        Reply::Unexpected(truncated(line))
    }

    /// Read a `KEY=0|1` answer for `key`
    ///
    /// Returns `None` when the reply is not a value for `key` or the value
    /// is not `0`/`1`.
    pub fn flag(&self, expected_key: &str) -> Option<bool> {
        match self {
            Reply::Value { key, value } if key.as_str() == expected_key => match value.as_str() {
                "0" => Some(false),
                "1" => Some(true),
                _ => None,
            },
            _ => None,
        }
    }

    /// Check if the controller accepted the command
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok)
    }
}

fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
