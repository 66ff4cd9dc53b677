//! Line framing for the controller link
//!
//! Lines are ASCII text terminated by `\n`; a `\r` before the terminator is
//! dropped. Bytes are fed one at a time as they arrive from the UART.

use heapless::String;

/// Longest accepted line, terminator excluded
pub const MAX_LINE_LEN: usize = 64;

/// A complete received line
pub type Line = String<MAX_LINE_LEN>;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; the rest of it is discarded
    TooLong,
    /// Line contained a byte that is not printable ASCII
    Encoding,
}

/// State machine assembling incoming lines
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    buffer: Line,
    state: ParseState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParseState {
    /// Collecting line bytes
    #[default]
    Collecting,
    /// Skipping the rest of a too-long line
    DiscardingLong,
    /// Skipping the rest of a line with a bad byte
    DiscardingBad,
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = ParseState::Collecting;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` at the end of a complete line, `Ok(None)`
    /// when more bytes are needed. A bad line is reported once, at its
    /// terminator, and parsing resumes with the next line.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if byte == b'\n' {
            let state = self.state;
            let line = core::mem::take(&mut self.buffer);
            self.state = ParseState::Collecting;
            return match state {
                ParseState::Collecting => Ok(Some(line)),
                ParseState::DiscardingLong => Err(LineError::TooLong),
                ParseState::DiscardingBad => Err(LineError::Encoding),
            };
        }

        if self.state != ParseState::Collecting || byte == b'\r' {
            return Ok(None);
        }

        if !(byte.is_ascii_graphic() || byte == b' ' || byte == b'\t') {
            self.buffer.clear();
            self.state = ParseState::DiscardingBad;
            return Ok(None);
        }

        if self.buffer.push(byte as char).is_err() {
            self.buffer.clear();
            self.state = ParseState::DiscardingLong;
        }
        Ok(None)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete line found, if any. Bytes after it are
    /// not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Line>, LineError> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte)? {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_line() {
        let mut parser = LineParser::new();
        let line = parser.feed_bytes(b"OK\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "OK");
    }

    #[test]
    fn test_crlf_stripped() {
        let mut parser = LineParser::new();
        let line = parser.feed_bytes(b"PARO=1\r\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "PARO=1");
    }

    #[test]
    fn test_partial_then_complete() {
        let mut parser = LineParser::new();
        assert_eq!(parser.feed_bytes(b"ERR no"), Ok(None));
        let line = parser.feed_bytes(b" motor\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "ERR no motor");
    }

    #[test]
    fn test_too_long_line_resyncs() {
        let mut parser = LineParser::new();
        let long = [b'X'; MAX_LINE_LEN + 10];
        assert_eq!(parser.feed_bytes(&long), Ok(None));
        assert_eq!(parser.feed(b'\n'), Err(LineError::TooLong));

        let line = parser.feed_bytes(b"OK\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "OK");
    }

    #[test]
    fn test_exact_max_length_accepted() {
        let mut parser = LineParser::new();
        let full = [b'A'; MAX_LINE_LEN];
        assert_eq!(parser.feed_bytes(&full), Ok(None));
        let line = parser.feed(b'\n').unwrap().unwrap();
        assert_eq!(line.len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_binary_garbage_rejected() {
        let mut parser = LineParser::new();
        assert_eq!(parser.feed_bytes(&[0xFF, b'O', b'K', b'\n']), Err(LineError::Encoding));
        let line = parser.feed_bytes(b"OK\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "OK");
    }

    #[test]
    fn test_reset_drops_partial() {
        let mut parser = LineParser::new();
        let _ = parser.feed_bytes(b"PAR");
        parser.reset();
        let line = parser.feed_bytes(b"OK\n").unwrap().unwrap();
        assert_eq!(line.as_str(), "OK");
    }
}
