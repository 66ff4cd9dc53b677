//! Command transport
//!
//! [`CommandTransport`] is the seam between the washer adapter and the wire:
//! one command out, one reply back. [`SerialTransport`] implements it over
//! any [`Uart`] by polling for the reply line with a deadline.

use embedded_hal::delay::DelayNs;
use lavandera_core::config::TransportConfig;
use lavandera_hal::Uart;

use crate::command::Command;
use crate::line::{LineError, LineParser};
use crate::reply::Reply;

/// Errors raised while exchanging a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No reply line arrived within the acknowledgement timeout
    #[error("no reply within the acknowledgement timeout")]
    Timeout,
    /// The UART reported an error
    #[error("serial I/O error")]
    Io,
    /// Reply line exceeded the maximum length
    #[error("reply line too long")]
    LineTooLong,
    /// Reply line contained non-ASCII bytes
    #[error("reply line is not ASCII text")]
    Encoding,
}

impl From<LineError> for TransportError {
    fn from(err: LineError) -> Self {
        match err {
            LineError::TooLong => TransportError::LineTooLong,
            LineError::Encoding => TransportError::Encoding,
        }
    }
}

/// Sends commands and waits for their replies
pub trait CommandTransport {
    /// Send `command` and return the controller's reply
    fn exchange(&mut self, command: Command) -> Result<Reply, TransportError>;
}

impl<T: CommandTransport + ?Sized> CommandTransport for &mut T {
    fn exchange(&mut self, command: Command) -> Result<Reply, TransportError> {
        (**self).exchange(command)
    }
}

/// Command transport over a serial UART
///
/// Replies are polled every `poll_interval_ms` (at least 1 ms) until
/// `ack_timeout_ms` has passed. Bytes left over from an earlier exchange are discarded before
/// each command so a late reply is never taken for the current one.
pub struct SerialTransport<U: Uart, D: DelayNs> {
    uart: U,
    delay: D,
    parser: LineParser,
    config: TransportConfig,
}

impl<U: Uart, D: DelayNs> SerialTransport<U, D> {
    /// Create a transport; call [`SerialTransport::open`] before use
    pub fn new(uart: U, delay: D, config: &TransportConfig) -> Self {
        Self {
            uart,
            delay,
            parser: LineParser::new(),
            config: *config,
        }
    }

    /// Wait for the controller to boot, then drop its start-up chatter
    ///
    /// Opening a serial port resets most controller boards.
    pub fn open(&mut self) -> Result<(), TransportError> {
        info!("waiting {} ms for controller boot", self.config.boot_delay_ms);
        self.delay.delay_ms(self.config.boot_delay_ms);
        self.uart.clear_input().map_err(|_| TransportError::Io)?;
        self.parser.reset();
        Ok(())
    }

    /// Timing in use
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Give back the UART and the delay provider
    pub fn release(self) -> (U, D) {
        (self.uart, self.delay)
    }

    fn send(&mut self, command: Command) -> Result<(), TransportError> {
        self.uart.clear_input().map_err(|_| TransportError::Io)?;
        self.parser.reset();

        trace!("-> {}", command.as_str());
        self.uart
            .write_blocking(&command.encode())
            .map_err(|_| TransportError::Io)?;
        self.uart.flush().map_err(|_| TransportError::Io)
    }

    fn receive(&mut self) -> Result<Reply, TransportError> {
        let poll_ms = self.config.poll_interval_ms.max(1);
        let mut waited_ms: u32 = 0;

        loop {
            while let Some(byte) = self.uart.try_read_byte().map_err(|_| TransportError::Io)? {
                if let Some(line) = self.parser.feed(byte)? {
                    if line.trim().is_empty() {
                        continue;
                    }
                    trace!("<- {}", line.as_str());
                    return Ok(Reply::parse(&line));
                }
            }

            if waited_ms >= self.config.ack_timeout_ms {
                self.parser.reset();
                return Err(TransportError::Timeout);
            }
            self.delay.delay_ms(poll_ms);
            waited_ms = waited_ms.saturating_add(poll_ms);
        }
    }
}

impl<U: Uart, D: DelayNs> CommandTransport for SerialTransport<U, D> {
    fn exchange(&mut self, command: Command) -> Result<Reply, TransportError> {
        self.send(command)?;
        let reply = self.receive();
        if let Err(e) = &reply {
            warn!("{} failed: {:?}", command.as_str(), e);
        }
        reply
    }
}
