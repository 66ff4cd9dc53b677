//! Relay controller command protocol
//!
//! The washer's actuators hang off a small relay controller reached over a
//! serial line. Every exchange is one ASCII command line and one reply line:
//!
//! ```text
//! host  -> VALVULA_AGUA_ON\n
//! ctrl  <- OK\n
//! host  -> PARO?\n
//! ctrl  <- PARO=0\n
//! host  -> DOSIF_E_ON\n
//! ctrl  <- ERR unknown channel\n
//! ```
//!
//! Replies are `OK`, `ERR <text>` or `KEY=VALUE` for queries. A reply that
//! does not arrive within the acknowledgement timeout is a transport fault.

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod command;
pub mod line;
pub mod reply;
pub mod transport;

pub use command::{Command, MotorSpeed};
pub use line::{Line, LineError, LineParser, MAX_LINE_LEN};
pub use reply::Reply;
pub use transport::{CommandTransport, SerialTransport, TransportError};
