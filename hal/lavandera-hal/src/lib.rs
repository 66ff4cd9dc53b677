//! Lavandera Hardware Abstraction Layer
//!
//! Low-level I/O traits the washer adapters are written against. A host
//! build implements them over a serial port and GPIO character device; a
//! board build implements them over the chip peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lavandera-core (sequencer, recipes)    │
//! └─────────────────────────────────────────┘
//!                     │ WasherIo
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lavandera-drivers / lavandera-protocol │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lavandera-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial line to the machine controller
//! - [`gpio::InputPin`] - Wired interlock inputs (emergency stop, suction)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

pub use gpio::{ActiveLevel, InputPin};
pub use uart::{Uart, UartRx, UartTx};
