//! Washer adapters
//!
//! Implementations of [`lavandera_core::traits::WasherIo`].

pub mod interlock;
pub mod simulated;
pub mod transport;

pub use interlock::{InterlockedWasher, NoPin, PinInterlocks};
pub use simulated::{IoCall, Motor, Outputs, SimulatedWasher};
pub use transport::TransportWasher;
