//! Safety monitoring
//!
//! Tracks the emergency-stop input and hardware faults and decides when the
//! sequencer must force a safe stop.

pub mod monitor;

pub use monitor::{FaultKind, SafetyMonitor, SafetyStatus};
