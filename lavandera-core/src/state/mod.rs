//! Run-state machine
//!
//! The sequencer's run state is a pure function of the previous state and
//! an event. The sequencer decides *when* an event happens; this module
//! decides *where* it leads.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::RunState;
