//! Events that trigger run-state transitions

/// Events that can trigger run-state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Operator events
    /// Operator pressed start
    Start,
    /// Operator pressed pause
    Pause,
    /// Operator resumed a paused cycle
    Resume,
    /// Operator requested a stop
    Stop,

    // Recipe events
    /// A new recipe was loaded
    Load,
    /// The last stage ran out
    Finished,

    // Safety events
    /// Emergency-stop input is active
    EmergencyStop,
    /// Hardware command failed
    Fault,
}

impl Event {
    /// Check if this event forces the safe-stop path
    pub fn is_safety_event(&self) -> bool {
        matches!(self, Event::EmergencyStop | Event::Fault)
    }
}
