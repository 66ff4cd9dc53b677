//! Run-state definition
//!
//! Actuators are driven only while the state is [`RunState::Running`].

use super::events::Event;

/// Sequencer run states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// No active stage
    #[default]
    Idle,
    /// Stage timer counting down, actuator commands active
    Running,
    /// Timer frozen, actuators forced off
    Paused,
    /// Safe shutdown; only loading a recipe leaves this state
    Stopped,
}

impl RunState {
    /// Check if actuators may be on in this state
    pub fn actuators_allowed(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// Check if a cycle is in progress (running or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }

    /// Short uppercase name for status lines
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "IDLE",
            RunState::Running => "RUNNING",
            RunState::Paused => "PAUSED",
            RunState::Stopped => "STOPPED",
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use RunState::*;

        match (self, event) {
            // Loading always resets
            (_, Load) => Idle,

            // Safe stop from anywhere
            (_, Stop) | (_, EmergencyStop) | (_, Fault) => Stopped,

            (Idle, Start) => Running,

            (Running, Pause) => Paused,
            (Running, Finished) => Idle,

            (Paused, Resume) => Running,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RunState; 4] = [
        RunState::Idle,
        RunState::Running,
        RunState::Paused,
        RunState::Stopped,
    ];

    #[test]
    fn test_start_only_from_idle() {
        assert_eq!(RunState::Idle.transition(Event::Start), RunState::Running);
        assert_eq!(RunState::Paused.transition(Event::Start), RunState::Paused);
        assert_eq!(RunState::Stopped.transition(Event::Start), RunState::Stopped);
        assert_eq!(RunState::Running.transition(Event::Start), RunState::Running);
    }

    #[test]
    fn test_pause_resume() {
        let paused = RunState::Running.transition(Event::Pause);
        assert_eq!(paused, RunState::Paused);
        assert_eq!(paused.transition(Event::Resume), RunState::Running);
        assert_eq!(RunState::Idle.transition(Event::Pause), RunState::Idle);
        assert_eq!(RunState::Running.transition(Event::Resume), RunState::Running);
    }

    #[test]
    fn test_stop_from_any_state() {
        for state in ALL {
            assert_eq!(state.transition(Event::Stop), RunState::Stopped);
            assert_eq!(state.transition(Event::EmergencyStop), RunState::Stopped);
            assert_eq!(state.transition(Event::Fault), RunState::Stopped);
        }
    }

    #[test]
    fn test_load_resets_any_state() {
        for state in ALL {
            assert_eq!(state.transition(Event::Load), RunState::Idle);
        }
    }

    #[test]
    fn test_finished_only_while_running() {
        assert_eq!(RunState::Running.transition(Event::Finished), RunState::Idle);
        assert_eq!(RunState::Paused.transition(Event::Finished), RunState::Paused);
        assert_eq!(RunState::Stopped.transition(Event::Finished), RunState::Stopped);
    }

    #[test]
    fn test_actuators_only_while_running() {
        assert!(RunState::Running.actuators_allowed());
        assert!(!RunState::Paused.actuators_allowed());
        assert!(RunState::Paused.is_active());
        assert!(!RunState::Stopped.is_active());
    }
}
