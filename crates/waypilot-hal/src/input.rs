//! The `InputSink` trait.
//!
//! Backends implement this trait; the rest of the stack only ever talks to
//! the trait, so a real keyboard/mouse driver and the simulator are
//! interchangeable.

use waypilot_types::{InputAction, PilotError};

/// Anything that can perform an [`InputAction`].
pub trait InputSink {
    /// Perform `action`.
    ///
    /// Returning `Ok` only means the input was sent; whether the game
    /// reacted is observed through later snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`PilotError::Input`] when the backend could not send the
    /// input at all (window gone, target off screen, …).
    fn dispatch(&mut self, action: &InputAction) -> Result<(), PilotError>;
}

/// A backend that records every action and never fails.
#[derive(Debug, Default)]
pub struct RecordingInput {
    actions: Vec<InputAction>,
}

impl RecordingInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far, oldest first.
    pub fn actions(&self) -> &[InputAction] {
        &self.actions
    }

    /// Drain the recorded actions.
    pub fn take(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.actions)
    }

    /// Number of recorded `Step` actions.
    pub fn steps(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, InputAction::Step(_)))
            .count()
    }
}

impl InputSink for RecordingInput {
    fn dispatch(&mut self, action: &InputAction) -> Result<(), PilotError> {
        self.actions.push(action.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypilot_types::Direction;

    /// Backend that rejects everything, for error-path coverage.
    struct DeadInput;

    impl InputSink for DeadInput {
        fn dispatch(&mut self, action: &InputAction) -> Result<(), PilotError> {
            Err(PilotError::Input {
                action: action.to_string(),
                details: "no window".to_string(),
            })
        }
    }

    #[test]
    fn recording_input_keeps_order() {
        let mut input = RecordingInput::new();
        input.dispatch(&InputAction::Step(Direction::North)).unwrap();
        input.dispatch(&InputAction::Hotkey("F1".into())).unwrap();
        input.dispatch(&InputAction::Step(Direction::East)).unwrap();
        assert_eq!(input.steps(), 2);
        assert_eq!(input.actions()[1], InputAction::Hotkey("F1".into()));
        assert_eq!(input.take().len(), 3);
        assert!(input.actions().is_empty());
    }

    #[test]
    fn failing_backend_reports_action() {
        let mut input = DeadInput;
        let err = input.dispatch(&InputAction::Step(Direction::West)).unwrap_err();
        assert!(err.to_string().contains("step west"));
    }
}
