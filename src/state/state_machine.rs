use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle phases of a single guessing round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Round constructed but not announced yet.
    #[default]
    Created,
    /// Product announced, guesses are being collected.
    Started,
    /// Results computed; the round is inert.
    Finished,
}

/// Events that can be applied to the round state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Product announced and timeout armed.
    Start,
    /// Round resolved, either by timeout or by an explicit stop.
    Finish,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The state the round was in when the invalid event was received.
    pub from: GameState,
    /// The event that cannot be applied from this state.
    pub event: GameEvent,
}

/// Linear `Created -> Started -> Finished` state machine.
///
/// Every transition is a compare-and-set: the event is only applied when it is
/// valid from the current state, so a second `Finish` is always rejected and
/// callers can gate their side effects on the returned `Result`.
#[derive(Debug, Clone, Default)]
pub struct GameStateMachine {
    state: GameState,
}

impl GameStateMachine {
    /// Create a new state machine initialised in the created state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current state.
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Whether guesses are currently accepted.
    pub fn is_open(&self) -> bool {
        self.state == GameState::Started
    }

    /// Apply `event`, returning the new state, or leave the machine untouched.
    pub fn apply(&mut self, event: GameEvent) -> Result<GameState, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.state = next;
        Ok(next)
    }

    fn compute_transition(&self, event: GameEvent) -> Result<GameState, InvalidTransition> {
        let next = match (self.state, event) {
            (GameState::Created, GameEvent::Start) => GameState::Started,
            // A round can be closed before it was ever announced.
            (GameState::Created | GameState::Started, GameEvent::Finish) => GameState::Finished,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_created() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.state(), GameState::Created);
        assert!(!sm.is_open());
    }

    #[test]
    fn full_happy_path_through_round() {
        let mut sm = GameStateMachine::new();

        assert_eq!(sm.apply(GameEvent::Start), Ok(GameState::Started));
        assert!(sm.is_open());
        assert_eq!(sm.apply(GameEvent::Finish), Ok(GameState::Finished));
        assert!(!sm.is_open());
    }

    #[test]
    fn finish_before_start_is_allowed() {
        let mut sm = GameStateMachine::new();
        assert_eq!(sm.apply(GameEvent::Finish), Ok(GameState::Finished));
    }

    #[test]
    fn second_finish_is_rejected() {
        let mut sm = GameStateMachine::new();
        sm.apply(GameEvent::Start).unwrap();
        sm.apply(GameEvent::Finish).unwrap();

        let err = sm.apply(GameEvent::Finish).unwrap_err();
        assert_eq!(err.from, GameState::Finished);
        assert_eq!(err.event, GameEvent::Finish);
        assert_eq!(sm.state(), GameState::Finished);
    }

    #[test]
    fn start_is_only_valid_once() {
        let mut sm = GameStateMachine::new();
        sm.apply(GameEvent::Start).unwrap();

        let err = sm.apply(GameEvent::Start).unwrap_err();
        assert_eq!(
            err,
            InvalidTransition {
                from: GameState::Started,
                event: GameEvent::Start,
            }
        );
    }

    #[test]
    fn finished_round_cannot_restart() {
        let mut sm = GameStateMachine::new();
        sm.apply(GameEvent::Finish).unwrap();
        assert!(sm.apply(GameEvent::Start).is_err());
        assert_eq!(sm.state(), GameState::Finished);
    }
}
