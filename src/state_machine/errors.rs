use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    #[error("Invalid transition from {from} on event {event}")]
    InvalidTransition { from: String, event: String },
    #[error("State {state} is terminal, cannot apply event {event}")]
    TerminalState { state: String, event: String },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
