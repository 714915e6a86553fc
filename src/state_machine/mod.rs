//! # Expansion State Machine
//!
//! A node moves expandable -> expanding when an expansion is requested, then either
//! expanding -> expanded on success or expanding -> expandable on failure. The graph
//! store derives the state from the leaf flag and the expansion marker and consults
//! this table before mutating.

pub mod errors;
pub mod events;
pub mod states;

pub use errors::{StateMachineError, StateMachineResult};
pub use events::ExpansionEvent;
pub use states::NodeExpansionState;

/// Determine the target state for `event` from `current`
pub fn transition(
    current: NodeExpansionState,
    event: &ExpansionEvent,
) -> StateMachineResult<NodeExpansionState> {
    if current.is_terminal() {
        return Err(StateMachineError::TerminalState {
            state: current.to_string(),
            event: event.event_type().to_string(),
        });
    }

    let target = match (current, event) {
        (NodeExpansionState::Expandable, ExpansionEvent::Request) => NodeExpansionState::Expanding,
        (NodeExpansionState::Expanding, ExpansionEvent::Succeed(_)) => NodeExpansionState::Expanded,
        (NodeExpansionState::Expanding, ExpansionEvent::Fail(_)) => NodeExpansionState::Expandable,

        (from_state, _) => {
            return Err(StateMachineError::InvalidTransition {
                from: from_state.to_string(),
                event: event.event_type().to_string(),
            })
        }
    };

    Ok(target)
}
