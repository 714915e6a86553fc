//! Error types for the decision-graph engine.
//!
//! Every failure is scoped to the single in-flight operation that raised it; none of
//! them is fatal to the process and none leaves a partially mutated graph behind.

use crate::client::ModelCallError;
use crate::config::ConfigurationError;
use crate::layout::LayoutError;
use crate::parser::ParseError;
use crate::state_machine::StateMachineError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SidequestError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Failed to parse model response: {0}")]
    StructuralParse(#[from] ParseError),
    #[error("Model call failed: {0}")]
    ModelCall(#[from] ModelCallError),
    #[error("Expansion already in progress for node {active}")]
    ExpansionInProgress { active: String },
    #[error("Node not found: {0}")]
    NodeNotFound(String),
    #[error("Node {0} is not expandable")]
    NodeNotExpandable(String),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("State transition error: {0}")]
    StateTransition(#[from] StateMachineError),
}

/// Failure taxonomy surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Provider unreachable or non-2xx after retries
    Transport,
    /// Provider answered but with no usable text after retries
    EmptyContent,
    /// Full-tree response was not the expected JSON chain array
    StructuralParse,
    /// Request rejected because another expansion holds the marker
    Conflict,
    /// Caller supplied an unknown node, bad settings or bad text
    InvalidRequest,
    /// Graph or configuration invariant violated
    Internal,
}

impl SidequestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ModelCall(error) if error.is_empty_content() => ErrorCategory::EmptyContent,
            Self::ModelCall(_) => ErrorCategory::Transport,
            Self::StructuralParse(_) => ErrorCategory::StructuralParse,
            Self::ExpansionInProgress { .. } => ErrorCategory::Conflict,
            Self::NodeNotFound(_)
            | Self::NodeNotExpandable(_)
            | Self::InvalidSettings(_)
            | Self::InvalidInput(_) => ErrorCategory::InvalidRequest,
            Self::Layout(_) | Self::Configuration(_) | Self::StateTransition(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SidequestError>;
