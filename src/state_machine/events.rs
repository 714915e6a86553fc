use serde::{Deserialize, Serialize};

/// Events that drive a node through its expansion lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ExpansionEvent {
    /// An expansion was requested for the node
    Request,
    /// Branches arrived and were attached (count may be zero)
    Succeed(usize),
    /// The model call failed; the node returns to expandable
    Fail(String),
}

impl ExpansionEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Succeed(_) => "succeed",
            Self::Fail(_) => "fail",
        }
    }

    /// Extract error message if this is a failure event
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Fail(msg) => Some(msg),
            _ => None,
        }
    }
}
