use crate::models::DecisionNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expansion lifecycle of a single node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeExpansionState {
    /// Leaf node that may be expanded
    Expandable,
    /// Expansion requested; the node holds the global expansion marker
    Expanding,
    /// Node has been expanded (possibly into zero children) and is no longer a leaf
    Expanded,
}

impl NodeExpansionState {
    /// Derive a node's state from its leaf flag and the store's expansion marker
    pub fn of(node: &DecisionNode, expanding_node_id: Option<&str>) -> Self {
        if expanding_node_id == Some(node.id.as_str()) {
            Self::Expanding
        } else if node.is_leaf {
            Self::Expandable
        } else {
            Self::Expanded
        }
    }

    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expanded)
    }
}

impl fmt::Display for NodeExpansionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expandable => write!(f, "expandable"),
            Self::Expanding => write!(f, "expanding"),
            Self::Expanded => write!(f, "expanded"),
        }
    }
}
