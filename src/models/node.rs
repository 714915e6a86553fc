use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Sentiment tag carried by every node in a decision tree
///
/// Exactly one node per tree (the root) carries [`Polarity::Root`]; every outcome
/// node carries one of the three outcome polarities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// The decision itself
    Root,
    Positive,
    Neutral,
    Negative,
}

impl Polarity {
    /// Positional polarity cycle used whenever the model does not tag an outcome
    pub const OUTCOME_CYCLE: [Polarity; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Polarity assigned to the outcome at `index` when no tag is available
    pub fn for_position(index: usize) -> Self {
        Self::OUTCOME_CYCLE[index % Self::OUTCOME_CYCLE.len()]
    }

    /// Coerce a raw model-provided polarity string into an outcome polarity.
    ///
    /// Anything outside `positive | neutral | negative` (including `root`) becomes
    /// [`Polarity::Neutral`].
    pub fn coerce_outcome(raw: &str) -> Self {
        match raw {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

impl std::str::FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(Self::Root),
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(format!("Invalid polarity: {s}")),
        }
    }
}

/// Layout-derived 2D position (top-left corner of the node footprint)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single outcome (or the root decision) in a decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionNode {
    /// Opaque unique identity, uncorrelated with content
    pub id: String,
    pub label: String,
    pub polarity: Polarity,
    /// True while the node has no children and may still be expanded
    pub is_leaf: bool,
    /// Placeholder until the layout engine has run
    pub position: Position,
}

impl DecisionNode {
    /// Create a node with a freshly generated identity and a placeholder position
    pub fn new(label: impl Into<String>, polarity: Polarity, is_leaf: bool) -> Self {
        Self {
            id: generate_node_id(),
            label: label.into(),
            polarity,
            is_leaf,
            position: Position::ORIGIN,
        }
    }

    /// Create the root node of a tree. Roots are never leaves.
    pub fn root(label: impl Into<String>) -> Self {
        Self::new(label, Polarity::Root, false)
    }

    /// Create a fresh, expandable outcome node
    pub fn outcome(label: impl Into<String>, polarity: Polarity) -> Self {
        let polarity = if polarity.is_root() {
            Polarity::Neutral
        } else {
            polarity
        };
        Self::new(label, polarity, true)
    }

    pub fn is_root(&self) -> bool {
        self.polarity.is_root()
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Generate an opaque, collision-resistant node identity
pub fn generate_node_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_coercion() {
        assert_eq!(Polarity::coerce_outcome("positive"), Polarity::Positive);
        assert_eq!(Polarity::coerce_outcome("negative"), Polarity::Negative);
        assert_eq!(Polarity::coerce_outcome("neutral"), Polarity::Neutral);
        assert_eq!(Polarity::coerce_outcome("root"), Polarity::Neutral);
        assert_eq!(Polarity::coerce_outcome("POSITIVE"), Polarity::Neutral);
        assert_eq!(Polarity::coerce_outcome(""), Polarity::Neutral);
    }

    #[test]
    fn test_positional_cycle() {
        assert_eq!(Polarity::for_position(0), Polarity::Positive);
        assert_eq!(Polarity::for_position(1), Polarity::Neutral);
        assert_eq!(Polarity::for_position(2), Polarity::Negative);
        assert_eq!(Polarity::for_position(3), Polarity::Positive);
    }

    #[test]
    fn test_polarity_string_round_trip() {
        for polarity in [
            Polarity::Root,
            Polarity::Positive,
            Polarity::Neutral,
            Polarity::Negative,
        ] {
            assert_eq!(polarity.to_string().parse::<Polarity>(), Ok(polarity));
        }
        assert!("sideways".parse::<Polarity>().is_err());
    }

    #[test]
    fn test_node_constructors() {
        let root = DecisionNode::root("Should I quit my job?");
        assert!(root.is_root());
        assert!(!root.is_leaf);
        assert_eq!(root.position, Position::ORIGIN);

        let outcome = DecisionNode::outcome("Got the job", Polarity::Root);
        assert_eq!(outcome.polarity, Polarity::Neutral);
        assert!(outcome.is_leaf);
        assert_ne!(root.id, outcome.id);
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let node = DecisionNode::outcome("Stayed put", Polarity::Negative);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["isLeaf"], serde_json::json!(true));
        assert_eq!(json["polarity"], serde_json::json!("negative"));
    }
}
