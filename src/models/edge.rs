use serde::{Deserialize, Serialize};

/// Directed parent → child relationship in a decision tree
///
/// Edges are created together with the child node they terminate at and are
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionEdge {
    /// Derived from `(source, target)`; see [`DecisionEdge::edge_id`]
    pub id: String,
    pub source: String,
    pub target: String,
}

impl DecisionEdge {
    /// Connect a parent node to a child node
    pub fn connect(source: &str, target: &str) -> Self {
        Self {
            id: Self::edge_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// Deterministic edge identity for an ordered `(source, target)` pair
    pub fn edge_id(source: &str, target: &str) -> String {
        format!("{source}-{target}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_is_deterministic() {
        let a = DecisionEdge::connect("parent", "child");
        let b = DecisionEdge::connect("parent", "child");
        assert_eq!(a, b);
        assert_eq!(a.id, "parent-child");
        assert_ne!(a.id, DecisionEdge::edge_id("child", "parent"));
    }
}
