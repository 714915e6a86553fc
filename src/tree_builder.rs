//! # Tree Builder
//!
//! Turns parallel linear storylines into one rooted tree: a shared root holding the
//! decision text and one disjoint chain per storyline hanging directly off it.

use crate::models::{DecisionEdge, DecisionNode, Polarity, Storyline};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generic node and edge collections of a freshly built tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<DecisionNode>,
    pub edges: Vec<DecisionEdge>,
}

impl DecisionTree {
    pub fn root(&self) -> Option<&DecisionNode> {
        self.nodes.iter().find(|node| node.is_root())
    }

    pub fn leaves(&self) -> impl Iterator<Item = &DecisionNode> {
        self.nodes.iter().filter(|node| node.is_leaf)
    }

    pub fn into_parts(self) -> (Vec<DecisionNode>, Vec<DecisionEdge>) {
        (self.nodes, self.edges)
    }
}

/// Build a rooted tree from storylines.
///
/// Identities are freshly generated, so building the same storylines twice yields
/// structurally equivalent but identity-distinct trees. Positions are placeholders
/// until the graph store lays the tree out.
pub fn storylines_to_tree(root_text: &str, storylines: &[Storyline]) -> DecisionTree {
    let root = DecisionNode::root(root_text);
    let root_id = root.id.clone();

    let step_count: usize = storylines.iter().map(Storyline::len).sum();
    let mut nodes = Vec::with_capacity(step_count + 1);
    let mut edges = Vec::with_capacity(step_count);
    nodes.push(root);

    for storyline in storylines {
        let mut parent_id = root_id.clone();
        let last = storyline.steps.len().saturating_sub(1);

        for (position, step) in storyline.steps.iter().enumerate() {
            let node = DecisionNode::new(
                step.text.clone(),
                Polarity::coerce_outcome(&step.polarity),
                position == last,
            );
            edges.push(DecisionEdge::connect(&parent_id, &node.id));
            parent_id = node.id.clone();
            nodes.push(node);
        }
    }

    debug!(
        storylines = storylines.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "Built decision tree from storylines"
    );

    DecisionTree { nodes, edges }
}
