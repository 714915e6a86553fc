use proptest::prelude::*;
use sidequest_core::models::{Branch, DecisionEdge, DecisionNode, Polarity};

/// Strategy for parent tables: entry `i` is the parent of node `i + 1`, always an
/// earlier node, so the result is a single rooted tree
pub fn parent_table_strategy(max_nodes: usize) -> impl Strategy<Value = Vec<usize>> {
    (1..max_nodes).prop_flat_map(|len| {
        (1..=len)
            .map(|child| 0..child)
            .collect::<Vec<_>>()
    })
}

/// Strategy for random rooted trees with labels that encode their node index
pub fn tree_strategy(max_nodes: usize) -> impl Strategy<Value = (Vec<DecisionNode>, Vec<DecisionEdge>)> {
    parent_table_strategy(max_nodes).prop_map(|parents| {
        let mut nodes = vec![DecisionNode::root("node 0")];
        let mut edges = Vec::with_capacity(parents.len());
        for (offset, parent) in parents.iter().enumerate() {
            let child = DecisionNode::new(
                format!("node {}", offset + 1),
                Polarity::for_position(offset),
                true,
            );
            edges.push(DecisionEdge::connect(&nodes[*parent].id, &child.id));
            nodes.push(child);
        }

        let parent_ids: std::collections::HashSet<String> =
            edges.iter().map(|edge| edge.source.clone()).collect();
        for node in nodes.iter_mut() {
            node.is_leaf = !parent_ids.contains(&node.id);
        }
        (nodes, edges)
    })
}

pub fn polarity_strategy() -> impl Strategy<Value = Polarity> {
    prop_oneof![
        Just(Polarity::Positive),
        Just(Polarity::Neutral),
        Just(Polarity::Negative),
    ]
}

/// Strategy for branch lists of zero to three outcomes
pub fn branches_strategy() -> impl Strategy<Value = Vec<Branch>> {
    prop::collection::vec(
        ("[a-zA-Z ]{1,40}", polarity_strategy()).prop_map(|(text, polarity)| Branch::new(text, polarity)),
        0..=3,
    )
}
