//! # Layout Engine
//!
//! Assigns left-to-right coordinates to every node of a decision tree.
//!
//! Ranks (tree depth) drive the primary `x` axis. Along the secondary `y` axis every
//! leaf receives its own slot in depth-first order and every parent is centered on
//! the span of its children, so nodes sharing a rank occupy disjoint, ordered slot
//! ranges and can never overlap. The whole tree is recomputed on every call; the
//! result depends only on the node order and edge order of the input.

use crate::constants::{NODE_HEIGHT, NODE_SEPARATION, NODE_WIDTH, RANK_SEPARATION};
use crate::models::{DecisionEdge, DecisionNode, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Caller invariant violations detected while laying out a graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Edge {edge_id} references unknown node {node_id}")]
    UnknownNode { edge_id: String, node_id: String },
    #[error("Node {node_id} has more than one parent")]
    MultipleParents { node_id: String },
    #[error("Nodes not reachable from any root: {node_ids:?}")]
    Unreachable { node_ids: Vec<String> },
}

/// Node footprint and spacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between nodes of the same rank
    pub node_separation: f64,
    /// Gap between consecutive ranks
    pub rank_separation: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            node_separation: NODE_SEPARATION,
            rank_separation: RANK_SEPARATION,
        }
    }
}

impl LayoutConfig {
    /// Distance between the left edges of consecutive ranks
    pub fn rank_step(&self) -> f64 {
        self.node_width + self.rank_separation
    }

    /// Distance between the top edges of consecutive slots
    pub fn slot_step(&self) -> f64 {
        self.node_height + self.node_separation
    }
}

/// Rank and slot computed for one node
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    rank: usize,
    slot: f64,
}

/// Lay out `nodes` according to `edges`, returning repositioned copies in input order.
///
/// Nodes without a parent are treated as roots and stacked one after another, which
/// keeps a partially built graph displayable. Every edge must reference nodes present
/// in `nodes`.
pub fn layout_tree(
    nodes: &[DecisionNode],
    edges: &[DecisionEdge],
    config: &LayoutConfig,
) -> Result<Vec<DecisionNode>, LayoutError> {
    let placements = compute_placements(nodes, edges)?;

    Ok(nodes
        .iter()
        .zip(placements)
        .map(|(node, placement)| {
            node.clone().with_position(Position::new(
                placement.rank as f64 * config.rank_step(),
                placement.slot * config.slot_step(),
            ))
        })
        .collect())
}

/// Tree depth of every node, in input order
pub fn ranks(nodes: &[DecisionNode], edges: &[DecisionEdge]) -> Result<Vec<usize>, LayoutError> {
    Ok(compute_placements(nodes, edges)?
        .into_iter()
        .map(|placement| placement.rank)
        .collect())
}

fn compute_placements(
    nodes: &[DecisionNode],
    edges: &[DecisionEdge],
) -> Result<Vec<Placement>, LayoutError> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut has_parent = vec![false; nodes.len()];

    for edge in edges {
        let lookup = |id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| LayoutError::UnknownNode {
                    edge_id: edge.id.clone(),
                    node_id: id.to_string(),
                })
        };
        let source = lookup(&edge.source)?;
        let target = lookup(&edge.target)?;

        if has_parent[target] {
            return Err(LayoutError::MultipleParents {
                node_id: edge.target.clone(),
            });
        }
        has_parent[target] = true;
        children[source].push(target);
    }

    let mut placements: Vec<Option<Placement>> = vec![None; nodes.len()];
    let mut next_leaf_slot = 0.0_f64;

    for root in (0..nodes.len()).filter(|&i| !has_parent[i]) {
        // Iterative post-order walk: (node, rank, next child cursor)
        let mut stack: Vec<(usize, usize, usize)> = vec![(root, 0, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, rank, cursor) = *frame;

            if let Some(&child) = children[node].get(cursor) {
                frame.2 += 1;
                stack.push((child, rank + 1, 0));
                continue;
            }

            stack.pop();
            let slot = match (children[node].first(), children[node].last()) {
                (Some(&first), Some(&last)) => {
                    let first_slot = placements[first].map_or(0.0, |p| p.slot);
                    let last_slot = placements[last].map_or(0.0, |p| p.slot);
                    (first_slot + last_slot) / 2.0
                }
                _ => {
                    let slot = next_leaf_slot;
                    next_leaf_slot += 1.0;
                    slot
                }
            };
            placements[node] = Some(Placement { rank, slot });
        }
    }

    let unreachable: Vec<String> = placements
        .iter()
        .zip(nodes)
        .filter(|(placement, _)| placement.is_none())
        .map(|(_, node)| node.id.clone())
        .collect();
    if !unreachable.is_empty() {
        return Err(LayoutError::Unreachable {
            node_ids: unreachable,
        });
    }

    Ok(placements.into_iter().flatten().collect())
}
