//! # Graph Store
//!
//! Authoritative mutable state of one decision tree session: the node and edge
//! collections, the single expansion marker, and the generation settings.
//!
//! Every mutation takes the write lock for its whole duration and runs the layout
//! engine before committing, so readers never observe a half-updated or un-laid-out
//! graph. Settings live behind their own lock because they are owned and reset
//! independently of the graph.

use crate::constants::operations;
use crate::error::{Result, SidequestError};
use crate::layout::{layout_tree, LayoutConfig};
use crate::logging::log_graph_operation;
use crate::models::{Branch, DecisionEdge, DecisionNode, GenerationSettings};
use crate::state_machine::{transition, ExpansionEvent, NodeExpansionState};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Consistent copy of the graph handed to rendering collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub nodes: Vec<DecisionNode>,
    pub edges: Vec<DecisionEdge>,
    pub expanding_node_id: Option<String>,
}

#[derive(Debug, Default)]
struct GraphState {
    nodes: Vec<DecisionNode>,
    edges: Vec<DecisionEdge>,
    expanding_node_id: Option<String>,
}

impl GraphState {
    fn node(&self, id: &str) -> Option<&DecisionNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    fn expansion_state(&self, node: &DecisionNode) -> NodeExpansionState {
        NodeExpansionState::of(node, self.expanding_node_id.as_deref())
    }
}

/// Thread-safe state container for a single tree session
#[derive(Debug)]
pub struct GraphStore {
    graph: RwLock<GraphState>,
    settings: RwLock<GenerationSettings>,
    layout: LayoutConfig,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl GraphStore {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            graph: RwLock::new(GraphState::default()),
            settings: RwLock::new(GenerationSettings::default()),
            layout,
        }
    }

    /// Create a store seeded with non-default settings
    pub fn with_settings(layout: LayoutConfig, settings: GenerationSettings) -> Self {
        let store = Self::new(layout);
        *store.settings.write() = settings;
        store
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Replace the whole graph, lay it out and clear the expansion marker.
    ///
    /// On a layout failure the previous graph is left untouched.
    pub fn set_graph(&self, nodes: Vec<DecisionNode>, edges: Vec<DecisionEdge>) -> Result<()> {
        let laid_out = layout_tree(&nodes, &edges, &self.layout)?;

        let mut graph = self.graph.write();
        graph.nodes = laid_out;
        graph.edges = edges;
        graph.expanding_node_id = None;

        log_graph_operation(
            operations::SET_GRAPH,
            None,
            graph.nodes.len(),
            graph.edges.len(),
            "success",
            None,
        );
        Ok(())
    }

    /// Attach one new leaf child per branch to `parent_id` and re-lay-out the graph.
    ///
    /// The parent stops being a leaf even when `branches` is empty, which turns it into
    /// a permanent dead end. Returns the ids of the created children in branch order.
    pub fn expand_node(&self, parent_id: &str, branches: &[Branch]) -> Result<Vec<String>> {
        let mut graph = self.graph.write();

        let parent = graph
            .node(parent_id)
            .ok_or_else(|| SidequestError::NodeNotFound(parent_id.to_string()))?;
        match graph.expansion_state(parent) {
            NodeExpansionState::Expanding => {
                transition(
                    NodeExpansionState::Expanding,
                    &ExpansionEvent::Succeed(branches.len()),
                )?;
            }
            state => {
                warn!(
                    node_id = %parent_id,
                    state = %state,
                    "Expanding node that does not hold the expansion marker"
                );
            }
        }

        let mut nodes: Vec<DecisionNode> = graph
            .nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if node.id == parent_id {
                    node.is_leaf = false;
                }
                node
            })
            .collect();
        let mut edges = graph.edges.clone();

        let children: Vec<DecisionNode> = branches
            .iter()
            .map(|branch| DecisionNode::outcome(branch.text.clone(), branch.polarity))
            .collect();
        let child_ids: Vec<String> = children.iter().map(|child| child.id.clone()).collect();

        edges.extend(
            children
                .iter()
                .map(|child| DecisionEdge::connect(parent_id, &child.id)),
        );
        nodes.extend(children);

        let laid_out = layout_tree(&nodes, &edges, &self.layout)?;

        graph.nodes = laid_out;
        graph.edges = edges;
        graph.expanding_node_id = None;

        log_graph_operation(
            operations::EXPAND_NODE,
            Some(parent_id),
            graph.nodes.len(),
            graph.edges.len(),
            "success",
            Some(&format!("{} children attached", child_ids.len())),
        );
        Ok(child_ids)
    }

    /// Set or clear the single expansion-in-progress marker
    pub fn set_expanding_node_id(&self, id: Option<String>) {
        let mut graph = self.graph.write();
        debug!(
            previous = ?graph.expanding_node_id,
            next = ?id,
            "Updating expansion marker"
        );
        graph.expanding_node_id = id;
    }

    /// Atomically claim the expansion marker for `node_id`.
    ///
    /// Rejects the request when any node already holds the marker, when the node does
    /// not exist, or when it is no longer a leaf.
    pub fn try_begin_expansion(&self, node_id: &str) -> Result<()> {
        let mut graph = self.graph.write();

        if let Some(active) = &graph.expanding_node_id {
            return Err(SidequestError::ExpansionInProgress {
                active: active.clone(),
            });
        }

        let node = graph
            .node(node_id)
            .ok_or_else(|| SidequestError::NodeNotFound(node_id.to_string()))?;
        let state = graph.expansion_state(node);
        if transition(state, &ExpansionEvent::Request).is_err() {
            return Err(SidequestError::NodeNotExpandable(node_id.to_string()));
        }

        graph.expanding_node_id = Some(node_id.to_string());
        log_graph_operation(
            operations::BEGIN_EXPANSION,
            Some(node_id),
            graph.nodes.len(),
            graph.edges.len(),
            "claimed",
            None,
        );
        Ok(())
    }

    /// Release the marker after a failed expansion, leaving the node expandable.
    ///
    /// Does nothing if `node_id` no longer holds the marker (for example after a reset).
    pub fn abort_expansion(&self, node_id: &str, reason: &str) {
        let mut graph = self.graph.write();

        let Some(node) = graph.node(node_id) else {
            if graph.expanding_node_id.as_deref() == Some(node_id) {
                graph.expanding_node_id = None;
            }
            return;
        };
        let state = graph.expansion_state(node);
        let event = ExpansionEvent::Fail(reason.to_string());
        if transition(state, &event).is_err() {
            debug!(node_id = %node_id, state = %state, "No expansion to abort");
            return;
        }

        graph.expanding_node_id = None;
        log_graph_operation(
            operations::CLEAR_EXPANSION,
            Some(node_id),
            graph.nodes.len(),
            graph.edges.len(),
            "aborted",
            event.error_message(),
        );
    }

    pub fn expanding_node_id(&self) -> Option<String> {
        self.graph.read().expanding_node_id.clone()
    }

    /// Labels of every ancestor of `node_id`, ordered root first.
    ///
    /// Walks parent edges until no parent is found; a visited set guarantees
    /// termination even if the graph were malformed.
    pub fn get_ancestor_path(&self, node_id: &str) -> Vec<String> {
        let graph = self.graph.read();

        let parents: HashMap<&str, &str> = graph
            .edges
            .iter()
            .map(|edge| (edge.target.as_str(), edge.source.as_str()))
            .collect();
        let labels: HashMap<&str, &str> = graph
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node.label.as_str()))
            .collect();

        let mut path = Vec::new();
        let mut visited: HashSet<&str> = HashSet::from([node_id]);
        let mut current = node_id;

        while let Some(&parent) = parents.get(current) {
            let Some(&label) = labels.get(parent) else {
                break;
            };
            if !visited.insert(parent) {
                warn!(node_id = %node_id, "Cycle detected while walking ancestors");
                break;
            }
            path.push(label.to_string());
            current = parent;
        }

        path.reverse();
        path
    }

    /// Clear nodes, edges and the expansion marker. Settings are left alone.
    pub fn reset(&self) {
        let mut graph = self.graph.write();
        *graph = GraphState::default();
        log_graph_operation(operations::RESET, None, 0, 0, "success", None);
    }

    pub fn settings(&self) -> GenerationSettings {
        *self.settings.read()
    }

    /// Replace the settings wholesale for the next generation run
    pub fn set_settings(&self, settings: GenerationSettings) {
        *self.settings.write() = settings;
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let graph = self.graph.read();
        GraphSnapshot {
            nodes: graph.nodes.clone(),
            edges: graph.edges.clone(),
            expanding_node_id: graph.expanding_node_id.clone(),
        }
    }

    pub fn node(&self, id: &str) -> Option<DecisionNode> {
        self.graph.read().node(id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.graph.read().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.read().edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.read().nodes.is_empty()
    }
}
