use super::generation::{generate_branches, generate_tree};
use super::types::{ExpandBranchesRequest, GenerateTreeRequest};
use crate::client::{ModelClient, OpenRouterClient, RetryingClient};
use crate::config::SidequestConfig;
use crate::constants::operations;
use crate::error::{Result, SidequestError};
use crate::logging::log_error;
use crate::models::GenerationSettings;
use crate::store::{GraphSnapshot, GraphStore};
use crate::tree_builder::storylines_to_tree;
use std::sync::Arc;
use tracing::{info, instrument};

/// One interactive decision tree: the graph store plus the model used to grow it.
///
/// At most one expansion runs at a time across the whole session; a second request
/// is rejected immediately rather than queued.
#[derive(Clone)]
pub struct DecisionSession {
    store: Arc<GraphStore>,
    client: Arc<dyn ModelClient>,
}

impl std::fmt::Debug for DecisionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionSession")
            .field("node_count", &self.store.node_count())
            .field("expanding_node_id", &self.store.expanding_node_id())
            .finish()
    }
}

impl DecisionSession {
    pub fn new(store: Arc<GraphStore>, client: Arc<dyn ModelClient>) -> Self {
        Self { store, client }
    }

    /// Build a session backed by the configured provider with retry
    pub fn from_config(config: &SidequestConfig) -> Result<Self> {
        config.validate()?;
        let provider = OpenRouterClient::new(config.model.clone())?;
        let client = RetryingClient::new(provider, config.retry.policy());
        let store = GraphStore::with_settings(config.layout, config.default_settings());
        Ok(Self::new(Arc::new(store), Arc::new(client)))
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    /// Generate and install a fresh tree for `root_text`.
    ///
    /// The previous tree is discarded up front; on any failure the store is left empty.
    #[instrument(skip(self, root_text), fields(depth = settings.depth))]
    pub async fn start(&self, root_text: &str, settings: GenerationSettings) -> Result<GraphSnapshot> {
        settings.validate()?;
        let root_text = root_text.trim();
        if root_text.is_empty() {
            return Err(SidequestError::InvalidInput(
                "decision text must not be empty".to_string(),
            ));
        }

        self.store.reset();
        self.store.set_settings(settings);

        let request = GenerateTreeRequest::new(root_text, settings);
        let response = generate_tree(self.client.as_ref(), &request).await?;

        let (nodes, edges) = storylines_to_tree(root_text, &response.storylines).into_parts();
        self.store.set_graph(nodes, edges)?;

        info!(
            nodes = self.store.node_count(),
            edges = self.store.edge_count(),
            "Decision tree generated"
        );
        Ok(self.store.snapshot())
    }

    /// Grow the leaf `node_id` by one level of model-generated outcomes.
    ///
    /// Returns the ids of the new children. On failure the node stays an expandable
    /// leaf and the expansion marker is released.
    #[instrument(skip(self))]
    pub async fn expand(&self, node_id: &str) -> Result<Vec<String>> {
        self.store.try_begin_expansion(node_id)?;

        match self.run_expansion(node_id).await {
            Ok(children) => Ok(children),
            Err(error) => {
                log_error(
                    "session",
                    operations::EXPAND_NODE,
                    &error.to_string(),
                    Some(node_id),
                );
                self.store.abort_expansion(node_id, &error.to_string());
                Err(error)
            }
        }
    }

    async fn run_expansion(&self, node_id: &str) -> Result<Vec<String>> {
        let node = self
            .store
            .node(node_id)
            .ok_or_else(|| SidequestError::NodeNotFound(node_id.to_string()))?;
        let settings = self.store.settings();
        let ancestor_path = self.store.get_ancestor_path(node_id);

        let path_len = u32::try_from(ancestor_path.len()).unwrap_or(u32::MAX);
        let request = ExpandBranchesRequest {
            node_text: node.label,
            tone: settings.tone,
            timeline: settings.timeline,
            path_style: settings.path_style,
            current_level: path_len.saturating_add(1).min(settings.depth),
            total_levels: settings.depth,
            ancestor_path,
        };

        let response = generate_branches(self.client.as_ref(), &request).await?;
        self.store.expand_node(node_id, &response.branches)
    }
}
