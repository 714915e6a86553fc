#![allow(clippy::doc_markdown)] // Allow technical terms like OpenRouter in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Sidequest Core
//!
//! Decision-graph engine behind an interactive "what if" explorer: a user states a
//! decision, a language model proposes outcome chains, and the user grows the tree by
//! expanding any leaf into further outcomes.
//!
//! ## Overview
//!
//! The crate owns everything between raw model text and a positioned tree:
//!
//! - **Layout Engine**: pure left-to-right tree layout over nodes and edges
//! - **Response Parser**: strict storyline decoding and forgiving branch extraction
//! - **Tree Builder**: parallel storylines → rooted tree
//! - **Graph Store**: authoritative graph state with a single expansion marker
//! - **Prompt Composer**: time-window aware prompt construction
//!
//! Rendering and the model provider are collaborators at the edges: the store hands
//! out [`store::GraphSnapshot`]s, and providers plug in through [`client::ModelClient`].
//!
//! ## Module Organization
//!
//! - [`models`] - Nodes, edges, polarities, settings and model outcome types
//! - [`layout`] - Tree layout
//! - [`parser`] - Model response parsing
//! - [`tree_builder`] - Storyline to tree conversion
//! - [`state_machine`] - Per-node expansion lifecycle
//! - [`store`] - Graph store
//! - [`prompt`] - Prompt construction
//! - [`client`] - Model client trait, retry with backoff, OpenRouter implementation
//! - [`orchestration`] - Start and expand flows, [`DecisionSession`]
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup and helpers
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sidequest_core::config::ConfigManager;
//! use sidequest_core::{DecisionSession, GenerationSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! sidequest_core::logging::init_structured_logging();
//!
//! let manager = ConfigManager::load()?;
//! let session = DecisionSession::from_config(manager.config())?;
//!
//! let snapshot = session
//!     .start("Should I move to Lisbon?", GenerationSettings::default())
//!     .await?;
//! if let Some(leaf) = snapshot.nodes.iter().find(|node| node.is_leaf) {
//!     let children = session.expand(&leaf.id).await?;
//!     println!("expanded into {} outcomes", children.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod layout;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod parser;
pub mod prompt;
pub mod state_machine;
pub mod store;
pub mod tree_builder;

pub use client::{ModelCallError, ModelClient, OpenRouterClient, RetryPolicy, RetryingClient};
pub use config::{ConfigManager, SidequestConfig};
pub use error::{ErrorCategory, Result, SidequestError};
pub use layout::{layout_tree, LayoutConfig, LayoutError};
pub use models::{
    Branch, DecisionEdge, DecisionNode, GenerationSettings, PathStyle, Polarity, Position,
    Storyline, StorylineStep, Timeline, Tone,
};
pub use orchestration::DecisionSession;
pub use parser::{parse_branches, parse_storylines, ParseError};
pub use store::{GraphSnapshot, GraphStore};
pub use tree_builder::{storylines_to_tree, DecisionTree};
