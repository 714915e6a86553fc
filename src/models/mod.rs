pub mod branch;
pub mod edge;
pub mod node;
pub mod settings;

// Re-export core models for easy access
pub use branch::{Branch, Storyline, StorylineStep};
pub use edge::DecisionEdge;
pub use node::{generate_node_id, DecisionNode, Polarity, Position};
pub use settings::{GenerationSettings, PathStyle, Timeline, Tone};
