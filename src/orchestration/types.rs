use crate::models::{Branch, GenerationSettings, PathStyle, Storyline, Timeline, Tone};
use serde::{Deserialize, Serialize};

/// Input for full-tree generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTreeRequest {
    pub root_text: String,
    pub tone: Tone,
    pub timeline: Timeline,
    pub path_style: PathStyle,
    pub depth: u32,
}

impl GenerateTreeRequest {
    pub fn new(root_text: impl Into<String>, settings: GenerationSettings) -> Self {
        Self {
            root_text: root_text.into(),
            tone: settings.tone,
            timeline: settings.timeline,
            path_style: settings.path_style,
            depth: settings.depth,
        }
    }

    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings {
            tone: self.tone,
            timeline: self.timeline,
            path_style: self.path_style,
            depth: self.depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateTreeResponse {
    pub storylines: Vec<Storyline>,
}

/// Input for expanding a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandBranchesRequest {
    pub node_text: String,
    pub tone: Tone,
    pub timeline: Timeline,
    pub path_style: PathStyle,
    /// Labels from the root down to the node's parent
    pub ancestor_path: Vec<String>,
    pub current_level: u32,
    pub total_levels: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandBranchesResponse {
    pub branches: Vec<Branch>,
}
