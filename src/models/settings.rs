//! Generation settings chosen by the user before a run.
//!
//! Settings are immutable for the duration of a generation run and are replaced
//! wholesale for the next one.

use crate::error::{Result, SidequestError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotional register requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Optimistic,
    Realistic,
    Pessimistic,
    Chaotic,
}

impl Tone {
    /// Sentence injected into every prompt for this tone
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Optimistic => {
                "Focus on hopeful and encouraging outcomes, but keep them realistic and grounded."
            }
            Self::Realistic => {
                "Be balanced and pragmatic. Show how things would most likely unfold."
            }
            Self::Pessimistic => "Focus on risks, challenges, and things that could go wrong.",
            Self::Chaotic => {
                "Be wildly creative and unpredictable. Throw in unexpected twists and absurd scenarios."
            }
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimistic => write!(f, "optimistic"),
            Self::Realistic => write!(f, "realistic"),
            Self::Pessimistic => write!(f, "pessimistic"),
            Self::Chaotic => write!(f, "chaotic"),
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "optimistic" => Ok(Self::Optimistic),
            "realistic" => Ok(Self::Realistic),
            "pessimistic" => Ok(Self::Pessimistic),
            "chaotic" => Ok(Self::Chaotic),
            _ => Err(format!("Invalid tone: {s}")),
        }
    }
}

/// Total horizon the tree's levels are spread across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "lifetime")]
    Lifetime,
}

impl Timeline {
    /// Total duration of the horizon, expressed in years
    pub fn total_duration(&self) -> u32 {
        match self {
            Self::OneYear => 1,
            Self::FiveYears => 5,
            Self::TenYears => 10,
            Self::Lifetime => 60,
        }
    }

    /// Unit used when labelling time windows
    pub fn unit(&self) -> &'static str {
        match self {
            Self::OneYear => "months",
            Self::FiveYears | Self::TenYears | Self::Lifetime => "years",
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneYear => write!(f, "1y"),
            Self::FiveYears => write!(f, "5y"),
            Self::TenYears => write!(f, "10y"),
            Self::Lifetime => write!(f, "lifetime"),
        }
    }
}

impl std::str::FromStr for Timeline {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1y" => Ok(Self::OneYear),
            "5y" => Ok(Self::FiveYears),
            "10y" => Ok(Self::TenYears),
            "lifetime" => Ok(Self::Lifetime),
            _ => Err(format!("Invalid timeline: {s}")),
        }
    }
}

/// How polarities are distributed across sibling outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    /// Exactly one positive, one neutral and one negative outcome per expansion
    Balanced,
    /// The model picks polarities for narrative coherence
    Story,
    /// The model picks polarities freely with unpredictable twists
    Chaos,
}

impl PathStyle {
    pub fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balanced => write!(f, "balanced"),
            Self::Story => write!(f, "story"),
            Self::Chaos => write!(f, "chaos"),
        }
    }
}

impl std::str::FromStr for PathStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(Self::Balanced),
            "story" => Ok(Self::Story),
            "chaos" => Ok(Self::Chaos),
            _ => Err(format!("Invalid path style: {s}")),
        }
    }
}

/// Settings for one generation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub tone: Tone,
    pub timeline: Timeline,
    pub path_style: PathStyle,
    /// Number of levels below the root generated up front (2 to 5)
    pub depth: u32,
}

impl GenerationSettings {
    pub const MIN_DEPTH: u32 = 2;
    pub const MAX_DEPTH: u32 = 5;

    /// True when `depth` lies within `MIN_DEPTH..=MAX_DEPTH`
    pub fn depth_in_range(depth: u32) -> bool {
        (Self::MIN_DEPTH..=Self::MAX_DEPTH).contains(&depth)
    }

    pub fn validate(&self) -> Result<()> {
        if !Self::depth_in_range(self.depth) {
            return Err(SidequestError::InvalidSettings(format!(
                "depth must be between {} and {}, got {}",
                Self::MIN_DEPTH,
                Self::MAX_DEPTH,
                self.depth
            )));
        }
        Ok(())
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        crate::constants::DEFAULT_SETTINGS
    }
}
