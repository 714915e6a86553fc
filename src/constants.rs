//! # System Constants
//!
//! Fixed values that define the shape of a decision tree and the setting choices
//! offered to the user. Layout values here are the defaults for
//! [`crate::layout::LayoutConfig`]; deployments may override them through configuration.

use crate::models::{GenerationSettings, PathStyle, Timeline, Tone};

/// Number of outcomes requested per expansion and storylines per generation
pub const BRANCHES_PER_NODE: usize = 3;

/// Node footprint used by the layout engine
pub const NODE_WIDTH: f64 = 300.0;
pub const NODE_HEIGHT: f64 = 100.0;

/// Minimum gap between nodes sharing a rank
pub const NODE_SEPARATION: f64 = 50.0;
/// Minimum gap between consecutive ranks
pub const RANK_SEPARATION: f64 = 120.0;

pub const DEFAULT_SETTINGS: GenerationSettings = GenerationSettings {
    tone: Tone::Realistic,
    timeline: Timeline::FiveYears,
    path_style: PathStyle::Story,
    depth: 3,
};

/// Human-readable life stages used for the first levels of a lifetime horizon
pub const LIFETIME_STAGE_LABELS: [&str; 4] =
    ["early life", "young adulthood", "mid-life", "later years"];

/// A selectable value with its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingOption<T> {
    pub value: T,
    pub label: &'static str,
    pub description: Option<&'static str>,
}

const fn option<T>(value: T, label: &'static str) -> SettingOption<T> {
    SettingOption {
        value,
        label,
        description: None,
    }
}

pub const TONE_OPTIONS: [SettingOption<Tone>; 4] = [
    option(Tone::Realistic, "Realistic"),
    option(Tone::Optimistic, "Optimistic"),
    option(Tone::Pessimistic, "Pessimistic"),
    option(Tone::Chaotic, "Chaotic"),
];

pub const TIMELINE_OPTIONS: [SettingOption<Timeline>; 4] = [
    option(Timeline::OneYear, "1 Year"),
    option(Timeline::FiveYears, "5 Years"),
    option(Timeline::TenYears, "10 Years"),
    option(Timeline::Lifetime, "Lifetime"),
];

pub const PATH_STYLE_OPTIONS: [SettingOption<PathStyle>; 3] = [
    SettingOption {
        value: PathStyle::Story,
        label: "Story",
        description: Some("AI picks polarities for narrative coherence"),
    },
    SettingOption {
        value: PathStyle::Balanced,
        label: "Balanced",
        description: Some("Always one positive, neutral, negative"),
    },
    SettingOption {
        value: PathStyle::Chaos,
        label: "Chaos",
        description: Some("Wild, unpredictable outcomes"),
    },
];

pub const DEPTH_OPTIONS: [SettingOption<u32>; 3] = [
    option(2, "Quick (2 levels)"),
    option(3, "Medium (3 levels)"),
    option(4, "Deep (4 levels)"),
];

/// Look up the display label for a value in one of the option tables
pub fn option_label<T: PartialEq>(options: &[SettingOption<T>], value: &T) -> Option<&'static str> {
    options
        .iter()
        .find(|option| option.value == *value)
        .map(|option| option.label)
}

/// Structured-log operation names
pub mod operations {
    pub const SET_GRAPH: &str = "graph.set";
    pub const EXPAND_NODE: &str = "graph.expand_node";
    pub const BEGIN_EXPANSION: &str = "graph.begin_expansion";
    pub const CLEAR_EXPANSION: &str = "graph.clear_expansion";
    pub const RESET: &str = "graph.reset";
    pub const GENERATE_TREE: &str = "model.generate_tree";
    pub const GENERATE_BRANCHES: &str = "model.generate_branches";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_tables_cover_every_variant() {
        assert_eq!(option_label(&TONE_OPTIONS, &Tone::Chaotic), Some("Chaotic"));
        assert_eq!(
            option_label(&TIMELINE_OPTIONS, &Timeline::Lifetime),
            Some("Lifetime")
        );
        assert_eq!(option_label(&DEPTH_OPTIONS, &4), Some("Deep (4 levels)"));
        assert_eq!(option_label(&DEPTH_OPTIONS, &7), None);
        assert!(PATH_STYLE_OPTIONS
            .iter()
            .all(|option| option.description.is_some()));
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(DEFAULT_SETTINGS.validate().is_ok());
        assert!(DEPTH_OPTIONS
            .iter()
            .all(|option| option.value >= GenerationSettings::MIN_DEPTH));
    }
}
