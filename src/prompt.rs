//! # Prompt Composer
//!
//! Deterministic construction of the two prompts sent to the model: full-tree
//! generation and single-node expansion. The output format each prompt asks for is
//! exactly what [`crate::parser`] expects back.

use crate::constants::{BRANCHES_PER_NODE, LIFETIME_STAGE_LABELS};
use crate::models::{PathStyle, Timeline, Tone};

/// Human label for the slice of `timeline` covered by `current_level` (1-based).
///
/// The horizon is divided into `total_levels` equal windows. Lifetime horizons use
/// life-stage labels for their first levels instead of numbers.
pub fn time_window(timeline: Timeline, current_level: u32, total_levels: u32) -> String {
    let level = current_level.max(1);
    let total_levels = total_levels.max(1);
    let unit = timeline.unit();

    let span = match timeline {
        Timeline::OneYear => 12.0,
        other => f64::from(other.total_duration()),
    };
    let per_level = span / f64::from(total_levels);
    let from = (f64::from(level - 1) * per_level).round() as u64;
    let to = (f64::from(level) * per_level).round() as u64;

    if timeline == Timeline::Lifetime {
        if let Some(stage) = LIFETIME_STAGE_LABELS.get(level as usize - 1) {
            return format!("during {stage}");
        }
        return format!("{unit} {from}-{to}");
    }

    if from == 0 {
        format!("the first {to} {unit}")
    } else {
        format!("{unit} {from}-{to}")
    }
}

/// Comma-separated window label for every level from 1 to `depth`
pub fn timeline_description(timeline: Timeline, depth: u32) -> String {
    (1..=depth)
        .map(|level| format!("Level {level}: {}", time_window(timeline, level, depth)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn horizon(timeline: Timeline) -> String {
    format!("{}-{}", timeline.total_duration(), timeline.unit())
}

fn story_so_far(ancestor_path: &[String]) -> String {
    if ancestor_path.is_empty() {
        return String::new();
    }

    let steps = ancestor_path
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\nStory so far:\n{steps}\n")
}

/// Prompt asking for the next outcomes of a single node
pub fn build_branch_prompt(
    node_text: &str,
    tone: Tone,
    timeline: Timeline,
    path_style: PathStyle,
    ancestor_path: &[String],
    current_level: u32,
    total_levels: u32,
) -> String {
    let window = time_window(timeline, current_level, total_levels);
    let horizon = horizon(timeline);
    let tone_instruction = tone.instruction();
    let context = story_so_far(ancestor_path);

    if path_style.is_balanced() {
        return format!(
            "Given the decision below, predict {BRANCHES_PER_NODE} outcomes for {window} of a {horizon} timeline. \
{tone_instruction} Respond in the SAME language as the decision text.
{context}
1. positive outcome
2. neutral outcome
3. negative outcome

Max 25 words each. No markdown, no extra text. Just the numbered list.

Decision: \"{node_text}\""
        );
    }

    let style_instruction = match path_style {
        PathStyle::Chaos => "Be wildly unpredictable with twists.",
        _ => "Make it a coherent narrative: positive events can lead to hubris, negative to comebacks.",
    };

    format!(
        "Given the decision below, predict {BRANCHES_PER_NODE} possible next events for {window} of a {horizon} timeline. \
{tone_instruction} {style_instruction} Respond in the SAME language as the decision text.
{context}
For each, pick a polarity tag. Format exactly like this:
1. [positive] outcome text here
2. [negative] outcome text here
3. [neutral] outcome text here

Max 25 words each. No markdown, no extra text. Just the numbered list with [polarity] tags.

Decision: \"{node_text}\""
    )
}

/// Prompt asking for the whole initial tree as three linear JSON chains
pub fn build_tree_prompt(
    root_text: &str,
    tone: Tone,
    timeline: Timeline,
    path_style: PathStyle,
    depth: u32,
) -> String {
    let progression = timeline_description(timeline, depth);
    let tone_instruction = tone.instruction();
    let polarity_instruction = match path_style {
        PathStyle::Balanced => {
            "Each group of 3 siblings MUST have exactly one \"positive\", one \"neutral\", and one \"negative\" node."
        }
        PathStyle::Chaos => "Assign polarities freely and be wildly unpredictable with twists.",
        PathStyle::Story => {
            "Assign polarities freely for narrative coherence: positive events can lead to hubris, negative to comebacks."
        }
    };

    format!(
        r#"Generate {BRANCHES_PER_NODE} parallel storylines as JSON for the decision below. Each storyline is a linear chain of {depth} events with no branching, just one event leading to the next.

Rules:
- Exactly {BRANCHES_PER_NODE} storylines, each {depth} events long (linear chain, NOT a tree)
- Each event has: "text" (max 30 words, be detailed and specific), "polarity" ("positive"/"neutral"/"negative")
- Each event has a "next" field pointing to the next event, or omit "next" for the last event
- Time progression along each chain: {progression}
- {tone_instruction}
- {polarity_instruction}
- Respond in the SAME language as the decision text
- Return ONLY valid JSON array, no markdown, no code fences

Format:
[
  {{"text": "...", "polarity": "positive", "next": {{"text": "...", "polarity": "neutral", "next": {{"text": "...", "polarity": "negative"}}}}}},
  {{"text": "...", "polarity": "neutral", "next": {{"text": "...", "polarity": "positive", "next": {{"text": "...", "polarity": "negative"}}}}}},
  {{"text": "...", "polarity": "negative", "next": {{"text": "...", "polarity": "neutral", "next": {{"text": "...", "polarity": "positive"}}}}}}
]

Decision: "{root_text}""#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_year_windows() {
        assert_eq!(time_window(Timeline::OneYear, 1, 3), "the first 4 months");
        assert_eq!(time_window(Timeline::OneYear, 2, 3), "months 4-8");
        assert_eq!(time_window(Timeline::OneYear, 3, 3), "months 8-12");
    }

    #[test]
    fn test_year_windows_round_half_up() {
        assert_eq!(time_window(Timeline::FiveYears, 1, 2), "the first 3 years");
        assert_eq!(time_window(Timeline::FiveYears, 2, 2), "years 3-5");
        assert_eq!(time_window(Timeline::TenYears, 2, 4), "years 3-5");
    }

    #[test]
    fn test_lifetime_stages() {
        assert_eq!(time_window(Timeline::Lifetime, 1, 4), "during early life");
        assert_eq!(time_window(Timeline::Lifetime, 4, 4), "during later years");
        assert_eq!(time_window(Timeline::Lifetime, 5, 6), "years 40-50");
    }

    #[test]
    fn test_degenerate_levels_do_not_panic() {
        assert_eq!(time_window(Timeline::OneYear, 0, 0), "the first 12 months");
    }

    #[test]
    fn test_timeline_description() {
        assert_eq!(
            timeline_description(Timeline::FiveYears, 2),
            "Level 1: the first 3 years, Level 2: years 3-5"
        );
    }

    #[test]
    fn test_balanced_branch_prompt() {
        let prompt = build_branch_prompt(
            "Quit my job",
            Tone::Realistic,
            Timeline::FiveYears,
            PathStyle::Balanced,
            &[],
            1,
            3,
        );
        assert!(prompt.contains("predict 3 outcomes for the first 2 years of a 5-years timeline"));
        assert!(prompt.contains("1. positive outcome"));
        assert!(!prompt.contains("Story so far"));
        assert!(prompt.ends_with("Decision: \"Quit my job\""));
    }

    #[test]
    fn test_tagged_branch_prompt_includes_context() {
        let path = vec!["Quit my job".to_string(), "Started a bakery".to_string()];
        let prompt = build_branch_prompt(
            "Bakery is popular",
            Tone::Chaotic,
            Timeline::OneYear,
            PathStyle::Chaos,
            &path,
            3,
            3,
        );
        assert!(prompt.contains("Story so far:\n1. Quit my job\n2. Started a bakery\n"));
        assert!(prompt.contains("Be wildly unpredictable with twists."));
        assert!(prompt.contains("[polarity] tags"));
        assert!(prompt.contains("months 8-12"));
    }

    #[test]
    fn test_tree_prompt() {
        let prompt = build_tree_prompt(
            "Move abroad",
            Tone::Optimistic,
            Timeline::Lifetime,
            PathStyle::Balanced,
            2,
        );
        assert!(prompt.contains("linear chain of 2 events"));
        assert!(prompt.contains("Level 1: during early life, Level 2: during young adulthood"));
        assert!(prompt.contains("exactly one \"positive\""));
        assert!(prompt.contains(r#"{"text": "...", "polarity": "positive", "next": {"#));
        assert!(prompt.ends_with("Decision: \"Move abroad\""));
    }
}
