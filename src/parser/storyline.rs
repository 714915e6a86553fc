use super::{preview, ParseError};
use crate::constants::BRANCHES_PER_NODE;
use crate::models::Storyline;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, error, warn};

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^```(?:json)?\s*").expect("opening fence pattern is valid"));
static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)```\s*$").expect("closing fence pattern is valid"));

/// Remove a surrounding code fence (optionally tagged `json`) from model output
pub fn strip_code_fence(raw: &str) -> String {
    let without_opening = OPENING_FENCE.replace(raw, "");
    CLOSING_FENCE
        .replace(&without_opening, "")
        .trim()
        .to_string()
}

/// Decode the full-tree response into parallel storylines.
///
/// `expected_depth` is only used to flag chains of unexpected length; a well-formed
/// response with a different chain count or length is still accepted.
pub fn parse_storylines(
    raw: &str,
    expected_depth: Option<usize>,
) -> Result<Vec<Storyline>, ParseError> {
    let cleaned = strip_code_fence(raw);

    let value: serde_json::Value = serde_json::from_str(&cleaned).map_err(|e| {
        error!(error = %e, raw = %preview(raw), "Storyline response is not valid JSON");
        ParseError::InvalidJson(e.to_string())
    })?;

    let storylines: Vec<Storyline> = serde_json::from_value(value).map_err(|e| {
        error!(error = %e, raw = %preview(raw), "Storyline response has unexpected shape");
        ParseError::UnexpectedShape(e.to_string())
    })?;

    if storylines.is_empty() {
        return Err(ParseError::UnexpectedShape(
            "storyline array is empty".to_string(),
        ));
    }

    if storylines.len() != BRANCHES_PER_NODE {
        warn!(
            expected = BRANCHES_PER_NODE,
            actual = storylines.len(),
            "Model returned an unexpected number of storylines"
        );
    }
    if let Some(depth) = expected_depth {
        for (index, storyline) in storylines.iter().enumerate() {
            if storyline.len() != depth {
                warn!(
                    storyline = index,
                    expected_depth = depth,
                    actual_depth = storyline.len(),
                    "Storyline length differs from requested depth"
                );
            }
        }
    }

    debug!(count = storylines.len(), "Parsed storylines");
    Ok(storylines)
}
