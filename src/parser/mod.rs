//! # Response Parser
//!
//! Converts raw model text into typed outcomes. Two independent contracts:
//!
//! - [`parse_storylines`] decodes the nested JSON chain array returned for full-tree
//!   generation and fails loudly, since a malformed tree cannot be safely repaired.
//! - [`parse_branches`] extracts up to three outcomes from a numbered list and never
//!   fails; format drift degrades through fallback heuristics down to an empty list.

pub mod branches;
pub mod storyline;

pub use branches::parse_branches;
pub use storyline::parse_storylines;

use thiserror::Error;

/// Structural failures of the full-tree response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("response does not match the storyline chain shape: {0}")]
    UnexpectedShape(String),
}

/// Characters of raw model output included in log previews
pub(crate) const PREVIEW_CHARS: usize = 200;

/// Truncated copy of `text` for logging
pub(crate) fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
