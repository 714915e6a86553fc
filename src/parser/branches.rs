use crate::constants::BRANCHES_PER_NODE;
use crate::models::{Branch, PathStyle, Polarity};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\s\S]*?```").expect("fenced block pattern is valid"));
static ENUMERATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)\-]").expect("enumeration pattern is valid"));
static ENUMERATION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)\-]\s*").expect("enumeration prefix pattern is valid"));
static POLARITY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[?(positive|neutral|negative)\]?\s*[:\-–]?\s*")
        .expect("polarity tag pattern is valid")
});

/// Fallback lines must be longer than this many characters
const MIN_FALLBACK_LINE_CHARS: usize = 5;

/// Strip fenced code blocks and asterisk emphasis markup
fn clean_markup(raw: &str) -> String {
    FENCED_BLOCK
        .replace_all(raw, "")
        .replace('*', "")
        .trim()
        .to_string()
}

fn strip_enumeration(line: &str) -> &str {
    match ENUMERATION_PREFIX.find(line) {
        Some(prefix) => line[prefix.end()..].trim(),
        None => line.trim(),
    }
}

/// Split a leading polarity keyword (bracketed or not) off an outcome line
fn split_polarity_tag(text: &str) -> Option<(Polarity, &str)> {
    let captures = POLARITY_TAG.captures(text)?;
    let polarity = match captures[1].to_ascii_lowercase().as_str() {
        "positive" => Polarity::Positive,
        "negative" => Polarity::Negative,
        _ => Polarity::Neutral,
    };
    let tag_end = captures.get(0).map_or(0, |m| m.end());
    Some((polarity, text[tag_end..].trim()))
}

/// Extract up to three branch outcomes from a numbered-list response.
///
/// Never fails: unformatted prose falls back to positional polarities, and the worst
/// case is an empty list which callers treat as "no branches produced".
pub fn parse_branches(raw: &str, path_style: PathStyle) -> Vec<Branch> {
    let cleaned = clean_markup(raw);

    let lines: Vec<&str> = cleaned
        .lines()
        .map(str::trim)
        .filter(|line| ENUMERATION_MARKER.is_match(line))
        .take(BRANCHES_PER_NODE)
        .collect();

    let branches: Vec<Branch> = if lines.is_empty() {
        warn!("Branch response has no numbered lines, falling back to plain lines");
        cleaned
            .lines()
            .map(str::trim)
            .filter(|line| line.chars().count() > MIN_FALLBACK_LINE_CHARS)
            .take(BRANCHES_PER_NODE)
            .enumerate()
            .map(|(i, line)| Branch::new(strip_enumeration(line), Polarity::for_position(i)))
            .collect()
    } else if path_style.is_balanced() {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| Branch::new(strip_enumeration(line), Polarity::for_position(i)))
            .collect()
    } else {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let stripped = strip_enumeration(line);
                match split_polarity_tag(stripped) {
                    Some((polarity, text)) => Branch::new(text, polarity),
                    None => Branch::new(stripped, Polarity::for_position(i)),
                }
            })
            .collect()
    };

    debug!(
        count = branches.len(),
        path_style = %path_style,
        "Parsed branch outcomes"
    );
    branches
}
