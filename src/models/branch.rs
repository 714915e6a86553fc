//! Outcome structures produced by the model.
//!
//! A [`Storyline`] is decoded from the nested `{ text, polarity, next }` chain the
//! model returns for full-tree generation, but held as a flat ordered sequence since
//! consumers only ever walk it front to back.

use super::node::Polarity;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One candidate child outcome produced by a single-node expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub text: String,
    pub polarity: Polarity,
}

impl Branch {
    pub fn new(text: impl Into<String>, polarity: Polarity) -> Self {
        Self {
            text: text.into(),
            polarity,
        }
    }
}

/// One step of a storyline with the polarity exactly as the model wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorylineStep {
    pub text: String,
    /// Raw polarity; unrecognized values are coerced when the tree is built
    pub polarity: String,
}

impl StorylineStep {
    pub fn new(text: impl Into<String>, polarity: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            polarity: polarity.into(),
        }
    }
}

/// A linear chain of outcome steps from the root to a terminal leaf
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Storyline {
    pub steps: Vec<StorylineStep>,
}

impl Storyline {
    pub fn new(steps: Vec<StorylineStep>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl FromIterator<StorylineStep> for Storyline {
    fn from_iter<I: IntoIterator<Item = StorylineStep>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Wire shape of a single chain link
#[derive(Debug, Deserialize)]
struct ChainLink {
    text: String,
    #[serde(default)]
    polarity: Option<String>,
    #[serde(default)]
    next: Option<Box<ChainLink>>,
}

impl<'de> Deserialize<'de> for Storyline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let head = ChainLink::deserialize(deserializer)?;
        let mut steps = Vec::new();
        let mut current = Some(Box::new(head));
        while let Some(link) = current {
            let ChainLink {
                text,
                polarity,
                next,
            } = *link;
            steps.push(StorylineStep {
                text,
                polarity: polarity.unwrap_or_default(),
            });
            current = next;
        }
        Ok(Self { steps })
    }
}

/// Borrowed view over the remaining steps, serialized as a nested chain
struct ChainView<'a>(&'a [StorylineStep]);

impl Serialize for ChainView<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some((head, rest)) = self.0.split_first() else {
            return serializer.serialize_none();
        };
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("text", &head.text)?;
        map.serialize_entry("polarity", &head.polarity)?;
        if !rest.is_empty() {
            map.serialize_entry("next", &ChainView(rest))?;
        }
        map.end()
    }
}

impl Serialize for Storyline {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ChainView(&self.steps).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_chain_decodes_to_flat_steps() {
        let storyline: Storyline = serde_json::from_value(json!({
            "text": "Quit the job",
            "polarity": "positive",
            "next": {
                "text": "Savings ran low",
                "polarity": "negative",
                "next": { "text": "Landed a contract", "polarity": "neutral" }
            }
        }))
        .unwrap();

        assert_eq!(storyline.len(), 3);
        assert_eq!(storyline.steps[0], StorylineStep::new("Quit the job", "positive"));
        assert_eq!(storyline.steps[2].text, "Landed a contract");
    }

    #[test]
    fn test_null_next_and_missing_polarity_are_tolerated() {
        let storyline: Storyline =
            serde_json::from_value(json!({ "text": "Stayed", "next": null })).unwrap();
        assert_eq!(storyline.steps, vec![StorylineStep::new("Stayed", "")]);
    }

    #[test]
    fn test_storyline_serializes_as_chain() {
        let storyline: Storyline = vec![
            StorylineStep::new("a", "positive"),
            StorylineStep::new("b", "neutral"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_value(&storyline).unwrap(),
            json!({
                "text": "a",
                "polarity": "positive",
                "next": { "text": "b", "polarity": "neutral" }
            })
        );
    }
}
