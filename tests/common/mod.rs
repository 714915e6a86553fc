#![allow(dead_code)]

pub mod strategies;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use sidequest_core::client::{ModelCallError, ModelClient};
use sidequest_core::models::{DecisionEdge, DecisionNode, Polarity};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Mock model that replays scripted replies in order and records every prompt
#[derive(Default)]
pub struct ScriptedModelClient {
    replies: Mutex<VecDeque<Result<String, ModelCallError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicU32,
}

impl ScriptedModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, error: ModelCallError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    /// Fail `times` times with a transport error, then answer `text`
    pub fn fail_then_reply(mut self, times: u32, text: impl Into<String>) -> Self {
        for attempt in 0..times {
            self = self.fail(ModelCallError::Transport(format!("connection reset #{attempt}")));
        }
        self.reply(text)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for ScriptedModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ModelCallError::Transport("no scripted reply left".to_string())))
    }
}

/// Mock that blocks every call until the test releases it
pub struct GatedModelClient {
    pub inner: ScriptedModelClient,
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedModelClient {
    pub fn new(inner: ScriptedModelClient) -> Self {
        Self {
            inner,
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl ModelClient for GatedModelClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelCallError> {
        self.started.notify_one();
        self.release.notified().await;
        self.inner.complete(prompt).await
    }
}

/// JSON for `count` linear storylines of `depth` steps each
pub fn storylines_json(count: usize, depth: usize) -> String {
    let polarities = ["positive", "neutral", "negative"];
    let chains: Vec<Value> = (0..count)
        .map(|storyline| {
            let mut chain: Option<Value> = None;
            for step in (0..depth).rev() {
                let mut event = json!({
                    "text": format!("storyline {storyline} step {step}"),
                    "polarity": polarities[(storyline + step) % 3],
                });
                if let Some(next) = chain.take() {
                    event["next"] = next;
                }
                chain = Some(event);
            }
            chain.unwrap_or(Value::Null)
        })
        .collect();
    Value::Array(chains).to_string()
}

/// Root with three outcome leaves, not yet laid out
pub fn small_tree() -> (Vec<DecisionNode>, Vec<DecisionEdge>) {
    let root = DecisionNode::root("Should I learn Rust?");
    let children: Vec<DecisionNode> = Polarity::OUTCOME_CYCLE
        .iter()
        .enumerate()
        .map(|(i, polarity)| DecisionNode::outcome(format!("outcome {i}"), *polarity))
        .collect();
    let edges = children
        .iter()
        .map(|child| DecisionEdge::connect(&root.id, &child.id))
        .collect();

    let mut nodes = vec![root];
    nodes.extend(children);
    (nodes, edges)
}
