//! Stateless prompt → model → parse steps for both generation flows.

use super::types::{
    ExpandBranchesRequest, ExpandBranchesResponse, GenerateTreeRequest, GenerateTreeResponse,
};
use crate::client::ModelClient;
use crate::constants::operations;
use crate::error::{Result, SidequestError};
use crate::logging::log_error;
use crate::parser::{parse_branches, parse_storylines, preview};
use crate::prompt::{build_branch_prompt, build_tree_prompt};
use tracing::{debug, info, instrument};

/// Generate the initial storylines for a decision.
///
/// Fails with [`SidequestError::StructuralParse`] when the model's answer is not the
/// expected chain array; there is no partial tree in that case.
#[instrument(skip_all, fields(depth = request.depth, path_style = %request.path_style))]
pub async fn generate_tree(
    client: &dyn ModelClient,
    request: &GenerateTreeRequest,
) -> Result<GenerateTreeResponse> {
    let root_text = request.root_text.trim();
    if root_text.is_empty() {
        return Err(SidequestError::InvalidInput(
            "decision text must not be empty".to_string(),
        ));
    }
    request.settings().validate()?;

    let prompt = build_tree_prompt(
        root_text,
        request.tone,
        request.timeline,
        request.path_style,
        request.depth,
    );

    let text = client.complete(&prompt).await?;
    debug!(raw = %preview(&text), "Tree response received");

    let storylines = parse_storylines(&text, Some(request.depth as usize)).map_err(|e| {
        log_error(
            "orchestration",
            operations::GENERATE_TREE,
            &e.to_string(),
            Some(&preview(&text)),
        );
        SidequestError::from(e)
    })?;

    info!(
        storylines = storylines.len(),
        steps = storylines.iter().map(|s| s.len()).sum::<usize>(),
        "Storylines parsed"
    );
    Ok(GenerateTreeResponse { storylines })
}

/// Generate candidate outcomes for a single node.
///
/// Parsing never fails here; an unusable answer yields an empty branch list.
#[instrument(
    skip_all,
    fields(level = request.current_level, total_levels = request.total_levels)
)]
pub async fn generate_branches(
    client: &dyn ModelClient,
    request: &ExpandBranchesRequest,
) -> Result<ExpandBranchesResponse> {
    let prompt = build_branch_prompt(
        &request.node_text,
        request.tone,
        request.timeline,
        request.path_style,
        &request.ancestor_path,
        request.current_level,
        request.total_levels,
    );

    let text = client.complete(&prompt).await?;
    debug!(raw = %preview(&text), "Branch response received");

    let branches = parse_branches(&text, request.path_style);
    info!(
        operation = operations::GENERATE_BRANCHES,
        branches = branches.len(),
        "Branches parsed"
    );
    Ok(ExpandBranchesResponse { branches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ModelCallError;
    use crate::models::{GenerationSettings, PathStyle, Polarity, Timeline, Tone};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct FixedClient {
        reply: std::result::Result<String, ModelCallError>,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedClient {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for FixedClient {
        async fn complete(&self, prompt: &str) -> std::result::Result<String, ModelCallError> {
            self.prompts.lock().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn branch_request(path_style: PathStyle) -> ExpandBranchesRequest {
        ExpandBranchesRequest {
            node_text: "Open a bakery".to_string(),
            tone: Tone::Realistic,
            timeline: Timeline::FiveYears,
            path_style,
            ancestor_path: vec!["Quit my job".to_string()],
            current_level: 2,
            total_levels: 3,
        }
    }

    #[tokio::test]
    async fn test_generate_tree_parses_fenced_json() {
        let client = FixedClient::ok(
            "```json\n[{\"text\":\"a\",\"polarity\":\"positive\",\"next\":{\"text\":\"b\",\"polarity\":\"negative\"}}]\n```",
        );
        let request = GenerateTreeRequest::new(
            "  Move abroad  ",
            GenerationSettings {
                depth: 2,
                ..GenerationSettings::default()
            },
        );

        let response = generate_tree(&client, &request).await.unwrap();

        assert_eq!(response.storylines.len(), 1);
        assert_eq!(response.storylines[0].len(), 2);
        assert!(client.prompts.lock()[0].ends_with("Decision: \"Move abroad\""));
    }

    #[tokio::test]
    async fn test_generate_tree_rejects_prose() {
        let client = FixedClient::ok("Sorry, I cannot help with that.");
        let request = GenerateTreeRequest::new("Move abroad", GenerationSettings::default());

        let error = generate_tree(&client, &request).await.unwrap_err();
        assert!(matches!(error, SidequestError::StructuralParse(_)));
    }

    #[tokio::test]
    async fn test_generate_tree_validates_before_calling() {
        let client = FixedClient::ok("[]");
        let blank = GenerateTreeRequest::new("   ", GenerationSettings::default());
        assert!(matches!(
            generate_tree(&client, &blank).await,
            Err(SidequestError::InvalidInput(_))
        ));

        let shallow = GenerateTreeRequest::new(
            "Move abroad",
            GenerationSettings {
                depth: 1,
                ..GenerationSettings::default()
            },
        );
        assert!(matches!(
            generate_tree(&client, &shallow).await,
            Err(SidequestError::InvalidSettings(_))
        ));
        assert!(client.prompts.lock().is_empty());
    }

    #[tokio::test]
    async fn test_generate_branches_tagged() {
        let client = FixedClient::ok("1. [negative] Flour prices spike\n2. [positive] Lines out the door");
        let response = generate_branches(&client, &branch_request(PathStyle::Story))
            .await
            .unwrap();

        assert_eq!(response.branches.len(), 2);
        assert_eq!(response.branches[0].polarity, Polarity::Negative);
        assert_eq!(response.branches[1].text, "Lines out the door");
        assert!(client.prompts.lock()[0].contains("Story so far:\n1. Quit my job"));
    }

    #[tokio::test]
    async fn test_generate_branches_propagates_model_failure() {
        let client = FixedClient {
            reply: Err(ModelCallError::Exhausted {
                attempts: 3,
                last: Box::new(ModelCallError::EmptyContent),
            }),
            prompts: Mutex::new(Vec::new()),
        };

        let error = generate_branches(&client, &branch_request(PathStyle::Balanced))
            .await
            .unwrap_err();
        assert!(matches!(error, SidequestError::ModelCall(_)));
    }
}
