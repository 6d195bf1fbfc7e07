//! First-turn task intake via the LLM collaborator
//!
//! Converts a free-form goal description into raw tasks. The model is
//! told to answer with a strict JSON payload; the first `{...}` blob in
//! the reply is decoded and each task is clamped to the data model's
//! bounds. Anything else is an [`IntakeError`] the controller turns into
//! a fixed apology reply.

use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use tracing::debug;

use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::plan::RawTask;

const SYSTEM_PROMPT: &str = "You are a planning assistant. Reply with strict JSON only:\n\
{\"tasks\":[{\"title\":\"...\",\"est_minutes\":30,\"priority\":2}]}\n\
title is a short action.\n\
est_minutes is the duration in minutes.\n\
priority is 1 (important), 2 (normal) or 3 (minor).\n\
Do not assign times of day, only extract tasks.";

const MAX_TOKENS: u32 = 1024;

static PAYLOAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("no JSON payload in model response")]
    NoPayload,

    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    tasks: Vec<WireTask>,
}

#[derive(Debug, Deserialize)]
struct WireTask {
    #[serde(default)]
    title: String,
    #[serde(default)]
    est_minutes: Option<u32>,
    #[serde(default)]
    priority: Option<u8>,
}

/// Ask the model for tasks and clamp them to the data model's bounds.
///
/// Empty titles are dropped, estimates default to 30 and are floored at
/// 5 minutes, priorities outside {1,2,3} become 2. An empty result is a
/// valid outcome the controller answers with its own message.
pub async fn extract_tasks(llm: &Arc<dyn LlmClient>, prompt: &str) -> Result<Vec<RawTask>, IntakeError> {
    let request = CompletionRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        messages: vec![Message::user(prompt)],
        max_tokens: MAX_TOKENS,
    };

    let response = llm.complete(request).await?;
    let raw = response.content.unwrap_or_default();

    let blob = PAYLOAD_RE.find(&raw).ok_or(IntakeError::NoPayload)?;
    let payload: Payload = serde_json::from_str(blob.as_str())?;

    let tasks: Vec<RawTask> = payload
        .tasks
        .into_iter()
        .filter_map(|t| {
            let title = t.title.trim().to_string();
            if title.is_empty() {
                debug!("extract_tasks: dropping task with empty title");
                return None;
            }
            let est_minutes = t.est_minutes.unwrap_or(30).max(5);
            let priority = match t.priority {
                Some(p @ 1..=3) => p,
                _ => 2,
            };
            Some(RawTask {
                title,
                est_minutes,
                priority,
            })
        })
        .collect();

    debug!(count = tasks.len(), "extract_tasks: extracted");
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;

    fn llm(reply: &str) -> Arc<dyn LlmClient> {
        Arc::new(MockLlmClient::with_text(reply))
    }

    #[tokio::test]
    async fn extracts_tasks_from_noisy_reply() {
        let reply = r#"Sure, here you go:
{"tasks":[{"title":"Write report","est_minutes":60,"priority":1},
          {"title":"Walk","est_minutes":45,"priority":3}]}
Hope that helps!"#;

        let tasks = extract_tasks(&llm(reply), "my day").await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Write report");
        assert_eq!(tasks[1].priority, 3);
    }

    #[tokio::test]
    async fn clamps_out_of_range_fields() {
        let reply = r#"{"tasks":[
            {"title":"Tiny","est_minutes":1,"priority":9},
            {"title":"Bare"},
            {"title":"   "}
        ]}"#;

        let tasks = extract_tasks(&llm(reply), "my day").await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].est_minutes, 5);
        assert_eq!(tasks[0].priority, 2);
        assert_eq!(tasks[1].est_minutes, 30);
        assert_eq!(tasks[1].priority, 2);
    }

    #[tokio::test]
    async fn missing_payload_is_an_error() {
        let err = extract_tasks(&llm("I could not find any tasks."), "my day")
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::NoPayload));
    }

    #[tokio::test]
    async fn undecodable_payload_is_an_error() {
        let err = extract_tasks(&llm(r#"{"tasks": "not a list"}"#), "my day")
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Malformed(_)));
    }

    #[tokio::test]
    async fn empty_task_list_is_not_an_error() {
        let tasks = extract_tasks(&llm(r#"{"tasks":[]}"#), "my day").await.unwrap();
        assert!(tasks.is_empty());
    }
}
