//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent (fresh context)
///
/// The planner needs exactly one blocking completion per conversation,
/// the first-turn task intake, so the trait surface is a single call.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        responses: Vec<CompletionResponse>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<CompletionResponse>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Convenience for the common single-text-reply case
        pub fn with_text(text: &str) -> Self {
            Self::new(vec![CompletionResponse {
                content: Some(text.to_string()),
                usage: Default::default(),
            }])
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::complete: fetching response");
            self.responses
                .get(idx)
                .cloned()
                .or_else(|| self.responses.last().cloned())
                .ok_or_else(|| LlmError::InvalidResponse("No mock responses".to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn mock_client_returns_responses_in_order() {
            let client = MockLlmClient::new(vec![
                CompletionResponse {
                    content: Some("Response 1".to_string()),
                    usage: Default::default(),
                },
                CompletionResponse {
                    content: Some("Response 2".to_string()),
                    usage: Default::default(),
                },
            ]);

            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                max_tokens: 100,
            };

            let resp1 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp1.content.as_deref(), Some("Response 1"));

            let resp2 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp2.content.as_deref(), Some("Response 2"));

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn mock_client_repeats_last_response_when_exhausted() {
            let client = MockLlmClient::with_text("only");

            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                max_tokens: 100,
            };

            client.complete(req.clone()).await.unwrap();
            let again = client.complete(req).await.unwrap();
            assert_eq!(again.content.as_deref(), Some("only"));
        }

        #[tokio::test]
        async fn mock_client_errors_with_no_responses() {
            let client = MockLlmClient::new(vec![]);
            let req = CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                max_tokens: 100,
            };
            assert!(client.complete(req).await.is_err());
        }
    }
}
