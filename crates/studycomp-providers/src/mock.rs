//! Scripted provider for exercising the quiz engine without real API calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use studycomp_core::traits::{GenerateRequest, GenerateResponse, TextGenerator, TokenUsage};

/// Returns canned responses chosen by prompt substring.
pub struct MockProvider {
    /// Map of prompt substring to response text.
    responses: HashMap<String, String>,
    /// Response used when no substring matches.
    default_response: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            // An empty question list: the engine falls back to its own content.
            default_response: "[]".to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self::new(HashMap::new()).with_default_response(response)
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = response.to_string();
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        // Longest matching key wins so overlapping keys stay predictable.
        let content = self
            .responses
            .iter()
            .filter(|(key, _)| request.prompt.contains(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        // Rough estimate
        let prompt_tokens = (request.prompt.len() / 4) as u32;
        let completion_tokens = (content.len() / 4) as u32;

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage::new(prompt_tokens, completion_tokens),
            latency_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: "mock".into(),
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: 100,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("{\"title\": \"t\"}");
        let response = provider.generate(&request("anything")).await.unwrap();
        assert_eq!(response.content, "{\"title\": \"t\"}");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn prompt_matching() {
        let mut responses = HashMap::new();
        responses.insert("Explain".to_string(), "explanation".to_string());
        responses.insert("Explain \"Deadlocks\"".to_string(), "deadlocks".to_string());
        responses.insert("multiple-choice".to_string(), "questions".to_string());

        let provider = MockProvider::new(responses);

        let resp = provider
            .generate(&request("Explain \"Deadlocks\" for a college student."))
            .await
            .unwrap();
        assert_eq!(resp.content, "deadlocks");

        let resp = provider
            .generate(&request("Write 2 Easy multiple-choice questions"))
            .await
            .unwrap();
        assert_eq!(resp.content, "questions");

        let resp = provider.generate(&request("unrelated")).await.unwrap();
        assert_eq!(resp.content, "[]");
        assert_eq!(provider.call_count(), 3);
    }
}
