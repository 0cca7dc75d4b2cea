//! HTTP client for the hosted generation service.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::GenerationError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Narrow interface to the generative service: text instruction in,
/// text (or schema-shaped JSON text) out.
///
/// The question source and the follow-up client share one implementation;
/// tests substitute a canned double.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        schema: Option<&Value>,
    ) -> Result<String, GenerationError>;
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(
        &self,
        instruction: &str,
        schema: Option<&Value>,
    ) -> Result<String, GenerationError> {
        let mut payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": instruction }] }],
        });
        if let Some(schema) = schema {
            payload["generationConfig"] = serde_json::json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        let url = format!("{}/models/{}:generateContent", API_BASE, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        extract_candidate_text(&body)
    }
}

/// Pull the reply text out of a `generateContent` response body.
fn extract_candidate_text(body: &Value) -> Result<String, GenerationError> {
    body.get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
        .ok_or_else(|| GenerationError::Parse("no candidate text in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_candidate_text() {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"question\":\"...\"}" }] }
            }]
        });
        assert_eq!(
            extract_candidate_text(&body).unwrap(),
            "{\"question\":\"...\"}"
        );
    }

    #[test]
    fn test_extract_candidate_text_missing() {
        let body = serde_json::json!({ "candidates": [] });
        assert!(matches!(
            extract_candidate_text(&body),
            Err(GenerationError::Parse(_))
        ));
    }
}
