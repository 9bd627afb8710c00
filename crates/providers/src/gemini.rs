use crate::credentials::CredentialStore;
use crate::{ProviderError, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Provider name, also the key under which the credential is stored.
pub const GEMINI: &str = "gemini";

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

pub struct GeminiClient {
    http: Client,
    model: String,
    credentials: Arc<dyn CredentialStore>,
}

impl GeminiClient {
    /// The credential store is injected so the request layer never reads
    /// global state; the key is looked up at every outbound call.
    pub fn new(model: &str, credentials: Arc<dyn CredentialStore>) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(45))
            .build()
            .map_err(|e| ProviderError::Network {
                provider: GEMINI,
                source: e,
            })?;
        Ok(Self {
            http,
            model: model.to_string(),
            credentials,
        })
    }
}

fn truncate_body(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn is_key_rejection(status: u16, body: &str) -> bool {
    // Gemini reports a bad key as 400 API_KEY_INVALID rather than 401.
    status == 401
        || status == 403
        || (status == 400 && (body.contains("API key not valid") || body.contains("API_KEY_INVALID")))
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let key = self
            .credentials
            .get(GEMINI)
            .ok_or(ProviderError::MissingKey { provider: GEMINI })?;
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, key
        );

        let req = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "gemini request");
        let resp = self
            .http
            .post(url)
            .json(&req)
            .send()
            .await
            .map_err(|e| ProviderError::Network {
                provider: GEMINI,
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body = body.trim();
            if is_key_rejection(status.as_u16(), body) {
                tracing::warn!(%status, "gemini rejected the API key");
                return Err(ProviderError::Unauthorized { provider: GEMINI });
            }
            return Err(ProviderError::Api {
                provider: GEMINI,
                status: status.as_u16(),
                message: truncate_body(body, 800),
            });
        }

        let body: GeminiResponse = resp.json().await.map_err(|e| ProviderError::Network {
            provider: GEMINI,
            source: e,
        })?;
        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default();
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rejection_statuses() {
        assert!(is_key_rejection(401, ""));
        assert!(is_key_rejection(403, "forbidden"));
        assert!(is_key_rejection(
            400,
            r#"{"error":{"status":"INVALID_ARGUMENT","message":"API key not valid. Please pass a valid API key."}}"#
        ));
        assert!(!is_key_rejection(400, "malformed request"));
        assert!(!is_key_rejection(500, "internal"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let short = truncate_body("hello", 800);
        assert_eq!(short, "hello");

        let long: String = "é".repeat(1000);
        let cut = truncate_body(&long, 800);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 803);
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Improved text."}]}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(json).unwrap();
        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default();
        assert_eq!(text, "Improved text.");
    }

    #[test]
    fn test_empty_candidates_yield_empty_text() {
        let parsed: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
