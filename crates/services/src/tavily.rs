use crate::search::SearchProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENDPOINT: &str = "https://api.tavily.com/search";

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct TavilyErrorBody {
    error: Option<String>,
}

pub struct TavilyClient {
    http: Client,
    api_key: String,
    max_results: usize,
}

impl TavilyClient {
    pub fn new(api_key: String, max_results: usize) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(20)).build()?;
        Ok(Self {
            http,
            api_key,
            max_results,
        })
    }
}

/// Prefer Tavily's direct answer; otherwise join the result entries.
fn format_response(resp: &TavilyResponse) -> String {
    if let Some(answer) = resp.answer.as_deref() {
        if !answer.trim().is_empty() {
            return answer.trim().to_string();
        }
    }

    resp.results
        .iter()
        .map(|r| format!("Title: {}\nURL: {}\nContent: {}", r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &'static str {
        "tavily"
    }

    async fn search(&self, query: &str) -> Result<String> {
        let req = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: "basic",
            include_answer: true,
            max_results: self.max_results,
        };

        let resp = self.http.post(ENDPOINT).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<TavilyErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| status.to_string());
            return Err(anyhow!("Tavily API error: {}", detail));
        }

        let parsed: TavilyResponse = resp.json().await?;
        Ok(format_response(&parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_takes_priority() {
        let parsed: TavilyResponse = serde_json::from_str(
            r#"{
                "answer": "Rust 1.80 was released in July 2024.",
                "results": [{"title": "t", "url": "u", "content": "c"}]
            }"#,
        )
        .unwrap();
        assert_eq!(format_response(&parsed), "Rust 1.80 was released in July 2024.");
    }

    #[test]
    fn test_results_joined_with_separators() {
        let parsed: TavilyResponse = serde_json::from_str(
            r#"{
                "answer": null,
                "results": [
                    {"title": "First", "url": "https://a.example", "content": "Alpha"},
                    {"title": "Second", "url": "https://b.example", "content": "Beta"}
                ]
            }"#,
        )
        .unwrap();

        let text = format_response(&parsed);
        assert!(text.starts_with("Title: First\nURL: https://a.example\nContent: Alpha"));
        assert!(text.contains("\n\n---\n\n"));
        assert!(text.ends_with("Title: Second\nURL: https://b.example\nContent: Beta"));
    }

    #[test]
    fn test_blank_answer_falls_through_to_results() {
        let parsed: TavilyResponse = serde_json::from_str(
            r#"{"answer": "  ", "results": [{"title": "t", "url": "u", "content": "c"}]}"#,
        )
        .unwrap();
        assert_eq!(format_response(&parsed), "Title: t\nURL: u\nContent: c");
    }

    #[test]
    fn test_error_body_field() {
        let body: TavilyErrorBody =
            serde_json::from_str(r#"{"error": "Invalid API key"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("Invalid API key"));
    }
}
