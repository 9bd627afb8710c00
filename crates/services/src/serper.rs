use crate::search::SearchProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENDPOINT: &str = "https://google.serper.dev/search";

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(rename = "answerBox")]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    snippet: Option<String>,
    answer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerperErrorBody {
    message: Option<String>,
}

pub struct SerperClient {
    http: Client,
    api_key: String,
    max_results: usize,
}

impl SerperClient {
    pub fn new(api_key: String, max_results: usize) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(20)).build()?;
        Ok(Self {
            http,
            api_key,
            max_results,
        })
    }
}

/// Answer box first, then the top organic hits.
fn format_response(resp: &SerperResponse, max_results: usize) -> String {
    if let Some(answer_box) = &resp.answer_box {
        if let Some(text) = answer_box
            .snippet
            .as_deref()
            .or(answer_box.answer.as_deref())
        {
            return text.to_string();
        }
        return "No direct answer found.".to_string();
    }

    if !resp.organic.is_empty() {
        return resp
            .organic
            .iter()
            .take(max_results)
            .map(|r| {
                format!(
                    "Title: {}\nURL: {}\nSnippet: {}",
                    r.title,
                    r.link,
                    r.snippet.as_deref().unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");
    }

    "No relevant search results found.".to_string()
}

#[async_trait]
impl SearchProvider for SerperClient {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(&self, query: &str) -> Result<String> {
        let resp = self
            .http
            .post(ENDPOINT)
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest { q: query })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<SerperErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            return Err(anyhow!("Serper API error: {}", detail));
        }

        let parsed: SerperResponse = resp.json().await?;
        Ok(format_response(&parsed, self.max_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_box_snippet_first() {
        let parsed: SerperResponse = serde_json::from_str(
            r#"{
                "answerBox": {"snippet": "The snippet.", "answer": "The answer."},
                "organic": [{"title": "t", "link": "l", "snippet": "s"}]
            }"#,
        )
        .unwrap();
        assert_eq!(format_response(&parsed, 5), "The snippet.");
    }

    #[test]
    fn test_answer_box_without_snippet_uses_answer() {
        let parsed: SerperResponse =
            serde_json::from_str(r#"{"answerBox": {"answer": "42"}}"#).unwrap();
        assert_eq!(format_response(&parsed, 5), "42");
    }

    #[test]
    fn test_empty_answer_box_reports_no_direct_answer() {
        let parsed: SerperResponse = serde_json::from_str(r#"{"answerBox": {}}"#).unwrap();
        assert_eq!(format_response(&parsed, 5), "No direct answer found.");
    }

    #[test]
    fn test_organic_results_capped() {
        let organic: Vec<String> = (0..8)
            .map(|i| {
                format!(
                    r#"{{"title": "Result {i}", "link": "https://x.example/{i}", "snippet": "s{i}"}}"#
                )
            })
            .collect();
        let json = format!(r#"{{"organic": [{}]}}"#, organic.join(","));
        let parsed: SerperResponse = serde_json::from_str(&json).unwrap();

        let text = format_response(&parsed, 5);
        assert_eq!(text.matches("Title: ").count(), 5);
        assert!(text.contains("Result 0"));
        assert!(!text.contains("Result 5"));
    }

    #[test]
    fn test_nothing_found() {
        let parsed: SerperResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(format_response(&parsed, 5), "No relevant search results found.");
    }
}
