//! Web search routing.
//!
//! A `SearchProvider` turns a query into a block of plain text. The router
//! tries providers in preference order and falls back on failure; no
//! ranking, dedup, or citation tracking happens here.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, query: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub provider: &'static str,
    pub text: String,
}

pub struct SearchRouter {
    providers: Vec<Box<dyn SearchProvider>>,
}

impl SearchRouter {
    pub fn new(providers: Vec<Box<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.search(query).await {
                Ok(text) => {
                    tracing::info!(provider = provider.name(), "web search succeeded");
                    return Ok(SearchOutcome {
                        provider: provider.name(),
                        text,
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "web search failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("no search providers configured")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        name: &'static str,
        reply: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl SearchProvider for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn search(&self, _query: &str) -> Result<String> {
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(anyhow!(msg)),
            }
        }
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let router = SearchRouter::new(vec![
            Box::new(Fixed {
                name: "tavily",
                reply: Ok("tavily says"),
            }),
            Box::new(Fixed {
                name: "serper",
                reply: Ok("serper says"),
            }),
        ]);

        let outcome = router.search("anything").await.unwrap();
        assert_eq!(outcome.provider, "tavily");
        assert_eq!(outcome.text, "tavily says");
    }

    #[tokio::test]
    async fn test_falls_back_on_failure() {
        let router = SearchRouter::new(vec![
            Box::new(Fixed {
                name: "tavily",
                reply: Err("quota exceeded"),
            }),
            Box::new(Fixed {
                name: "serper",
                reply: Ok("serper says"),
            }),
        ]);

        let outcome = router.search("anything").await.unwrap();
        assert_eq!(outcome.provider, "serper");
    }

    #[tokio::test]
    async fn test_all_failed_returns_last_error() {
        let router = SearchRouter::new(vec![Box::new(Fixed {
            name: "tavily",
            reply: Err("quota exceeded"),
        })]);

        let err = router.search("anything").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_empty_router_errors() {
        let router = SearchRouter::new(vec![]);
        assert!(router.is_empty());
        assert!(router.search("anything").await.is_err());
    }
}
