//! Chat-turn orchestration and the append-only session log.
//!
//! A turn optionally performs a web search first, then builds a single
//! prompt (document context, search results, prior conversation) and asks
//! the generator. The caller appends the user message optimistically and
//! rolls it back by id when the turn fails.

use crate::{prompt, AssistError};
use providers::TextGenerator;
use services::SearchRouter;
use shared::chat::{ChatMessage, MessageKind};
use uuid::Uuid;

/// Ordered, append-only message log for the chat sidebar.
///
/// Messages are never edited; the only removal is rolling back an
/// optimistically appended entry, addressed by id so duplicate contents
/// stay unambiguous.
#[derive(Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_welcome(text: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.push(ChatMessage::model(text));
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) -> Uuid {
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Remove the message with this id. Returns whether anything was
    /// removed.
    pub fn rollback(&mut self, id: Uuid) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    /// The conversation as prompt context: everything except step markers.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.kind == MessageKind::Normal)
            .cloned()
            .collect()
    }
}

/// Inputs for one chat turn. `transcript` is the conversation *before*
/// the current question (the caller snapshots it before optimistically
/// appending the user message).
pub struct ChatTurn<'a> {
    pub question: &'a str,
    pub document: Option<&'a str>,
    pub transcript: &'a [ChatMessage],
}

/// Run one turn: optional search step, then a single generation call.
///
/// `on_step` fires for progress notes the UI shows as step-marker
/// messages while the turn is still running.
pub async fn run_chat_turn(
    generator: &dyn TextGenerator,
    search: Option<&SearchRouter>,
    turn: ChatTurn<'_>,
    mut on_step: impl FnMut(&str),
) -> Result<String, AssistError> {
    let mut search_context = None;

    if let Some(router) = search {
        on_step("Searching the web…");
        let outcome = router
            .search(turn.question)
            .await
            .map_err(AssistError::Search)?;
        on_step(&format!("Searched the web with {}.", outcome.provider));
        search_context = Some(outcome.text);
    }

    let prompt = prompt::chat_prompt(
        turn.question,
        turn.document,
        search_context.as_deref(),
        turn.transcript,
    );
    tracing::info!(
        with_search = search.is_some(),
        with_document = turn.document.is_some(),
        "requesting chat reply"
    );

    let response = generator.generate(&prompt).await?;
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(AssistError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use providers::ProviderError;
    use services::SearchProvider;
    use std::sync::Mutex;

    struct MockGenerator {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl MockGenerator {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct MockSearch {
        reply: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl SearchProvider for MockSearch {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn search(&self, _query: &str) -> anyhow::Result<String> {
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(anyhow!(msg)),
            }
        }
    }

    #[tokio::test]
    async fn test_plain_turn_returns_trimmed_reply() {
        let generator = MockGenerator::replying("  An answer. \n");
        let turn = ChatTurn {
            question: "What now?",
            document: None,
            transcript: &[],
        };

        let reply = run_chat_turn(&generator, None, turn, |_| {}).await.unwrap();
        assert_eq!(reply, "An answer.");
    }

    #[tokio::test]
    async fn test_search_results_reach_the_prompt() {
        let generator = MockGenerator::replying("Grounded answer.");
        let router = SearchRouter::new(vec![Box::new(MockSearch {
            reply: Ok("Title: Rivers\nURL: https://r.example\nContent: facts"),
        })]);
        let turn = ChatTurn {
            question: "Latest river news?",
            document: None,
            transcript: &[],
        };

        let mut steps = Vec::new();
        let reply = run_chat_turn(&generator, Some(&router), turn, |s| steps.push(s.to_string()))
            .await
            .unwrap();

        assert_eq!(reply, "Grounded answer.");
        assert_eq!(steps, vec!["Searching the web…", "Searched the web with mock."]);
        let prompt = generator.last_prompt();
        assert!(prompt.contains("WEB SEARCH RESULTS"));
        assert!(prompt.contains("Title: Rivers"));
    }

    #[tokio::test]
    async fn test_search_failure_abandons_the_turn() {
        let generator = MockGenerator::replying("never used");
        let router = SearchRouter::new(vec![Box::new(MockSearch {
            reply: Err("quota exceeded"),
        })]);
        let turn = ChatTurn {
            question: "Anything?",
            document: None,
            transcript: &[],
        };

        let err = run_chat_turn(&generator, Some(&router), turn, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AssistError::Search(_)));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_document_context_reaches_the_prompt() {
        let generator = MockGenerator::replying("ok");
        let turn = ChatTurn {
            question: "Summarize it",
            document: Some("The whole document body."),
            transcript: &[],
        };

        run_chat_turn(&generator, None, turn, |_| {}).await.unwrap();
        assert!(generator.last_prompt().contains("The whole document body."));
    }

    #[tokio::test]
    async fn test_empty_reply_is_a_failure() {
        let generator = MockGenerator::replying("  \n ");
        let turn = ChatTurn {
            question: "Hm?",
            document: None,
            transcript: &[],
        };

        let err = run_chat_turn(&generator, None, turn, |_| {}).await.unwrap_err();
        assert!(matches!(err, AssistError::EmptyResponse));
    }

    #[test]
    fn test_rollback_removes_only_the_addressed_message() {
        let mut session = ChatSession::new();
        let first = session.push(ChatMessage::user("same words"));
        let second = session.push(ChatMessage::user("same words"));

        assert!(session.rollback(second));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].id, first);

        // Rolling back again is a no-op.
        assert!(!session.rollback(second));
    }

    #[test]
    fn test_transcript_skips_step_markers() {
        let mut session = ChatSession::with_welcome("Hello!");
        session.push(ChatMessage::user("question"));
        session.push(ChatMessage::step("Searching the web…"));
        session.push(ChatMessage::model("answer"));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert!(transcript.iter().all(|m| m.kind == MessageKind::Normal));
    }
}
