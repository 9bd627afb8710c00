//! Background request workers.
//!
//! Each request runs on its own thread with its own tokio runtime and
//! reports back over an mpsc channel polled by the UI every frame. Worker
//! panics are caught and surfaced as ordinary failures.

use crate::types::{ChatUpdate, RequestFailure, RewriteResult};
use assist::{ChatTurn, RewriteAction, RewriteEngine, SelectionRange};
use providers::{CredentialStore, GeminiClient, TextGenerator};
use services::{SearchProvider, SearchRouter, SerperClient, TavilyClient};
use shared::chat::ChatMessage;
use shared::settings::AppSettings;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use uuid::Uuid;

pub fn spawn_rewrite_request(
    action: RewriteAction,
    selection: String,
    range: SelectionRange,
    model: String,
    credentials: Arc<dyn CredentialStore>,
    tx: Sender<RewriteResult>,
) {
    std::thread::spawn(move || {
        let tx_panic = tx.clone();
        let res = catch_unwind(AssertUnwindSafe(|| {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = tx.send(RewriteResult {
                        action,
                        outcome: Err(RequestFailure::internal(format!(
                            "failed to start async runtime: {e}"
                        ))),
                    });
                    return;
                }
            };

            let outcome = rt.block_on(async {
                let client = GeminiClient::new(&model, credentials)?;
                let engine = RewriteEngine::new(Arc::new(client));
                engine.suggest(action, &selection, range).await
            });

            let _ = tx.send(RewriteResult {
                action,
                outcome: outcome.map_err(RequestFailure::from_assist),
            });
        }));

        if res.is_err() {
            let _ = tx_panic.send(RewriteResult {
                action,
                outcome: Err(RequestFailure::internal("rewrite worker panicked")),
            });
        }
    });
}

pub struct ChatRequest {
    pub question: String,
    pub document: Option<String>,
    pub transcript: Vec<ChatMessage>,
    pub use_search: bool,
    pub user_message_id: Uuid,
}

/// Build the search router from whichever providers have a stored key,
/// honoring the configured preference order.
fn build_search_router(
    settings: &AppSettings,
    credentials: &Arc<dyn CredentialStore>,
) -> SearchRouter {
    let mut providers: Vec<Box<dyn SearchProvider>> = Vec::new();
    for name in &settings.search_provider_preference {
        let built: Option<Box<dyn SearchProvider>> = match name.as_str() {
            "tavily" => credentials.get("tavily").and_then(|key| {
                TavilyClient::new(key, settings.search_max_results)
                    .ok()
                    .map(|c| Box::new(c) as Box<dyn SearchProvider>)
            }),
            "serper" => credentials.get("serper").and_then(|key| {
                SerperClient::new(key, settings.search_max_results)
                    .ok()
                    .map(|c| Box::new(c) as Box<dyn SearchProvider>)
            }),
            other => {
                tracing::warn!(provider = other, "unknown search provider in settings");
                None
            }
        };
        if let Some(provider) = built {
            providers.push(provider);
        }
    }
    SearchRouter::new(providers)
}

pub fn spawn_chat_request(
    request: ChatRequest,
    settings: AppSettings,
    credentials: Arc<dyn CredentialStore>,
    tx: Sender<ChatUpdate>,
) {
    std::thread::spawn(move || {
        let tx_panic = tx.clone();
        let user_message_id = request.user_message_id;

        let res = catch_unwind(AssertUnwindSafe(|| {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = tx.send(ChatUpdate::Done {
                        user_message_id,
                        outcome: Err(RequestFailure::internal(format!(
                            "failed to start async runtime: {e}"
                        ))),
                    });
                    return;
                }
            };

            let router = if request.use_search {
                let router = build_search_router(&settings, &credentials);
                if router.is_empty() {
                    let _ = tx.send(ChatUpdate::Step(
                        "Web search is not configured; answering without it.".to_string(),
                    ));
                    None
                } else {
                    Some(router)
                }
            } else {
                None
            };

            let outcome = rt.block_on(async {
                let client = GeminiClient::new(&settings.gemini_model, credentials)?;
                let generator: &dyn TextGenerator = &client;
                let turn = ChatTurn {
                    question: &request.question,
                    document: request.document.as_deref(),
                    transcript: &request.transcript,
                };
                assist::run_chat_turn(generator, router.as_ref(), turn, |step| {
                    let _ = tx.send(ChatUpdate::Step(step.to_string()));
                })
                .await
            });

            let _ = tx.send(ChatUpdate::Done {
                user_message_id,
                outcome: outcome.map_err(RequestFailure::from_assist),
            });
        }));

        if res.is_err() {
            let _ = tx_panic.send(ChatUpdate::Done {
                user_message_id,
                outcome: Err(RequestFailure::internal("chat worker panicked")),
            });
        }
    });
}
