//! Core types and state for the Quill app.

use crate::modals::{ApiKeyDialog, SuggestionDialog};
use crate::state::{spawn_chat_request, spawn_rewrite_request, ChatRequest};
use crate::utils::{load_settings_or_default, save_settings};
use crate::widgets::Toasts;
use assist::{AssistError, ChatSession, RewriteAction, SelectionRange, Suggestion};
use providers::gemini::GEMINI;
use providers::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use shared::chat::ChatMessage;
use shared::settings::AppSettings;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use uuid::Uuid;

pub const WELCOME_DOCUMENT: &str = "\
Welcome to your AI-powered editor!

This is a writing desk with AI features integrated directly into the
writing experience.

To get started, select any piece of text. A floating toolbar will appear
with several options:

- Improve: fix grammar and improve the writing style.
- Shorten: make the selected text more concise.
- Lengthen: expand on the selected text to add more detail.
- To Table: convert the selection into a markdown table.

On the right-hand side, you'll find a chat panel where you can ask an AI
assistant about your document. Turn on \"Search the web\" to let it look
things up before answering.

Happy writing!
";

pub const CHAT_WELCOME: &str = "Hello! How can I help you with your document today?";

/// Failure classified by the worker thread for the UI to surface.
#[derive(Debug)]
pub struct RequestFailure {
    /// Toast text.
    pub message: String,
    /// Low-level error chain, logged but not shown.
    pub details: String,
    /// The provider rejected the stored key: clear it and re-prompt.
    pub key_rejected: bool,
    /// No key configured at all: prompt without clearing anything.
    pub key_missing: bool,
}

impl RequestFailure {
    pub fn from_assist(err: AssistError) -> Self {
        let key_rejected = err.is_key_rejection();
        let key_missing = err.is_missing_key();
        let message = match &err {
            AssistError::EmptySelection | AssistError::EmptyResponse => err.to_string(),
            AssistError::Search(_) => {
                "Web search failed. Check your search API key and connection.".to_string()
            }
            AssistError::Provider(_) if key_rejected => {
                "Your Gemini API key was rejected. Please enter a valid key.".to_string()
            }
            AssistError::Provider(_) if key_missing => {
                "Add your Gemini API key to use AI features.".to_string()
            }
            AssistError::Provider(_) => {
                "AI action failed. Please check your API key and connection.".to_string()
            }
        };
        let details = format!("{:#}", anyhow::Error::from(err));
        Self {
            message,
            details,
            key_rejected,
            key_missing,
        }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self {
            message: "Something went wrong while processing that request. Please try again."
                .to_string(),
            details: details.into(),
            key_rejected: false,
            key_missing: false,
        }
    }
}

/// Result from a background rewrite request.
#[derive(Debug)]
pub struct RewriteResult {
    pub action: RewriteAction,
    pub outcome: Result<Suggestion, RequestFailure>,
}

/// Updates from a background chat turn. Steps arrive while the turn is
/// still running; `Done` ends it.
#[derive(Debug)]
pub enum ChatUpdate {
    Step(String),
    Done {
        user_message_id: Uuid,
        outcome: Result<String, RequestFailure>,
    },
}

/// Main application state.
pub struct AppState {
    pub settings: AppSettings,
    pub credentials: Arc<dyn CredentialStore>,

    // Document surface
    pub document: String,
    /// Single-flight flag for the editor surface.
    pub rewrite_in_flight: bool,
    pub active_action: Option<RewriteAction>,
    pub rewrite_rx: Option<Receiver<RewriteResult>>,
    /// Range to re-select in the editor on the next frame.
    pub pending_select: Option<SelectionRange>,

    // Chat surface
    pub chat: ChatSession,
    pub chat_input: String,
    /// Single-flight flag for the chat surface.
    pub chat_in_flight: bool,
    pub chat_status: String,
    pub chat_rx: Option<Receiver<ChatUpdate>>,
    /// Explicit, user-confirmed web-search mode for the next turn.
    pub search_web: bool,
    pub include_document: bool,

    // Dialogs, notices, settings UI
    pub api_key_dialog: ApiKeyDialog,
    pub suggestion_dialog: SuggestionDialog,
    pub toasts: Toasts,
    pub show_settings: bool,
    pub tavily_key_input: String,
    pub serper_key_input: String,
}

impl Default for AppState {
    fn default() -> Self {
        let settings = load_settings_or_default();
        let credentials: Arc<dyn CredentialStore> = match FileCredentialStore::open_default() {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(error = %e, "credential file unavailable, keys will not persist");
                Arc::new(MemoryCredentialStore::default())
            }
        };

        let mut api_key_dialog = ApiKeyDialog::new("gemini_api_key");
        if credentials.get(GEMINI).is_none() {
            api_key_dialog.open();
        }

        Self {
            search_web: settings.search_before_answering,
            include_document: settings.include_document_context,
            settings,
            credentials,
            document: WELCOME_DOCUMENT.to_string(),
            rewrite_in_flight: false,
            active_action: None,
            rewrite_rx: None,
            pending_select: None,
            chat: ChatSession::with_welcome(CHAT_WELCOME),
            chat_input: String::new(),
            chat_in_flight: false,
            chat_status: String::new(),
            chat_rx: None,
            api_key_dialog,
            suggestion_dialog: SuggestionDialog::new("suggestion_review"),
            toasts: Toasts::default(),
            show_settings: false,
            tavily_key_input: String::new(),
            serper_key_input: String::new(),
        }
    }
}

impl AppState {
    /// Kick off a rewrite of the current selection. Ignored while a
    /// request is already outstanding on this surface.
    pub fn trigger_rewrite(&mut self, action: RewriteAction, selection: String, range: SelectionRange) {
        if self.rewrite_in_flight {
            return;
        }
        if selection.trim().is_empty() {
            // Not dispatched at all; mirror the engine's message.
            self.toasts.error("Please select text to perform an AI action.");
            return;
        }

        let (tx, rx) = channel::<RewriteResult>();
        self.rewrite_rx = Some(rx);
        self.rewrite_in_flight = true;
        self.active_action = Some(action);

        spawn_rewrite_request(
            action,
            selection,
            range,
            self.settings.gemini_model.clone(),
            Arc::clone(&self.credentials),
            tx,
        );
    }

    /// Send the chat input. Ignored while a turn is already outstanding.
    pub fn send_chat_message(&mut self) {
        let question = self.chat_input.trim().to_string();
        if question.is_empty() || self.chat_in_flight {
            return;
        }
        self.chat_input.clear();

        // Snapshot the conversation before the optimistic append so the
        // prompt does not contain the question twice.
        let transcript = self.chat.transcript();
        let user_message_id = self.chat.push(ChatMessage::user(question.clone()));

        let (tx, rx) = channel::<ChatUpdate>();
        self.chat_rx = Some(rx);
        self.chat_in_flight = true;
        self.chat_status = "Thinking…".to_string();

        spawn_chat_request(
            ChatRequest {
                question,
                document: self.include_document.then(|| self.document.clone()),
                transcript,
                use_search: self.search_web,
                user_message_id,
            },
            self.settings.clone(),
            Arc::clone(&self.credentials),
            tx,
        );
    }

    /// Poll the rewrite channel (called every frame).
    pub fn poll_rewrite(&mut self) {
        let Some(rx) = &self.rewrite_rx else { return };
        let Ok(result) = rx.try_recv() else { return };

        self.rewrite_rx = None;
        self.rewrite_in_flight = false;
        self.active_action = None;

        match result.outcome {
            Ok(suggestion) => {
                self.suggestion_dialog.open_with(suggestion, result.action);
            }
            Err(failure) => self.handle_failure(failure),
        }
    }

    /// Poll the chat channel (called every frame).
    pub fn poll_chat(&mut self) {
        let Some(rx) = &self.chat_rx else { return };

        let mut done = None;
        while let Ok(update) = rx.try_recv() {
            match update {
                ChatUpdate::Step(text) => {
                    self.chat_status = text.clone();
                    self.chat.push(ChatMessage::step(text));
                }
                ChatUpdate::Done { user_message_id, outcome } => {
                    done = Some((user_message_id, outcome));
                    break;
                }
            }
        }

        if let Some((user_message_id, outcome)) = done {
            self.chat_rx = None;
            self.chat_in_flight = false;
            self.chat_status.clear();

            match outcome {
                Ok(answer) => {
                    self.chat.push(ChatMessage::model(answer));
                }
                Err(failure) => {
                    // Reconcile the optimistic append by id, never by value.
                    self.chat.rollback(user_message_id);
                    self.handle_failure(failure);
                }
            }
        }
    }

    /// Apply a pending decision from the suggestion dialog.
    pub fn resolve_suggestion_review(&mut self) {
        let Some(decision) = self.suggestion_dialog.take_decision() else {
            return;
        };

        match decision {
            Some(suggestion) => match assist::apply_suggestion(&self.document, &suggestion) {
                Ok(applied) => {
                    self.document = applied.document;
                    self.pending_select = Some(applied.range);
                }
                Err(e) => self.toasts.error(e.to_string()),
            },
            // Cancelled: the document stays untouched.
            None => {}
        }
    }

    /// Store a key confirmed in the API-key dialog.
    pub fn resolve_api_key_entry(&mut self) {
        let Some(key) = self.api_key_dialog.take_key() else {
            return;
        };
        match self.credentials.store(GEMINI, &key) {
            Ok(()) => self.toasts.info("API key saved."),
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist API key");
                self.toasts.error("Could not save the API key to disk.");
            }
        }
    }

    fn handle_failure(&mut self, failure: RequestFailure) {
        tracing::warn!(details = %failure.details, "request failed");
        self.toasts.error(failure.message);

        if failure.key_rejected {
            // The page-reload analog: drop the bad key and block on re-entry.
            if let Err(e) = self.credentials.clear(GEMINI) {
                tracing::warn!(error = %e, "failed to clear rejected API key");
            }
            self.api_key_dialog
                .open_with_message("The provider rejected your previous key. Enter a new one.");
        } else if failure.key_missing {
            self.api_key_dialog.open();
        }
    }

    pub fn persist_settings(&mut self) {
        self.settings.search_before_answering = self.search_web;
        self.settings.include_document_context = self.include_document;
        save_settings(&self.settings);
    }

    pub fn any_in_flight(&self) -> bool {
        self.rewrite_in_flight || self.chat_in_flight
    }
}
