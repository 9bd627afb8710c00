pub mod anchor;
pub mod chat;
pub mod prompt;
pub mod rewrite;

pub use anchor::{apply_suggestion, AppliedEdit, ApplyError};
pub use chat::{run_chat_turn, ChatSession, ChatTurn};
pub use rewrite::{RewriteAction, RewriteEngine, SelectionRange, Suggestion};

use providers::ProviderError;
use thiserror::Error;

/// Failures surfaced to the user as a toast. Every variant returns the
/// surface to idle; nothing here is fatal.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("Please select text to perform an AI action.")]
    EmptySelection,

    #[error("The AI returned an empty response. Please try again.")]
    EmptyResponse,

    #[error("web search failed: {0}")]
    Search(#[source] anyhow::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl AssistError {
    /// The provider actively rejected the stored key; the app clears it
    /// and reopens the key dialog.
    pub fn is_key_rejection(&self) -> bool {
        matches!(
            self,
            AssistError::Provider(ProviderError::Unauthorized { .. })
        )
    }

    /// No key is configured at all.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, AssistError::Provider(ProviderError::MissingKey { .. }))
    }
}
