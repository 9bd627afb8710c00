//! The selection-to-suggestion flow.
//!
//! The engine turns (action, selected text, captured range) into a
//! `Suggestion` pending user review. It never touches the document;
//! applying happens in [`crate::anchor`] after the user accepts.

use crate::{prompt, AssistError};
use providers::TextGenerator;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteAction {
    Improve,
    Shorten,
    Lengthen,
    Table,
}

impl RewriteAction {
    pub const ALL: [RewriteAction; 4] = [
        RewriteAction::Improve,
        RewriteAction::Shorten,
        RewriteAction::Lengthen,
        RewriteAction::Table,
    ];

    /// Lowercase verb interpolated into the prompt.
    pub fn verb(&self) -> &'static str {
        match self {
            RewriteAction::Improve => "improve",
            RewriteAction::Shorten => "shorten",
            RewriteAction::Lengthen => "lengthen",
            RewriteAction::Table => "table",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            RewriteAction::Improve => "Improve",
            RewriteAction::Shorten => "Shorten",
            RewriteAction::Lengthen => "Lengthen",
            RewriteAction::Table => "To Table",
        }
    }
}

/// Char-offset selection captured from the editor at trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Normalizes the two cursor ends so `start <= end`.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// A proposed replacement pending user acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub original: String,
    pub suggested: String,
    pub range: SelectionRange,
}

pub struct RewriteEngine {
    generator: Arc<dyn TextGenerator>,
}

impl RewriteEngine {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Request a rewrite of the selection.
    ///
    /// A blank selection fails before any request is dispatched; an
    /// empty (after trim) model response fails without a suggestion.
    pub async fn suggest(
        &self,
        action: RewriteAction,
        selection: &str,
        range: SelectionRange,
    ) -> Result<Suggestion, AssistError> {
        if selection.trim().is_empty() {
            return Err(AssistError::EmptySelection);
        }

        let prompt = prompt::rewrite_prompt(action, selection);
        tracing::info!(
            action = action.verb(),
            selection_chars = selection.chars().count(),
            "requesting rewrite"
        );

        let response = self.generator.generate(&prompt).await?;
        let trimmed = response.trim();
        if trimmed.is_empty() {
            return Err(AssistError::EmptyResponse);
        }

        Ok(Suggestion {
            original: selection.to_string(),
            suggested: trimmed.to_string(),
            range,
        })
    }
}
