//! Modal dialogs: API-key entry and suggestion review.

pub mod api_key_dialog;
pub mod suggestion_dialog;

pub use api_key_dialog::ApiKeyDialog;
pub use suggestion_dialog::SuggestionDialog;

/// Outcome of a modal interaction, drained by the app once per frame.
#[derive(Debug, Clone)]
pub enum ModalResult<T> {
    Pending,
    Confirmed(T),
    Cancelled,
}

impl<T> ModalResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ModalResult::Pending)
    }

    pub fn take_value(self) -> Option<T> {
        match self {
            ModalResult::Confirmed(v) => Some(v),
            _ => None,
        }
    }
}
