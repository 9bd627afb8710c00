//! Staleness-guarded application of accepted suggestions.
//!
//! A suggestion carries the range captured when the action was triggered.
//! The document may have been edited between capture and accept, so apply
//! re-validates: if the captured range still holds the original text the
//! splice happens there; otherwise the original is located in the current
//! document and the edit re-anchors to its unique occurrence. A missing or
//! ambiguous original refuses rather than corrupting the document.

use crate::rewrite::{SelectionRange, Suggestion};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("The selected text changed before the suggestion could be applied.")]
    OriginalMissing,

    #[error("The selected text now appears in more than one place; apply it manually.")]
    Ambiguous,
}

/// Result of a successful apply: the new document and the range now
/// occupied by the inserted text (used to re-select it in the editor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
    pub document: String,
    pub range: SelectionRange,
}

pub fn apply_suggestion(document: &str, suggestion: &Suggestion) -> Result<AppliedEdit, ApplyError> {
    if suggestion.original.is_empty() {
        return Err(ApplyError::OriginalMissing);
    }

    // Fast path: the captured offsets still hold the original text.
    if char_slice(document, suggestion.range) == Some(suggestion.original.as_str()) {
        return Ok(splice(document, suggestion.range, &suggestion.suggested));
    }

    // The document shifted underneath the capture; re-anchor.
    let occurrences = find_occurrences(document, &suggestion.original);
    match occurrences.as_slice() {
        [] => Err(ApplyError::OriginalMissing),
        [range] => {
            tracing::debug!(
                captured_start = suggestion.range.start,
                anchored_start = range.start,
                "re-anchored stale suggestion range"
            );
            Ok(splice(document, *range, &suggestion.suggested))
        }
        _ => Err(ApplyError::Ambiguous),
    }
}

/// The document slice covered by a char-offset range, or `None` when the
/// range no longer fits the document.
fn char_slice(document: &str, range: SelectionRange) -> Option<&str> {
    let start = byte_offset(document, range.start)?;
    let end = byte_offset(document, range.end)?;
    document.get(start..end)
}

fn byte_offset(document: &str, char_idx: usize) -> Option<usize> {
    if char_idx == 0 {
        return Some(0);
    }
    document
        .char_indices()
        .nth(char_idx - 1)
        .map(|(i, c)| i + c.len_utf8())
}

/// Char-offset ranges of every occurrence of `needle`.
fn find_occurrences(document: &str, needle: &str) -> Vec<SelectionRange> {
    let needle_chars = needle.chars().count();
    document
        .match_indices(needle)
        .map(|(byte_idx, _)| {
            let start = document[..byte_idx].chars().count();
            SelectionRange {
                start,
                end: start + needle_chars,
            }
        })
        .collect()
}

fn splice(document: &str, range: SelectionRange, replacement: &str) -> AppliedEdit {
    // Range validity was established by the caller.
    let start = byte_offset(document, range.start).unwrap_or(document.len());
    let end = byte_offset(document, range.end).unwrap_or(document.len());

    let mut out = String::with_capacity(document.len() + replacement.len());
    out.push_str(&document[..start]);
    out.push_str(replacement);
    out.push_str(&document[end..]);

    AppliedEdit {
        document: out,
        range: SelectionRange {
            start: range.start,
            end: range.start + replacement.chars().count(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(original: &str, suggested: &str, start: usize, end: usize) -> Suggestion {
        Suggestion {
            original: original.to_string(),
            suggested: suggested.to_string(),
            range: SelectionRange { start, end },
        }
    }

    #[test]
    fn test_apply_replaces_exactly_the_captured_range() {
        let doc = "Keep this. Replace me. Keep that.";
        let s = suggestion("Replace me.", "Replaced!", 11, 22);

        let applied = apply_suggestion(doc, &s).unwrap();
        assert_eq!(applied.document, "Keep this. Replaced! Keep that.");
        assert_eq!(applied.range, SelectionRange { start: 11, end: 20 });
    }

    #[test]
    fn test_prefix_and_suffix_untouched() {
        let doc = "alpha beta gamma";
        let s = suggestion("beta", "BETA-REWRITTEN", 6, 10);

        let applied = apply_suggestion(doc, &s).unwrap();
        assert!(applied.document.starts_with("alpha "));
        assert!(applied.document.ends_with(" gamma"));
    }

    #[test]
    fn test_cancel_is_a_no_op_on_the_document() {
        // Cancelling never calls apply; the input document is borrowed
        // immutably, so not applying leaves it byte-identical.
        let doc = "untouched document";
        let s = suggestion("untouched", "changed", 0, 9);
        let _ = apply_suggestion(doc, &s).unwrap();
        assert_eq!(doc, "untouched document");
    }

    #[test]
    fn test_reanchors_after_text_inserted_before_selection() {
        // Captured against "Replace me." at 11..22, then the user typed
        // a new sentence at the front.
        let doc = "New intro sentence. Keep this. Replace me. Keep that.";
        let s = suggestion("Replace me.", "Replaced!", 11, 22);

        let applied = apply_suggestion(doc, &s).unwrap();
        assert_eq!(
            applied.document,
            "New intro sentence. Keep this. Replaced! Keep that."
        );
    }

    #[test]
    fn test_missing_original_refuses() {
        let doc = "The selection was deleted entirely.";
        let s = suggestion("Replace me.", "Replaced!", 11, 22);
        assert_eq!(apply_suggestion(doc, &s), Err(ApplyError::OriginalMissing));
    }

    #[test]
    fn test_exact_range_wins_over_duplicates_elsewhere() {
        // "dup" appears twice but the captured range still matches, so no
        // ambiguity arises.
        let doc = "dup and dup";
        let s = suggestion("dup", "DUP", 8, 11);

        let applied = apply_suggestion(doc, &s).unwrap();
        assert_eq!(applied.document, "dup and DUP");
    }

    #[test]
    fn test_ambiguous_after_shift_refuses() {
        // The capture is stale and the original now matches twice.
        let doc = "x dup and dup";
        let s = suggestion("dup", "DUP", 0, 3);
        assert_eq!(apply_suggestion(doc, &s), Err(ApplyError::Ambiguous));
    }

    #[test]
    fn test_multibyte_offsets() {
        let doc = "héllo wörld, héllo edïtor";
        // chars 13..18 cover the second "héllo"
        let s = suggestion("héllo", "goodbye", 13, 18);

        let applied = apply_suggestion(doc, &s).unwrap();
        assert_eq!(applied.document, "héllo wörld, goodbye edïtor");
        assert_eq!(applied.range, SelectionRange { start: 13, end: 20 });
    }

    #[test]
    fn test_range_past_end_of_document_reanchors() {
        // Document shrank below the captured offsets.
        let doc = "short now, Replace me.";
        let s = suggestion("Replace me.", "Replaced!", 40, 51);

        let applied = apply_suggestion(doc, &s).unwrap();
        assert_eq!(applied.document, "short now, Replaced!");
    }

    #[test]
    fn test_empty_original_refuses() {
        let s = suggestion("", "anything", 0, 0);
        assert_eq!(
            apply_suggestion("some doc", &s),
            Err(ApplyError::OriginalMissing)
        );
    }

    #[test]
    fn test_replacement_at_document_edges() {
        let doc = "edge";
        let s = suggestion("edge", "EDGE", 0, 4);
        let applied = apply_suggestion(doc, &s).unwrap();
        assert_eq!(applied.document, "EDGE");
        assert_eq!(applied.range, SelectionRange { start: 0, end: 4 });
    }
}
