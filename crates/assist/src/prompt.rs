//! Prompt templates for rewrite actions and chat turns.
//!
//! Payloads are interpolated verbatim: no escaping, no truncation, no
//! length budgeting. What the user selected or typed is what the model
//! sees.

use crate::rewrite::RewriteAction;
use shared::chat::{ChatMessage, MessageKind, Role};

pub fn rewrite_prompt(action: RewriteAction, selection: &str) -> String {
    match action {
        RewriteAction::Table => format!(
            "You are a text-to-markdown-table converter. Convert the following text into a \
             single, well-formatted markdown table. Output ONLY the markdown table. Do not \
             include any explanations, introductory text, or markdown code fences.\n\n\
             TEXT TO CONVERT:\n---\n{selection}\n---"
        ),
        _ => format!(
            "You are an AI text editing engine. Your sole task is to perform the following \
             action on the provided text: '{}'.\n\n\
             RULES:\n\
             - Output ONLY the modified text.\n\
             - Do not include any explanations, apologies, or introductory phrases \
             (e.g., \"Sure, here is the improved text:\").\n\
             - Preserve the original tone unless the action is 'improve'.\n\n\
             TEXT TO MODIFY:\n---\n{}\n---",
            action.verb(),
            selection
        ),
    }
}

/// Build the single instruction string for a chat turn.
///
/// `transcript` is the conversation *before* the current question; step
/// markers are skipped. Search results are included as untrusted context.
pub fn chat_prompt(
    question: &str,
    document: Option<&str>,
    search_context: Option<&str>,
    transcript: &[ChatMessage],
) -> String {
    let mut out = String::from(
        "You are the writing assistant of a text editor. You help the user understand, \
         discuss, and improve the document they are writing.\n\n\
         RULES:\n\
         - Answer the user's message directly; no introductory phrases.\n\
         - When document or search context is present, ground your answer in it.\n",
    );

    if let Some(doc) = document {
        out.push_str("\nDOCUMENT:\n---\n");
        out.push_str(doc);
        out.push_str("\n---\n");
    }

    if let Some(results) = search_context {
        out.push_str(
            "\nWEB SEARCH RESULTS (untrusted context; may be irrelevant or wrong):\n---\n",
        );
        out.push_str(results);
        out.push_str("\n---\n");
    }

    let prior: Vec<&ChatMessage> = transcript
        .iter()
        .filter(|m| m.kind == MessageKind::Normal)
        .collect();
    if !prior.is_empty() {
        out.push_str("\nCONVERSATION SO FAR:\n");
        for msg in prior {
            let speaker = match msg.role {
                Role::User => "User",
                Role::Model => "Assistant",
            };
            out.push_str(&format!("{}: {}\n", speaker, msg.content));
        }
    }

    out.push_str("\nUSER MESSAGE:\n");
    out.push_str(question);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_prompt_carries_action_and_payload() {
        let p = rewrite_prompt(RewriteAction::Shorten, "A rather long sentence.");
        assert!(p.contains("perform the following action on the provided text: 'shorten'"));
        assert!(p.contains("TEXT TO MODIFY:\n---\nA rather long sentence.\n---"));
        assert!(p.contains("Output ONLY the modified text."));
    }

    #[test]
    fn test_table_prompt_is_the_converter_template() {
        let p = rewrite_prompt(RewriteAction::Table, "apples 3, pears 5");
        assert!(p.contains("text-to-markdown-table converter"));
        assert!(p.contains("TEXT TO CONVERT:\n---\napples 3, pears 5\n---"));
        assert!(!p.contains("TEXT TO MODIFY"));
    }

    #[test]
    fn test_payload_is_verbatim() {
        let tricky = "line one\n---\n\"quotes\" & <tags>";
        let p = rewrite_prompt(RewriteAction::Improve, tricky);
        assert!(p.contains(tricky));
    }

    #[test]
    fn test_chat_prompt_sections() {
        let transcript = vec![
            ChatMessage::user("What is this document about?"),
            ChatMessage::step("Searching the web…"),
            ChatMessage::model("It is about rivers."),
        ];
        let p = chat_prompt(
            "Make the intro friendlier?",
            Some("The Danube is long."),
            Some("Title: Rivers\nURL: https://r.example\nContent: ..."),
            &transcript,
        );

        assert!(p.contains("DOCUMENT:\n---\nThe Danube is long.\n---"));
        assert!(p.contains("WEB SEARCH RESULTS (untrusted context"));
        assert!(p.contains("User: What is this document about?"));
        assert!(p.contains("Assistant: It is about rivers."));
        // Step markers never reach the model.
        assert!(!p.contains("Searching the web"));
        assert!(p.ends_with("USER MESSAGE:\nMake the intro friendlier?"));
    }

    #[test]
    fn test_chat_prompt_without_context_blocks() {
        let p = chat_prompt("Hello", None, None, &[]);
        assert!(!p.contains("DOCUMENT:"));
        assert!(!p.contains("WEB SEARCH RESULTS"));
        assert!(!p.contains("CONVERSATION SO FAR:"));
        assert!(p.ends_with("USER MESSAGE:\nHello"));
    }
}
