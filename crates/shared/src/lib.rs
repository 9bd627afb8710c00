pub mod settings {
    use serde::{Deserialize, Serialize};

    fn default_true() -> bool {
        true
    }

    fn default_max_results() -> usize {
        5
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AppSettings {
        /// Gemini model used for every rewrite and chat request.
        pub gemini_model: String,
        /// Search providers in the order they should be tried, e.g. ["tavily", "serper"]
        pub search_provider_preference: Vec<String>,
        #[serde(default = "default_max_results")]
        pub search_max_results: usize,
        pub dark_mode: bool,
        /// Include the current document as context in chat prompts.
        #[serde(default = "default_true")]
        pub include_document_context: bool,
        /// Whether the chat "Search the web" toggle starts enabled.
        #[serde(default)]
        pub search_before_answering: bool,
    }

    impl Default for AppSettings {
        fn default() -> Self {
            Self {
                gemini_model: "gemini-1.5-flash".into(),
                search_provider_preference: vec!["tavily".into(), "serper".into()],
                search_max_results: 5,
                dark_mode: true,
                include_document_context: true,
                search_before_answering: false,
            }
        }
    }
}

pub mod chat {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Role {
        User,
        Model,
    }

    impl Role {
        pub fn as_str(&self) -> &'static str {
            match self {
                Role::User => "user",
                Role::Model => "model",
            }
        }
    }

    /// Step markers are transient progress notes ("Searching the web…"),
    /// rendered differently from normal messages and excluded from prompts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum MessageKind {
        Normal,
        Step,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub id: Uuid,
        pub role: Role,
        pub content: String,
        pub kind: MessageKind,
        pub timestamp: String,
    }

    impl ChatMessage {
        fn stamped(role: Role, content: impl Into<String>, kind: MessageKind) -> Self {
            Self {
                id: Uuid::new_v4(),
                role,
                content: content.into(),
                kind,
                timestamp: chrono::Utc::now().format("%H:%M").to_string(),
            }
        }

        pub fn user(content: impl Into<String>) -> Self {
            Self::stamped(Role::User, content, MessageKind::Normal)
        }

        pub fn model(content: impl Into<String>) -> Self {
            Self::stamped(Role::Model, content, MessageKind::Normal)
        }

        pub fn step(content: impl Into<String>) -> Self {
            Self::stamped(Role::Model, content, MessageKind::Step)
        }
    }

}
