pub mod credentials;
pub mod gemini;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

/// Failures from a hosted provider call.
///
/// `Unauthorized` is the signal the app acts on: the stored key for that
/// provider gets cleared and the key dialog reopens.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured for {provider}")]
    MissingKey { provider: &'static str },

    #[error("{provider} rejected the API key")]
    Unauthorized { provider: &'static str },

    #[error("{provider} error: {status}\n{message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("network error talking to {provider}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// The generation seam: one prompt in, plain text out.
///
/// `GeminiClient` is the production implementation; tests substitute mocks.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
