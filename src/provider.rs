//! Embedding provider boundary.
//!
//! The cloud LLM integration lives outside this crate; the search core only
//! sees this trait. The provider promises 128-length vectors on success but
//! the core verifies the shape defensively before scoring or storing
//! (see [`crate::search::vector::validate_embedding`]).

use async_trait::async_trait;

/// Errors from the external embedding provider.
///
/// Never fatal to a search: the engine degrades to lexical fallback, and the
/// repair path skips the affected note and continues.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("provider quota exceeded")]
    QuotaExceeded,

    #[error("malformed provider response: {0}")]
    InvalidResponse(String),
}

/// External embedding generation.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}
