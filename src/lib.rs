//! Search and ranking core for a note-capture browser extension.
//!
//! Captured web selections are summarized upstream and stored as notes; this
//! crate retrieves them. Semantic (embedding) search is the primary path,
//! with automatic fallback to lexical/fuzzy matching whenever embeddings are
//! unavailable, mismatched in length, or the provider fails. Persistence and
//! the embedding provider are external collaborators behind the [`NoteStore`]
//! and [`EmbeddingProvider`] traits; the extension's messaging layer marshals
//! requests into [`SearchEngine`] calls.

pub mod config;
pub mod notes;
pub mod provider;
pub mod search;

#[cfg(test)]
mod tests;

pub use config::SearchConfig;
pub use notes::{EmbeddingRecord, Note, NoteStore, StoreError};
pub use provider::{EmbeddingProvider, ProviderError};
pub use search::{SearchEngine, SearchError, SearchResult, EMBEDDING_DIM};
