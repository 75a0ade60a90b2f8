//! Hybrid retrieval for captured notes.
//!
//! # Architecture
//!
//! - `vector`: cosine similarity and provider-output validation
//! - `lexical`: tokenization, Levenshtein fuzzy matching, weighted scoring
//! - `cache`: time-windowed embedding and result caches (bulk sweep)
//! - `repair`: corpus-wide embedding regeneration on dimension drift
//! - `engine`: the search state machine (semantic path, lexical fallback)
//! - `views`: tag/project/date/related/topics/recent/rating lookups

pub mod cache;
pub mod engine;
pub mod lexical;
pub mod repair;
pub mod vector;
pub mod views;

pub use engine::{SearchEngine, SearchError, SearchResult};
pub use vector::{cosine_similarity, validate_embedding, VectorError};

/// Canonical embedding vector length.
pub const EMBEDDING_DIM: usize = 128;
