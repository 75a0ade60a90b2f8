//! Note and embedding-record models plus the persistence boundary.
//!
//! The store is implemented elsewhere (the extension's key-value layer);
//! this crate only consumes it through [`NoteStore`]. The store is the sole
//! source of truth — the search caches read through it and never write back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-captured note.
///
/// Created when a summarization completes, mutated on edit/rating/feedback,
/// deleted explicitly by the user. Every note belongs to exactly one user;
/// the store must never return another user's notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub user_id: String,

    pub title: String,
    /// Full captured text content.
    pub content: String,
    /// AI-generated (or fallback) summary of the content.
    pub summary: String,

    /// Originating source label (e.g. site name).
    pub source: String,
    pub url: String,

    /// Topic tags. Insertion order is irrelevant; duplicates are collapsed
    /// case-insensitively when aggregating.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form project identifier; may be empty.
    #[serde(default)]
    pub project: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Optional 1-5 rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Optional thumbs-up/down feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<bool>,

    /// Legacy inline embedding. Newer notes store their vector as an
    /// [`EmbeddingRecord`]; the record takes precedence when both exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Note {
    /// Concatenated searchable text: title, content, summary and tags.
    /// This is what the lexical matcher scores against.
    pub fn searchable_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.content.len() + self.summary.len() + 16,
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.content);
        text.push(' ');
        text.push_str(&self.summary);
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text
    }
}

/// A stored note-id -> embedding mapping (canonical length 128).
///
/// One record per note, overwritten in place on regeneration. Records may
/// outlive their note; consumers must tolerate orphans rather than assume
/// referential integrity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub note_id: String,
    pub vector: Vec<f32>,
}

/// Errors reported by the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("note not found")]
    NotFound,

    #[error("store error: {0:?}")]
    Other(#[from] anyhow::Error),
}

/// Persistence boundary consumed by the search core.
///
/// "Current user" is the store's concern: an unauthenticated session yields
/// empty lists, never an error, so no cross-user failure leaks upward.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// All notes belonging to the authenticated user; empty when there is
    /// no authenticated user.
    async fn get_all_notes_for_current_user(&self) -> Result<Vec<Note>, StoreError>;

    async fn get_note_by_id(&self, id: &str) -> Result<Option<Note>, StoreError>;

    /// Indexed lookup by project identifier.
    async fn get_notes_by_project(&self, project: &str) -> Result<Vec<Note>, StoreError>;

    async fn get_all_embedding_records(&self) -> Result<Vec<EmbeddingRecord>, StoreError>;

    async fn get_embedding_for_note(&self, id: &str) -> Result<Option<Vec<f32>>, StoreError>;

    /// Insert or overwrite the embedding record for a note.
    async fn save_embedding_for_note(&self, id: &str, vector: Vec<f32>)
        -> Result<(), StoreError>;
}
