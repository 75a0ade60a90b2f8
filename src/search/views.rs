//! Auxiliary retrieval views over the note corpus.
//!
//! Small, self-contained lookups consumed by the popup UI: tag/project/date
//! filters, nearest-neighbor "related notes", topic frequencies, recency and
//! rating listings. All of them read through the store, none touch the
//! search caches. An unauthenticated session yields empty results.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::notes::{Note, NoteStore, StoreError};
use crate::search::engine::SearchResult;
use crate::search::vector;

/// Notes where any note tag case-insensitively contains any query tag as a
/// substring (not exact match).
pub async fn search_by_tags(
    store: &dyn NoteStore,
    tags: &[String],
) -> Result<Vec<Note>, StoreError> {
    let query_tags: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
    let notes = store.get_all_notes_for_current_user().await?;

    Ok(notes
        .into_iter()
        .filter(|note| {
            note.tags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                query_tags.iter().any(|q| tag.contains(q.as_str()))
            })
        })
        .collect())
}

/// Notes whose project identifier equals the given one.
/// Delegates to the store's indexed lookup.
pub async fn search_by_project(
    store: &dyn NoteStore,
    project: &str,
) -> Result<Vec<Note>, StoreError> {
    store.get_notes_by_project(project).await
}

/// Notes created within the inclusive `[start, end]` range.
pub async fn search_by_date_range(
    store: &dyn NoteStore,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Note>, StoreError> {
    let notes = store.get_all_notes_for_current_user().await?;
    Ok(notes
        .into_iter()
        .filter(|note| note.created_at >= start && note.created_at <= end)
        .collect())
}

/// Nearest neighbors of a note by embedding similarity, excluding itself.
///
/// A note with no stored embedding (neither record nor legacy inline
/// vector) yields an empty list — no lexical fallback for this view.
/// Pairwise dimension mismatches skip the other note.
pub async fn related_notes(
    store: &dyn NoteStore,
    note_id: &str,
    limit: usize,
) -> Result<Vec<SearchResult>, StoreError> {
    let target = match store.get_embedding_for_note(note_id).await? {
        Some(v) => Some(v),
        None => store
            .get_note_by_id(note_id)
            .await?
            .and_then(|note| note.embedding),
    };
    let Some(target) = target else {
        return Ok(Vec::new());
    };

    let notes = store.get_all_notes_for_current_user().await?;
    let records = store.get_all_embedding_records().await?;
    let mut record_map: HashMap<String, Vec<f32>> = HashMap::with_capacity(records.len());
    for record in records {
        record_map.insert(record.note_id, record.vector);
    }

    let mut results = Vec::new();
    for note in notes {
        if note.id == note_id {
            continue;
        }
        let other = match record_map.get(&note.id).or(note.embedding.as_ref()) {
            Some(v) => v,
            None => continue,
        };
        match vector::cosine_similarity(&target, other) {
            Ok(score) if score.is_finite() => results.push(SearchResult { note, score }),
            Ok(_) => {}
            Err(e) => {
                log::debug!("related: skipping note {}: {}", note.id, e);
            }
        }
    }

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
    Ok(results)
}

/// Tag frequencies across the corpus, case-folded, top `limit` by count.
/// Ties order alphabetically so repeated calls are stable.
pub async fn popular_topics(
    store: &dyn NoteStore,
    limit: usize,
) -> Result<Vec<(String, u64)>, StoreError> {
    let notes = store.get_all_notes_for_current_user().await?;

    let mut counts: HashMap<String, u64> = HashMap::new();
    for note in &notes {
        for tag in &note.tags {
            *counts.entry(tag.to_lowercase()).or_insert(0) += 1;
        }
    }

    let mut topics: Vec<(String, u64)> = counts.into_iter().collect();
    topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    topics.truncate(limit);
    Ok(topics)
}

/// Most recently created notes, newest first.
pub async fn recent_notes(store: &dyn NoteStore, limit: usize) -> Result<Vec<Note>, StoreError> {
    let mut notes = store.get_all_notes_for_current_user().await?;
    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    notes.truncate(limit);
    Ok(notes)
}

/// Notes with a rating present and >= `min_rating`.
pub async fn notes_with_min_rating(
    store: &dyn NoteStore,
    min_rating: u8,
) -> Result<Vec<Note>, StoreError> {
    let notes = store.get_all_notes_for_current_user().await?;
    Ok(notes
        .into_iter()
        .filter(|note| note.rating.is_some_and(|r| r >= min_rating))
        .collect())
}
