//! Corpus-wide embedding regeneration.
//!
//! Invoked by the engine when a scoring pass produced zero usable
//! comparisons while observing dimension mismatches — the stored vectors
//! predate a schema change and must be rebuilt from note content.

use crate::notes::{NoteStore, StoreError};
use crate::provider::EmbeddingProvider;
use crate::search::vector;

/// Re-embed every note of the current user and overwrite its stored record.
///
/// Best-effort: a provider failure or wrong-shaped vector on one note is
/// logged and skipped, never aborts the run. Orphaned embedding records
/// (no owning note) are left untouched. Returns the repaired count.
pub async fn regenerate_all(
    store: &dyn NoteStore,
    provider: &dyn EmbeddingProvider,
    expected_dim: usize,
) -> Result<usize, StoreError> {
    let notes = store.get_all_notes_for_current_user().await?;
    log::info!("regenerating embeddings for {} notes", notes.len());

    let mut repaired = 0;
    for note in &notes {
        let vector = match provider.generate_embedding(&note.content).await {
            Ok(v) => v,
            Err(e) => {
                log::warn!("skipping note {}: embedding failed: {}", note.id, e);
                continue;
            }
        };

        if let Err(e) = vector::validate_embedding(&vector, expected_dim) {
            log::warn!("skipping note {}: provider returned bad vector: {}", note.id, e);
            continue;
        }

        match store.save_embedding_for_note(&note.id, vector).await {
            Ok(()) => repaired += 1,
            Err(e) => log::warn!("skipping note {}: save failed: {}", note.id, e),
        }
    }

    log::info!("embedding repair complete: {}/{} repaired", repaired, notes.len());
    Ok(repaired)
}
