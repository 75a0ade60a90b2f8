//! The retrieval engine: semantic search with lexical fallback.
//!
//! A search call walks a fixed sequence: result-cache check, query
//! embedding, corpus load, similarity scoring, optional one-shot repair
//! retry, ranking, cache store. Every failure mode maps to a named
//! transition instead of a nested catch: provider failure and empty
//! embedding corpus both land on the lexical path, and a persistent
//! dimension mismatch falls back there permanently after exactly one
//! repair attempt.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::notes::{Note, NoteStore, StoreError};
use crate::provider::EmbeddingProvider;
use crate::search::cache::{EmbeddingCache, ResultCache};
use crate::search::vector::VectorError;
use crate::search::{lexical, repair, vector};

/// A scored note. Ephemeral — constructed fresh per query, cached only
/// within the result-cache window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub note: Note,
    /// Cosine similarity in [0,1] on the semantic path, normalized term
    /// score on the lexical path.
    pub score: f32,
}

/// User-visible search failures. Degraded modes (fallback, skipped notes)
/// are absorbed and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search timed out after {secs}s; try again")]
    Timeout { secs: u64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one scoring pass over the corpus.
struct ScorePass {
    results: Vec<SearchResult>,
    /// Comparisons that produced a valid similarity.
    usable: usize,
    /// Comparisons skipped on vector-length mismatch.
    mismatches: usize,
    /// Whether any stored or inline embedding existed at all.
    has_vectors: bool,
    notes_total: usize,
}

/// Orchestrates embedding generation, similarity scoring, ranking and
/// fallback selection. Process-wide shared state lives in the two caches;
/// the store remains the sole source of truth.
pub struct SearchEngine {
    store: Arc<dyn NoteStore>,
    provider: Arc<dyn EmbeddingProvider>,
    config: SearchConfig,
    embedding_cache: EmbeddingCache,
    result_cache: ResultCache,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn NoteStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(store, provider, SearchConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn NoteStore>,
        provider: Arc<dyn EmbeddingProvider>,
        config: SearchConfig,
    ) -> Self {
        let window = config.cache_window();
        Self {
            store,
            provider,
            config,
            embedding_cache: EmbeddingCache::new(window),
            result_cache: ResultCache::new(window),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search with the configured default limit.
    pub async fn search_default(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.search(query, self.config.default_limit).await
    }

    /// Search the corpus, returning at most `limit` results ranked by
    /// descending score.
    ///
    /// All-or-nothing under a wall-clock budget: exceeding
    /// `config.search_timeout_secs` yields [`SearchError::Timeout`] with no
    /// partial results.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        match tokio::time::timeout(self.config.search_timeout(), self.search_inner(query, limit))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout {
                secs: self.config.search_timeout_secs,
            }),
        }
    }

    /// Drop all cached embeddings and results.
    pub fn clear_caches(&self) {
        self.embedding_cache.clear();
        self.result_cache.clear();
    }

    async fn search_inner(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        // CACHE_CHECK
        let cache_key = ResultCache::key(query, limit);
        if let Some(cached) = self.result_cache.get(&cache_key) {
            log::debug!("result cache hit for {:?}", cache_key);
            return Ok(cached);
        }

        // EMBED_QUERY: any failure here degrades to the lexical path.
        let query_vector = match self
            .embedding_cache
            .get_or_compute(query, self.provider.as_ref())
            .await
        {
            Ok(v) => v,
            Err(e) => {
                log::info!("query embedding failed ({}), using lexical search", e);
                return self.lexical_fallback(query, limit).await;
            }
        };
        if let Err(e) = vector::validate_embedding(&query_vector, self.config.embedding_dim) {
            log::warn!("provider returned bad query vector ({}), using lexical search", e);
            return self.lexical_fallback(query, limit).await;
        }

        // LOAD_CORPUS + SCORE
        let mut pass = self.score_pass(&query_vector).await?;

        if !pass.has_vectors {
            log::info!("no stored embeddings, using lexical search");
            return self.lexical_fallback(query, limit).await;
        }

        // REPAIR_RETRY: only when every comparison mismatched, and exactly once.
        if pass.usable == 0 && pass.mismatches > 0 && pass.notes_total > 0 {
            log::info!(
                "all {} comparisons mismatched, regenerating embeddings",
                pass.mismatches
            );
            repair::regenerate_all(
                self.store.as_ref(),
                self.provider.as_ref(),
                self.config.embedding_dim,
            )
            .await?;

            pass = self.score_pass(&query_vector).await?;
            if pass.usable == 0 {
                log::warn!("repair did not yield usable embeddings, using lexical search");
                return self.lexical_fallback(query, limit).await;
            }
        }

        // RANK + CACHE_STORE
        let mut results = pass.results;
        rank(&mut results, limit);
        self.result_cache.put(cache_key, results.clone());
        Ok(results)
    }

    /// One scoring pass: load the corpus and compute similarities.
    ///
    /// Stored records take precedence over a note's legacy inline vector.
    /// Per-note problems (length mismatch, malformed vector) skip the note;
    /// they never abort the pass.
    async fn score_pass(&self, query_vector: &[f32]) -> Result<ScorePass, StoreError> {
        let notes = self.store.get_all_notes_for_current_user().await?;
        let records = self.store.get_all_embedding_records().await?;

        let mut record_map: HashMap<String, Vec<f32>> = HashMap::with_capacity(records.len());
        for record in records {
            record_map.insert(record.note_id, record.vector);
        }

        let mut pass = ScorePass {
            results: Vec::new(),
            usable: 0,
            mismatches: 0,
            has_vectors: !record_map.is_empty(),
            notes_total: notes.len(),
        };

        for note in notes {
            let stored = match record_map.get(&note.id).or(note.embedding.as_ref()) {
                Some(v) => v,
                None => continue,
            };
            pass.has_vectors = true;

            match vector::cosine_similarity(query_vector, stored) {
                Ok(score) if score.is_finite() => {
                    pass.usable += 1;
                    if score > self.config.similarity_floor {
                        pass.results.push(SearchResult { note, score });
                    }
                }
                Ok(_) => {
                    log::warn!("note {} has a malformed embedding, skipping", note.id);
                }
                Err(VectorError::DimensionMismatch { expected, got }) => {
                    log::warn!(
                        "note {} embedding length {} != query length {}, skipping",
                        note.id,
                        got,
                        expected
                    );
                    pass.mismatches += 1;
                }
                Err(e) => {
                    log::warn!("note {} scoring failed ({}), skipping", note.id, e);
                }
            }
        }

        Ok(pass)
    }

    /// LEXICAL_FALLBACK: fuzzy keyword scoring over the whole corpus.
    ///
    /// Does not read or populate the result cache — recomputation is cheap
    /// and coherency with the semantic path is not guaranteed.
    async fn lexical_fallback(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let notes = self.store.get_all_notes_for_current_user().await?;

        let mut results: Vec<SearchResult> = notes
            .into_iter()
            .filter_map(|note| {
                let score = lexical::score(query, &note, self.config.fuzzy_max_distance);
                (score > 0.0).then_some(SearchResult { note, score })
            })
            .collect();

        rank(&mut results, limit);
        Ok(results)
    }
}

/// Stable sort by score descending, then truncate.
fn rank(results: &mut Vec<SearchResult>, limit: usize) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(limit);
}
