use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Minimum similarity for a semantic match to be kept.
/// Tunable noise floor, not a hard contract; 0.1 matches observed behavior.
const DEFAULT_SIMILARITY_FLOOR: f32 = 0.1;
/// Default number of results returned by a search.
const DEFAULT_LIMIT: usize = 10;
/// Default cache window in seconds (both caches are swept in full).
const DEFAULT_CACHE_WINDOW_SECS: u64 = 300;
/// Default wall-clock budget for a single search call.
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 15;
/// Canonical embedding length promised by the provider.
const DEFAULT_EMBEDDING_DIM: usize = 128;
/// Maximum edit distance for a fuzzy term match.
const DEFAULT_FUZZY_MAX_DISTANCE: usize = 2;

/// Configuration for the search core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum similarity score for semantic results [0.0, 1.0].
    #[serde(default = "default_similarity_floor")]
    pub similarity_floor: f32,

    /// Result count used when the caller does not pass a limit.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Seconds between full cache sweeps (embedding and result caches).
    #[serde(default = "default_cache_window_secs")]
    pub cache_window_secs: u64,

    /// Wall-clock budget for a search call, in seconds.
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,

    /// Expected embedding vector length.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Maximum Levenshtein distance for fuzzy lexical matches.
    #[serde(default = "default_fuzzy_max_distance")]
    pub fuzzy_max_distance: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            similarity_floor: DEFAULT_SIMILARITY_FLOOR,
            default_limit: DEFAULT_LIMIT,
            cache_window_secs: DEFAULT_CACHE_WINDOW_SECS,
            search_timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            fuzzy_max_distance: DEFAULT_FUZZY_MAX_DISTANCE,
        }
    }
}

impl SearchConfig {
    pub fn cache_window(&self) -> Duration {
        Duration::from_secs(self.cache_window_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

fn default_similarity_floor() -> f32 {
    DEFAULT_SIMILARITY_FLOOR
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_cache_window_secs() -> u64 {
    DEFAULT_CACHE_WINDOW_SECS
}

fn default_search_timeout_secs() -> u64 {
    DEFAULT_SEARCH_TIMEOUT_SECS
}

fn default_embedding_dim() -> usize {
    DEFAULT_EMBEDDING_DIM
}

fn default_fuzzy_max_distance() -> usize {
    DEFAULT_FUZZY_MAX_DISTANCE
}
