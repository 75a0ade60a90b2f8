//! Lexical (keyword) scoring with fuzzy fallback matching.
//!
//! The primary resilience mechanism of the search core: when embeddings are
//! unavailable or unusable, every note is scored here instead. Scoring never
//! fails — malformed notes simply score 0.
//!
//! Per query term: +1.0 for an exact substring hit in the note text,
//! otherwise +0.5 per document token within Levenshtein distance 2. The total
//! is normalized by the term count, so 1.0 means every term matched exactly.

use crate::notes::Note;

/// Stop words dropped from queries: articles, conjunctions and common
/// auxiliary verbs. Terms of length <= 2 are dropped regardless.
const STOP_WORDS: &[&str] = &[
    "the", "and", "are", "was", "were", "been", "being", "has", "have", "had", "does", "did",
    "will", "would", "could", "should", "can", "may", "might", "must", "shall", "but", "nor",
    "for", "yet", "not",
];

/// Weight for a fuzzy (edit-distance) token match relative to an exact hit.
const FUZZY_MATCH_WEIGHT: f32 = 0.5;

/// Lowercase, strip punctuation to spaces, collapse whitespace.
/// Also used to normalize query text for cache keys.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenize a query into scoring terms, dropping short terms and stop words.
pub fn tokenize(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .filter(|term| term.len() > 2 && !STOP_WORDS.contains(term))
        .map(|term| term.to_string())
        .collect()
}

/// Classic dynamic-programming Levenshtein edit distance.
/// Documents are short, so the full table is fine.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        table[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + cost);
        }
    }

    table[a.len()][b.len()]
}

/// Score a note's searchable text against a query.
///
/// Returns 0.0 for an empty query (after stop-word removal) — "no results",
/// not a division by zero.
pub fn score(query: &str, note: &Note, fuzzy_max_distance: usize) -> f32 {
    let terms = tokenize(query);
    if terms.is_empty() {
        return 0.0;
    }

    let document = normalize(&note.searchable_text());
    let doc_tokens: Vec<&str> = document.split_whitespace().collect();

    let mut total = 0.0f32;
    for term in &terms {
        if document.contains(term.as_str()) {
            total += 1.0;
        } else {
            let fuzzy_hits = doc_tokens
                .iter()
                .filter(|token| levenshtein(term, token) <= fuzzy_max_distance)
                .count();
            total += FUZZY_MATCH_WEIGHT * fuzzy_hits as f32;
        }
    }

    total / terms.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, content: &str, summary: &str, tags: &[&str]) -> Note {
        Note {
            id: "n1".to_string(),
            user_id: "u1".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            summary: summary.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Rust-Lang, Python!"), "rust lang python");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  a   lot\tof   space "), "a lot of space");
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_terms() {
        let terms = tokenize("the cat and a dog should run");
        assert_eq!(terms, vec!["cat", "dog", "run"]);
    }

    #[test]
    fn test_tokenize_empty_after_filtering() {
        assert!(tokenize("the and a of is").is_empty());
    }

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("kitten", "kitten"), 0);
    }

    #[test]
    fn test_levenshtein_classic_case() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_levenshtein_empty_sides() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_levenshtein_unicode() {
        assert_eq!(levenshtein("café", "cafe"), 1);
    }

    #[test]
    fn test_score_empty_query_is_zero() {
        let n = note("Anything", "at all", "", &[]);
        assert_eq!(score("", &n, 2), 0.0);
        assert_eq!(score("the a an", &n, 2), 0.0);
    }

    #[test]
    fn test_score_exact_match_full_credit() {
        let n = note("Intro to Machine Learning", "neural networks", "", &[]);
        let s = score("machine learning", &n, 2);
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_fuzzy_match_half_credit() {
        // Transposed misspelling: no substring hit, edit distance 2.
        let n = note("Mahcine pipelines", "", "", &[]);
        let s = score("machine", &n, 2);
        // No substring hit; one token within distance 2 -> 0.5 / 1 term.
        assert!((s - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_score_counts_multiple_fuzzy_tokens() {
        let n = note("mahcine machnie", "", "", &[]);
        let s = score("machine", &n, 2);
        assert!((s - 1.0).abs() < 1e-6); // 0.5 * 2 tokens
    }

    #[test]
    fn test_score_uses_tags_and_summary() {
        let n = note("Untitled", "nothing here", "a summary about compilers", &["rust"]);
        assert!(score("compilers", &n, 2) > 0.0);
        assert!(score("rust", &n, 2) > 0.0);
    }

    #[test]
    fn test_score_orders_relevant_note_first() {
        let ml = note("Intro to Machine Learning", "gradient descent", "", &[]);
        let cook = note("Cooking recipes", "pasta and sauce", "", &[]);
        let q = "machine learning";
        assert!(score(q, &ml, 2) > score(q, &cook, 2));
    }

    #[test]
    fn test_score_no_match_is_zero() {
        let n = note("Cooking recipes", "pasta", "", &[]);
        assert_eq!(score("quantum chromodynamics", &n, 2), 0.0);
    }
}
