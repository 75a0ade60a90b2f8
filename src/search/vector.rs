//! Vector math for semantic similarity.
//!
//! Comparing vectors of unequal length is a reportable error, never a silent
//! zero score — callers decide whether to skip the note or trigger a
//! corpus-wide repair.

/// Errors from vector operations and provider-output validation.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embedding contains non-finite components")]
    NonFinite,
}

/// Cosine similarity between two equal-length vectors, in [-1.0, 1.0].
///
/// A zero-magnitude vector on either side yields 0.0 ("no meaningful
/// similarity", not an error). Unequal lengths are an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a < f32::EPSILON || norm_b < f32::EPSILON {
        return Ok(0.0);
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    Ok(dot / (norm_a * norm_b))
}

/// Validate a provider-returned embedding before it enters scoring or
/// storage: correct length and all components finite.
pub fn validate_embedding(vector: &[f32], expected_dim: usize) -> Result<(), VectorError> {
    if vector.len() != expected_dim {
        return Err(VectorError::DimensionMismatch {
            expected: expected_dim,
            got: vector.len(),
        });
    }
    if vector.iter().any(|x| !x.is_finite()) {
        return Err(VectorError::NonFinite);
    }
    Ok(())
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = vec![0.3, -0.7, 0.2, 0.5];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        let score = cosine_similarity(&a, &b).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors_score_negative_one() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        let score = cosine_similarity(&a, &b).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_symmetry() {
        let a = vec![0.1, 0.9, -0.3];
        let b = vec![0.5, -0.2, 0.8];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_range_bounded() {
        let a = vec![3.0, -4.0, 12.0];
        let b = vec![-7.0, 2.0, 0.5];
        let score = cosine_similarity(&a, &b).unwrap();
        assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let a = vec![0.0; 128];
        let b = vec![0.0; 64];
        let result = cosine_similarity(&a, &b);
        assert!(matches!(
            result,
            Err(VectorError::DimensionMismatch {
                expected: 128,
                got: 64
            })
        ));
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&b, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_validate_embedding_accepts_expected_shape() {
        let v = vec![0.5; 128];
        assert!(validate_embedding(&v, 128).is_ok());
    }

    #[test]
    fn test_validate_embedding_rejects_wrong_length() {
        let v = vec![0.5; 64];
        assert!(matches!(
            validate_embedding(&v, 128),
            Err(VectorError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_embedding_rejects_nan() {
        let mut v = vec![0.5; 128];
        v[7] = f32::NAN;
        assert!(matches!(
            validate_embedding(&v, 128),
            Err(VectorError::NonFinite)
        ));
    }
}
