//! Vector distance primitives
//!
//! Euclidean distance compares individual frames (inside DTW) and summary
//! vectors; cosine similarity compares time-averaged summary vectors.

use crate::error::ComparisonError;

/// How to treat vectors of different length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Lengths must match exactly, otherwise `DimensionMismatch`
    #[default]
    Strict,
    /// Clip both vectors to the shorter length
    TruncateToShorter,
}

/// Euclidean distance `sqrt(Σ(aᵢ-bᵢ)²)` between equal-length vectors
///
/// # Errors
///
/// Returns `ComparisonError::DimensionMismatch` if the lengths differ.
pub fn euclidean(a: &[f64], b: &[f64]) -> Result<f64, ComparisonError> {
    euclidean_with(a, b, LengthPolicy::Strict)
}

/// Euclidean distance under an explicit length policy
///
/// With [`LengthPolicy::TruncateToShorter`] this never fails; two empty vectors
/// (or an empty and a non-empty one) are at distance 0.
///
/// # Errors
///
/// Returns `ComparisonError::DimensionMismatch` under [`LengthPolicy::Strict`]
/// when the lengths differ.
pub fn euclidean_with(
    a: &[f64],
    b: &[f64],
    policy: LengthPolicy,
) -> Result<f64, ComparisonError> {
    if a.len() != b.len() && policy == LengthPolicy::Strict {
        return Err(ComparisonError::DimensionMismatch(format!(
            "euclidean distance between vectors of length {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(frame_distance(a, b))
}

/// Euclidean distance over the common prefix
///
/// The plain sum of squares is used whenever it is a normal float. Sums that
/// overflowed, underflowed or vanished are recomputed on differences scaled by
/// their largest magnitude.
#[inline]
pub(crate) fn frame_distance(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum();
    if sum.is_normal() || sum.is_nan() {
        return sum.sqrt();
    }

    let scale = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max);
    if scale == 0.0 || scale.is_infinite() {
        return scale;
    }
    let scaled: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = (x - y) / scale;
            d * d
        })
        .sum();
    scale * scaled.sqrt()
}

/// Largest magnitude in `v`, ignoring NaN
fn max_abs(v: &[f64]) -> f64 {
    v.iter().map(|x| x.abs()).fold(0.0, f64::max)
}

/// Cosine similarity `a·b / (‖a‖‖b‖)`
///
/// Vectors of different length are clipped to the shorter length first. The
/// result is clamped to [-1, 1] to absorb rounding; for non-negative features
/// it lies in [0, 1].
///
/// Both vectors are scaled by their largest magnitude before accumulating, so
/// very large or very small finite values keep `cos(v, v) = 1`.
///
/// If either clipped vector has zero norm (all zeros, or empty) the cosine is
/// undefined; this function returns 0.0 in that case (never NaN). Vectors with
/// infinite or NaN elements also yield 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        log::debug!(
            "Cosine similarity truncating vectors of length {} and {} to {}",
            a.len(),
            b.len(),
            a.len().min(b.len())
        );
    }

    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);
    let scale_a = max_abs(a);
    let scale_b = max_abs(b);
    if scale_a == 0.0 || scale_b == 0.0 {
        log::warn!("Cosine similarity of a zero-norm vector, returning 0.0");
        return 0.0;
    }
    if !scale_a.is_finite() || !scale_b.is_finite() {
        log::warn!("Cosine similarity of a non-finite vector, returning 0.0");
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    if cosine.is_nan() {
        log::warn!("Cosine similarity of a non-finite vector, returning 0.0");
        return 0.0;
    }
    cosine.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_euclidean_basic() {
        let d = euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((d - 5.0).abs() < EPSILON);
        assert_eq!(euclidean(&[1.5, -2.0], &[1.5, -2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_euclidean_strict_mismatch() {
        let result = euclidean(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(matches!(result, Err(ComparisonError::DimensionMismatch(_))));
    }

    #[test]
    fn test_euclidean_truncation_determinism() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 0.0, 3.5, -1.0, 5.0, 9.0, 9.0, 9.0];
        let truncated = euclidean_with(&a, &b, LengthPolicy::TruncateToShorter).unwrap();
        let prefix = euclidean(&a, &b[..5]).unwrap();
        assert_eq!(truncated, prefix);
    }

    #[test]
    fn test_cosine_identity_and_orthogonal() {
        let v = [0.3, -1.2, 4.0, 2.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < EPSILON);
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_and_scale_invariance() {
        let a = [1.0, 2.0, 3.0];
        let b = [-2.0, -4.0, -6.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < EPSILON);
        let c = [10.0, 20.0, 30.0];
        assert!((cosine_similarity(&a, &c) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cosine_symmetry() {
        let a = [0.1, 0.7, 0.2, 0.9];
        let b = [0.5, 0.3, 0.8, 0.1];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_cosine_zero_vector_fallback() {
        assert_eq!(cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_identity_at_extreme_magnitudes() {
        let big = [1e200, 2e200, 3e200];
        let tiny = [1e-200, 2e-200, 3e-200];
        assert!((cosine_similarity(&big, &big) - 1.0).abs() < EPSILON);
        assert!((cosine_similarity(&tiny, &tiny) - 1.0).abs() < EPSILON);
        assert!((cosine_similarity(&big, &tiny) - 1.0).abs() < EPSILON);

        let subnormal = [5e-324, 5e-324];
        assert!((cosine_similarity(&subnormal, &subnormal) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_cosine_non_finite_input() {
        assert_eq!(cosine_similarity(&[f64::INFINITY, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[f64::NAN, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_euclidean_at_extreme_magnitudes() {
        let d = euclidean(&[1e200, 0.0], &[-1e200, 0.0]).unwrap();
        assert!((d / 2e200 - 1.0).abs() < EPSILON);

        let d = euclidean(&[3e-200, 0.0], &[0.0, 4e-200]).unwrap();
        assert!((d / 5e-200 - 1.0).abs() < EPSILON);

        assert_eq!(euclidean(&[f64::MAX], &[-f64::MAX]).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_cosine_truncation_determinism() {
        let a = [0.2, 0.4, 0.1, 0.9, 0.3];
        let b = [0.5, 0.1, 0.7, 0.2, 0.6, 0.8, 0.8, 0.8];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&a, &b[..5]));
    }
}
