//! Resonance: similarity between unit vectors.
//!
//! When compiled with the `simd` feature, the dot product runs through
//! SIMD-accelerated kernels.

use crate::error::{CosmosError, Result};
use crate::kernel::vector::{Vector, NORM_EPSILON};

/// Similarity computation for vectors.
pub struct Similarity;

impl Similarity {
    /// Resonance between two vectors: their dot product.
    ///
    /// For unit vectors this is the cosine similarity in [-1, 1]:
    /// - 1 means identical direction
    /// - 0 means unrelated
    /// - -1 means opposite
    ///
    /// Vectors of different lengths are rejected, never truncated.
    pub fn resonance(a: &Vector, b: &Vector) -> Result<f64> {
        if a.dimensions() != b.dimensions() {
            return Err(CosmosError::DimensionMismatch {
                expected: a.dimensions(),
                got: b.dimensions(),
            });
        }
        Ok(Self::dot(a.data(), b.data()))
    }

    /// Cosine similarity for vectors that may not be normalized.
    ///
    /// Returns 0.0 when either side is a zero vector.
    pub fn cosine(a: &Vector, b: &Vector) -> Result<f64> {
        let dot = Self::resonance(a, b)?;
        let norm_product = a.norm() * b.norm();
        if norm_product < NORM_EPSILON {
            return Ok(0.0);
        }
        Ok(dot / norm_product)
    }

    /// Euclidean distance between two vectors.
    pub fn euclidean_distance(a: &Vector, b: &Vector) -> Result<f64> {
        if a.dimensions() != b.dimensions() {
            return Err(CosmosError::DimensionMismatch {
                expected: a.dimensions(),
                got: b.dimensions(),
            });
        }
        Ok(a.data()
            .iter()
            .zip(b.data())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt())
    }

    /// Raw dot product. Callers guarantee equal lengths.
    #[cfg(feature = "simd")]
    pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
        use simsimd::SpatialSimilarity;
        debug_assert_eq!(a.len(), b.len(), "Dimension mismatch in dot product");
        f64::dot(a, b).unwrap_or(0.0)
    }

    #[cfg(not(feature = "simd"))]
    pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "Dimension mismatch in dot product");
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }
}
