//! Vector type for cosmos.
//!
//! Cosmos stores dense real-valued vectors. Everything that lives inside a
//! memory is unit-normalized; raw encoder output is accepted as-is and
//! normalized on the way in.

use crate::error::{CosmosError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Norms below this are treated as zero.
pub(crate) const NORM_EPSILON: f64 = 1e-12;

/// A dense feature vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a new zero vector of given dimensionality.
    pub fn zeros(dimensions: usize) -> Self {
        Self {
            data: vec![0.0; dimensions],
        }
    }

    /// Create a vector from raw data.
    pub fn from_data(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    /// Get the raw data as a slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Get mutable access to the raw data.
    ///
    /// Callers that mutate a stored vector must renormalize afterwards.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume the vector, returning its components.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Compute the L2 norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// True when every component is zero (within epsilon of the norm).
    pub fn is_zero(&self) -> bool {
        self.norm() < NORM_EPSILON
    }

    /// Scale to unit length in place. A zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm < NORM_EPSILON {
            return;
        }
        for v in self.data.iter_mut() {
            *v /= norm;
        }
    }

    /// Return a unit-normalized copy. A zero vector comes back unchanged.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.normalize();
        out
    }

    /// Reject empty vectors and vectors carrying NaN or infinity.
    pub fn validate(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(CosmosError::InvalidInput("empty vector".into()));
        }
        if let Some(i) = self.data.iter().position(|v| !v.is_finite()) {
            return Err(CosmosError::InvalidInput(format!(
                "non-finite component at index {}",
                i
            )));
        }
        Ok(())
    }

    /// Fail fast unless `self` has exactly `expected` components.
    pub fn expect_dimensions(&self, expected: usize) -> Result<()> {
        if self.dimensions() != expected {
            return Err(CosmosError::DimensionMismatch {
                expected,
                got: self.dimensions(),
            });
        }
        Ok(())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self::from_data(data)
    }
}

impl From<&[f64]> for Vector {
    fn from(data: &[f64]) -> Self {
        Self::from_data(data.to_vec())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}
