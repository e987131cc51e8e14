//! Vector primitives used by the memories.
//!
//! - **blend**: weighted interpolation followed by renormalization
//! - **perturb**: Gaussian jitter followed by renormalization

use crate::error::{CosmosError, Result};
use crate::kernel::vector::Vector;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Collection of primitive vector operations.
pub struct Primitives;

impl Primitives {
    /// Weighted interpolation between two vectors, renormalized.
    ///
    /// `alpha = 0.0` returns `base` (normalized), `alpha = 1.0` returns
    /// `toward` (normalized).
    pub fn blend(base: &Vector, toward: &Vector, alpha: f64) -> Result<Vector> {
        if base.dimensions() != toward.dimensions() {
            return Err(CosmosError::DimensionMismatch {
                expected: base.dimensions(),
                got: toward.dimensions(),
            });
        }

        let data: Vec<f64> = base
            .data()
            .iter()
            .zip(toward.data())
            .map(|(&b, &t)| b * (1.0 - alpha) + t * alpha)
            .collect();

        let mut out = Vector::from_data(data);
        out.normalize();
        Ok(out)
    }

    /// Add independent N(0, `std_dev`) noise to every component, then
    /// renormalize.
    pub fn perturb<R: Rng + ?Sized>(vec: &mut Vector, std_dev: f64, rng: &mut R) -> Result<()> {
        let normal = Normal::new(0.0, std_dev)
            .map_err(|e| CosmosError::InvalidInput(format!("noise level {}: {}", std_dev, e)))?;
        for v in vec.data_mut() {
            *v += normal.sample(rng);
        }
        vec.normalize();
        Ok(())
    }
}
