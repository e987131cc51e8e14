//! Consolidation ("dreaming"): prune one-shot stars, optionally jitter the
//! survivors, then greedily merge near-duplicates that share a label.
//!
//! Merging walks the forest heaviest-first and folds each star into the
//! first already-kept star of the same label it resonates with. Heavy stars
//! therefore only ever absorb; they are never absorbed by lighter ones. The
//! result depends on that traversal order and is not a global optimum.

use crate::error::{CosmosError, Result};
use crate::kernel::{Primitives, Similarity};
use crate::memory::resonator::SimilarityMemory;
use crate::memory::star::MemoryStar;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Counts from one dream cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreamReport {
    pub start_count: usize,
    pub pruned: usize,
    pub merged: usize,
    pub final_count: usize,
}

impl fmt::Display for DreamReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dream complete: {} -> {} stars ({} pruned, {} merged)",
            self.start_count, self.final_count, self.pruned, self.merged
        )
    }
}

impl SimilarityMemory {
    /// Run one consolidation cycle over the root forest.
    ///
    /// - `threshold`: resonance a star must exceed to merge into a kept star
    ///   of the same label. Anything above 1.0 disables merging.
    /// - `noise_level`: standard deviation of the Gaussian jitter applied
    ///   before merging; 0.0 skips the jitter.
    pub fn dream(&mut self, threshold: f64, noise_level: f64) -> Result<DreamReport> {
        if threshold.is_nan() {
            return Err(CosmosError::InvalidInput("dream threshold is NaN".into()));
        }
        if !noise_level.is_finite() || noise_level < 0.0 {
            return Err(CosmosError::InvalidInput(format!(
                "noise level must be finite and non-negative, got {}",
                noise_level
            )));
        }

        let start_count = self.galaxy.len();
        let pruned = prune(&mut self.galaxy, self.config.prune_floor);

        if noise_level > 0.0 {
            let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(self.dreams));
            for star in self.galaxy.iter_mut() {
                Primitives::perturb(&mut star.vector, noise_level, &mut rng)?;
            }
        }

        let survivors = std::mem::take(&mut self.galaxy);
        let (kept, merged) = merge(survivors, threshold)?;
        self.galaxy = kept;
        self.dreams += 1;

        let report = DreamReport {
            start_count,
            pruned,
            merged,
            final_count: self.galaxy.len(),
        };
        info!(
            start = report.start_count,
            pruned = report.pruned,
            merged = report.merged,
            remaining = report.final_count,
            "dream complete"
        );
        Ok(report)
    }
}

/// Drop mass-1 stars, but only while the forest is above `floor`.
fn prune(galaxy: &mut Vec<MemoryStar>, floor: usize) -> usize {
    if galaxy.len() <= floor {
        return 0;
    }
    let before = galaxy.len();
    galaxy.retain(|star| star.mass > 1);
    before - galaxy.len()
}

/// Greedy first-match merge, heaviest first. Returns the kept stars and the
/// number absorbed.
fn merge(mut stars: Vec<MemoryStar>, threshold: f64) -> Result<(Vec<MemoryStar>, usize)> {
    // Stable: equal masses keep their forest order.
    stars.sort_by(|a, b| b.mass.cmp(&a.mass));

    let mut kept: Vec<MemoryStar> = Vec::with_capacity(stars.len());
    let mut merged = 0;

    for star in stars {
        let host = kept.iter().position(|k| {
            k.label == star.label
                && Similarity::dot(k.vector.data(), star.vector.data()) > threshold
        });
        match host {
            Some(i) => {
                kept[i].absorb(star)?;
                merged += 1;
            }
            None => kept.push(star),
        }
    }

    Ok((kept, merged))
}
