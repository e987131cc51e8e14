//! Health metrics for a similarity memory's root forest.
//!
//! - [`system_entropy`]: how evenly mass is spread across stars. Many light
//!   stars (fragmentation) score high; a few heavy stars score low.
//! - [`conflict_degree`]: how scattered each label's stars are relative to
//!   how far apart the labels sit. Lower is cleaner.

use crate::kernel::{Label, Vector};
use crate::memory::resonator::SimilarityMemory;
use std::collections::BTreeMap;

/// Shannon entropy (nats) of the mass distribution over root stars.
pub fn system_entropy(memory: &SimilarityMemory) -> f64 {
    let total: u64 = memory.stars().iter().map(|s| s.mass()).sum();
    if total == 0 {
        return 0.0;
    }

    memory
        .stars()
        .iter()
        .map(|s| s.mass() as f64 / total as f64)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

/// Mean intra-label variance divided by mean inter-centroid distance.
///
/// Intra-label variance is the mean squared distance of a label's root
/// vectors from their centroid (0 for a single star). With one label the
/// intra variance is returned as-is; coincident centroids give infinity.
pub fn conflict_degree(memory: &SimilarityMemory) -> f64 {
    let mut groups: BTreeMap<&Label, Vec<&Vector>> = BTreeMap::new();
    for star in memory.stars() {
        groups.entry(star.label()).or_default().push(star.vector());
    }
    if groups.is_empty() {
        return 0.0;
    }

    let mut variances = Vec::with_capacity(groups.len());
    let mut centroids = Vec::with_capacity(groups.len());
    for vectors in groups.values() {
        let c = centroid(vectors);
        let variance = if vectors.len() > 1 {
            vectors.iter().map(|v| squared_distance(v.data(), &c)).sum::<f64>() / vectors.len() as f64
        } else {
            0.0
        };
        variances.push(variance);
        centroids.push(c);
    }

    let mean_intra = variances.iter().sum::<f64>() / variances.len() as f64;
    if centroids.len() < 2 {
        return mean_intra;
    }

    let mut inter = Vec::new();
    for (i, a) in centroids.iter().enumerate() {
        for b in &centroids[i + 1..] {
            inter.push(squared_distance(a, b).sqrt());
        }
    }
    let mean_inter = inter.iter().sum::<f64>() / inter.len() as f64;
    if mean_inter == 0.0 {
        return f64::INFINITY;
    }

    mean_intra / mean_inter
}

fn centroid(vectors: &[&Vector]) -> Vec<f64> {
    let dim = vectors.first().map_or(0, |v| v.dimensions());
    let mut sum = vec![0.0; dim];
    for v in vectors {
        for (s, x) in sum.iter_mut().zip(v.data()) {
            *s += x;
        }
    }
    let n = vectors.len() as f64;
    sum.iter_mut().for_each(|s| *s /= n);
    sum
}

#[inline]
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
