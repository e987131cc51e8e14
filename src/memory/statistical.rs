//! Statistical memory: per-label feature distributions learned online.
//!
//! Every label keeps a [`DistributionRecord`] per extracted [`Feature`].
//! Perception asks which label's distributions the query sits closest to,
//! measured as the average absolute z-score, and refuses to answer when no
//! label is within two standard deviations on average.
//!
//! Only flattened 28×28 images are modelled. Vectors of any other length
//! are opaque embeddings: memorizing one is a no-op and perceiving one
//! yields no opinion.

use crate::error::Result;
use crate::kernel::{features, Feature, Label, Vector};
use crate::memory::distribution::DistributionRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Added to every standard deviation before dividing.
pub const Z_EPSILON: f64 = 1e-6;

/// Average z below this is a confident match.
const HIGH_CONFIDENCE_Z: f64 = 1.0;
/// Average z below this (and at or above [`HIGH_CONFIDENCE_Z`]) is a
/// moderate match; anything further is no match.
const MODERATE_CONFIDENCE_Z: f64 = 2.0;

/// Distributions learned for one label, in feature order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelProfile {
    pub label: Label,
    pub records: Vec<(Feature, DistributionRecord)>,
}

/// Online per-label feature statistics.
#[derive(Clone, Debug, Default)]
pub struct StatisticalMemory {
    profiles: BTreeMap<Label, BTreeMap<Feature, DistributionRecord>>,
}

impl StatisticalMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels seen so far, in order.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.profiles.keys()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn record(&self, label: &Label, feature: Feature) -> Option<&DistributionRecord> {
        self.profiles.get(label)?.get(&feature)
    }

    /// Fold the features of `x` into `label`'s distributions.
    ///
    /// Returns `false` without touching any record when `x` is not an image.
    pub fn memorize(&mut self, x: &Vector, label: Label) -> Result<bool> {
        x.validate()?;
        if !features::is_image(x) {
            trace!(dimensions = x.dimensions(), "not an image, statistics skipped");
            return Ok(false);
        }

        let records = self.profiles.entry(label).or_default();
        for (feature, value) in features::extract(x) {
            records.entry(feature).or_default().update(value);
        }
        Ok(true)
    }

    /// Best-fitting label with its confidence: 1.0, 0.5, or `(None, 0.0)`.
    pub fn perceive(&self, x: &Vector) -> Result<(Option<Label>, f64)> {
        let Some((label, mean_z)) = self.best_fit(x)? else {
            return Ok((None, 0.0));
        };

        let verdict = if mean_z < HIGH_CONFIDENCE_Z {
            (Some(label.clone()), 1.0)
        } else if mean_z < MODERATE_CONFIDENCE_Z {
            (Some(label.clone()), 0.5)
        } else {
            (None, 0.0)
        };
        Ok(verdict)
    }

    /// Label with the lowest average absolute z-score over features that
    /// have at least two observations. Labels with no such feature are
    /// skipped; ties keep the first label in order. Non-images fit nothing.
    pub fn best_fit(&self, x: &Vector) -> Result<Option<(&Label, f64)>> {
        x.validate()?;
        if !features::is_image(x) {
            return Ok(None);
        }
        let observed = features::extract(x);

        let mut best: Option<(&Label, f64)> = None;
        for (label, records) in &self.profiles {
            let zs: Vec<f64> = observed
                .iter()
                .filter_map(|(feature, value)| records.get(feature)?.z_score(*value, Z_EPSILON))
                .collect();
            if zs.is_empty() {
                continue;
            }

            let mean_z = zs.iter().sum::<f64>() / zs.len() as f64;
            trace!(%label, mean_z, "statistical fit");
            if best.map_or(true, |(_, b)| mean_z < b) {
                best = Some((label, mean_z));
            }
        }
        Ok(best)
    }

    /// Export as an ordered list of profiles.
    pub fn snapshot(&self) -> Vec<LabelProfile> {
        self.profiles
            .iter()
            .map(|(label, records)| LabelProfile {
                label: label.clone(),
                records: records.iter().map(|(f, r)| (*f, *r)).collect(),
            })
            .collect()
    }

    pub fn from_snapshot(profiles: Vec<LabelProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.label, p.records.into_iter().collect()))
                .collect(),
        }
    }
}
