//! Whole-brain persistence.
//!
//! A [`BrainSnapshot`] captures both memories and the arbitration state as
//! one serde value. The JSON form carries a format version so that older
//! readers refuse newer documents instead of misreading them.

use crate::error::{CosmosError, Result};
use crate::highlevel::brain::Brain;
use crate::memory::{LabelProfile, ResonatorSnapshot, SimilarityMemory, StatisticalMemory};
use serde::{Deserialize, Serialize};

/// Format version written by [`Brain::snapshot`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable state of a [`Brain`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BrainSnapshot {
    pub version: u32,
    pub dominance: f64,
    pub adaptation_rate: f64,
    pub similarity: ResonatorSnapshot,
    pub statistical: Vec<LabelProfile>,
}

impl BrainSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Brain {
    /// Export state for persistence.
    pub fn snapshot(&self) -> BrainSnapshot {
        BrainSnapshot {
            version: SNAPSHOT_VERSION,
            dominance: self.dominance,
            adaptation_rate: self.adaptation_rate,
            similarity: self.similarity.snapshot(),
            statistical: self.statistical.snapshot(),
        }
    }

    /// Restore from a snapshot.
    pub fn from_snapshot(snap: BrainSnapshot) -> Result<Self> {
        if snap.version != SNAPSHOT_VERSION {
            return Err(CosmosError::UnsupportedSnapshot {
                found: snap.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        for (name, value) in [("dominance", snap.dominance), ("adaptation_rate", snap.adaptation_rate)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CosmosError::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(Self {
            similarity: SimilarityMemory::from_snapshot(snap.similarity)?,
            statistical: StatisticalMemory::from_snapshot(snap.statistical),
            dominance: snap.dominance,
            adaptation_rate: snap.adaptation_rate,
        })
    }

    /// Serialize the whole brain to JSON.
    pub fn save(&self) -> Result<String> {
        self.snapshot().to_json()
    }

    /// Restore a brain written by [`save`](Self::save).
    pub fn load(json: &str) -> Result<Self> {
        Self::from_snapshot(BrainSnapshot::from_json(json)?)
    }
}
