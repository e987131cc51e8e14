//! Engine configuration.
//!
//! Every field has a default, so a partial JSON document only overrides
//! what it names:
//!
//! ```rust
//! use cosmos::highlevel::BrainConfig;
//!
//! let config = BrainConfig::from_json(r#"{"adaptation_rate": 0.1, "similarity": {"mitosis_threshold": 8}}"#).unwrap();
//! assert_eq!(config.adaptation_rate, 0.1);
//! assert_eq!(config.similarity.mitosis_threshold, 8);
//! assert_eq!(config.similarity.resonance_threshold, 0.85);
//! ```

use crate::error::{CosmosError, Result};
use crate::memory::SimilarityConfig;
use serde::{Deserialize, Serialize};

/// Tunables for a [`Brain`](crate::highlevel::Brain).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub similarity: SimilarityConfig,
    /// Dominance step applied when exactly one memory was right.
    pub adaptation_rate: f64,
    /// Starting dominance: 0 = statistics lead, 1 = similarity leads.
    pub initial_dominance: f64,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            adaptation_rate: 0.05,
            initial_dominance: 0.5,
        }
    }
}

impl BrainConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.similarity.validate()?;
        if !(0.0..=1.0).contains(&self.adaptation_rate) {
            return Err(CosmosError::InvalidConfig(format!(
                "adaptation_rate must be in [0, 1], got {}",
                self.adaptation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_dominance) {
            return Err(CosmosError::InvalidConfig(format!(
                "initial_dominance must be in [0, 1], got {}",
                self.initial_dominance
            )));
        }
        Ok(())
    }
}
