//! Similarity memory: a forest of [`MemoryStar`]s searched by resonance.
//!
//! Observations either reinforce the most resonant star carrying the same
//! label, spawn a new star, or (once a star is heavy enough) descend into
//! that star's children. The last case is mitosis: an established category
//! keeps its own direction fixed and refines through its children instead.
//!
//! # Example
//!
//! ```rust
//! use cosmos::kernel::{Label, Vector};
//! use cosmos::memory::{Outcome, SimilarityMemory};
//!
//! let mut memory = SimilarityMemory::new();
//! let v = Vector::from_data(vec![1.0, 0.0, 0.0]);
//!
//! let first = memory.memorize(&v, Label::from("a")).unwrap();
//! assert_eq!(first.outcome, Outcome::NewCreation);
//!
//! let (star, score) = memory.perceive(&v).unwrap();
//! assert_eq!(star.unwrap().label(), &Label::from("a"));
//! assert!((score - 1.0).abs() < 1e-12);
//! ```

use crate::error::{CosmosError, Result};
use crate::kernel::{Label, Similarity, Vector};
use crate::memory::star::MemoryStar;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Tunables for the similarity memory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Resonance a star must exceed to absorb an observation or to be
    /// searched into.
    pub resonance_threshold: f64,
    /// Mass above which a star stops blending and grows children.
    pub mitosis_threshold: u64,
    /// Blend step toward each reinforcing observation.
    pub learning_rate: f64,
    /// Root forests at or below this size are never pruned.
    pub prune_floor: usize,
    /// Seed for dream perturbation.
    pub seed: u64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            resonance_threshold: 0.85,
            mitosis_threshold: 5,
            learning_rate: 0.1,
            prune_floor: 50,
            seed: 42,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.resonance_threshold.is_finite() {
            return Err(CosmosError::InvalidConfig(format!(
                "resonance_threshold must be finite, got {}",
                self.resonance_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(CosmosError::InvalidConfig(format!(
                "learning_rate must be in [0, 1], got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// What a call to [`SimilarityMemory::memorize`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// An existing star absorbed the observation.
    Reinforce,
    /// A new root star was created.
    NewCreation,
    /// The observation was routed into a category's children.
    Mitosis,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Reinforce => "reinforce",
            Outcome::NewCreation => "new_creation",
            Outcome::Mitosis => "mitosis",
        }
    }
}

/// Result of a memorize call: the outcome plus the star it touched.
#[derive(Debug)]
pub struct Memorization<'a> {
    pub outcome: Outcome,
    /// Tree depth of the touched star (0 = root forest).
    pub depth: usize,
    pub star: &'a MemoryStar,
}

/// Serializable state of a [`SimilarityMemory`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResonatorSnapshot {
    pub config: SimilarityConfig,
    pub dimensions: Option<usize>,
    pub clock: u64,
    pub dreams: u64,
    pub galaxy: Vec<MemoryStar>,
}

/// Hierarchical, resonance-searched memory.
#[derive(Clone, Debug)]
pub struct SimilarityMemory {
    pub(crate) config: SimilarityConfig,
    pub(crate) galaxy: Vec<MemoryStar>,
    /// Fixed by the first stored vector.
    pub(crate) dimensions: Option<usize>,
    /// Last issued creation time.
    pub(crate) clock: u64,
    /// Completed dream cycles; salts the perturbation seed.
    pub(crate) dreams: u64,
}

impl SimilarityMemory {
    /// Create with default parameters.
    pub fn new() -> Self {
        Self {
            config: SimilarityConfig::default(),
            galaxy: Vec::new(),
            dimensions: None,
            clock: 0,
            dreams: 0,
        }
    }

    /// Create with explicit parameters.
    pub fn with_config(config: SimilarityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    // --- Accessors ---

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Root stars, in insertion order (or merge order after a dream).
    pub fn stars(&self) -> &[MemoryStar] {
        &self.galaxy
    }

    /// Number of root stars.
    pub fn len(&self) -> usize {
        self.galaxy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.galaxy.is_empty()
    }

    /// Number of stars at every depth.
    pub fn total_units(&self) -> usize {
        self.galaxy.iter().map(MemoryStar::subtree_len).sum()
    }

    /// Dimensionality fixed by the first memorized vector.
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// Forget everything. Configuration is kept.
    pub fn clear(&mut self) {
        self.galaxy.clear();
        self.dimensions = None;
        self.clock = 0;
        self.dreams = 0;
    }

    // --- Core methods ---

    /// Find the most resonant star for `x`.
    ///
    /// Searches the root forest; when the winner is a category and its
    /// resonance exceeds the threshold, its children are searched too and a
    /// child wins only with a strictly higher score. An empty memory yields
    /// `(None, 0.0)`.
    pub fn perceive(&self, x: &Vector) -> Result<(Option<&MemoryStar>, f64)> {
        let x = self.admit(x)?;
        Ok(self.perceive_in(&self.galaxy, &x))
    }

    /// `x` must already be admitted: unit-normalized and of the pool's
    /// dimensionality.
    fn perceive_in<'a>(&self, pool: &'a [MemoryStar], x: &Vector) -> (Option<&'a MemoryStar>, f64) {
        let Some((i, score)) = best_match(pool, x) else {
            return (None, 0.0);
        };
        let best = &pool[i];

        if best.is_category() && score > self.config.resonance_threshold {
            trace!(score, children = best.children.len(), "descending into category");
            if let (Some(child), child_score) = self.perceive_in(&best.children, x) {
                if child_score > score {
                    return (Some(child), child_score);
                }
            }
        }

        (Some(best), score)
    }

    /// Learn that `x` carries `label`.
    ///
    /// Exactly one star is reinforced or created per call.
    pub fn memorize(&mut self, x: &Vector, label: Label) -> Result<Memorization<'_>> {
        let x = self.admit(x)?;
        if x.is_zero() {
            return Err(CosmosError::InvalidInput("cannot memorize a zero vector".into()));
        }
        if self.dimensions.is_none() {
            self.dimensions = Some(x.dimensions());
        }

        let memo = memorize_in(&mut self.galaxy, x, label, &self.config, &mut self.clock, 0)?;
        debug!(
            outcome = memo.outcome.as_str(),
            depth = memo.depth,
            label = %memo.star.label,
            mass = memo.star.mass,
            "memorized"
        );
        Ok(memo)
    }

    /// Export state for persistence.
    pub fn snapshot(&self) -> ResonatorSnapshot {
        ResonatorSnapshot {
            config: self.config.clone(),
            dimensions: self.dimensions,
            clock: self.clock,
            dreams: self.dreams,
            galaxy: self.galaxy.clone(),
        }
    }

    /// Restore from a snapshot, checking that every stored vector agrees
    /// with the recorded dimensionality.
    pub fn from_snapshot(snap: ResonatorSnapshot) -> Result<Self> {
        snap.config.validate()?;
        if let Some(dim) = snap.dimensions {
            let mut stack: Vec<&MemoryStar> = snap.galaxy.iter().collect();
            while let Some(star) = stack.pop() {
                star.vector.validate()?;
                star.vector.expect_dimensions(dim)?;
                if star.vector.is_zero() {
                    return Err(CosmosError::InvalidInput("snapshot holds a zero-vector star".into()));
                }
                stack.extend(star.children.iter());
            }
        } else if !snap.galaxy.is_empty() {
            return Err(CosmosError::InvalidInput(
                "snapshot holds stars but no dimensionality".into(),
            ));
        }

        Ok(Self {
            config: snap.config,
            galaxy: snap.galaxy,
            dimensions: snap.dimensions,
            clock: snap.clock,
            dreams: snap.dreams,
        })
    }

    // --- Private helpers ---

    /// Validate, check dimensionality, normalize.
    fn admit(&self, x: &Vector) -> Result<Vector> {
        x.validate()?;
        if let Some(dim) = self.dimensions {
            x.expect_dimensions(dim)?;
        }
        Ok(x.normalized())
    }
}

impl Default for SimilarityMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Highest resonance in `pool`; ties go to the latest creation time.
pub(crate) fn best_match(pool: &[MemoryStar], x: &Vector) -> Option<(usize, f64)> {
    pool.iter()
        .enumerate()
        .map(|(i, star)| (i, Similarity::dot(star.vector.data(), x.data())))
        .max_by(|&(i, a), &(j, b)| {
            a.total_cmp(&b)
                .then_with(|| pool[i].creation_time.cmp(&pool[j].creation_time))
        })
}

fn memorize_in<'a>(
    pool: &'a mut Vec<MemoryStar>,
    x: Vector,
    label: Label,
    config: &SimilarityConfig,
    clock: &mut u64,
    depth: usize,
) -> Result<Memorization<'a>> {
    let target = best_match(pool, &x)
        .filter(|&(i, score)| pool[i].label == label && score > config.resonance_threshold)
        .map(|(i, _)| i);

    match target {
        Some(i) if pool[i].mass > config.mitosis_threshold => {
            trace!(depth, mass = pool[i].mass, "mitosis");
            let inner = memorize_in(&mut pool[i].children, x, label, config, clock, depth + 1)?;
            Ok(Memorization {
                outcome: Outcome::Mitosis,
                depth: inner.depth,
                star: inner.star,
            })
        }
        Some(i) => {
            let star = &mut pool[i];
            star.reinforce(&x, config.learning_rate)?;
            Ok(Memorization {
                outcome: Outcome::Reinforce,
                depth,
                star,
            })
        }
        None => {
            *clock += 1;
            let idx = pool.len();
            pool.push(MemoryStar::new(x, label, *clock));
            let outcome = if depth == 0 {
                Outcome::NewCreation
            } else {
                Outcome::Mitosis
            };
            Ok(Memorization {
                outcome,
                depth,
                star: &pool[idx],
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution, Normal};

    fn v(data: &[f64]) -> Vector {
        Vector::from_data(data.to_vec())
    }

    fn jitter(base: &[f64], sigma: f64, rng: &mut ChaCha8Rng) -> Vector {
        let normal = Normal::new(0.0, sigma).unwrap();
        Vector::from_data(base.iter().map(|x| x + normal.sample(&mut *rng)).collect())
    }

    #[test]
    fn test_perceive_empty() {
        let memory = SimilarityMemory::new();
        let (star, score) = memory.perceive(&v(&[1.0, 0.0])).unwrap();
        assert!(star.is_none());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_first_memorize_creates() {
        let mut memory = SimilarityMemory::new();
        let memo = memory.memorize(&v(&[2.0, 0.0, 0.0]), Label::from("a")).unwrap();

        assert_eq!(memo.outcome, Outcome::NewCreation);
        assert_eq!(memo.depth, 0);
        assert_eq!(memo.star.mass(), 1);
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.dimensions(), Some(3));
    }

    #[test]
    fn test_near_identical_reinforces() {
        let mut memory = SimilarityMemory::new();
        let label = Label::from("A");

        memory.memorize(&v(&[1.0, 0.0, 0.0]), label.clone()).unwrap();
        let second = memory.memorize(&v(&[1.0, 0.001, 0.0]), label.clone()).unwrap();
        assert_eq!(second.outcome, Outcome::Reinforce);
        let third = memory.memorize(&v(&[1.0, 0.0, 0.001]), label).unwrap();
        assert_eq!(third.outcome, Outcome::Reinforce);

        assert_eq!(memory.len(), 1);
        assert_eq!(memory.stars()[0].mass(), 3);
        assert!((memory.stars()[0].vector().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_other_label_creates() {
        let mut memory = SimilarityMemory::new();
        memory.memorize(&v(&[1.0, 0.0]), Label::from("a")).unwrap();
        let memo = memory.memorize(&v(&[1.0, 0.0]), Label::from("b")).unwrap();

        assert_eq!(memo.outcome, Outcome::NewCreation);
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_low_resonance_creates() {
        let mut memory = SimilarityMemory::new();
        memory.memorize(&v(&[1.0, 0.0]), Label::from("a")).unwrap();
        let memo = memory.memorize(&v(&[0.0, 1.0]), Label::from("a")).unwrap();

        assert_eq!(memo.outcome, Outcome::NewCreation);
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_mitosis_on_sixth_reinforcement() {
        let mut memory = SimilarityMemory::new();
        let label = Label::from("A");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let base = [1.0, 0.0, 0.0, 0.0];

        memory.memorize(&v(&base), label.clone()).unwrap();
        for _ in 0..5 {
            let memo = memory.memorize(&jitter(&base, 0.01, &mut rng), label.clone()).unwrap();
            assert_eq!(memo.outcome, Outcome::Reinforce);
        }
        assert_eq!(memory.stars()[0].mass(), 6);

        let parent_before = memory.stars()[0].clone();
        let memo = memory.memorize(&jitter(&base, 0.01, &mut rng), label.clone()).unwrap();
        assert_eq!(memo.outcome, Outcome::Mitosis);
        assert_eq!(memo.depth, 1);
        assert_eq!(memo.star.mass(), 1);

        let parent = &memory.stars()[0];
        assert_eq!(parent.mass(), parent_before.mass());
        assert_eq!(parent.vector(), parent_before.vector());
        assert_eq!(parent.children().len(), 1);
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.total_units(), 2);

        // The child now absorbs further observations.
        let memo = memory.memorize(&jitter(&base, 0.01, &mut rng), label).unwrap();
        assert_eq!(memo.outcome, Outcome::Mitosis);
        assert_eq!(memory.stars()[0].children()[0].mass(), 2);
        assert_eq!(memory.stars()[0].mass(), 6);
    }

    #[test]
    fn test_perceive_picks_maximum() {
        let mut memory = SimilarityMemory::new();
        memory.memorize(&v(&[1.0, 0.0, 0.0]), Label::from("x")).unwrap();
        memory.memorize(&v(&[0.0, 1.0, 0.0]), Label::from("y")).unwrap();
        memory.memorize(&v(&[0.0, 0.0, 1.0]), Label::from("z")).unwrap();

        let query = v(&[0.2, 0.9, 0.1]).normalized();
        let (star, score) = memory.perceive(&query).unwrap();
        let star = star.unwrap();
        assert_eq!(star.label(), &Label::from("y"));
        for other in memory.stars() {
            let s = Similarity::resonance(other.vector(), &query).unwrap();
            assert!(score >= s);
        }
    }

    #[test]
    fn test_perceive_tie_goes_to_latest() {
        let mut memory = SimilarityMemory::new();
        memory.memorize(&v(&[1.0, 0.0]), Label::from("old")).unwrap();
        memory.memorize(&v(&[0.0, 1.0]), Label::from("new")).unwrap();

        // Equidistant query
        let (star, _) = memory.perceive(&v(&[1.0, 1.0])).unwrap();
        assert_eq!(star.unwrap().label(), &Label::from("new"));
    }

    #[test]
    fn test_perceive_descends_into_children() {
        let mut memory = SimilarityMemory::new();
        let label = Label::from("A");
        let base = [1.0, 0.0, 0.0];
        for _ in 0..6 {
            memory.memorize(&v(&base), label.clone()).unwrap();
        }
        // Child lands slightly off the parent's axis
        let off = v(&[1.0, 0.3, 0.0]);
        let memo = memory.memorize(&off, label.clone()).unwrap();
        assert_eq!(memo.outcome, Outcome::Mitosis);

        let (star, score) = memory.perceive(&off).unwrap();
        let star = star.unwrap();
        assert_eq!(star.creation_time(), memory.stars()[0].children()[0].creation_time());
        assert!((score - 1.0).abs() < 1e-12);

        // On the parent's axis the parent still wins.
        let (star, _) = memory.perceive(&v(&base)).unwrap();
        assert!(star.unwrap().is_category());
    }

    #[test]
    fn test_dimension_mismatch_fails_fast() {
        let mut memory = SimilarityMemory::new();
        memory.memorize(&v(&[1.0, 0.0]), Label::from("a")).unwrap();

        assert!(matches!(
            memory.memorize(&v(&[1.0, 0.0, 0.0]), Label::from("a")),
            Err(CosmosError::DimensionMismatch {
                expected: 2,
                got: 3
            })
        ));
        assert!(memory.perceive(&v(&[1.0])).is_err());
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut memory = SimilarityMemory::new();
        assert!(matches!(
            memory.memorize(&v(&[]), Label::from("a")),
            Err(CosmosError::InvalidInput(_))
        ));
        assert!(matches!(
            memory.memorize(&v(&[f64::NAN, 1.0]), Label::from("a")),
            Err(CosmosError::InvalidInput(_))
        ));
        assert!(memory.is_empty());
        assert_eq!(memory.dimensions(), None);
    }

    #[test]
    fn test_zero_vector_is_not_stored() {
        let mut memory = SimilarityMemory::new();
        assert!(matches!(
            memory.memorize(&v(&[0.0, 0.0, 0.0]), Label::from("z")),
            Err(CosmosError::InvalidInput(_))
        ));
        assert!(memory.is_empty());
        assert_eq!(memory.dimensions(), None);

        memory.memorize(&v(&[1.0, 0.0, 0.0]), Label::from("a")).unwrap();
        assert!(memory.memorize(&v(&[0.0, 0.0, 0.0]), Label::from("a")).is_err());
        assert_eq!(memory.stars()[0].mass(), 1);

        // Perceiving a zero vector is allowed and resonates with nothing.
        let (_, score) = memory.perceive(&v(&[0.0, 0.0, 0.0])).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_from_snapshot_rejects_zero_star() {
        let mut memory = SimilarityMemory::new();
        memory.memorize(&v(&[1.0, 0.0]), Label::from("a")).unwrap();
        let mut snap = memory.snapshot();
        snap.galaxy[0].vector = Vector::zeros(2);

        assert!(matches!(
            SimilarityMemory::from_snapshot(snap),
            Err(CosmosError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut memory = SimilarityMemory::new();
        memory.memorize(&v(&[1.0, 0.0]), Label::from(1)).unwrap();
        memory.memorize(&v(&[0.0, 1.0]), Label::from("two")).unwrap();

        let json = serde_json::to_string(&memory.snapshot()).unwrap();
        let restored = SimilarityMemory::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

        assert_eq!(restored.stars(), memory.stars());
        assert_eq!(restored.dimensions(), Some(2));

        let mut restored = restored;
        let memo = restored.memorize(&v(&[1.0, 1.0]), Label::from("three")).unwrap();
        assert_eq!(memo.star.creation_time(), 3);
    }

    #[test]
    fn test_from_snapshot_rejects_mixed_dimensions() {
        let mut memory = SimilarityMemory::new();
        memory.memorize(&v(&[1.0, 0.0]), Label::from("a")).unwrap();
        let mut snap = memory.snapshot();
        snap.galaxy.push(MemoryStar::new(v(&[1.0, 0.0, 0.0]), Label::from("b"), 9));

        assert!(matches!(
            SimilarityMemory::from_snapshot(snap),
            Err(CosmosError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let bad = SimilarityConfig {
            learning_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            SimilarityMemory::with_config(bad),
            Err(CosmosError::InvalidConfig(_))
        ));
    }
}
