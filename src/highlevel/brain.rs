//! Arbitration between the similarity and statistical memories.
//!
//! A [`Brain`] asks both memories for an opinion and lets the one with the
//! better track record speak. The track record is a single `dominance`
//! scalar: each time exactly one memory turns out to have been right, the
//! scalar steps toward it. Both memories learn from every labelled example
//! no matter which one was speaking.

use crate::error::Result;
use crate::highlevel::config::BrainConfig;
use crate::kernel::{Label, Vector};
use crate::memory::{DreamReport, MemoryStar, Outcome, SimilarityMemory, StatisticalMemory};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which memory produced an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    Similarity,
    Statistical,
}

/// Answer from [`Brain::perceive`].
#[derive(Clone, Debug, PartialEq)]
pub enum Thought<'a> {
    /// The similarity memory's best star, if any.
    Resonance {
        star: Option<&'a MemoryStar>,
        score: f64,
    },
    /// The statistical memory's answer, which may be "no label". Transient:
    /// it has no star behind it and is never stored.
    Inference { label: Option<Label>, confidence: f64 },
}

impl Thought<'_> {
    pub fn label(&self) -> Option<&Label> {
        match self {
            Thought::Resonance { star, .. } => star.map(MemoryStar::label),
            Thought::Inference { label, .. } => label.as_ref(),
        }
    }

    /// Resonance score or statistical confidence.
    pub fn score(&self) -> f64 {
        match self {
            Thought::Resonance { score, .. } => *score,
            Thought::Inference { confidence, .. } => *confidence,
        }
    }

    /// Mass of the answering star; 0 for statistical answers.
    pub fn mass(&self) -> u64 {
        match self {
            Thought::Resonance { star, .. } => star.map_or(0, MemoryStar::mass),
            Thought::Inference { .. } => 0,
        }
    }

    pub fn source(&self) -> Source {
        match self {
            Thought::Resonance { .. } => Source::Similarity,
            Thought::Inference { .. } => Source::Statistical,
        }
    }
}

/// Tally from [`Brain::evaluate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
    /// Correct answers fed back through `memorize`.
    pub reinforced: usize,
}

impl Evaluation {
    /// Fraction correct, 0.0 for an empty run.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Similarity memory, statistical memory, and the dominance between them.
#[derive(Clone, Debug)]
pub struct Brain {
    pub(crate) similarity: SimilarityMemory,
    pub(crate) statistical: StatisticalMemory,
    pub(crate) dominance: f64,
    pub(crate) adaptation_rate: f64,
}

impl Brain {
    /// Create with default parameters.
    pub fn new() -> Self {
        let config = BrainConfig::default();
        Self {
            similarity: SimilarityMemory::new(),
            statistical: StatisticalMemory::new(),
            dominance: config.initial_dominance,
            adaptation_rate: config.adaptation_rate,
        }
    }

    /// Create with explicit parameters.
    pub fn with_config(config: BrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            similarity: SimilarityMemory::with_config(config.similarity)?,
            statistical: StatisticalMemory::new(),
            dominance: config.initial_dominance,
            adaptation_rate: config.adaptation_rate,
        })
    }

    // --- Accessors ---

    /// 0 = statistics lead, 1 = similarity leads.
    pub fn dominance(&self) -> f64 {
        self.dominance
    }

    pub fn adaptation_rate(&self) -> f64 {
        self.adaptation_rate
    }

    /// The memory that wins a tie of equal raw scores.
    pub fn leader(&self) -> Source {
        if self.dominance >= 0.5 {
            Source::Similarity
        } else {
            Source::Statistical
        }
    }

    pub fn similarity(&self) -> &SimilarityMemory {
        &self.similarity
    }

    pub fn statistical(&self) -> &StatisticalMemory {
        &self.statistical
    }

    /// Forget both memories. Dominance and configuration are kept.
    pub fn clear(&mut self) {
        self.similarity.clear();
        self.statistical = StatisticalMemory::new();
    }

    // --- Core methods ---

    /// Weigh both memories' answers for `x`.
    ///
    /// The similarity score is scaled by `dominance`, the statistical
    /// confidence by `1 - dominance`; a declined statistical answer counts
    /// as confidence 0. The similarity answer wins ties. A similarity score
    /// below zero therefore loses even to a statistical "no label".
    pub fn perceive(&self, x: &Vector) -> Result<Thought<'_>> {
        let (star, score) = self.similarity.perceive(x)?;
        let (label, confidence) = self.statistical.perceive(x)?;

        let right = score * self.dominance;
        let left = confidence * (1.0 - self.dominance);

        Ok(if left > right {
            Thought::Inference { label, confidence }
        } else {
            Thought::Resonance { star, score }
        })
    }

    /// Learn that `x` carries `label`.
    ///
    /// Both memories are judged on their unmodified state first; dominance
    /// moves only when exactly one of them was right. Then both learn.
    pub fn memorize(&mut self, x: &Vector, label: Label) -> Result<Outcome> {
        let (star, _) = self.similarity.perceive(x)?;
        let similarity_correct = star.is_some_and(|s| s.label() == &label);
        let (belief, _) = self.statistical.perceive(x)?;
        let statistical_correct = belief.as_ref() == Some(&label);

        let outcome = self.similarity.memorize(x, label.clone())?.outcome;
        self.statistical.memorize(x, label)?;

        self.adapt(similarity_correct, statistical_correct);
        Ok(outcome)
    }

    /// Consolidate the similarity memory. The statistical memory has no
    /// consolidation step.
    pub fn dream(&mut self, threshold: f64, noise_level: f64) -> Result<DreamReport> {
        self.similarity.dream(threshold, noise_level)
    }

    /// Score the brain on labelled examples.
    ///
    /// With `self_reinforce`, every correctly perceived example is memorized
    /// again, so the run also trains.
    pub fn evaluate<'a, I>(&mut self, examples: I, self_reinforce: bool) -> Result<Evaluation>
    where
        I: IntoIterator<Item = (&'a Vector, &'a Label)>,
    {
        let mut eval = Evaluation::default();
        for (x, label) in examples {
            eval.total += 1;
            let correct = self.perceive(x)?.label() == Some(label);
            if correct {
                eval.correct += 1;
                if self_reinforce {
                    self.memorize(x, label.clone())?;
                    eval.reinforced += 1;
                }
            }
        }
        debug!(
            correct = eval.correct,
            total = eval.total,
            reinforced = eval.reinforced,
            "evaluation complete"
        );
        Ok(eval)
    }

    fn adapt(&mut self, similarity_correct: bool, statistical_correct: bool) {
        let before = self.dominance;
        match (similarity_correct, statistical_correct) {
            (true, false) => self.dominance = (self.dominance + self.adaptation_rate).min(1.0),
            (false, true) => self.dominance = (self.dominance - self.adaptation_rate).max(0.0),
            _ => return,
        }
        debug!(
            from = before,
            to = self.dominance,
            similarity_correct,
            statistical_correct,
            "dominance shifted"
        );
    }
}

impl Default for Brain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::features::{IMAGE_LEN, IMAGE_SIDE};
    use crate::kernel::{Feature, Similarity};
    use crate::memory::SimilarityConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::{Distribution, Normal, StandardNormal};

    fn v(data: &[f64]) -> Vector {
        Vector::from_data(data.to_vec())
    }

    /// A 6×6 patch of ink with its top-left corner at (`row`, `col`).
    fn patch(row: usize, col: usize, ink: f64) -> Vector {
        let mut data = vec![0.0; IMAGE_LEN];
        for r in row..row + 6 {
            for c in col..col + 6 {
                data[r * IMAGE_SIDE + c] = ink;
            }
        }
        Vector::from_data(data)
    }

    fn random_direction(dim: usize, rng: &mut ChaCha8Rng) -> Vec<f64> {
        let raw: Vec<f64> = (0..dim).map(|_| StandardNormal.sample(&mut *rng)).collect();
        Vector::from_data(raw).normalized().into_data()
    }

    fn around(center: &[f64], sigma: f64, rng: &mut ChaCha8Rng) -> Vector {
        let normal = Normal::new(0.0, sigma).unwrap();
        Vector::from_data(center.iter().map(|c| c + normal.sample(&mut *rng)).collect())
    }

    #[test]
    fn test_empty_brain_has_no_opinion() {
        let brain = Brain::new();
        let thought = brain.perceive(&v(&[1.0, 0.0])).unwrap();
        assert_eq!(thought.label(), None);
        assert_eq!(thought.score(), 0.0);
        assert_eq!(thought.source(), Source::Similarity);
    }

    #[test]
    fn test_perceive_prefers_similarity_on_ties() {
        let mut brain = Brain::new();
        let x = v(&[1.0, 0.0, 0.0]);
        brain.memorize(&x, Label::from("a")).unwrap();
        brain.memorize(&x, Label::from("a")).unwrap();

        // The second call already nudged dominance toward similarity.
        let thought = brain.perceive(&x).unwrap();
        assert_eq!(thought.source(), Source::Similarity);
        assert_eq!(thought.mass(), 2);
    }

    #[test]
    fn test_anti_parallel_input_yields_no_label() {
        let mut brain = Brain::new();
        brain.memorize(&v(&[1.0, 0.0]), Label::from("a")).unwrap();

        // similarity -1 * 0.5 loses to a declined statistical answer (0 * 0.5)
        let thought = brain.perceive(&v(&[-1.0, 0.0])).unwrap();
        assert_eq!(thought.source(), Source::Statistical);
        assert_eq!(thought.label(), None);
        assert_eq!(thought.score(), 0.0);
        assert_eq!(thought.mass(), 0);
    }

    #[test]
    fn test_orthogonal_input_keeps_similarity_answer() {
        let mut brain = Brain::new();
        brain.memorize(&v(&[1.0, 0.0]), Label::from("a")).unwrap();

        // 0 * 0.5 ties with 0 * 0.5
        let thought = brain.perceive(&v(&[0.0, 1.0])).unwrap();
        assert_eq!(thought.source(), Source::Similarity);
        assert_eq!(thought.label(), Some(&Label::from("a")));
    }

    #[test]
    fn test_statistical_answer_is_transient() {
        let config = BrainConfig {
            initial_dominance: 0.0,
            ..Default::default()
        };
        let mut brain = Brain::with_config(config).unwrap();
        let x = patch(10, 10, 1.0);
        brain.memorize(&x, Label::from("a")).unwrap();
        brain.memorize(&x, Label::from("a")).unwrap();
        let units = brain.similarity().total_units();

        let thought = brain.perceive(&x).unwrap();
        assert_eq!(thought.source(), Source::Statistical);
        assert_eq!(thought.label(), Some(&Label::from("a")));
        assert_eq!(thought.mass(), 0);
        assert_eq!(brain.similarity().total_units(), units);
    }

    #[test]
    fn test_dominance_moves_toward_the_correct_memory() {
        let mut brain = Brain::new();
        let x = v(&[1.0, 0.0]);
        let y = v(&[0.0, 1.0]);

        // Empty brain: neither is correct.
        brain.memorize(&x, Label::from("a")).unwrap();
        assert_eq!(brain.dominance(), 0.5);

        // Similarity recalls "a"; statistics has nothing to say about
        // non-image input.
        brain.memorize(&x, Label::from("a")).unwrap();
        assert!((brain.dominance() - 0.55).abs() < 1e-12);

        // Similarity's only star is "a", so it is wrong about "b", and
        // statistics is still silent. Both wrong.
        brain.memorize(&y, Label::from("b")).unwrap();
        assert!((brain.dominance() - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_dominance_moves_toward_statistics() {
        let config = BrainConfig {
            similarity: SimilarityConfig {
                // Nothing ever resonates, so every observation is a new star.
                resonance_threshold: 2.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut brain = Brain::with_config(config).unwrap();
        let faint = patch(10, 10, 1.0);
        let bold = patch(10, 10, 9.0);

        // Same direction, different ink: statistics can tell them apart,
        // similarity can't.
        for _ in 0..3 {
            brain.memorize(&faint, Label::from("faint")).unwrap();
            brain.memorize(&bold, Label::from("bold")).unwrap();
        }
        let before = brain.dominance();
        // Similarity's most recent identical direction is "bold".
        brain.memorize(&faint, Label::from("faint")).unwrap();
        assert!(brain.dominance() < before);
    }

    #[test]
    fn test_dominance_is_clamped() {
        let config = BrainConfig {
            initial_dominance: 0.98,
            ..Default::default()
        };
        let mut brain = Brain::with_config(config).unwrap();
        let x = v(&[1.0, 0.0]);
        brain.memorize(&x, Label::from("a")).unwrap();
        // Only similarity is right.
        brain.memorize(&x, Label::from("a")).unwrap();
        assert_eq!(brain.dominance(), 1.0);
    }

    #[test]
    fn test_dominance_unchanged_when_memories_agree() {
        let config = BrainConfig {
            initial_dominance: 0.3,
            ..Default::default()
        };
        let mut brain = Brain::with_config(config).unwrap();
        let x = patch(2, 2, 1.0);
        let w = patch(16, 16, 1.0);
        let a = Label::from("a");

        // Seed both memories directly so that they start out agreeing.
        brain.similarity.memorize(&x, a.clone()).unwrap();
        brain.statistical.memorize(&x, a.clone()).unwrap();
        brain.statistical.memorize(&x, a.clone()).unwrap();
        let initial = brain.dominance().to_bits();

        for i in 0..20 {
            // Both recall "a".
            brain.memorize(&x, a.clone()).unwrap();
            assert_eq!(brain.dominance().to_bits(), initial);
            // Neither can know a label it has never seen.
            brain.memorize(&w, Label::from(format!("novel-{}", i))).unwrap();
            assert_eq!(brain.dominance().to_bits(), initial);
        }
    }

    #[test]
    fn test_both_memories_always_learn() {
        let config = BrainConfig {
            initial_dominance: 1.0,
            ..Default::default()
        };
        let mut brain = Brain::with_config(config).unwrap();
        brain.memorize(&patch(2, 2, 1.0), Label::from("a")).unwrap();
        brain.memorize(&patch(16, 16, 1.0), Label::from("b")).unwrap();

        assert_eq!(brain.similarity().len(), 2);
        assert_eq!(brain.statistical().len(), 2);
    }

    #[test]
    fn test_memorize_rejects_bad_input_without_side_effects() {
        let mut brain = Brain::new();
        brain.memorize(&patch(10, 10, 1.0), Label::from("a")).unwrap();

        let mut poisoned = patch(10, 10, 1.0).into_data();
        poisoned[0] = f64::NAN;
        assert!(brain.memorize(&v(&[1.0, 0.0, 0.0]), Label::from("a")).is_err());
        assert!(brain.memorize(&Vector::from_data(poisoned), Label::from("a")).is_err());
        assert!(brain.memorize(&Vector::zeros(IMAGE_LEN), Label::from("a")).is_err());

        assert_eq!(brain.similarity().total_units(), 1);
        assert_eq!(
            brain
                .statistical()
                .record(&Label::from("a"), Feature::Density)
                .unwrap()
                .count(),
            1
        );
        assert_eq!(brain.dominance(), 0.5);
    }

    #[test]
    fn test_dream_delegates_to_similarity() {
        let mut brain = Brain::new();
        brain.memorize(&patch(2, 2, 1.0), Label::from("a")).unwrap();
        brain.memorize(&patch(16, 16, 1.0), Label::from("a")).unwrap();

        let report = brain.dream(-1.0, 0.0).unwrap();
        assert_eq!(report.merged, 1);
        assert_eq!(brain.similarity().len(), 1);
        assert_eq!(brain.statistical().len(), 1);
    }

    #[test]
    fn test_evaluate_with_self_reinforcement() {
        let mut brain = Brain::new();
        let a = v(&[1.0, 0.0]);
        let b = v(&[0.0, 1.0]);
        brain.memorize(&a, Label::from("a")).unwrap();
        brain.memorize(&b, Label::from("b")).unwrap();

        let la = Label::from("a");
        let lb = Label::from("b");
        let exam = [(&a, &la), (&b, &lb), (&a, &lb)];
        let eval = brain.evaluate(exam, true).unwrap();

        assert_eq!(eval.total, 3);
        assert_eq!(eval.correct, 2);
        assert_eq!(eval.reinforced, 2);
        assert!((eval.accuracy() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(brain.similarity().stars()[0].mass(), 2);
    }

    fn subtree_mass(star: &MemoryStar) -> u64 {
        star.mass() + star.children().iter().map(subtree_mass).sum::<u64>()
    }

    fn three_clusters(brain: &mut Brain, rng: &mut ChaCha8Rng) -> Vec<(Vec<f64>, Label)> {
        let dim = 16;
        let clusters: Vec<(Vec<f64>, Label)> = ["A", "B", "C"]
            .into_iter()
            .map(|l| (random_direction(dim, rng), Label::from(l)))
            .collect();
        for (center, label) in &clusters {
            for _ in 0..50 {
                let x = around(center, 0.05, rng);
                brain.memorize(&x, label.clone()).unwrap();
            }
        }
        clusters
    }

    #[test]
    fn test_three_clusters_consolidate() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let config = BrainConfig {
            similarity: SimilarityConfig {
                // Keep every observation at the root.
                mitosis_threshold: 1_000,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut brain = Brain::with_config(config).unwrap();
        let clusters = three_clusters(&mut brain, &mut rng);

        let report = brain.dream(0.9, 0.0).unwrap();
        assert_eq!(report.final_count, 3);

        for (center, label) in &clusters {
            let star = brain
                .similarity()
                .stars()
                .iter()
                .find(|s| s.label() == label)
                .unwrap();
            assert!((45..=50).contains(&star.mass()), "{}: mass {}", label, star.mass());
            let score = Similarity::resonance(star.vector(), &Vector::from_data(center.clone())).unwrap();
            assert!(score > 0.95, "star for {} drifted: {}", label, score);
        }
    }

    #[test]
    fn test_three_clusters_with_mitosis_conserve_mass() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut brain = Brain::new();
        let clusters = three_clusters(&mut brain, &mut rng);

        brain.dream(0.9, 0.0).unwrap();

        let stars = brain.similarity().stars();
        assert_eq!(stars.len(), 3);
        for (_, label) in &clusters {
            let star = stars.iter().find(|s| s.label() == label).unwrap();
            assert_eq!(star.mass(), 6);
            assert!(star.is_category());
            assert_eq!(subtree_mass(star), 50);
        }
    }
}
