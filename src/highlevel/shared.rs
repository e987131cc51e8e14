//! Thread-safe handle around a [`Brain`].
//!
//! Perception takes a read lock and may run concurrently; memorize and
//! dream take the write lock. Because a [`Thought`](crate::highlevel::Thought)
//! borrows the brain, perception through the handle returns an owned
//! [`Verdict`] instead.

use crate::error::Result;
use crate::highlevel::brain::{Brain, Evaluation, Source, Thought};
use crate::highlevel::snapshot::BrainSnapshot;
use crate::kernel::{Label, Vector};
use crate::memory::{DreamReport, Outcome};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Owned copy of a [`Thought`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Option<Label>,
    pub score: f64,
    pub source: Source,
    pub mass: u64,
}

impl From<&Thought<'_>> for Verdict {
    fn from(thought: &Thought<'_>) -> Self {
        Self {
            label: thought.label().cloned(),
            score: thought.score(),
            source: thought.source(),
            mass: thought.mass(),
        }
    }
}

/// Cloneable, shareable brain.
#[derive(Clone, Debug, Default)]
pub struct SharedBrain {
    inner: Arc<RwLock<Brain>>,
}

impl SharedBrain {
    pub fn new(brain: Brain) -> Self {
        Self {
            inner: Arc::new(RwLock::new(brain)),
        }
    }

    pub fn perceive(&self, x: &Vector) -> Result<Verdict> {
        let brain = self.read();
        let thought = brain.perceive(x)?;
        Ok(Verdict::from(&thought))
    }

    pub fn memorize(&self, x: &Vector, label: Label) -> Result<Outcome> {
        self.write().memorize(x, label)
    }

    pub fn dream(&self, threshold: f64, noise_level: f64) -> Result<DreamReport> {
        self.write().dream(threshold, noise_level)
    }

    pub fn evaluate(&self, examples: &[(Vector, Label)], self_reinforce: bool) -> Result<Evaluation> {
        self.write().evaluate(examples.iter().map(|(x, l)| (x, l)), self_reinforce)
    }

    pub fn dominance(&self) -> f64 {
        self.read().dominance()
    }

    pub fn snapshot(&self) -> BrainSnapshot {
        self.read().snapshot()
    }

    /// Run `f` with shared access to the brain.
    pub fn with<T>(&self, f: impl FnOnce(&Brain) -> T) -> T {
        f(&self.read())
    }

    fn read(&self) -> RwLockReadGuard<'_, Brain> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Brain> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Brain> for SharedBrain {
    fn from(brain: Brain) -> Self {
        Self::new(brain)
    }
}
