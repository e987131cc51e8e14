//! Memory stars: the atomic entries of the similarity memory.

use crate::error::Result;
use crate::kernel::{Label, Primitives, Vector};
use serde::{Deserialize, Serialize};

/// One memory unit.
///
/// A star with children is a category: it stopped absorbing observations
/// directly and delegates finer distinctions to its children. Children are
/// owned outright, so a forest of stars is always a tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryStar {
    pub(crate) vector: Vector,
    pub(crate) label: Label,
    pub(crate) mass: u64,
    pub(crate) children: Vec<MemoryStar>,
    pub(crate) creation_time: u64,
}

impl MemoryStar {
    /// A fresh star with mass 1. The vector is normalized on the way in.
    pub fn new(vector: Vector, label: Label, creation_time: u64) -> Self {
        Self {
            vector: vector.normalized(),
            label,
            mass: 1,
            children: Vec::new(),
            creation_time,
        }
    }

    /// Unit-normalized representative direction.
    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Reinforcement count.
    pub fn mass(&self) -> u64 {
        self.mass
    }

    pub fn children(&self) -> &[MemoryStar] {
        &self.children
    }

    pub fn creation_time(&self) -> u64 {
        self.creation_time
    }

    /// True once the star has grown children.
    pub fn is_category(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of stars in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(MemoryStar::subtree_len).sum::<usize>()
    }

    /// Pull the vector toward `x` by `learning_rate` and bump the mass.
    pub(crate) fn reinforce(&mut self, x: &Vector, learning_rate: f64) -> Result<()> {
        self.vector = Primitives::blend(&self.vector, x, learning_rate)?;
        self.mass += 1;
        Ok(())
    }

    /// Fold `other` into `self`, weighting each vector by its mass.
    ///
    /// Masses add and `other`'s children are appended after ours.
    pub(crate) fn absorb(&mut self, other: MemoryStar) -> Result<()> {
        let total = self.mass + other.mass;
        let weight = other.mass as f64 / total as f64;
        self.vector = Primitives::blend(&self.vector, &other.vector, weight)?;
        self.mass = total;
        self.children.extend(other.children);
        Ok(())
    }
}
