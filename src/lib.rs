//! # Cosmos: Self-Organizing Associative Memory
//!
//! Cosmos learns labelled vectors online with two cooperating memories and
//! lets the one with the better track record answer.
//!
//! ## Quick Start
//!
//! ```rust
//! use cosmos::{Brain, Label, Vector};
//!
//! let mut brain = Brain::new();
//!
//! // Learn
//! brain.memorize(&Vector::from_data(vec![1.0, 0.1, 0.0]), Label::from("left")).unwrap();
//! brain.memorize(&Vector::from_data(vec![0.0, 0.1, 1.0]), Label::from("right")).unwrap();
//!
//! // Recall
//! let thought = brain.perceive(&Vector::from_data(vec![0.9, 0.2, 0.1])).unwrap();
//! assert_eq!(thought.label(), Some(&Label::from("left")));
//!
//! // Consolidate
//! let report = brain.dream(0.9, 0.0).unwrap();
//! println!("{}", report);
//! ```
//!
//! ## Core Concepts
//!
//! - **Stars**: unit vectors with a label and a mass, organized as a forest
//! - **Mitosis**: a heavy star stops moving and refines through children
//! - **Dream**: prune light stars, optionally jitter, merge same-label neighbours
//! - **Profiles**: per-label running mean/variance of geometric features
//! - **Dominance**: a scalar in [0, 1] weighing similarity against statistics
//!
//! ## Layers
//!
//! - [`kernel`]: vectors, resonance, labels, feature extraction
//! - [`memory`]: the similarity forest and the statistical profiles
//! - [`highlevel`]: the arbitrating [`Brain`], config, persistence, sharing

pub mod error;
pub mod highlevel;
pub mod kernel;
pub mod memory;

// Re-exports for convenience
pub use error::{CosmosError, Result};
pub use highlevel::{Brain, BrainConfig, BrainSnapshot, Evaluation, SharedBrain, Source, Thought, Verdict};
pub use kernel::{Feature, Label, Similarity, Vector};
pub use memory::{
    DreamReport, MemoryStar, Outcome, SimilarityConfig, SimilarityMemory, StatisticalMemory,
};
