//! Kernel layer: vectors, labels, and feature extraction.
//!
//! The kernel provides the minimal foundation the memories build on:
//! - Dense vectors with unit normalization ([`Vector`])
//! - Resonance and distance ([`Similarity`])
//! - Blend and perturbation ([`Primitives`])
//! - Opaque labels ([`Label`])
//! - Geometric image features ([`features`])
//!
//! This layer has no dependencies on [`memory`](crate::memory) or
//! [`highlevel`](crate::highlevel).
//!
//! # Example
//!
//! ```rust
//! use cosmos::kernel::{Primitives, Similarity, Vector};
//!
//! let a = Vector::from_data(vec![1.0, 0.0]);
//! let b = Vector::from_data(vec![0.0, 1.0]);
//! let mid = Primitives::blend(&a, &b, 0.5).unwrap();
//! let r = Similarity::resonance(&mid, &a).unwrap();
//! assert!((r - 0.5f64.sqrt()).abs() < 1e-12);
//! ```

pub mod features;
pub mod label;
pub mod primitives;
pub mod similarity;
pub mod vector;

pub use features::Feature;
pub use label::Label;
pub use primitives::Primitives;
pub use similarity::Similarity;
pub use vector::Vector;
