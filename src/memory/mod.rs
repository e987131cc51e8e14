//! Memory layer: the similarity forest and the statistical profiles.
//!
//! This module provides:
//!
//! - [`SimilarityMemory`]: a forest of [`MemoryStar`]s that learns by
//!   reinforcing, creating, or subdividing stars, and consolidates itself
//!   with [`SimilarityMemory::dream`].
//!
//! - [`StatisticalMemory`]: per-label [`DistributionRecord`]s over
//!   geometric features, queried by average z-score.
//!
//! - [`analysis`]: entropy and conflict metrics for inspecting a forest.
//!
//! # Usage
//!
//! ```rust
//! use cosmos::kernel::{Label, Vector};
//! use cosmos::memory::SimilarityMemory;
//!
//! let mut memory = SimilarityMemory::new();
//! for i in 0..3 {
//!     let v = Vector::from_data(vec![1.0, 0.01 * i as f64]);
//!     memory.memorize(&v, Label::from("a")).unwrap();
//! }
//! assert_eq!(memory.len(), 1);
//!
//! let report = memory.dream(0.9, 0.0).unwrap();
//! assert_eq!(report.final_count, 1);
//! ```

pub mod analysis;
pub mod distribution;
pub mod dream;
pub mod resonator;
pub mod star;
pub mod statistical;

pub use distribution::DistributionRecord;
pub use dream::DreamReport;
pub use resonator::{Memorization, Outcome, ResonatorSnapshot, SimilarityConfig, SimilarityMemory};
pub use star::MemoryStar;
pub use statistical::{LabelProfile, StatisticalMemory};
