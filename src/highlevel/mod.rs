//! High-level API: the arbitrating [`Brain`].
//!
//! This layer combines the two [`memory`](crate::memory) engines, adds the
//! dominance scalar that decides which one answers, and handles
//! configuration, persistence, and shared access.

pub mod brain;
pub mod config;
pub mod shared;
pub mod snapshot;

pub use brain::{Brain, Evaluation, Source, Thought};
pub use config::BrainConfig;
pub use shared::{SharedBrain, Verdict};
pub use snapshot::{BrainSnapshot, SNAPSHOT_VERSION};
