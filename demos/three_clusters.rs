//! Three noisy clusters, one dream.
//!
//! Run with `RUST_LOG=cosmos=debug cargo run --example three_clusters` to
//! watch every memorize outcome.

use cosmos::memory::analysis::{conflict_degree, system_entropy};
use cosmos::{Brain, Label, Vector};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, StandardNormal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DIM: usize = 16;
const PER_CLUSTER: usize = 50;

fn main() -> cosmos::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cosmos=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let noise = Normal::new(0.0, 0.05).map_err(|e| cosmos::CosmosError::InvalidInput(e.to_string()))?;

    let mut brain = Brain::new();
    let mut centers = Vec::new();
    for name in ["A", "B", "C"] {
        let raw: Vec<f64> = (0..DIM).map(|_| StandardNormal.sample(&mut rng)).collect();
        centers.push((Vector::from_data(raw).normalized(), Label::from(name)));
    }

    for (center, label) in &centers {
        for _ in 0..PER_CLUSTER {
            let x: Vec<f64> = center.data().iter().map(|c| c + noise.sample(&mut rng)).collect();
            brain.memorize(&Vector::from_data(x), label.clone())?;
        }
    }

    let memory = brain.similarity();
    println!(
        "before dream: {} roots, {} units, entropy {:.3}, conflict {:.4}",
        memory.len(),
        memory.total_units(),
        system_entropy(memory),
        conflict_degree(memory)
    );

    let report = brain.dream(0.9, 0.0)?;
    println!("{}", report);

    let memory = brain.similarity();
    println!(
        "after dream: entropy {:.3}, conflict {:.4}",
        system_entropy(memory),
        conflict_degree(memory)
    );
    for star in memory.stars() {
        println!(
            "  {:>3} mass {:>3} children {:>2}",
            star.label().to_string(),
            star.mass(),
            star.children().len()
        );
    }

    for (center, label) in &centers {
        let thought = brain.perceive(center)?;
        println!(
            "query {} -> {:?} ({:.3}, {:?})",
            label,
            thought.label().map(ToString::to_string),
            thought.score(),
            thought.source()
        );
    }
    Ok(())
}
