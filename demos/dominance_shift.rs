//! Bars drawn at random positions on a 28×28 canvas.
//!
//! Vertical and horizontal bars rarely overlap pixel-wise, so the
//! similarity memory keeps seeing strangers. Their aspect ratios, though,
//! are unmistakable, and the brain learns to let statistics answer.

use cosmos::kernel::features::{IMAGE_LEN, IMAGE_SIDE};
use cosmos::{Brain, Label, Vector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn bar(rng: &mut ChaCha8Rng, vertical: bool) -> Vector {
    let long = rng.gen_range(14..22);
    let start = rng.gen_range(0..IMAGE_SIDE - long);
    let offset = rng.gen_range(0..IMAGE_SIDE - 3);
    let ink = rng.gen_range(0.7..1.0);

    let mut data = vec![0.0; IMAGE_LEN];
    for along in start..start + long {
        for across in offset..offset + 3 {
            let (row, col) = if vertical { (along, across) } else { (across, along) };
            data[row * IMAGE_SIDE + col] = ink;
        }
    }
    Vector::from_data(data)
}

fn sample(rng: &mut ChaCha8Rng) -> (Vector, Label) {
    let vertical = rng.gen_bool(0.5);
    let label = if vertical { "vertical" } else { "horizontal" };
    (bar(rng, vertical), Label::from(label))
}

fn main() -> cosmos::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "cosmos=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut brain = Brain::new();

    for step in 1..=200 {
        let (x, label) = sample(&mut rng);
        brain.memorize(&x, label)?;
        if step % 25 == 0 {
            info!(step, dominance = brain.dominance(), leader = ?brain.leader(), "training");
        }
    }

    let report = brain.dream(0.9, 0.0)?;
    info!(%report, "consolidated");

    let exam: Vec<(Vector, Label)> = (0..100).map(|_| sample(&mut rng)).collect();
    let eval = brain.evaluate(exam.iter().map(|(x, l)| (x, l)), false)?;
    println!(
        "accuracy {:.1}% ({} / {}), dominance {:.2}",
        eval.accuracy() * 100.0,
        eval.correct,
        eval.total,
        brain.dominance()
    );
    Ok(())
}
