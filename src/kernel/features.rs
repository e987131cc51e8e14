//! Geometric feature extraction for the statistical memory.
//!
//! A 784-component vector is read as a flattened 28×28 image (row-major) and
//! yields three features: ink density, aspect ratio of the active region,
//! and the share of ink in the central block. Any other length is an opaque
//! embedding, for which only density is meaningful.

use crate::kernel::vector::{Vector, NORM_EPSILON};
use serde::{Deserialize, Serialize};

/// Side length of the square image layout.
pub const IMAGE_SIDE: usize = 28;

/// Component count that triggers the image layout.
pub const IMAGE_LEN: usize = IMAGE_SIDE * IMAGE_SIDE;

/// A row or column is active when its projection exceeds this.
pub const ACTIVITY_THRESHOLD: f64 = 0.1;

/// Central block bounds, half-open, applied to both rows and columns.
const CENTER_START: usize = 7;
const CENTER_END: usize = 21;

/// Features the statistical memory tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    Density,
    AspectRatio,
    CenterRatio,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Density, Feature::AspectRatio, Feature::CenterRatio];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Density => "density",
            Feature::AspectRatio => "aspect_ratio",
            Feature::CenterRatio => "center_ratio",
        }
    }
}

/// True when `vec` has the flattened image layout the geometric features
/// are defined for.
pub fn is_image(vec: &Vector) -> bool {
    vec.dimensions() == IMAGE_LEN
}

/// Extract every applicable feature from `vec`, in [`Feature::ALL`] order.
///
/// Geometric features are simply absent for non-image lengths.
pub fn extract(vec: &Vector) -> Vec<(Feature, f64)> {
    let data = vec.data();
    let density: f64 = data.iter().map(|v| v.abs()).sum();

    if data.len() != IMAGE_LEN {
        return vec![(Feature::Density, density)];
    }

    let mut rows = [0.0f64; IMAGE_SIDE];
    let mut cols = [0.0f64; IMAGE_SIDE];
    let mut total = 0.0;
    let mut center = 0.0;

    for (i, &v) in data.iter().enumerate() {
        let (r, c) = (i / IMAGE_SIDE, i % IMAGE_SIDE);
        rows[r] += v;
        cols[c] += v;
        total += v;
        if (CENTER_START..CENTER_END).contains(&r) && (CENTER_START..CENTER_END).contains(&c) {
            center += v;
        }
    }

    let active_rows = rows.iter().filter(|&&p| p > ACTIVITY_THRESHOLD).count();
    let active_cols = cols.iter().filter(|&&p| p > ACTIVITY_THRESHOLD).count();

    let aspect_ratio = if active_cols == 0 {
        0.0
    } else {
        active_rows as f64 / active_cols as f64
    };
    let center_ratio = if total.abs() < NORM_EPSILON {
        0.0
    } else {
        center / total
    };

    vec![
        (Feature::Density, density),
        (Feature::AspectRatio, aspect_ratio),
        (Feature::CenterRatio, center_ratio),
    ]
}
