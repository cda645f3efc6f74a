//! Slope photo analysis.
//!
//! There is no computer vision here yet. [`RandomImageHeuristics`] stands in
//! for a real analyzer; anything implementing [`ImageHeuristicsProvider`] can
//! replace it in [`crate::api::AppState`].

use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::risk::ImageHeuristics;

pub trait ImageHeuristicsProvider: Send + Sync {
    fn analyze(&self, image: &[u8]) -> ImageHeuristics;
}

/// Placeholder analyzer: ignores the pixels and draws uniform integers.
pub struct RandomImageHeuristics {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomImageHeuristics {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomImageHeuristics {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageHeuristicsProvider for RandomImageHeuristics {
    fn analyze(&self, image: &[u8]) -> ImageHeuristics {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let heuristics = ImageHeuristics::complete(
            rng.gen_range(30..80) as f64,
            rng.gen_range(20..90) as f64,
            rng.gen_range(10..80) as f64,
            rng.gen_range(60..95) as f64,
            rng.gen_range(10..70) as f64,
        );
        tracing::debug!(bytes = image.len(), ?heuristics, "Placeholder image analysis");
        heuristics
    }
}
