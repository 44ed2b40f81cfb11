use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// A source of zero-mean random perturbation for the scoring heuristics.
///
/// Opportunity sub-scores are deliberately noisy; injecting the source keeps
/// production scoring randomized while letting tests swap in [`NoNoise`] for
/// fully deterministic output.
pub trait NoiseSource: Send {
    /// Draws one sample with the given standard deviation.
    fn sample(&mut self, std_dev: f64) -> f64;
}

/// Gaussian noise over a seedable generator.
#[derive(Debug)]
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    /// A generator seeded from OS entropy, for production scoring.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A generator with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for GaussianNoise {
    fn sample(&mut self, std_dev: f64) -> f64 {
        if std_dev <= 0.0 {
            return 0.0;
        }
        // Normal::new only fails on a non-finite or negative std_dev.
        let normal = Normal::new(0.0, std_dev).unwrap_or(Normal::new(0.0, 1.0).unwrap());
        normal.sample(&mut self.rng)
    }
}

/// A silent source: every sample is zero. Used by tests and by callers that
/// want the pure base scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn sample(&mut self, _std_dev: f64) -> f64 {
        0.0
    }
}
