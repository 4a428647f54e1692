//! Tuning knobs for the k-means extractor.

/// Options for [`KmeansExtractor`](super::KmeansExtractor).
///
/// Construct with [`ExtractOptions::new()`] (or `Default`) and chain the
/// builder methods:
///
/// ```
/// use dominant_colors::ExtractOptions;
///
/// let options = ExtractOptions::new().runs(3).seed(7);
/// assert_eq!(options.runs, 3);
/// assert_eq!(options.min_cluster_fraction, 0.005);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractOptions {
    /// Clusters covering less than this fraction of all pixels are dropped.
    /// Default: 0.005 (0.5%).
    pub min_cluster_fraction: f64,
    /// Independent k-means runs; the tightest one wins. Default: 10.
    pub runs: u32,
    /// Iteration cap per run. Default: 20.
    pub max_iterations: usize,
    /// Centroid movement below which a run stops early (RGB, 0..1 scale).
    /// Default: 0.0025.
    pub convergence: f32,
    /// Seed of the first run; run `i` uses `seed + i`. Default: 42.
    pub seed: u64,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self {
            min_cluster_fraction: 0.005,
            runs: 10,
            max_iterations: 20,
            convergence: 0.0025,
            seed: 42,
        }
    }

    pub fn min_cluster_fraction(mut self, fraction: f64) -> Self {
        self.min_cluster_fraction = fraction;
        self
    }

    pub fn runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn convergence(mut self, convergence: f32) -> Self {
        self.convergence = convergence;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}
