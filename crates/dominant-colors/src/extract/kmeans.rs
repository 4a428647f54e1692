//! k-means backend built on `kmeans_colors`.

use std::collections::HashSet;

use kmeans_colors::{get_kmeans, Kmeans};
use palette::Srgb;

use super::{ColorExtractor, ExtractOptions};
use crate::cluster::ExtractionResult;
use crate::color::Rgb;
use crate::error::ExtractError;

/// `kmeans_colors` stores assignments as `u8`.
const MAX_CLUSTERS: usize = 256;

/// Lloyd's k-means in RGB space with k-means++ seeding.
///
/// Runs `options.runs` times with consecutive seeds and keeps the run with
/// the lowest inertia (sum of squared distances from each pixel to its
/// centroid), so results are reproducible across calls and machines.
#[derive(Debug, Clone, Default)]
pub struct KmeansExtractor {
    options: ExtractOptions,
}

impl KmeansExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    fn best_run(&self, samples: &[Srgb], k: usize) -> Kmeans<Srgb> {
        let opts = &self.options;
        let run = |i: u64| {
            get_kmeans(
                k,
                opts.max_iterations,
                opts.convergence,
                false,
                samples,
                opts.seed.wrapping_add(i),
            )
        };

        let mut best = run(0);
        let mut best_inertia = inertia(samples, &best);
        for i in 1..u64::from(opts.runs) {
            let candidate = run(i);
            let candidate_inertia = inertia(samples, &candidate);
            if candidate_inertia < best_inertia {
                best = candidate;
                best_inertia = candidate_inertia;
            }
        }
        best
    }
}

impl ColorExtractor for KmeansExtractor {
    fn extract(&self, pixels: &[Rgb], k: usize) -> Result<ExtractionResult, ExtractError> {
        if pixels.is_empty() {
            return Err(ExtractError::EmptyImage);
        }
        if k == 0 {
            return Err(ExtractError::InvalidClusterCount(k));
        }

        // k-means++ cannot seed more centroids than there are distinct colors
        let k = distinct_colors_up_to(pixels, k.min(MAX_CLUSTERS));

        let samples: Vec<Srgb> = pixels
            .iter()
            .map(|p| {
                let [r, g, b] = p.to_unit();
                Srgb::new(r, g, b)
            })
            .collect();

        let run = self.best_run(&samples, k);

        let mut counts = vec![0usize; run.centroids.len()];
        for &index in &run.indices {
            counts[index as usize] += 1;
        }

        let raw = run
            .centroids
            .iter()
            .zip(counts)
            .map(|(c, count)| (Rgb::from_unit(c.red, c.green, c.blue), count));

        Ok(ExtractionResult::from_raw_clusters(
            raw,
            pixels.len(),
            self.options.min_cluster_fraction,
        ))
    }
}

/// Sum of squared RGB distances between each sample and its centroid.
///
/// `Kmeans::score` only reports the last centroid shift, which says little
/// about how well a run fits, so runs are compared on this instead.
fn inertia(samples: &[Srgb], run: &Kmeans<Srgb>) -> f64 {
    samples
        .iter()
        .zip(&run.indices)
        .map(|(s, &index)| {
            let c = &run.centroids[index as usize];
            let dr = f64::from(s.red - c.red);
            let dg = f64::from(s.green - c.green);
            let db = f64::from(s.blue - c.blue);
            dr * dr + dg * dg + db * db
        })
        .sum()
}

/// Number of distinct colors in `pixels`, counting no further than `limit`.
fn distinct_colors_up_to(pixels: &[Rgb], limit: usize) -> usize {
    let mut seen = HashSet::with_capacity(limit);
    for &p in pixels {
        seen.insert(p);
        if seen.len() >= limit {
            break;
        }
    }
    seen.len()
}
