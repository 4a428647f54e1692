//! dominant-colors: dominant color extraction with exclusion-aware percentages
//!
//! This library groups the pixels of an image into a small number of
//! representative colors and reports how much of the image each one covers.
//! Colors can be excluded afterwards (typically a background) and the
//! remaining shares are renormalized so they again sum to 100%.
//!
//! # Quick Start
//!
//! ```
//! use dominant_colors::{recalculate, ColorExtractor, ExclusionSet, KmeansExtractor, Rgb};
//!
//! let mut pixels = vec![Rgb::new(255, 255, 255); 50];
//! pixels.extend(vec![Rgb::new(200, 30, 30); 30]);
//! pixels.extend(vec![Rgb::new(30, 30, 200); 20]);
//!
//! let result = KmeansExtractor::default().extract(&pixels, 3).unwrap();
//! assert_eq!(result.len(), 3);
//! assert_eq!(result.clusters()[0].hex(), "#FFFFFF");
//!
//! // Hide the white background
//! let breakdown = recalculate(&result, &ExclusionSet::parse("1").unwrap());
//! let shown: Vec<f64> = breakdown.entries().iter().map(|e| e.display_percentage()).collect();
//! assert_eq!(shown, vec![60.0, 40.0]);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! &[Rgb] --ColorExtractor--> ExtractionResult --recalculate(ExclusionSet)--> Breakdown
//! ```
//!
//! - [`ColorExtractor`] clusters pixels. [`KmeansExtractor`] is the bundled
//!   backend (k-means++ seeding, best of several seeded runs).
//! - [`ExtractionResult`] is immutable. Cluster ids are `1..=N` in
//!   descending pixel-count order and stay stable while exclusions change.
//! - [`recalculate`] is pure and cheap. Re-run it on every exclusion change
//!   instead of re-extracting.
//!
//! # Determinism
//!
//! The same pixels, cluster count and [`ExtractOptions`] always produce the
//! same result. Every k-means run is seeded and ties in pixel count are
//! broken by color.

pub mod cluster;
pub mod color;
pub mod error;
pub mod exclusion;
pub mod extract;
pub mod recalc;


pub use cluster::{ClusterId, ColorCluster, ExtractionResult};
pub use color::{ParseColorError, Rgb};
pub use error::{ExclusionError, ExtractError};
pub use exclusion::ExclusionSet;
pub use extract::{ColorExtractor, ExtractOptions, KmeansExtractor, DEFAULT_CLUSTER_COUNT};
pub use recalc::{recalculate, Breakdown, DisplayEntry};
