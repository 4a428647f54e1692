//! Color extraction.
//!
//! [`ColorExtractor`] is the seam between the clustering backend and
//! everything downstream (percentages, charts). The bundled backend is
//! [`KmeansExtractor`].

mod kmeans;
mod options;

pub use kmeans::KmeansExtractor;
pub use options::ExtractOptions;

use crate::cluster::ExtractionResult;
use crate::color::Rgb;
use crate::error::ExtractError;

/// Default number of target clusters.
pub const DEFAULT_CLUSTER_COUNT: usize = 20;

/// Partitions pixels into at most `k` color clusters.
///
/// Implementations must be deterministic: the same pixels and `k` always
/// yield the same [`ExtractionResult`].
pub trait ColorExtractor: Send + Sync {
    /// Cluster `pixels` into at most `k` groups.
    ///
    /// Row order of `pixels` does not matter. Fails with
    /// [`ExtractError::EmptyImage`] when `pixels` is empty and
    /// [`ExtractError::InvalidClusterCount`] when `k` is zero.
    fn extract(&self, pixels: &[Rgb], k: usize) -> Result<ExtractionResult, ExtractError>;
}
