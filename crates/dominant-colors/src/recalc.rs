//! Exclusion-aware percentage breakdown.
//!
//! Percentages are kept at full precision; [`DisplayEntry::display_percentage`]
//! gives the one-decimal value for text. Display values are apportioned with
//! the largest-remainder method so the visible entries always add up to
//! exactly 100.0. Chart slices are sized from the full-precision values.

use crate::cluster::{ColorCluster, ExtractionResult};
use crate::exclusion::ExclusionSet;

/// One visible cluster and its share of the non-excluded pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    pub cluster: ColorCluster,
    /// Share in percent (0.0..=100.0), full precision
    pub percentage: f64,
    /// Displayed share in tenths of a percent
    tenths: u64,
}

impl DisplayEntry {
    /// Percentage at one decimal place. Within 0.1 of `percentage`; the
    /// values of one breakdown sum to 100.0.
    pub fn display_percentage(&self) -> f64 {
        self.tenths as f64 / 10.0
    }

    /// Share as a fraction (0.0..=1.0).
    pub fn fraction(&self) -> f64 {
        self.percentage / 100.0
    }
}

/// The result of one recalculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    entries: Vec<DisplayEntry>,
    excluded: ExclusionSet,
    visible_pixels: usize,
}

impl Breakdown {
    /// Visible entries in extraction order.
    pub fn entries(&self) -> &[DisplayEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DisplayEntry> {
        self.entries
    }

    /// Exclusions that matched a cluster.
    pub fn excluded(&self) -> &ExclusionSet {
        &self.excluded
    }

    /// Sum of pixel counts over visible clusters; the percentage denominator.
    pub fn visible_pixels(&self) -> usize {
        self.visible_pixels
    }

    /// True when nothing is left to show (every cluster excluded).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recompute each visible cluster's share of the non-excluded pixels.
///
/// Unknown ids in `exclusions` are ignored. When every cluster is
/// excluded the breakdown is empty rather than an error.
///
/// ```
/// use dominant_colors::{recalculate, ExclusionSet, ExtractionResult, Rgb};
///
/// let result = ExtractionResult::from_raw_clusters(
///     vec![(Rgb::new(255, 0, 0), 2), (Rgb::new(0, 255, 0), 1), (Rgb::new(0, 0, 255), 1)],
///     4,
///     0.005,
/// );
/// let green = result.clusters().iter().find(|c| c.color == Rgb::new(0, 255, 0)).unwrap().id;
///
/// let breakdown = recalculate(&result, &ExclusionSet::from_ids([green]));
/// let shown: Vec<f64> = breakdown.entries().iter().map(|e| e.display_percentage()).collect();
/// assert_eq!(shown, vec![66.7, 33.3]);
/// ```
pub fn recalculate(result: &ExtractionResult, exclusions: &ExclusionSet) -> Breakdown {
    let visible: Vec<&ColorCluster> = result
        .clusters()
        .iter()
        .filter(|c| !exclusions.contains(c.id))
        .collect();

    let visible_pixels: usize = visible.iter().map(|c| c.pixel_count).sum();

    let entries = if visible_pixels == 0 {
        Vec::new()
    } else {
        let counts: Vec<usize> = visible.iter().map(|c| c.pixel_count).collect();
        let tenths = apportion_tenths(&counts, visible_pixels);
        visible
            .into_iter()
            .zip(tenths)
            .map(|(cluster, tenths)| DisplayEntry {
                cluster: cluster.clone(),
                percentage: cluster.pixel_count as f64 / visible_pixels as f64 * 100.0,
                tenths,
            })
            .collect()
    };

    Breakdown {
        entries,
        excluded: exclusions.effective(result),
        visible_pixels,
    }
}

/// Split 1000 tenths of a percent over `counts` (summing to `total > 0`):
/// everyone gets the floor of their exact quota, the leftover tenths go to
/// the largest remainders, earlier entries first on ties.
fn apportion_tenths(counts: &[usize], total: usize) -> Vec<u64> {
    const WHOLE: u128 = 1000;
    let total = total as u128;

    let mut tenths = Vec::with_capacity(counts.len());
    let mut remainders = Vec::with_capacity(counts.len());
    for (index, &count) in counts.iter().enumerate() {
        let scaled = count as u128 * WHOLE;
        tenths.push((scaled / total) as u64);
        remainders.push((scaled % total, index));
    }

    let assigned: u64 = tenths.iter().sum();
    let leftover = (WHOLE as u64).saturating_sub(assigned) as usize;
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, index) in remainders.iter().take(leftover) {
        tenths[index] += 1;
    }
    tenths
}
