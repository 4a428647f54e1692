//! Extraction output: clusters and the result that owns them.

use crate::color::Rgb;

/// Cluster identifier, assigned 1..=N by descending pixel count.
pub type ClusterId = u32;

/// One group of visually similar pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCluster {
    /// Stable id within one [`ExtractionResult`]
    pub id: ClusterId,
    /// Centroid rounded to integer RGB
    pub color: Rgb,
    /// Pixels assigned to this cluster at extraction time
    pub pixel_count: usize,
}

impl ColorCluster {
    /// `#RRGGBB` form of the representative color.
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }

    /// Human label shown next to the cluster ("Color 3").
    pub fn label(&self) -> String {
        format!("Color {}", self.id)
    }
}

/// Ordered clusters for one image, plus the number of pixels clustered.
///
/// Created once per upload and never mutated. Clusters are sorted by
/// descending `pixel_count` and carry ids `1..=len()` in that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionResult {
    clusters: Vec<ColorCluster>,
    total_pixels: usize,
}

impl ExtractionResult {
    /// Build a result from raw `(centroid, pixel_count)` pairs.
    ///
    /// Drops empty clusters and clusters covering less than `min_fraction`
    /// of `total_pixels`, sorts the rest by descending count (ties by
    /// color, so equal inputs always produce equal ids) and numbers them
    /// from 1.
    ///
    /// ```
    /// use dominant_colors::{ExtractionResult, Rgb};
    ///
    /// let raw = vec![
    ///     (Rgb::new(0, 0, 255), 10),
    ///     (Rgb::new(255, 0, 0), 89),
    ///     (Rgb::new(0, 255, 0), 1),
    /// ];
    /// let result = ExtractionResult::from_raw_clusters(raw, 100, 0.05);
    ///
    /// assert_eq!(result.len(), 2);
    /// assert_eq!(result.clusters()[0].color, Rgb::new(255, 0, 0));
    /// assert_eq!(result.clusters()[0].id, 1);
    /// ```
    pub fn from_raw_clusters(
        raw: impl IntoIterator<Item = (Rgb, usize)>,
        total_pixels: usize,
        min_fraction: f64,
    ) -> Self {
        let mut kept: Vec<(Rgb, usize)> = if total_pixels == 0 {
            Vec::new()
        } else {
            raw.into_iter()
                .filter(|&(_, count)| {
                    count > 0 && count as f64 / total_pixels as f64 >= min_fraction
                })
                .collect()
        };

        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let clusters = kept
            .into_iter()
            .enumerate()
            .map(|(i, (color, pixel_count))| ColorCluster {
                id: i as ClusterId + 1,
                color,
                pixel_count,
            })
            .collect();

        Self {
            clusters,
            total_pixels,
        }
    }

    /// Clusters in id order (descending pixel count).
    pub fn clusters(&self) -> &[ColorCluster] {
        &self.clusters
    }

    /// Number of pixel samples that went into clustering.
    pub fn total_pixels(&self) -> usize {
        self.total_pixels
    }

    /// Pixels covered by the kept clusters; less than `total_pixels` when
    /// tiny clusters were filtered out.
    pub fn retained_pixels(&self) -> usize {
        self.clusters.iter().map(|c| c.pixel_count).sum()
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Look up a cluster by id.
    pub fn get(&self, id: ClusterId) -> Option<&ColorCluster> {
        // ids are dense and 1-based
        let index = (id as usize).checked_sub(1)?;
        self.clusters.get(index)
    }

    pub fn contains(&self, id: ClusterId) -> bool {
        self.get(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractionResult {
        ExtractionResult::from_raw_clusters(
            vec![
                (Rgb::new(0, 255, 0), 1),
                (Rgb::new(255, 0, 0), 2),
                (Rgb::new(0, 0, 255), 1),
            ],
            4,
            0.005,
        )
    }

    #[test]
    fn test_ids_follow_descending_count() {
        let result = sample();
        let ids: Vec<_> = result.clusters().iter().map(|c| c.id).collect();
        let counts: Vec<_> = result.clusters().iter().map(|c| c.pixel_count).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(counts, vec![2, 1, 1]);
    }

    #[test]
    fn test_ties_are_ordered_by_color() {
        let result = sample();
        // (0,0,255) sorts before (0,255,0)
        assert_eq!(result.clusters()[1].color, Rgb::new(0, 0, 255));
        assert_eq!(result.clusters()[2].color, Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_empty_clusters_are_dropped() {
        let result = ExtractionResult::from_raw_clusters(
            vec![(Rgb::new(1, 1, 1), 0), (Rgb::new(2, 2, 2), 5)],
            5,
            0.0,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result.retained_pixels(), 5);
    }

    #[test]
    fn test_tiny_clusters_are_dropped() {
        let result = ExtractionResult::from_raw_clusters(
            vec![(Rgb::new(1, 1, 1), 4), (Rgb::new(2, 2, 2), 996)],
            1000,
            0.005,
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result.total_pixels(), 1000);
        assert_eq!(result.retained_pixels(), 996);
    }

    #[test]
    fn test_cluster_at_threshold_is_kept() {
        let result = ExtractionResult::from_raw_clusters(
            vec![(Rgb::new(1, 1, 1), 5), (Rgb::new(2, 2, 2), 995)],
            1000,
            0.005,
        );
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_zero_total_yields_empty_result() {
        let result = ExtractionResult::from_raw_clusters(vec![(Rgb::new(1, 1, 1), 3)], 0, 0.0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_lookup_by_id() {
        let result = sample();
        assert_eq!(result.get(1).unwrap().color, Rgb::new(255, 0, 0));
        assert!(result.get(0).is_none());
        assert!(result.get(4).is_none());
        assert!(result.contains(3));
    }

    #[test]
    fn test_cluster_labels() {
        let result = sample();
        let first = &result.clusters()[0];
        assert_eq!(first.hex(), "#FF0000");
        assert_eq!(first.label(), "Color 1");
    }
}
