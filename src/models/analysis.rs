use chrono::{DateTime, Utc};
use dominant_colors::{Breakdown, ClusterId, ExclusionSet, ExtractionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Identifier of one upload's analysis; also the stem of its stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(Uuid);

impl AnalysisId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for AnalysisId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One uploaded image: its clusters and the current exclusions.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub id: AnalysisId,
    /// File name under the upload directory (`<id>.<ext>`)
    pub stored_name: String,
    /// File name the client sent, sanitized
    pub original_name: String,
    pub result: ExtractionResult,
    pub exclusions: ExclusionSet,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    pub fn new(
        id: AnalysisId,
        stored_name: impl Into<String>,
        original_name: impl Into<String>,
        result: ExtractionResult,
    ) -> Self {
        Self {
            id,
            stored_name: stored_name.into(),
            original_name: original_name.into(),
            result,
            exclusions: ExclusionSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn image_url(&self) -> String {
        format!("/uploads/{}", self.stored_name)
    }

    pub fn chart_url(&self) -> String {
        format!("/api/analyses/{}/chart.png", self.id)
    }
}

/// One visible color in an [`AnalysisView`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ColorEntryView {
    /// Cluster number, stable across exclusion updates
    pub id: ClusterId,
    /// "Color N"
    pub name: String,
    /// Share of the non-excluded pixels, one decimal
    pub percentage: f64,
    #[schema(value_type = Vec<u8>)]
    pub rgb: [u8; 3],
    /// `#RRGGBB`
    pub hex: String,
    pub pixel_count: usize,
}

/// Current state of an analysis as shown to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AnalysisView {
    pub id: String,
    pub original_name: String,
    /// URL of the uploaded original
    pub image_url: String,
    /// URL of the chart PNG for the current exclusions
    pub chart_url: String,
    /// Chart PNG, base64 encoded
    pub chart: String,
    pub title: String,
    /// Excluded cluster numbers that matched a color
    pub excluded: Vec<ClusterId>,
    /// Number of pixels that were clustered
    pub total_pixels: usize,
    /// Number of detected colors, excluded ones included
    pub color_count: usize,
    pub colors: Vec<ColorEntryView>,
}

impl AnalysisView {
    pub fn new(analysis: &Analysis, breakdown: &Breakdown, title: String, chart: String) -> Self {
        let colors = breakdown
            .entries()
            .iter()
            .map(|entry| ColorEntryView {
                id: entry.cluster.id,
                name: entry.cluster.label(),
                percentage: entry.display_percentage(),
                rgb: entry.cluster.color.to_bytes(),
                hex: entry.cluster.hex(),
                pixel_count: entry.cluster.pixel_count,
            })
            .collect();

        Self {
            id: analysis.id.to_string(),
            original_name: analysis.original_name.clone(),
            image_url: analysis.image_url(),
            chart_url: analysis.chart_url(),
            chart,
            title,
            excluded: breakdown.excluded().iter().collect(),
            total_pixels: analysis.result.total_pixels(),
            color_count: analysis.result.len(),
            colors,
        }
    }
}

/// Body of `PUT /api/analyses/{id}/exclusions`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ExclusionsRequest {
    /// Cluster numbers to hide; replaces the previous set
    #[serde(default)]
    pub exclude: Vec<ClusterId>,
}

impl ExclusionsRequest {
    /// Zero is never a cluster number and is rejected like malformed text input.
    pub fn into_set(self) -> Result<ExclusionSet, dominant_colors::ExclusionError> {
        if self.exclude.contains(&0) {
            return Err(dominant_colors::ExclusionError::InvalidToken("0".to_string()));
        }
        Ok(self.exclude.into_iter().collect())
    }
}
