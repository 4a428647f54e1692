use crate::assets::AssetLoader;
use dominant_colors::{ExtractOptions, DEFAULT_CLUSTER_COUNT};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub uploads: UploadConfig,

    #[serde(default)]
    pub chart: ChartConfig,
}

/// Color extraction parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Target number of clusters (K)
    pub cluster_count: usize,
    /// Minimum share of all pixels a cluster needs to be reported
    pub min_cluster_fraction: f64,
    /// Longest side, in pixels, of the image that gets clustered
    pub max_dimension: u32,
    pub runs: u32,
    pub max_iterations: usize,
    pub convergence: f32,
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let options = ExtractOptions::default();
        Self {
            cluster_count: DEFAULT_CLUSTER_COUNT,
            min_cluster_fraction: options.min_cluster_fraction,
            max_dimension: 800,
            runs: options.runs,
            max_iterations: options.max_iterations,
            convergence: options.convergence,
            seed: options.seed,
        }
    }
}

impl AnalysisConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .min_cluster_fraction(self.min_cluster_fraction)
            .runs(self.runs.max(1))
            .max_iterations(self.max_iterations)
            .convergence(self.convergence)
            .seed(self.seed)
    }
}

/// Upload storage settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
    /// Request body limit in bytes
    pub max_bytes: usize,
    /// Age after which an analysis and its file are swept
    pub retention_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_bytes: 20 * 1024 * 1024,
            retention_secs: 3600,
        }
    }
}

/// Output size of the rendered pie chart
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 700,
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        cluster_count = config.analysis.cluster_count,
                        max_dimension = config.analysis.max_dimension,
                        upload_dir = %config.uploads.dir.display(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply `UPLOAD_DIR` if set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(dir);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.cluster_count, 20);
        assert_eq!(config.analysis.min_cluster_fraction, 0.005);
        assert_eq!(config.analysis.max_dimension, 800);
        assert_eq!(config.uploads.dir, PathBuf::from("uploads"));
        assert_eq!(config.uploads.max_bytes, 20_971_520);
        assert_eq!(config.chart, ChartConfig { width: 900, height: 700 });
    }

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = AppConfig::load_from_assets(&AssetLoader::default());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let yaml = r#"
analysis:
  cluster_count: 8
chart:
  width: 400
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.analysis.cluster_count, 8);
        assert_eq!(config.analysis.runs, 10);
        assert_eq!(config.chart.width, 400);
        assert_eq!(config.chart.height, 700);
        assert_eq!(config.uploads, UploadConfig::default());
    }

    #[test]
    fn test_extract_options_from_config() {
        let analysis = AnalysisConfig {
            runs: 0,
            seed: 7,
            min_cluster_fraction: 0.01,
            ..Default::default()
        };
        let options = analysis.extract_options();
        assert_eq!(options.runs, 1);
        assert_eq!(options.seed, 7);
        assert_eq!(options.min_cluster_fraction, 0.01);
    }

    #[test]
    fn test_invalid_config_file_falls_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "analysis: [not, a, map]").unwrap();

        let loader = AssetLoader::new(None, Some(path));
        assert_eq!(AppConfig::load_from_assets(&loader), AppConfig::default());
    }
}
