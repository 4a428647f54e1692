pub mod analysis;
pub mod config;

pub use analysis::{Analysis, AnalysisId, AnalysisView, ColorEntryView, ExclusionsRequest};
pub use config::{AnalysisConfig, AppConfig, ChartConfig, UploadConfig};
