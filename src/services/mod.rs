pub mod analysis_pipeline;
pub mod analysis_store;
pub mod image_decoder;
pub mod template_service;
pub mod upload_storage;

pub use analysis_pipeline::AnalysisPipeline;
pub use analysis_store::{AnalysisStore, InMemoryAnalysisStore};
pub use image_decoder::{decode_pixels, DecodedImage, ImageKind};
pub use template_service::{TemplateError, TemplateService};
pub use upload_storage::{sanitize_filename, UploadStorage};
