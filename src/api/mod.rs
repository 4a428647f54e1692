pub mod analyses;
pub mod pages;
pub mod upload;

pub use analyses::{create_analysis, get_analysis, get_chart, put_exclusions, ErrorResponse};
pub use analyses::{
    __path_create_analysis, __path_get_analysis, __path_get_chart, __path_put_exclusions,
};
pub use upload::{read_upload, UploadedFile, FILE_FIELD};
