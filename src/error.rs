use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dominant_colors::{ExclusionError, ExtractError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Body-limit violations surface here as 413
            ApiError::Upload(e) => e.status(),
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Analysis(e) => e.status_code(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure of one analysis request: upload, decode, extraction, exclusion
/// update or chart rendering.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid exclusion list: {0}")]
    InvalidExclusion(#[from] ExclusionError),

    #[error("Extraction failed: {0}")]
    Extraction(ExtractError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Analysis not found: {0}")]
    NotFound(String),

    #[error("Worker task failed: {0}")]
    Task(String),
}

impl From<ExtractError> for AnalysisError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::EmptyImage => AnalysisError::InvalidImage(e.to_string()),
            other => AnalysisError::Extraction(other),
        }
    }
}

impl AnalysisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AnalysisError::InvalidImage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisError::InvalidExclusion(_) => StatusCode::BAD_REQUEST,
            AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalysisError::Extraction(_)
            | AnalysisError::Render(_)
            | AnalysisError::Storage(_)
            | AnalysisError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_missing_field() {
        let error = ApiError::MissingField("file");
        assert_eq!(error.to_string(), "Missing required field: file");
    }

    #[test]
    fn test_api_error_analysis_is_transparent() {
        let error: ApiError = AnalysisError::NotFound("abc".to_string()).into();
        assert_eq!(error.to_string(), "Analysis not found: abc");
    }

    #[test]
    fn test_empty_image_maps_to_invalid_image() {
        let error: AnalysisError = ExtractError::EmptyImage.into();
        assert!(matches!(error, AnalysisError::InvalidImage(_)));
        assert_eq!(error.to_string(), "Invalid image: image contains no pixels");
    }

    #[test]
    fn test_bad_cluster_count_maps_to_extraction() {
        let error: AnalysisError = ExtractError::InvalidClusterCount(0).into();
        assert!(matches!(error, AnalysisError::Extraction(_)));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_exclusion_error_message() {
        let error: AnalysisError = ExclusionError::InvalidToken("x".to_string()).into();
        assert_eq!(
            error.to_string(),
            "Invalid exclusion list: invalid color number 'x' (expected e.g. 1,3,7)"
        );
    }

    #[test]
    fn test_render_error_unsupported_dimensions() {
        let error = RenderError::UnsupportedDimensions {
            width: 0,
            height: 700,
        };
        assert_eq!(error.to_string(), "Unsupported dimensions: 0x700");
    }

    #[test]
    fn test_analysis_error_status_codes() {
        assert_eq!(
            AnalysisError::UnsupportedFormat("gif".into()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AnalysisError::InvalidImage("truncated".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AnalysisError::InvalidExclusion(ExclusionError::InvalidToken("a".into()))
                .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AnalysisError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AnalysisError::Render(RenderError::PixmapAllocation).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        let response = ApiError::MissingField("file").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            ApiError::Analysis(AnalysisError::UnsupportedFormat("bmp".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let response = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
