use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::upload::read_upload;
use crate::error::{AnalysisError, ApiError};
use crate::models::{AnalysisId, AnalysisView, ExclusionsRequest};
use crate::services::AnalysisPipeline;

/// Error body returned by the JSON endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Error message
    pub error: String,
}

fn parse_id(raw: &str) -> Result<AnalysisId, AnalysisError> {
    raw.parse()
        .map_err(|_| AnalysisError::NotFound(raw.to_string()))
}

/// Upload an image and analyze its dominant colors
#[utoipa::path(
    post,
    path = "/api/analyses",
    request_body(content = String, content_type = "multipart/form-data", description = "Image in the `file` field (PNG or JPEG)"),
    responses(
        (status = 201, description = "Analysis created", body = AnalysisView),
        (status = 400, description = "No file uploaded", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 415, description = "Not a PNG or JPEG image, or undecodable", body = ErrorResponse),
        (status = 422, description = "Empty upload or image without pixels", body = ErrorResponse),
    ),
    tag = "Analyses"
)]
pub async fn create_analysis(
    State(pipeline): State<Arc<AnalysisPipeline>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AnalysisView>), ApiError> {
    let file = read_upload(multipart).await?;
    let analysis = pipeline
        .analyze_upload(file.file_name.as_deref(), file.bytes)
        .await?;
    let view = pipeline.view(&analysis).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Get the current breakdown of an analysis
#[utoipa::path(
    get,
    path = "/api/analyses/{id}",
    params(("id" = String, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Current view", body = AnalysisView),
        (status = 404, description = "Unknown analysis", body = ErrorResponse),
    ),
    tag = "Analyses"
)]
pub async fn get_analysis(
    State(pipeline): State<Arc<AnalysisPipeline>>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisView>, ApiError> {
    let analysis = pipeline.load(&parse_id(&id)?).await?;
    Ok(Json(pipeline.view(&analysis).await?))
}

/// Replace the excluded colors and recalculate
///
/// Unknown color numbers are ignored; zero is rejected.
#[utoipa::path(
    put,
    path = "/api/analyses/{id}/exclusions",
    params(("id" = String, Path, description = "Analysis id")),
    request_body = ExclusionsRequest,
    responses(
        (status = 200, description = "Recalculated view", body = AnalysisView),
        (status = 400, description = "Malformed exclusion list", body = ErrorResponse),
        (status = 404, description = "Unknown analysis", body = ErrorResponse),
    ),
    tag = "Analyses"
)]
pub async fn put_exclusions(
    State(pipeline): State<Arc<AnalysisPipeline>>,
    Path(id): Path<String>,
    payload: Result<Json<ExclusionsRequest>, JsonRejection>,
) -> Result<Json<AnalysisView>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let exclusions = request.into_set().map_err(AnalysisError::from)?;

    let analysis = pipeline.update_exclusions(&id, exclusions).await?;
    Ok(Json(pipeline.view(&analysis).await?))
}

/// Chart PNG for the current exclusions
#[utoipa::path(
    get,
    path = "/api/analyses/{id}/chart.png",
    params(("id" = String, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Pie chart", body = Vec<u8>, content_type = "image/png"),
        (status = 404, description = "Unknown analysis", body = ErrorResponse),
    ),
    tag = "Analyses"
)]
pub async fn get_chart(
    State(pipeline): State<Arc<AnalysisPipeline>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let analysis = pipeline.load(&parse_id(&id)?).await?;
    let png = pipeline.chart_png(&analysis).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
