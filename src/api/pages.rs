//! HTML pages: the upload form and the result page.
//!
//! Failures are shown to the user on a re-rendered page with the matching
//! status code instead of a JSON body.

use axum::{
    extract::{rejection::FormRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use dominant_colors::ExclusionSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::upload::read_upload;
use crate::error::{AnalysisError, ApiError};
use crate::models::{Analysis, AnalysisId, AnalysisView};
use crate::services::template_service::{INDEX_TEMPLATE, RESULT_TEMPLATE};
use crate::services::{AnalysisPipeline, TemplateService};

#[derive(Debug, Serialize)]
struct IndexPage<'a> {
    error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ResultPage<'a> {
    #[serde(flatten)]
    view: &'a AnalysisView,
    error: Option<&'a str>,
}

/// Fields posted by the result page's update form.
const MISSING_ANALYSIS: &str = "Missing image reference, please upload again.";

#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub exclude: String,
}

/// `GET /`
pub async fn index(State(templates): State<Arc<TemplateService>>) -> Response {
    render_index(&templates, StatusCode::OK, None)
}

/// `POST /upload`
pub async fn upload(
    State(templates): State<Arc<TemplateService>>,
    State(pipeline): State<Arc<AnalysisPipeline>>,
    multipart: Multipart,
) -> Response {
    let view = async {
        let file = read_upload(multipart).await?;
        let analysis = pipeline
            .analyze_upload(file.file_name.as_deref(), file.bytes)
            .await?;
        Ok::<_, ApiError>(pipeline.view(&analysis).await?)
    }
    .await;

    match view {
        Ok(view) => render_result(&templates, StatusCode::OK, &view, None),
        Err(e) => render_index_error(&templates, &e),
    }
}

/// `POST /update`
pub async fn update(
    State(templates): State<Arc<TemplateService>>,
    State(pipeline): State<Arc<AnalysisPipeline>>,
    form: Result<Form<UpdateForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            tracing::debug!(error = %e.body_text(), "Unreadable update form");
            return render_index_error(&templates, &missing_analysis());
        }
    };
    let Some(raw_id) = form.analysis.as_deref().filter(|id| !id.trim().is_empty()) else {
        return render_index_error(&templates, &missing_analysis());
    };

    let analysis = match load_analysis(&pipeline, raw_id.trim()).await {
        Ok(analysis) => analysis,
        Err(e) => return render_index_error(&templates, &e.into()),
    };

    let exclusions = match ExclusionSet::parse(&form.exclude) {
        Ok(set) => set,
        Err(e) => {
            // Keep showing the current state next to the message
            let error = ApiError::from(AnalysisError::from(e));
            return match pipeline.view(&analysis).await {
                Ok(view) => render_result(
                    &templates,
                    error.status_code(),
                    &view,
                    Some(&error.to_string()),
                ),
                Err(e) => render_index_error(&templates, &e.into()),
            };
        }
    };

    let result = async {
        let analysis = pipeline.update_exclusions(&analysis.id, exclusions).await?;
        pipeline.view(&analysis).await
    }
    .await;

    match result {
        Ok(view) => render_result(&templates, StatusCode::OK, &view, None),
        Err(e) => render_index_error(&templates, &e.into()),
    }
}

fn missing_analysis() -> ApiError {
    ApiError::BadRequest(MISSING_ANALYSIS.to_string())
}

async fn load_analysis(pipeline: &AnalysisPipeline, raw_id: &str) -> Result<Analysis, AnalysisError> {
    let id: AnalysisId = raw_id
        .parse()
        .map_err(|_| AnalysisError::NotFound(raw_id.to_string()))?;
    pipeline.load(&id).await
}

fn render_index(templates: &TemplateService, status: StatusCode, error: Option<&str>) -> Response {
    match templates.render(INDEX_TEMPLATE, &IndexPage { error }) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response(),
    }
}

fn render_index_error(templates: &TemplateService, error: &ApiError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        tracing::error!(error = %error, "Page request failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "Page request rejected");
    }
    render_index(templates, status, Some(&error.to_string()))
}

fn render_result(
    templates: &TemplateService,
    status: StatusCode,
    view: &AnalysisView,
    error: Option<&str>,
) -> Response {
    match templates.render(RESULT_TEMPLATE, &ResultPage { view, error }) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => ApiError::Internal(e.to_string()).into_response(),
    }
}
