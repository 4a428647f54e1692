//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header::CACHE_CONTROL, HeaderValue},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api::{self, pages};
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::{AnalysisPipeline, TemplateService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub templates: Arc<TemplateService>,
    pub pipeline: Arc<AnalysisPipeline>,
}

impl FromRef<AppState> for Arc<TemplateService> {
    fn from_ref(state: &AppState) -> Self {
        state.templates.clone()
    }
}

impl FromRef<AppState> for Arc<AnalysisPipeline> {
    fn from_ref(state: &AppState) -> Self {
        state.pipeline.clone()
    }
}

/// Create application state from an asset loader.
///
/// `UPLOAD_DIR` overrides the configured upload directory.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = AppConfig::load_from_assets(&asset_loader).with_env_overrides();
    create_app_state_with_config(asset_loader, config)
}

/// Create application state with an explicit configuration.
pub fn create_app_state_with_config(
    asset_loader: Arc<AssetLoader>,
    config: AppConfig,
) -> anyhow::Result<AppState> {
    let templates = Arc::new(TemplateService::new(&asset_loader)?);
    let pipeline = Arc::new(
        AnalysisPipeline::from_config(&config, templates.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create analysis pipeline: {e}"))?,
    );

    tracing::info!(
        upload_dir = %pipeline.storage().dir().display(),
        clusters = config.analysis.cluster_count,
        "Application state ready"
    );

    Ok(AppState {
        config: Arc::new(config),
        templates,
        pipeline,
    })
}

/// Build the router with all pages, API endpoints and middleware.
///
/// This is the core router used by both production and tests. Responses
/// carry `Cache-Control: no-store` unless a handler sets its own.
pub fn build_router(state: AppState) -> Router {
    let upload_dir = state.pipeline.storage().dir().to_path_buf();
    let max_bytes = state.config.uploads.max_bytes;

    Router::new()
        // HTML pages
        .route("/", get(pages::index))
        .route("/upload", post(pages::upload))
        .route("/update", post(pages::update))
        // JSON API
        .route("/api/analyses", post(api::create_analysis))
        .route("/api/analyses/:id", get(api::get_analysis))
        .route("/api/analyses/:id/exclusions", put(api::put_exclusions))
        .route("/api/analyses/:id/chart.png", get(api::get_chart))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Uploaded originals
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback(|| async { ApiError::NotFound })
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// How often to sweep expired analyses, or `None` when retention is off.
pub fn retention_sweep_interval(retention: Duration) -> Option<Duration> {
    if retention.is_zero() {
        return None;
    }
    Some((retention / 4).clamp(Duration::from_secs(1), Duration::from_secs(300)))
}
