//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use chromapie::assets::AssetLoader;
use chromapie::models::AppConfig;
use chromapie::server::{build_router, create_app_state_with_config, AppState};
use chromapie::services::AnalysisPipeline;

use super::fixtures::multipart_body;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub pipeline: Arc<AnalysisPipeline>,
    upload_dir: PathBuf,
    // Dropped last: removes the upload directory
    _dir: TempDir,
}

impl TestApp {
    /// Create a new test application using embedded assets and a
    /// temporary upload directory
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a test application after adjusting the default config
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let (dir, state) = Self::create_state_with(adjust);
        let pipeline = state.pipeline.clone();
        let upload_dir = pipeline.storage().dir().to_path_buf();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            pipeline,
            upload_dir,
            _dir: dir,
        }
    }

    /// Create state for custom router configuration; keep the `TempDir`
    /// alive as long as the state is used
    pub fn create_state() -> (TempDir, AppState) {
        Self::create_state_with(|_| {})
    }

    fn create_state_with(adjust: impl FnOnce(&mut AppConfig)) -> (TempDir, AppState) {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.uploads.dir = dir.path().join("uploads");
        // Small charts keep rendering fast
        config.chart.width = 300;
        config.chart.height = 240;
        adjust(&mut config);

        // Embedded assets only (no external paths)
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        let state =
            create_app_state_with_config(asset_loader, config).expect("Failed to create app state");
        (dir, state)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Number of files currently in the upload directory
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a multipart body with a single `file` field
    pub async fn post_file(
        &self,
        path: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> TestResponse {
        let (boundary_header, body) = multipart_body("file", file_name, content_type, data);
        self.request(
            Request::post(path)
                .header(header::CONTENT_TYPE, boundary_header)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// POST a raw multipart body
    pub async fn post_multipart(&self, path: &str, content_type: &str, body: Vec<u8>) -> TestResponse {
        self.request(
            Request::post(path)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// POST an urlencoded form
    pub async fn post_form(&self, path: &str, body: &str) -> TestResponse {
        self.request(
            Request::post(path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// PUT a JSON body
    pub async fn put_json(&self, path: &str, body: &str) -> TestResponse {
        self.request(
            Request::put(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Send a request to the router
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Upload a file through the JSON API and return the created view
    pub async fn create_analysis(&self, file_name: &str, data: &[u8]) -> serde_json::Value {
        let content_type = if file_name.ends_with(".png") {
            "image/png"
        } else {
            "image/jpeg"
        };
        let response = self
            .post_file("/api/analyses", file_name, content_type, data)
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {}",
            response.text()
        );
        response.json()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Header value as string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
