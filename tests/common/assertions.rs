//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a valid PNG image
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );
    assert_eq!(
        response.header("content-type"),
        Some("image/png"),
        "Expected Content-Type: image/png"
    );
}

/// Assert response is an HTML page with the given status
pub fn assert_html(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let content_type = response.header("content-type").unwrap_or_default();
    assert!(
        content_type.starts_with("text/html"),
        "Expected HTML, got Content-Type: {content_type}"
    );
}

/// Assert a JSON error body with the given status code
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Full response: {}",
        serde_json::to_string_pretty(&json).unwrap()
    );
    assert!(json["error"].is_string(), "Expected an error message");
}

/// Displayed percentages of an analysis view, in order
pub fn percentages(view: &serde_json::Value) -> Vec<f64> {
    view["colors"]
        .as_array()
        .expect("colors array")
        .iter()
        .map(|c| c["percentage"].as_f64().expect("percentage"))
        .collect()
}

/// Assert displayed percentages add up to 100.0 (one-decimal values)
pub fn assert_sums_to_100(view: &serde_json::Value) {
    let tenths: i64 = percentages(view)
        .iter()
        .map(|p| (p * 10.0).round() as i64)
        .sum();
    let total = tenths as f64 / 10.0;
    assert!(
        tenths == 1000,
        "Percentages sum to {total}: {:?}",
        percentages(view)
    );
}
