//! Assertion helpers for tests.

use axum::http::StatusCode;
use base64::Engine;
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
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

/// Assert an error response carries the JSON `{status, error}` body
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Expected JSON status {}, got {:?}. Full response: {}",
        expected.as_u16(),
        json["status"],
        serde_json::to_string_pretty(&json).unwrap()
    );
    assert!(json["error"].is_string(), "Expected an error message");
}

/// Decode the base64 `preview_png` field of a reform response
pub fn preview_png(json: &serde_json::Value) -> Vec<u8> {
    let encoded = json["preview_png"]
        .as_str()
        .expect("preview_png should be a string");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .expect("preview_png should be valid base64");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG preview, got {} bytes",
        bytes.len()
    );
    bytes
}
