// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request validation tests
//!
//! A missing or non-string `text` must be rejected with a structured
//! validation error before the model is invoked, and must not be confused
//! with the 500 used for inference failures.

use super::support::*;
use axum::http::StatusCode;

fn untouched_backend() -> MockBackend {
    let mut mock = MockBackend::new();
    mock.expect_embed().never();
    mock.expect_probabilities().never();
    mock
}

#[tokio::test]
async fn test_missing_text_is_422() {
    for uri in ["/embeddings/", "/probabilities/"] {
        let (status, body) = post_json(app_with(untouched_backend()), uri, r#"{}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        let issue = &body["detail"][0];
        assert_eq!(issue["type"], "value_error");
        assert_eq!(issue["loc"], serde_json::json!(["body"]));
        assert!(issue["msg"].as_str().unwrap().contains("text"));
    }
}

#[tokio::test]
async fn test_non_string_text_is_422() {
    for body in [r#"{"text": 42}"#, r#"{"text": null}"#, r#"{"text": ["a", "b"]}"#, r#"{"text": {"a": 1}}"#] {
        let (status, json) = post_json(app_with(untouched_backend()), "/embeddings/", body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {}", body);
        assert!(json["detail"].is_array());
    }
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (status, body) = post_json(app_with(untouched_backend()), "/probabilities/", r#"{"text": "#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"][0]["type"], "json_invalid");
}

#[tokio::test]
async fn test_missing_content_type_is_415() {
    let status = post_raw(app_with(untouched_backend()), "/embeddings/", r#"{"text": "hi"}"#).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let (status, _) = post_json(
        app_with(HashBackend),
        "/embeddings/",
        r#"{"text": "hi", "model": "something-else"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
