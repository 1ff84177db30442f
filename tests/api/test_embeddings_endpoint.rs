// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embeddings/ endpoint tests
//!
//! Verifies:
//! - 200 with a fixed-length `embeddings` array of real numbers
//! - Empty text is accepted
//! - Bodies larger than axum's default limit are accepted
//! - Identical input gives identical output
//! - Backend failures become 500 with the error message as `detail`
//! - Route works with and without the trailing slash

use super::support::*;
use axum::http::StatusCode;

#[tokio::test]
async fn test_hello_world_returns_hidden_size_vector() {
    let mut mock = MockBackend::new();
    mock.expect_embed()
        .withf(|text| text == "hello world")
        .times(1)
        .returning(|_| Ok(vec![0.25; HIDDEN_SIZE]));

    let (status, body) = post_json(app_with(mock), "/embeddings/", r#"{"text": "hello world"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let embeddings = body["embeddings"].as_array().expect("embeddings array");
    assert_eq!(embeddings.len(), HIDDEN_SIZE);
    assert!(embeddings.iter().all(|v| v.as_f64().map(f64::is_finite).unwrap_or(false)));
}

#[tokio::test]
async fn test_empty_text_is_structurally_valid() {
    let (status, body) = post_json(app_with(HashBackend), "/embeddings/", r#"{"text": ""}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embeddings"].as_array().unwrap().len(), HIDDEN_SIZE);
}

#[tokio::test]
async fn test_identical_input_gives_identical_output() {
    let body = r#"{"text": "The quick brown fox"}"#;

    let (_, first) = post_json(app_with(HashBackend), "/embeddings/", body).await;
    let (_, second) = post_json(app_with(HashBackend), "/embeddings/", body).await;
    let (_, other) = post_json(app_with(HashBackend), "/embeddings/", r#"{"text": "jumps"}"#).await;

    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[tokio::test]
async fn test_long_text_is_not_rejected() {
    let long_text = "token ".repeat(5000);
    let body = serde_json::json!({ "text": long_text }).to_string();

    let (status, body) = post_json(app_with(HashBackend), "/embeddings/", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embeddings"].as_array().unwrap().len(), HIDDEN_SIZE);
}

#[tokio::test]
async fn test_multi_megabyte_body_is_not_rejected() {
    // ~3.5 MB, above axum's default 2 MB request body limit
    let long_text = "word ".repeat(700_000);
    let body = serde_json::json!({ "text": long_text }).to_string();
    assert!(body.len() > 2 * 1024 * 1024);

    let mut mock = MockBackend::new();
    mock.expect_embed()
        .withf(|text| text.len() == 3_500_000)
        .times(1)
        .returning(|_| Ok(vec![0.5; HIDDEN_SIZE]));

    let (status, body) = post_json(app_with(mock), "/embeddings/", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embeddings"].as_array().unwrap().len(), HIDDEN_SIZE);
}

#[tokio::test]
async fn test_backend_failure_becomes_500_with_detail() {
    let mut mock = MockBackend::new();
    mock.expect_embed()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("Model has no `last_hidden_state` output")));

    let (status, body) = post_json(app_with(mock), "/embeddings/", r#"{"text": "hi"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        serde_json::json!({ "detail": "Model has no `last_hidden_state` output" })
    );
}

#[tokio::test]
async fn test_route_without_trailing_slash() {
    let (status, _) = post_json(app_with(HashBackend), "/embeddings", r#"{"text": "hi"}"#).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let (status, _) = send_json(
        app_with(HashBackend),
        axum::http::Method::GET,
        "/embeddings/",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
