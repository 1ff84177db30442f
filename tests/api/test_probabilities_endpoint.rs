// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /probabilities/ endpoint tests

use super::support::*;
use axum::http::StatusCode;

fn rows(body: &serde_json::Value) -> Vec<Vec<f64>> {
    body["probabilities"]
        .as_array()
        .expect("probabilities array")
        .iter()
        .map(|row| {
            row.as_array()
                .expect("row array")
                .iter()
                .map(|v| v.as_f64().unwrap())
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_rows_are_distributions() {
    for text in ["hello world", "", "a much longer sentence about nothing in particular"] {
        let body = serde_json::json!({ "text": text }).to_string();
        let (status, body) = post_json(app_with(HashBackend), "/probabilities/", &body).await;

        assert_eq!(status, StatusCode::OK, "text {:?}", text);
        let rows = rows(&body);
        assert_eq!(rows.len(), 1, "batch axis is kept");
        assert_eq!(rows[0].len(), NUM_LABELS);
        let sum: f64 = rows[0].iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "row sums to {}", sum);
        assert!(rows[0].iter().all(|&p| p >= 0.0));
    }
}

#[tokio::test]
async fn test_response_shape_is_nested() {
    let mut mock = MockBackend::new();
    mock.expect_probabilities()
        .times(1)
        .returning(|_| Ok(vec![vec![0.25, 0.75]]));

    let (status, body) = post_json(app_with(mock), "/probabilities/", r#"{"text": "great"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "probabilities": [[0.25, 0.75]] }));
}

#[tokio::test]
async fn test_identical_input_gives_identical_output() {
    let body = r#"{"text": "deterministic"}"#;

    let (_, first) = post_json(app_with(HashBackend), "/probabilities/", body).await;
    let (_, second) = post_json(app_with(HashBackend), "/probabilities/", body).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_multi_megabyte_body_is_not_rejected() {
    let long_text = "word ".repeat(700_000);
    let body = serde_json::json!({ "text": long_text }).to_string();

    let (status, body) = post_json(app_with(HashBackend), "/probabilities/", &body).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["probabilities"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].as_array().unwrap().len(), NUM_LABELS);
}

#[tokio::test]
async fn test_backend_failure_becomes_500_with_detail() {
    let mut mock = MockBackend::new();
    mock.expect_probabilities()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("Failed to run model: out of memory")));

    let (status, body) = post_json(app_with(mock), "/probabilities/", r#"{"text": "x"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Failed to run model: out of memory");
}

#[tokio::test]
async fn test_endpoints_are_distinct_operations() {
    let mut mock = MockBackend::new();
    mock.expect_embed().never();
    mock.expect_probabilities()
        .times(1)
        .returning(|_| Ok(vec![vec![1.0, 0.0]]));

    let (status, body) = post_json(app_with(mock), "/probabilities", r#"{"text": "x"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("embeddings").is_none());
}
