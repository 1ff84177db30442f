// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embeddings/ HTTP handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::time::Instant;
use tracing::info;

use crate::api::embeddings::EmbeddingsResponse;
use crate::api::http_server::{run_blocking, AppState};
use crate::api::{ApiError, TextRequest};

/// POST /embeddings/ handler
///
/// Tokenizes `text` (truncated to the token limit), runs the forward pass
/// on the blocking pool and mean-pools the last hidden state.
///
/// # Request Body
/// ```json
/// { "text": "hello world" }
/// ```
///
/// # Responses
/// - `200 {"embeddings": [f32, ...]}`
/// - `422` when `text` is missing or not a string (model not invoked)
/// - `500 {"detail": "<error message>"}` on any tokenization or inference failure
pub async fn embeddings_handler(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<EmbeddingsResponse>, ApiError> {
    let Json(request) = payload?;

    let start = Instant::now();
    let backend = state.backend.clone();
    let embeddings = run_blocking(move || backend.embed(&request.text)).await?;
    let response = EmbeddingsResponse { embeddings };

    info!(
        "Generated embedding ({} dims) in {:?}",
        response.dimension(),
        start.elapsed()
    );

    Ok(Json(response))
}
