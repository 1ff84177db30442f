// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /probabilities/ HTTP handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::time::Instant;
use tracing::info;

use crate::api::http_server::{run_blocking, AppState};
use crate::api::probabilities::ProbabilitiesResponse;
use crate::api::{ApiError, TextRequest};

/// POST /probabilities/ handler
///
/// Same tokenization and forward pass as the embeddings endpoint, then a
/// softmax over the classification logits.
///
/// # Responses
/// - `200 {"probabilities": [[f32, ...]]}`
/// - `422` when `text` is missing or not a string (model not invoked)
/// - `500 {"detail": "<error message>"}` on any tokenization or inference failure
pub async fn probabilities_handler(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<ProbabilitiesResponse>, ApiError> {
    let Json(request) = payload?;

    let start = Instant::now();
    let backend = state.backend.clone();
    let probabilities = run_blocking(move || backend.probabilities(&request.text)).await?;

    info!(
        "Computed probabilities ({} classes) in {:?}",
        probabilities.first().map(Vec::len).unwrap_or(0),
        start.elapsed()
    );

    Ok(Json(ProbabilitiesResponse { probabilities }))
}
