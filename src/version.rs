// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the text inference node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-embeddings-probabilities-2026-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-10-19";

/// Operations served by this build
pub const FEATURES: &[&str] = &[
    "embeddings",
    "probabilities",
    "mean-pooling",
    "softmax",
    "onnx-runtime",
    "hf-hub-model-resolution",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Text Inference Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Version object reported by GET /health
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
