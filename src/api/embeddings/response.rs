// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// Response body for POST /embeddings/
///
/// # Example
/// ```json
/// { "embeddings": [0.1, -0.2, ...] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingsResponse {
    /// Pooled embedding, one value per hidden unit
    pub embeddings: Vec<f32>,
}

impl EmbeddingsResponse {
    pub fn dimension(&self) -> usize {
        self.embeddings.len()
    }
}
