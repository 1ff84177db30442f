// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

/// Response body for POST /probabilities/
///
/// The batch axis is kept, so a single request yields one row.
///
/// # Example
/// ```json
/// { "probabilities": [[0.12, 0.88]] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbabilitiesResponse {
    pub probabilities: Vec<Vec<f32>>,
}
