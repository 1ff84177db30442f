// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! TextRequest type shared by POST /embeddings/ and POST /probabilities/

use serde::{Deserialize, Serialize};

/// Request body for both inference endpoints
///
/// `text` is required and must be a JSON string. There is no length or
/// emptiness check here: tokenization truncates long input and an empty
/// string still tokenizes to the model's special tokens.
///
/// # Example
/// ```json
/// { "text": "hello world" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextRequest {
    pub text: String,
}
