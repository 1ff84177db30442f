// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embeddings API Module
//!
//! POST /embeddings/ returns the mean-pooled last hidden state of the
//! loaded model for one input text.

pub mod handler;
pub mod response;

pub use handler::embeddings_handler;
pub use response::EmbeddingsResponse;
