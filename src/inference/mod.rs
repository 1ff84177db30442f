// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Text model inference
//!
//! Model resolution, tokenization, the ONNX forward pass and the two
//! post-processing steps (mean pooling and softmax). The HTTP layer only
//! sees the [`InferenceBackend`] trait, so tests can swap in a mock.

pub mod onnx_model;
pub mod pooling;
pub mod provider;
pub mod tokenization;

pub use onnx_model::{OnnxTextModel, RuntimeOptions};
pub use provider::{load_labels, ModelFiles, ModelSource};
pub use tokenization::{TokenizedInput, TokenizerSettings};

use serde::{Deserialize, Serialize};

/// Static description of the loaded model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier (Hub repo id or local directory)
    pub model_id: String,
    /// Width of the pooled embedding, if the model exposes hidden states
    pub hidden_size: Option<usize>,
    /// Number of classes, if the model exposes logits
    pub num_labels: Option<usize>,
    /// Class names ordered by class index (empty when unknown)
    pub labels: Vec<String>,
    /// Token limit applied by truncation
    pub max_length: usize,
}

/// Blocking inference over a shared, read-only model.
///
/// Implementations are called from `tokio::task::spawn_blocking`, never
/// from an async worker thread.
#[cfg_attr(test, mockall::automock)]
pub trait InferenceBackend: Send + Sync {
    /// Mean-pooled last hidden state for `text`, batch axis squeezed away
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// Softmax over classification logits, one row per batch item
    fn probabilities(&self, text: &str) -> anyhow::Result<Vec<Vec<f32>>>;

    fn info(&self) -> ModelInfo;
}
