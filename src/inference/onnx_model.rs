// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX text model wrapper
//!
//! Wraps ONNX Runtime and a HuggingFace tokenizer around a BERT-style
//! model exported to ONNX (for example `bert-base-uncased`).
//!
//! Features:
//! - CUDA execution provider with automatic CPU fallback
//! - Truncation to the configured token limit (512 by default)
//! - Mean-pooled last hidden state (`embed`)
//! - Softmax over classification logits (`probabilities`)
//! - Output discovery by name, falling back to tensor rank

use anyhow::{anyhow, Context, Result};
use ndarray::{ArrayD, Ix2, Ix3};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use super::pooling::{into_rows, mean_pool, softmax_rows, squeeze_batch};
use super::provider::{load_labels, ModelFiles};
use super::tokenization::{encode, prepare_tokenizer, TokenizedInput, TokenizerSettings};
use super::{InferenceBackend, ModelInfo};

const VALIDATION_TEXT: &str = "validation test";

/// ONNX Runtime session options and output names
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeOptions {
    pub intra_threads: usize,
    pub use_cuda: bool,
    /// Output holding `[batch, seq_len, hidden]` states
    pub hidden_state_output: String,
    /// Output holding `[batch, num_labels]` logits
    pub logits_output: String,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            intra_threads: 4,
            use_cuda: false,
            hidden_state_output: "last_hidden_state".to_string(),
            logits_output: "logits".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputKind {
    HiddenState,
    Logits,
}

impl OutputKind {
    fn rank(self) -> usize {
        match self {
            OutputKind::HiddenState => 3,
            OutputKind::Logits => 2,
        }
    }
}

/// BERT-style model served by ONNX Runtime.
///
/// `Session::run` needs exclusive access, so the session sits behind a
/// mutex and concurrent requests take turns. The tokenizer and model
/// metadata are read-only after [`OnnxTextModel::load`].
pub struct OnnxTextModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    output_names: Vec<String>,
    feeds_token_type_ids: bool,
    options: RuntimeOptions,
    info: ModelInfo,
}

impl std::fmt::Debug for OnnxTextModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxTextModel")
            .field("info", &self.info)
            .field("output_names", &self.output_names)
            .field("feeds_token_type_ids", &self.feeds_token_type_ids)
            .finish_non_exhaustive()
    }
}

impl OnnxTextModel {
    /// Loads the ONNX graph and tokenizer, then runs one validation pass to
    /// learn the hidden size and class count.
    ///
    /// # Errors
    /// - Model or tokenizer file missing or invalid
    /// - ONNX Runtime initialization fails
    /// - The model exposes neither hidden states nor logits
    pub fn load(
        files: &ModelFiles,
        settings: TokenizerSettings,
        options: RuntimeOptions,
    ) -> Result<Self> {
        if !files.model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", files.model_path.display());
        }
        if !files.tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}",
                files.tokenizer_path.display()
            );
        }

        info!("Initializing ONNX text model {}", files.model_id);
        let session = build_session(&files.model_path, &options)?;

        let feeds_token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");
        let output_names: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect();
        debug!(
            "Model outputs: {:?}, token_type_ids input: {}",
            output_names, feeds_token_type_ids
        );

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        prepare_tokenizer(&mut tokenizer, settings)?;

        let labels = load_labels(files.config_path.as_deref());

        let mut model = Self {
            session: Mutex::new(session),
            tokenizer,
            output_names,
            feeds_token_type_ids,
            options,
            info: ModelInfo {
                model_id: files.model_id.clone(),
                hidden_size: None,
                num_labels: None,
                labels,
                max_length: settings.max_length,
            },
        };

        let input = encode(&model.tokenizer, VALIDATION_TEXT)?;
        model.info.hidden_size = match model.forward(&input, OutputKind::HiddenState) {
            Ok(hidden) => Some(hidden.shape()[2]),
            Err(e) => {
                warn!("Embeddings unavailable for {}: {:#}", files.model_id, e);
                None
            }
        };
        model.info.num_labels = match model.forward(&input, OutputKind::Logits) {
            Ok(logits) => Some(logits.shape()[1]),
            Err(e) => {
                warn!("Probabilities unavailable for {}: {:#}", files.model_id, e);
                None
            }
        };

        if model.info.hidden_size.is_none() && model.info.num_labels.is_none() {
            anyhow::bail!(
                "Model {} exposes neither hidden states nor logits (outputs: {:?})",
                files.model_id,
                model.output_names
            );
        }

        if let Some(num_labels) = model.info.num_labels {
            if !model.info.labels.is_empty() && model.info.labels.len() != num_labels {
                warn!(
                    "config.json lists {} labels but the model emits {} logits",
                    model.info.labels.len(),
                    num_labels
                );
            }
        }

        info!(
            "ONNX text model ready: hidden_size={:?}, num_labels={:?}",
            model.info.hidden_size, model.info.num_labels
        );
        Ok(model)
    }

    /// Runs the forward pass and returns the requested output, owned.
    ///
    /// The returned tensor has the rank of `kind`: 3 for hidden states and
    /// 2 for logits.
    fn forward(&self, input: &TokenizedInput, kind: OutputKind) -> Result<ArrayD<f32>> {
        let preferred = match kind {
            OutputKind::HiddenState => &self.options.hidden_state_output,
            OutputKind::Logits => &self.options.logits_output,
        };

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("ONNX session lock poisoned"))?;

        let outputs = if self.feeds_token_type_ids {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input.input_ids.clone())?,
                "attention_mask" => Value::from_array(input.attention_mask.clone())?,
                "token_type_ids" => Value::from_array(input.token_type_ids.clone())?
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input.input_ids.clone())?,
                "attention_mask" => Value::from_array(input.attention_mask.clone())?
            ])?
        };

        let index = match self.output_names.iter().position(|name| name == preferred) {
            Some(index) => index,
            None => (0..self.output_names.len())
                .find(|&i| {
                    outputs[i]
                        .try_extract_array::<f32>()
                        .map(|array| array.ndim() == kind.rank())
                        .unwrap_or(false)
                })
                .with_context(|| {
                    format!(
                        "Model has no `{}` output (outputs: {:?})",
                        preferred, self.output_names
                    )
                })?,
        };

        let array = outputs[index]
            .try_extract_array::<f32>()
            .with_context(|| format!("Failed to extract output `{}`", self.output_names[index]))?
            .to_owned();

        if array.ndim() != kind.rank() {
            anyhow::bail!(
                "Output `{}` has shape {:?}, expected rank {}",
                self.output_names[index],
                array.shape(),
                kind.rank()
            );
        }

        Ok(array)
    }

    pub fn tokenize(&self, text: &str) -> Result<TokenizedInput> {
        let input = encode(&self.tokenizer, text)?;
        debug!(
            "Tokenized {} chars into {} tokens",
            text.chars().count(),
            input.token_count()
        );
        Ok(input)
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}

impl InferenceBackend for OnnxTextModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = self.tokenize(text)?;
        let hidden = self
            .forward(&input, OutputKind::HiddenState)?
            .into_dimensionality::<Ix3>()
            .context("Hidden state is not [batch, seq_len, hidden]")?;

        let pooled = mean_pool(hidden.view(), input.attention_mask.view())?;
        squeeze_batch(pooled)
    }

    fn probabilities(&self, text: &str) -> Result<Vec<Vec<f32>>> {
        let input = self.tokenize(text)?;
        let logits = self
            .forward(&input, OutputKind::Logits)?
            .into_dimensionality::<Ix2>()
            .context("Logits are not [batch, num_labels]")?;

        Ok(into_rows(softmax_rows(logits.view())))
    }

    fn info(&self) -> ModelInfo {
        self.info.clone()
    }
}

/// Builds the ONNX Runtime session, trying CUDA first when requested.
fn build_session(model_path: &Path, options: &RuntimeOptions) -> Result<Session> {
    if options.use_cuda {
        info!("Attempting CUDA execution provider...");
        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(options.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path);

        match cuda_result {
            Ok(session) => {
                info!("CUDA execution provider initialized");
                return Ok(session);
            }
            Err(e) => {
                warn!("CUDA execution provider failed: {}", e);
                warn!("Falling back to CPU execution provider");
            }
        }
    }

    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(options.intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
}
