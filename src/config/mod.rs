// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Every setting can come from a command-line flag or an environment
//! variable (a `.env` file is loaded by `main` before parsing).

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::inference::{ModelSource, RuntimeOptions, TokenizerSettings};

/// Default HuggingFace model identifier
pub const DEFAULT_MODEL_ID: &str = "bert-base-uncased";

/// Default token limit applied by truncation
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// Text inference node configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "text-inference-node")]
#[command(version)]
#[command(about = "Serves BERT-style embeddings and class probabilities over HTTP", long_about = None)]
pub struct ServiceConfig {
    /// Interface to bind the HTTP server to
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,

    /// HuggingFace Hub repository id of the model
    #[arg(long, env = "MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub model_id: String,

    /// Local directory holding model.onnx and tokenizer.json (skips the Hub)
    #[arg(long, env = "MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Maximum number of tokens per request; longer input is truncated
    #[arg(long, env = "MAX_TOKENS", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// ONNX Runtime intra-op thread count
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Try the CUDA execution provider before falling back to CPU
    #[arg(long, env = "USE_CUDA")]
    pub use_cuda: bool,

    /// Name of the model output holding the last hidden state
    #[arg(long, env = "HIDDEN_STATE_OUTPUT", default_value = "last_hidden_state")]
    pub hidden_state_output: String,

    /// Name of the model output holding classification logits
    #[arg(long, env = "LOGITS_OUTPUT", default_value = "logits")]
    pub logits_output: String,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(anyhow!("max_length must be greater than 0"));
        }
        if self.intra_threads == 0 {
            return Err(anyhow!("intra_threads must be greater than 0"));
        }
        if self.model_id.trim().is_empty() && self.model_dir.is_none() {
            return Err(anyhow!("either model_id or model_dir must be set"));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid listen host: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn model_source(&self) -> ModelSource {
        match &self.model_dir {
            Some(dir) => ModelSource::LocalDir(dir.clone()),
            None => ModelSource::Hub {
                repo_id: self.model_id.clone(),
            },
        }
    }

    pub fn tokenizer_settings(&self) -> TokenizerSettings {
        TokenizerSettings {
            max_length: self.max_length,
        }
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            intra_threads: self.intra_threads,
            use_cuda: self.use_cuda,
            hidden_state_output: self.hidden_state_output.clone(),
            logits_output: self.logits_output.clone(),
        }
    }
}
