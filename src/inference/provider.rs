// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Pretrained model provider
//!
//! Turns a model identifier into local paths for the ONNX graph, the
//! tokenizer and (optionally) the HuggingFace `config.json`. Files come
//! either from a local directory or from the HuggingFace Hub cache.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const ONNX_CANDIDATES: &[&str] = &["onnx/model.onnx", "model.onnx"];
const TOKENIZER_FILE: &str = "tokenizer.json";
const CONFIG_FILE: &str = "config.json";

/// Where model files are read from
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// Directory containing `model.onnx` (or `onnx/model.onnx`) and `tokenizer.json`
    LocalDir(PathBuf),
    /// HuggingFace Hub repository, downloaded into the local hf-hub cache
    Hub { repo_id: String },
}

/// Resolved on-disk model files
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFiles {
    /// Identifier reported in `ModelInfo`
    pub model_id: String,
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl ModelSource {
    pub fn model_id(&self) -> String {
        match self {
            ModelSource::LocalDir(dir) => dir.display().to_string(),
            ModelSource::Hub { repo_id } => repo_id.clone(),
        }
    }

    pub async fn resolve(&self) -> Result<ModelFiles> {
        match self {
            ModelSource::LocalDir(dir) => resolve_local(dir),
            ModelSource::Hub { repo_id } => resolve_hub(repo_id).await,
        }
    }
}

fn resolve_local(dir: &Path) -> Result<ModelFiles> {
    if !dir.is_dir() {
        anyhow::bail!("Model directory not found: {}", dir.display());
    }

    let model_path = ONNX_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|path| path.exists())
        .with_context(|| format!("ONNX model file not found in {}", dir.display()))?;

    let tokenizer_path = dir.join(TOKENIZER_FILE);
    if !tokenizer_path.exists() {
        anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
    }

    let config_path = Some(dir.join(CONFIG_FILE)).filter(|path| path.exists());

    Ok(ModelFiles {
        model_id: dir.display().to_string(),
        model_path,
        tokenizer_path,
        config_path,
    })
}

async fn resolve_hub(repo_id: &str) -> Result<ModelFiles> {
    info!("Resolving model {} from HuggingFace Hub", repo_id);

    let api = hf_hub::api::tokio::Api::new().context("Failed to create HuggingFace Hub client")?;
    let repo = api.model(repo_id.to_string());

    let mut model_path = None;
    for candidate in ONNX_CANDIDATES {
        match repo.get(candidate).await {
            Ok(path) => {
                model_path = Some(path);
                break;
            }
            Err(e) => debug!("{} has no {}: {}", repo_id, candidate, e),
        }
    }
    let model_path =
        model_path.with_context(|| format!("No ONNX export found in repository {}", repo_id))?;

    let tokenizer_path = repo
        .get(TOKENIZER_FILE)
        .await
        .with_context(|| format!("Failed to fetch {} from {}", TOKENIZER_FILE, repo_id))?;

    let config_path = match repo.get(CONFIG_FILE).await {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("{} has no {}: {}", repo_id, CONFIG_FILE, e);
            None
        }
    };

    Ok(ModelFiles {
        model_id: repo_id.to_string(),
        model_path,
        tokenizer_path,
        config_path,
    })
}

#[derive(Deserialize)]
struct ModelConfigFile {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Reads class names from a HuggingFace `config.json`, ordered by class id.
///
/// A missing or unreadable file yields no labels.
pub fn load_labels(config_path: Option<&Path>) -> Vec<String> {
    let Some(path) = config_path else {
        return Vec::new();
    };

    let parsed = std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|raw| serde_json::from_str::<ModelConfigFile>(&raw).map_err(Into::into));

    let config = match parsed {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring unreadable model config {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut labels: Vec<(usize, String)> = config
        .id2label
        .into_iter()
        .filter_map(|(id, label)| id.parse::<usize>().ok().map(|id| (id, label)))
        .collect();
    labels.sort_by_key(|(id, _)| *id);
    labels.into_iter().map(|(_, label)| label).collect()
}
