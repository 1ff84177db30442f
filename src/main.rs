// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::{env, sync::Arc};
use text_inference_node::{
    api::{start_server, AppState},
    config::ServiceConfig,
    inference::OnnxTextModel,
    version,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting {}", version::get_version_string());

    let config = ServiceConfig::parse();
    config.validate()?;
    let addr = config.listen_addr()?;

    // Model and tokenizer are loaded once and shared read-only by every request
    let source = config.model_source();
    info!("Resolving model {}", source.model_id());
    let files = source
        .resolve()
        .await
        .with_context(|| format!("Failed to resolve model {}", source.model_id()))?;

    let settings = config.tokenizer_settings();
    let options = config.runtime_options();
    let model = tokio::task::spawn_blocking(move || OnnxTextModel::load(&files, settings, options))
        .await
        .context("Model loading task failed")??;

    let info = model.model_info();
    info!(
        "Model {} loaded (hidden_size={:?}, num_labels={:?}, max_length={})",
        info.model_id, info.hidden_size, info.num_labels, info.max_length
    );
    if !info.labels.is_empty() {
        info!("Labels: {}", info.labels.join(", "));
    }

    let state = AppState::new(Arc::new(model));
    start_server(addr, state).await?;

    info!("Goodbye");
    Ok(())
}
