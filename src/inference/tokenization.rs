// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tokenization with padding and truncation
//!
//! A single request text becomes a `[1, seq_len]` batch of input ids,
//! attention mask and token type ids, with `seq_len <= max_length`.

use anyhow::{anyhow, Context, Result};
use ndarray::Array2;
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};

use crate::config::DEFAULT_MAX_LENGTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerSettings {
    /// Upper bound on tokens per input, special tokens included
    pub max_length: usize,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Model-ready tensors for one request
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedInput {
    pub input_ids: Array2<i64>,
    pub attention_mask: Array2<i64>,
    pub token_type_ids: Array2<i64>,
}

impl TokenizedInput {
    /// Tokens in the (only) sequence, padding included
    pub fn seq_len(&self) -> usize {
        self.input_ids.ncols()
    }

    /// Tokens the attention mask marks as real
    pub fn token_count(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m != 0).count()
    }
}

/// Enables longest-first truncation at `max_length` and batch-longest padding.
pub fn prepare_tokenizer(tokenizer: &mut Tokenizer, settings: TokenizerSettings) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: settings.max_length,
            ..Default::default()
        }))
        .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;
    tokenizer.with_padding(Some(PaddingParams::default()));
    Ok(())
}

/// Encodes `text` with special tokens into a batch of one.
///
/// Over-length text is truncated, never rejected. Empty text still yields
/// the model's special tokens.
pub fn encode(tokenizer: &Tokenizer, text: &str) -> Result<TokenizedInput> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();
    let mut token_type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| t as i64).collect();
    if token_type_ids.len() != input_ids.len() {
        token_type_ids = vec![0i64; input_ids.len()];
    }

    let seq_len = input_ids.len();
    Ok(TokenizedInput {
        input_ids: Array2::from_shape_vec((1, seq_len), input_ids)
            .context("Failed to create input_ids array")?,
        attention_mask: Array2::from_shape_vec((1, seq_len), attention_mask)
            .context("Failed to create attention_mask array")?,
        token_type_ids: Array2::from_shape_vec((1, seq_len), token_type_ids)
            .context("Failed to create token_type_ids array")?,
    })
}
