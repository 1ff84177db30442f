// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Post-processing of raw model outputs
//!
//! - Mean pooling of `[batch, seq_len, hidden]` hidden states into
//!   `[batch, hidden]` sentence embeddings, weighted by the attention mask
//! - Row-wise softmax of `[batch, num_labels]` logits

use anyhow::{ensure, Result};
use ndarray::{s, Array2, ArrayView2, ArrayView3, Axis};

/// Averages hidden states over the token axis.
///
/// Only positions whose attention mask is non-zero contribute, so padding
/// never shifts the mean. An unpadded input gives the plain average.
pub fn mean_pool(hidden: ArrayView3<f32>, attention_mask: ArrayView2<i64>) -> Result<Array2<f32>> {
    let (batch, seq_len, hidden_dim) = hidden.dim();
    ensure!(
        attention_mask.dim() == (batch, seq_len),
        "attention mask shape {:?} does not match hidden state shape {:?}",
        attention_mask.dim(),
        hidden.dim()
    );

    let mut pooled = Array2::<f32>::zeros((batch, hidden_dim));

    for b in 0..batch {
        let mut sum_mask = 0.0f32;
        let mut row = pooled.row_mut(b);

        for t in 0..seq_len {
            let mask_value = attention_mask[[b, t]] as f32;
            if mask_value == 0.0 {
                continue;
            }
            sum_mask += mask_value;
            row.scaled_add(mask_value, &hidden.slice(s![b, t, ..]));
        }

        let divisor = sum_mask.max(1e-9);
        row.mapv_inplace(|v| v / divisor);
    }

    Ok(pooled)
}

/// Numerically stable softmax along the class axis of each row.
pub fn softmax_rows(logits: ArrayView2<f32>) -> Array2<f32> {
    let mut probs = logits.to_owned();

    for mut row in probs.axis_iter_mut(Axis(0)) {
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        row.mapv_inplace(|v| (v - max).exp());
        let sum: f32 = row.sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }

    probs
}

/// Drops a singleton batch axis: `[1, hidden]` becomes `hidden` values.
///
/// Each request encodes one text, so any other batch size is an error.
pub fn squeeze_batch(pooled: Array2<f32>) -> Result<Vec<f32>> {
    ensure!(
        pooled.nrows() == 1,
        "expected a single pooled row, got {}",
        pooled.nrows()
    );
    Ok(pooled.row(0).to_vec())
}

/// Converts `[batch, n]` into nested rows.
pub fn into_rows(values: Array2<f32>) -> Vec<Vec<f32>> {
    values.outer_iter().map(|row| row.to_vec()).collect()
}
