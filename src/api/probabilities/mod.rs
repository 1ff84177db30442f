// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Probabilities API Module
//!
//! POST /probabilities/ returns softmax class probabilities computed from
//! the loaded model's classification logits.

pub mod handler;
pub mod response;

pub use handler::probabilities_handler;
pub use response::ProbabilitiesResponse;
