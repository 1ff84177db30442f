// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embeddings;
pub mod errors;
pub mod http_server;
pub mod probabilities;
pub mod request;

pub use embeddings::{embeddings_handler, EmbeddingsResponse};
pub use errors::{ApiError, ErrorDetail, ErrorResponse, ValidationIssue};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
pub use probabilities::{probabilities_handler, ProbabilitiesResponse};
pub use request::TextRequest;
