// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// One problem found while validating a request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// `detail` is free text for internal failures and a list of issues for
/// validation failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: ErrorDetail,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body rejected before reaching the model
    #[error("Validation error ({kind}): {message}")]
    Validation {
        status: StatusCode,
        kind: &'static str,
        message: String,
    },
    /// Any failure during tokenization or inference
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let detail = match self {
            ApiError::Validation { kind, message, .. } => {
                ErrorDetail::Validation(vec![ValidationIssue {
                    loc: vec!["body".to_string()],
                    msg: message.clone(),
                    kind: kind.to_string(),
                }])
            }
            ApiError::Internal(message) => ErrorDetail::Message(message.clone()),
        };
        ErrorResponse { detail }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "value_error",
            JsonRejection::JsonSyntaxError(_) => "json_invalid",
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "body_error",
        };
        let status = match &rejection {
            JsonRejection::JsonDataError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => rejection.status(),
        };
        ApiError::Validation {
            status,
            kind,
            message: rejection.body_text(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Inference task failed: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Validation { .. } => warn!("Rejected request: {}", self),
            ApiError::Internal(_) => error!("Request failed: {}", self),
        }
        (status, Json(self.to_response())).into_response()
    }
}
