// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use labkit_classifier::ClassifierError;

/// API error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    NotFound,
    InvalidInput,
    Internal,
}

impl ApiErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ApiErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body in the FastAPI shape: `{"detail": "..."}`
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ApiErrorCode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl ApiError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            code: None,
            details: None,
        }
    }

    pub fn with_code(mut self, code: ApiErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(message).with_code(ApiErrorCode::InvalidInput)
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(format!("Route '{}' not found", path))
            .with_code(ApiErrorCode::NotFound)
            .with_details(serde_json::json!({ "path": path }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message).with_code(ApiErrorCode::Internal)
    }

    pub fn status(&self) -> StatusCode {
        self.code
            .map(ApiErrorCode::status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::FeatureCount { expected, found } => ApiError::invalid_input(format!(
                "Expected {} features, got {}",
                expected, found
            ))
            .with_details(serde_json::json!({ "expected": expected, "found": found })),
            ClassifierError::InvalidParameter(msg) => ApiError::invalid_input(msg),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(target: "labkit_api", "{} {}", status, self.detail);
        } else {
            tracing::debug!(target: "labkit_api", "{} {}", status, self.detail);
        }
        (status, Json(self)).into_response()
    }
}
