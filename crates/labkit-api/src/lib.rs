// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # labkit-api
//!
//! HTTP surface for the tumor classifier: a browser form at `/` and JSON
//! endpoints under `/v1`. Handlers share one read-only [`TrainedModel`]
//! through [`ApiState`].
//!
//! [`TrainedModel`]: labkit_classifier::TrainedModel

pub mod common;
pub mod endpoints;
pub mod transports;
pub mod v1;

pub use common::{ApiError, ApiErrorCode, ApiResult};
pub use transports::http::{create_http_server, serve, ApiState};
