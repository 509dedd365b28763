// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

// Types shared by every endpoint

pub mod error;

pub use error::{ApiError, ApiErrorCode};

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
