// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use axum::Json;

use crate::common::ApiResult;
use crate::transports::http::server::ApiState;
use crate::v1::HealthCheckResponse;

/// `GET /v1/system/health_check`
pub async fn get_health_check(State(state): State<ApiState>) -> ApiResult<Json<HealthCheckResponse>> {
    Ok(Json(HealthCheckResponse::healthy(state.model.n_features())))
}
