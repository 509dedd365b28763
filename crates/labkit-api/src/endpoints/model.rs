// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use axum::Json;

use crate::common::ApiResult;
use crate::transports::http::server::ApiState;
use crate::v1::ModelEvaluationResponse;

/// `GET /v1/model/evaluation` - held-out accuracy and classification report
/// computed once at startup.
pub async fn get_evaluation(State(state): State<ApiState>) -> ApiResult<Json<ModelEvaluationResponse>> {
    let model = &state.model;
    Ok(Json(ModelEvaluationResponse::new(
        model.evaluation(),
        model.train_samples(),
        model.forest().n_trees(),
    )))
}
