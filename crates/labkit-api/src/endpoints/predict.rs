// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::common::{ApiError, ApiResult};
use crate::transports::http::server::ApiState;
use crate::v1::{PredictRequest, PredictResponse};

/// `POST /v1/predict`
///
/// Accepts `{"features": [30 numbers]}` or one named entry per feature column.
/// Values are not range-checked.
pub async fn post_predict(
    State(state): State<ApiState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<Json<PredictResponse>> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::invalid_input(format!("Invalid prediction request: {}", rejection.body_text()))
    })?;

    let features = request.into_features(state.model.feature_names())?;
    let prediction = state.model.predict_slice(&features)?;
    tracing::debug!(
        target: "labkit_api",
        "Predicted {} ({:.2}%)",
        prediction.diagnosis,
        prediction.confidence
    );
    Ok(Json(prediction.into()))
}
