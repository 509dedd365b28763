// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

// HTTP server (Axum): routing, tracing middleware and shared state

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{Request, Response, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use labkit_classifier::TrainedModel;

use crate::common::ApiError;
use crate::endpoints::{form, model, predict, system};

/// State shared by every handler; the model is read-only after training.
#[derive(Clone)]
pub struct ApiState {
    pub model: Arc<TrainedModel>,
}

impl ApiState {
    pub fn new(model: TrainedModel) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

pub fn create_http_server(state: ApiState) -> Router {
    Router::new()
        .route("/", get(form::get_form))
        .route("/predict", post(form::post_form))
        .nest("/v1", create_v1_router())
        .fallback(not_found)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::span!(
                        target: "labkit_api",
                        tracing::Level::DEBUG,
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|request: &Request<_>, _span: &tracing::Span| {
                    tracing::debug!(target: "labkit_api", "Incoming request: {} {}", request.method(), request.uri());
                })
                .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
                    tracing::debug!(
                        target: "labkit_api",
                        "Response: status={}, latency={:?}",
                        response.status(),
                        latency
                    );
                }),
        )
}

/// Format: /v1/{module}/{snake_case_endpoint}
fn create_v1_router() -> Router<ApiState> {
    Router::new()
        .route("/predict", post(predict::post_predict))
        .route("/model/evaluation", get(model::get_evaluation))
        .route("/system/health_check", get(system::get_health_check))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::warn!(target: "labkit_api", "Unmatched request: {}", uri);
    ApiError::not_found(uri.path())
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(state: ApiState, addr: SocketAddr, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        target: "labkit_api",
        "Prediction server listening on http://{}",
        listener.local_addr()?
    );
    axum::serve(listener, create_http_server(state))
        .with_graceful_shutdown(shutdown)
        .await
}
