//! 健康检查与 metrics 端点

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use inventory_errors::AppError;
use inventory_telemetry::HealthStatus;

use super::dto::HealthResponse;
use crate::state::AppState;

/// 固定的存活响应
pub const HEALTH_MESSAGE: &str = "Server is running";

/// `GET /health`，不访问数据库
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
    })
}

/// `GET /ready`，数据库不可达时返回 503
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let mut status = HealthStatus::new();
    match state.repository.ping().await {
        Ok(()) => status.add_check("database", true, None),
        Err(e) => status.add_check("database", false, Some(e.to_string())),
    }

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// `GET /metrics`
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => AppError::not_found("Metrics recorder is not installed").into_response(),
    }
}
