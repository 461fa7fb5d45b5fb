//! 请求计量中间件

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use inventory_telemetry::record_http_request;
use tracing::error;

/// 记录每个请求的次数与耗时，5xx 额外输出错误日志
pub async fn track_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
    record_http_request(&method, &route, status.as_u16(), duration_ms);

    if status.is_server_error() {
        error!(%method, %route, status = status.as_u16(), "Request failed");
    }

    response
}
