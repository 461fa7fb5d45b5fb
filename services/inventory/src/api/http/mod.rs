//! HTTP 接口

mod dto;
mod handlers;
mod health;
mod middleware;

pub use dto::*;

use axum::http::{HeaderValue, Method, header};
use axum::routing::{delete, get, post};
use axum::{Router, middleware::from_fn};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// 构建全部路由
///
/// `cors_origins` 为空时允许任意源
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::render_metrics))
        .route("/inventory", get(handlers::list_items))
        .route("/search", get(handlers::search_by_name))
        .route("/search/quantity", get(handlers::search_by_quantity))
        .route("/inventory/add", post(handlers::add_item))
        .route("/inventory/delete", delete(handlers::delete_item))
        .fallback(handlers::not_found)
        .layer(from_fn(middleware::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        return base.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}
