//! Inventory HTTP 服务入口

use inventory_service::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir =
        std::env::var("INVENTORY_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    inventory_bootstrap::run(&config_dir, |infra| {
        let mut state = AppState::new(infra.inventory_repository());
        if let Some(handle) = infra.metrics_handle() {
            state = state.with_metrics(handle);
        }
        build_router(state, &infra.config().server.cors_allowed_origins)
    })
    .await
}
