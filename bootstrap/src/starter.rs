//! 服务启动器
//!
//! 提供统一的服务启动模式

use axum::Router;
use inventory_config::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 1. 加载 `.env` 与分层配置
/// 2. 初始化运行时（日志）
/// 3. 创建基础设施资源（数据库连接池带重试）
/// 4. 调用用户提供的闭包构建路由
/// 5. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     inventory_bootstrap::run("config", |infra| build_router(infra)).await
/// }
/// ```
pub async fn run<F>(config_dir: &str, router_builder: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&Infrastructure) -> Router,
{
    dotenvy::dotenv().ok();

    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);
    info!("Starting {} service", config.app_name);

    // 3. 创建基础设施
    let infra = Infrastructure::from_config(config).await?;

    // 4. 构建路由
    let app = router_builder(&infra);

    // 5. 启动服务器
    let addr = infra.config().listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    infra.close().await;
    info!("Service stopped");

    Ok(())
}
