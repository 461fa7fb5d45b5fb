//! PostgreSQL 连接管理

use inventory_errors::{AppError, AppResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::PostgresConfig;
use crate::retry::with_retry;

/// 创建 PostgreSQL 连接池
///
/// 连接池会自动替换断开的连接，调用方无需自行重连
pub async fn create_pool(config: &PostgresConfig) -> AppResult<PgPool> {
    let pool = &config.pool;
    PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .acquire_timeout(pool.acquire_timeout)
        .idle_timeout(pool.idle_timeout)
        .test_before_acquire(true)
        .connect_with(config.connect_options())
        .await
        .map_err(|e| AppError::database(format!("Failed to create pool: {}", e)))
}

/// 按配置的重试策略创建连接池，全部失败时返回最后一次错误
pub async fn connect_with_retry(config: &PostgresConfig) -> AppResult<PgPool> {
    let pool = with_retry(&config.retry, "PostgreSQL connection", || create_pool(config)).await?;
    info!(
        target_db = %config.display_target(),
        max_connections = config.pool.max_connections,
        "PostgreSQL connection pool created"
    );
    Ok(pool)
}

/// 检查数据库连接
pub async fn check_connection(pool: &PgPool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Database health check failed: {}", e)))?;
    Ok(())
}
