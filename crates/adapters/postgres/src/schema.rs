//! inventory 表结构

use inventory_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::info;

/// 建表语句，可重复执行
pub const CREATE_INVENTORY_TABLE: &str = "CREATE TABLE IF NOT EXISTS inventory (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    quantity INTEGER NOT NULL CHECK (quantity >= 0)
)";

/// 确保 inventory 表存在
pub async fn ensure_schema(pool: &PgPool) -> AppResult<()> {
    sqlx::query(CREATE_INVENTORY_TABLE)
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create inventory table: {}", e)))?;

    info!("Inventory schema ready");
    Ok(())
}
