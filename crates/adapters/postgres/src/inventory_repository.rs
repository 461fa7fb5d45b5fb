//! PostgreSQL 库存仓储实现

use std::time::Instant;

use async_trait::async_trait;
use inventory_domain_core::{
    DeleteOutcome, InsertOutcome, InventoryItem, ItemId, NewInventoryItem, Quantity,
};
use inventory_errors::{AppError, AppResult};
use inventory_ports::InventoryRepository;
use inventory_telemetry::record_db_query;
use sqlx::PgPool;
use tracing::debug;

use crate::retry::{RetryConfig, is_sqlx_retryable, with_conditional_retry};

const SELECT_ALL: &str = "SELECT id, name, quantity FROM inventory ORDER BY id";
const SELECT_BY_NAME: &str =
    "SELECT id, name, quantity FROM inventory WHERE name LIKE $1 ESCAPE '\\' ORDER BY id";
const SELECT_BY_NAME_CI: &str =
    "SELECT id, name, quantity FROM inventory WHERE name ILIKE $1 ESCAPE '\\' ORDER BY id";
const SELECT_BY_QUANTITY: &str =
    "SELECT id, name, quantity FROM inventory WHERE quantity = $1 ORDER BY id";
const INSERT: &str = "INSERT INTO inventory (name, quantity) VALUES ($1, $2) RETURNING id";
const DELETE: &str = "DELETE FROM inventory WHERE id = $1";

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: i64,
    name: String,
    quantity: i32,
}

impl TryFrom<InventoryRow> for InventoryItem {
    type Error = AppError;

    fn try_from(row: InventoryRow) -> AppResult<Self> {
        let quantity = Quantity::new(row.quantity.into()).map_err(|_| {
            AppError::database(format!(
                "Row {} has invalid quantity {}",
                row.id, row.quantity
            ))
        })?;
        Ok(InventoryItem::new(ItemId(row.id), row.name, quantity))
    }
}

/// 把搜索词转为 LIKE 子串模式，通配符按字面匹配
pub fn substring_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub struct PostgresInventoryRepository {
    pool: PgPool,
    retry: RetryConfig,
    case_insensitive: bool,
}

impl PostgresInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            retry: RetryConfig::default(),
            case_insensitive: false,
        }
    }

    /// 设置只读查询的重试策略
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// 名称搜索忽略大小写（ILIKE）
    pub fn with_case_insensitive_search(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 执行只读查询，瞬时错误按策略重试
    async fn fetch_rows<'a>(
        &'a self,
        operation: &'static str,
        sql: &'static str,
        bind: Bind<'a>,
    ) -> AppResult<Vec<InventoryItem>> {
        let started = Instant::now();
        let result = with_conditional_retry(
            &self.retry,
            operation,
            || {
                let query = sqlx::query_as::<_, InventoryRow>(sql);
                let query = match bind {
                    Bind::None => query,
                    Bind::Text(value) => query.bind(value),
                    Bind::Int(value) => query.bind(value),
                };
                query.fetch_all(&self.pool)
            },
            is_sqlx_retryable,
        )
        .await;
        record_db_query(operation, elapsed_ms(started), result.is_ok());

        let rows = result.map_err(|e| {
            AppError::database(format!("Failed to {}: {}", operation.replace('_', " "), e))
        })?;
        debug!(operation, rows = rows.len(), "Inventory query finished");

        rows.into_iter().map(InventoryItem::try_from).collect()
    }
}

#[derive(Clone, Copy)]
enum Bind<'a> {
    None,
    Text(&'a str),
    Int(i32),
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[async_trait]
impl InventoryRepository for PostgresInventoryRepository {
    async fn list_all(&self) -> AppResult<Vec<InventoryItem>> {
        self.fetch_rows("list_all", SELECT_ALL, Bind::None).await
    }

    async fn search_by_name(&self, term: &str) -> AppResult<Vec<InventoryItem>> {
        let pattern = substring_pattern(term);
        let sql = if self.case_insensitive {
            SELECT_BY_NAME_CI
        } else {
            SELECT_BY_NAME
        };
        self.fetch_rows("search_by_name", sql, Bind::Text(&pattern))
            .await
    }

    async fn search_by_quantity(&self, quantity: Quantity) -> AppResult<Vec<InventoryItem>> {
        self.fetch_rows(
            "search_by_quantity",
            SELECT_BY_QUANTITY,
            Bind::Int(quantity.value()),
        )
        .await
    }

    async fn insert(&self, item: &NewInventoryItem) -> AppResult<InsertOutcome> {
        // 插入不幂等，失败不重试
        let started = Instant::now();
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(INSERT)
            .bind(item.name())
            .bind(item.quantity().value())
            .fetch_one(&self.pool)
            .await;
        record_db_query("insert", elapsed_ms(started), result.is_ok());

        let (id,) = result
            .map_err(|e| AppError::database(format!("Failed to insert item: {}", e)))?;
        Ok(InsertOutcome::inserted(ItemId(id)))
    }

    async fn delete(&self, id: ItemId) -> AppResult<DeleteOutcome> {
        // 断连前可能已提交，重试会报成 0 行，不重试
        let started = Instant::now();
        let result = sqlx::query(DELETE)
            .bind(id.value())
            .execute(&self.pool)
            .await;
        record_db_query("delete", elapsed_ms(started), result.is_ok());

        let done = result.map_err(|e| AppError::database(format!("Failed to delete item: {}", e)))?;
        Ok(DeleteOutcome {
            affected_rows: done.rows_affected(),
        })
    }

    async fn ping(&self) -> AppResult<()> {
        crate::connection::check_connection(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PostgresConfig, SslMode};
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    /// 指向无人监听的端口，退避远长于取连接超时
    fn unreachable_repository() -> PostgresInventoryRepository {
        let config = PostgresConfig::from_components("127.0.0.1", 1, "inventory", "postgres")
            .with_ssl_mode(SslMode::Disable);
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(300))
            .connect_lazy_with(config.connect_options());
        PostgresInventoryRepository::new(pool).with_retry(RetryConfig::new(
            5,
            Duration::from_secs(2),
            Duration::from_secs(5),
        ))
    }

    #[tokio::test]
    async fn test_outage_fails_after_one_acquire_timeout() {
        let repo = unreachable_repository();

        let started = Instant::now();
        let err = repo.list_all().await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)), "{}", err);
        assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());

        let started = Instant::now();
        let err = repo.delete(ItemId(1)).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().starts_with("Database error: Failed to delete item"));
        assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    }

    #[test]
    fn test_substring_pattern_escapes_wildcards() {
        assert_eq!(substring_pattern("Widget"), "%Widget%");
        assert_eq!(substring_pattern("50%"), "%50\\%%");
        assert_eq!(substring_pattern("a_b"), "%a\\_b%");
        assert_eq!(substring_pattern("c:\\tmp"), "%c:\\\\tmp%");
        assert_eq!(substring_pattern(""), "%%");
    }

    #[test]
    fn test_row_with_negative_quantity_is_rejected() {
        let row = InventoryRow {
            id: 7,
            name: "Broken".to_string(),
            quantity: -2,
        };
        assert!(matches!(
            InventoryItem::try_from(row),
            Err(AppError::Database(_))
        ));
    }

    #[test]
    fn test_row_conversion() {
        let row = InventoryRow {
            id: 1,
            name: "Bolt".to_string(),
            quantity: 10,
        };
        let item = InventoryItem::try_from(row).unwrap();
        assert_eq!(item.id, ItemId(1));
        assert_eq!(item.quantity.value(), 10);
    }
}
