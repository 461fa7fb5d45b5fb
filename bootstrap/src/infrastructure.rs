//! 基础设施资源管理
//!
//! 连接池在启动时创建一次，之后通过依赖注入传给各个 handler

use std::time::Duration;

use inventory_adapter_postgres::{
    PostgresConfig, PostgresInventoryRepository, RetryConfig, SslMode, connect_with_retry,
    ensure_schema,
};
use inventory_config::{AppConfig, RetrySettings};
use inventory_errors::{AppError, AppResult};
use inventory_telemetry::init_metrics;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{info, warn};

/// 基础设施资源容器
pub struct Infrastructure {
    /// 应用配置
    config: AppConfig,
    /// PostgreSQL 连接池
    postgres_pool: PgPool,
    /// 只读查询的重试策略
    retry: RetryConfig,
    /// Prometheus 句柄（未启用 metrics 时为 None）
    metrics: Option<PrometheusHandle>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（连接带重试，全部失败即启动失败）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry = retry_config(&config.retry);
        let pg_config = postgres_config(&config)?.with_retry(retry.clone());

        let postgres_pool = connect_with_retry(&pg_config).await?;

        if config.database.ensure_schema {
            ensure_schema(&postgres_pool).await?;
        }

        let metrics = if config.telemetry.metrics {
            match init_metrics() {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
                    None
                }
            }
        } else {
            None
        };

        info!(metrics_enabled = metrics.is_some(), "Infrastructure ready");

        Ok(Self {
            config,
            postgres_pool,
            retry,
            metrics,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    pub fn metrics_handle(&self) -> Option<PrometheusHandle> {
        self.metrics.clone()
    }

    /// 按配置构建库存仓储
    pub fn inventory_repository(&self) -> PostgresInventoryRepository {
        PostgresInventoryRepository::new(self.postgres_pool())
            .with_retry(self.retry.clone())
            .with_case_insensitive_search(self.config.search.case_insensitive)
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.postgres_pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}

/// 从应用配置构建 PostgreSQL 配置，`ssl_mode` 无法识别时启动失败
pub fn postgres_config(config: &AppConfig) -> AppResult<PostgresConfig> {
    let db = &config.database;
    let ssl_mode: SslMode = db
        .ssl_mode
        .parse()
        .map_err(|e: String| AppError::validation(format!("Invalid database config: {}", e)))?;

    Ok(
        PostgresConfig::from_components(&db.host, db.port, &db.name, &db.username)
            .with_password(db.password.expose_secret().as_str())
            .with_ssl_mode(ssl_mode)
            .with_pool(1, db.max_connections)
            .with_acquire_timeout(Duration::from_secs(db.connect_timeout_secs))
            .with_application_name(&config.app_name),
    )
}

/// 从应用配置构建重试策略
pub fn retry_config(settings: &RetrySettings) -> RetryConfig {
    RetryConfig::new(
        settings.max_attempts,
        Duration::from_millis(settings.initial_delay_ms),
        Duration::from_millis(settings.max_delay_ms),
    )
}
