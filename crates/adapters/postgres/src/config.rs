//! PostgreSQL 连接配置
//!
//! 密码不拼进 URL，直接交给 `PgConnectOptions`，因此无需转义特殊字符

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::retry::RetryConfig;

/// SSL 模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        })
    }
}

impl FromStr for SslMode {
    type Err = String;

    /// 接受 libpq `sslmode` 的写法，不区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" => Ok(SslMode::VerifyCa),
            "verify-full" => Ok(SslMode::VerifyFull),
            other => Err(format!("Unknown ssl_mode `{}`", other)),
        }
    }
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
            SslMode::VerifyCa => PgSslMode::VerifyCa,
            SslMode::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

/// 连接池参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    /// 等待空闲连接的上限，超时即请求失败
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

#[derive(Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: Option<String>,
    pub ssl_mode: SslMode,
    /// 出现在 `pg_stat_activity.application_name`
    pub application_name: Option<String>,
    pub pool: PoolSettings,
    /// 启动建连和只读查询共用
    pub retry: RetryConfig,
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("target", &self.display_target())
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("application_name", &self.application_name)
            .field("pool", &self.pool)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from_components("localhost", 5432, "inventory", "postgres")
    }
}

impl PostgresConfig {
    pub fn from_components(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            username: username.into(),
            password: None,
            ssl_mode: SslMode::default(),
            application_name: None,
            pool: PoolSettings::default(),
            retry: RetryConfig::default(),
        }
    }

    /// 空字符串表示不使用密码
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.password = (!password.is_empty()).then_some(password);
        self
    }

    pub fn with_ssl_mode(mut self, mode: SslMode) -> Self {
        self.ssl_mode = mode;
        self
    }

    /// 设置连接数范围，`min` 不会超过 `max`
    pub fn with_pool(mut self, min: u32, max: u32) -> Self {
        self.pool.max_connections = max;
        self.pool.min_connections = min.min(max);
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.pool.acquire_timeout = timeout;
        self
    }

    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .ssl_mode(self.ssl_mode.into());

        let options = match &self.password {
            Some(password) => options.password(password),
            None => options,
        };
        match &self.application_name {
            Some(name) => options.application_name(name),
            None => options,
        }
    }

    /// 日志里展示的连接目标，不含密码
    pub fn display_target(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}?sslmode={}",
            self.username, self.host, self.port, self.database, self.ssl_mode
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_local_inventory() {
        let config = PostgresConfig::default();
        assert_eq!(
            config.display_target(),
            "postgres://postgres@localhost:5432/inventory?sslmode=prefer"
        );
        assert_eq!(config.pool, PoolSettings::default());
        assert!(config.password.is_none());
    }

    #[test]
    fn test_password_with_url_metacharacters_reaches_options() {
        let config = PostgresConfig::from_components("db.internal", 6432, "stock", "clerk")
            .with_password("p@ss/w:rd?")
            .with_ssl_mode(SslMode::Require)
            .with_application_name("inventory-service");

        let options = config.connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_database(), Some("stock"));
        assert_eq!(options.get_username(), "clerk");
        assert_eq!(options.get_application_name(), Some("inventory-service"));
        assert_eq!(config.password.as_deref(), Some("p@ss/w:rd?"));
    }

    #[test]
    fn test_blank_password_means_none() {
        assert!(PostgresConfig::default().with_password("").password.is_none());
    }

    #[test]
    fn test_password_never_printed() {
        let config = PostgresConfig::default().with_password("hunter2");

        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!config.display_target().contains("hunter2"));
    }

    #[test]
    fn test_pool_bounds() {
        let config = PostgresConfig::default()
            .with_pool(8, 4)
            .with_acquire_timeout(Duration::from_secs(2));

        assert_eq!(config.pool.min_connections, 4);
        assert_eq!(config.pool.max_connections, 4);
        assert_eq!(config.pool.acquire_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_ssl_mode_parse() {
        assert_eq!("require".parse::<SslMode>(), Ok(SslMode::Require));
        assert_eq!(" Verify-Full ".parse::<SslMode>(), Ok(SslMode::VerifyFull));
        assert!("allow-ish".parse::<SslMode>().is_err());

        let config = PostgresConfig::default().with_ssl_mode(SslMode::Disable);
        assert!(config.display_target().ends_with("?sslmode=disable"));
    }

    #[test]
    fn test_ssl_mode_names() {
        let names: Vec<String> = [
            SslMode::Disable,
            SslMode::Prefer,
            SslMode::Require,
            SslMode::VerifyCa,
            SslMode::VerifyFull,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(
            names,
            ["disable", "prefer", "require", "verify-ca", "verify-full"]
        );
    }
}
