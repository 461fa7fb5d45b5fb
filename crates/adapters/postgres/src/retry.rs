//! 数据库操作的退避重试
//!
//! 启动时的建连对任何错误都重试；运行期只有只读查询在瞬时错误下重试

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// 指数退避策略
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// 总尝试次数，包含第一次
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100), Duration::from_secs(5))
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay,
            multiplier: 2.0,
        }
    }

    /// 只执行一次
    pub fn disabled() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// 第 `retry` 次重试前的等待时间（从 0 开始），不超过 `max_delay`
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let factor = self.multiplier.powi(retry.min(i32::MAX as u32) as i32);
        let nanos = self.initial_delay.as_nanos() as f64 * factor;
        if nanos >= self.max_delay.as_nanos() as f64 {
            self.max_delay
        } else {
            Duration::from_nanos(nanos as u64)
        }
    }

    /// 全部重试的等待序列，长度为 `max_attempts - 1`
    fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts.saturating_sub(1)).map(|retry| self.delay_for_attempt(retry))
    }
}

/// 对任何错误都重试，用于启动时建立连接
pub async fn with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    with_conditional_retry(config, operation_name, operation, |_| true).await
}

/// 只在 `should_retry` 认可时重试，返回最后一次错误
pub async fn with_conditional_retry<F, Fut, T, E, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut delays = config.delays();
    let mut attempt = 1;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Recovered after retry");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        let transient = should_retry(&error);
        let Some(delay) = delays.next().filter(|_| transient) else {
            warn!(
                operation = operation_name,
                attempt,
                transient,
                error = %error,
                "Giving up on database operation"
            );
            return Err(error);
        };

        warn!(
            operation = operation_name,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Database operation failed, backing off"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// 驱动或服务端返回的、通常几秒内自行恢复的错误文本
const TRANSIENT_MESSAGES: &[&str] = &[
    "connection refused",
    "connection reset",
    "timed out",
    "timeout",
    "broken pipe",
    "too many clients",
    "the database system is starting up",
    "the database system is shutting down",
    "terminating connection",
    "server closed the connection",
    "could not connect",
];

/// 按错误文本判断是否瞬时故障
pub fn looks_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_MESSAGES.iter().any(|m| message.contains(m))
}

/// SQLSTATE 中可重试的代码：08 连接异常、40001/40P01 事务冲突、53300 连接数耗尽、57P01..57P03 服务端关闭
fn transient_sqlstate(code: &str) -> bool {
    code.starts_with("08") || matches!(code, "40001" | "40P01" | "53300" | "57P01" | "57P02" | "57P03")
}

/// 判断 sqlx 错误是否值得在语句级重试
///
/// `PoolTimedOut` 表示已经等满 `acquire_timeout`，不再重试
pub fn is_sqlx_retryable(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => transient_sqlstate(&code),
            None => looks_transient(db.message()),
        },
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::RowNotFound
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::TypeNotFound { .. } => false,
        other => looks_transient(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick(max_attempts: u32) -> RetryConfig {
        RetryConfig::new(max_attempts, Duration::from_millis(1), Duration::from_millis(4))
    }

    #[tokio::test]
    async fn test_connect_recovers_after_refusals() {
        let calls = AtomicU32::new(0);

        let pool: Result<&str, String> = with_retry(&quick(5), "connect", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("connection refused".to_string())
                } else {
                    Ok("pool")
                }
            }
        })
        .await;

        assert_eq!(pool.unwrap(), "pool");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_connect_gives_up_with_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = with_retry(&quick(4), "connect", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(format!("attempt {} refused", n + 1)) }
        })
        .await;

        assert_eq!(result.unwrap_err(), "attempt 4 refused");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);

        let result: Result<(), &str> = with_conditional_retry(
            &quick(5),
            "list_all",
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("relation \"inventory\" does not exist") }
            },
            |e: &&str| looks_transient(e),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_runs_once() {
        let calls = AtomicU32::new(0);

        let result: Result<(), &str> = with_retry(&RetryConfig::disabled(), "delete", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("timeout") }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RetryConfig::new(6, Duration::from_millis(200), Duration::from_secs(1));

        let delays: Vec<_> = config.delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
                Duration::from_secs(1),
                Duration::from_secs(1),
            ]
        );
        assert_eq!(config.delay_for_attempt(10_000), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let config = RetryConfig::new(0, Duration::from_millis(1), Duration::from_millis(1));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.delays().count(), 0);
    }

    #[test]
    fn test_transient_messages() {
        assert!(looks_transient("Connection refused (os error 111)"));
        assert!(looks_transient("FATAL: the database system is starting up"));
        assert!(!looks_transient("null value in column \"name\" violates not-null constraint"));
    }

    #[test]
    fn test_sqlstate_classification() {
        assert!(transient_sqlstate("08006"));
        assert!(transient_sqlstate("40P01"));
        assert!(transient_sqlstate("57P01"));
        assert!(!transient_sqlstate("23514"));
        assert!(!transient_sqlstate("42P01"));
    }

    #[test]
    fn test_sqlx_error_classification() {
        assert!(is_sqlx_retryable(&sqlx::Error::Io(std::io::Error::from(
            std::io::ErrorKind::ConnectionReset
        ))));
        assert!(!is_sqlx_retryable(&sqlx::Error::PoolClosed));
        assert!(!is_sqlx_retryable(&sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn test_pool_timeout_fails_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::new(5, Duration::from_secs(1), Duration::from_secs(5));

        let started = std::time::Instant::now();
        let result: Result<(), sqlx::Error> = with_conditional_retry(
            &config,
            "list_all",
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(sqlx::Error::PoolTimedOut) }
            },
            is_sqlx_retryable,
        )
        .await;

        assert!(matches!(result, Err(sqlx::Error::PoolTimedOut)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
