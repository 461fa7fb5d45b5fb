//! 客户端配置

use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 服务根地址，不含末尾的 `/`
    pub base_url: String,
    /// 单个请求的超时
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// 从 `INVENTORY_API_URL` / `INVENTORY_API_TIMEOUT_SECS` 读取，缺失或非法时使用默认值
    pub fn from_env() -> Self {
        let base_url =
            env::var("INVENTORY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = env::var("INVENTORY_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(base_url).with_timeout(Duration::from_secs(timeout_secs))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 拼接接口地址，`path` 以 `/` 开头
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn normalize(url: String) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = ClientConfig::new("http://stock.local:8080/");
        assert_eq!(
            config.endpoint("/inventory"),
            "http://stock.local:8080/inventory"
        );
    }

    #[test]
    fn test_blank_url_falls_back_to_default() {
        assert_eq!(ClientConfig::new("  ").base_url, DEFAULT_API_URL);
    }
}
