//! inventory-errors - 统一错误处理
//!
//! 服务端所有失败都经由 `AppError` 映射为非 2xx 状态码和 RFC 7807 错误体，
//! 客户端用同一个 `ProblemDetails` 解析。

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "axum")]
mod response;

#[cfg(feature = "axum")]
pub use response::PROBLEM_JSON;

/// Problem type URI 前缀
pub const PROBLEM_TYPE_BASE: &str = "https://inventory.example.com/problems";

#[derive(Debug, Error)]
pub enum AppError {
    /// 未知路由或资源
    #[error("Not found: {0}")]
    NotFound(String),

    /// 参数缺失、类型错误或违反业务规则
    #[error("Validation error: {0}")]
    Validation(String),

    /// 语句执行或连接失败
    #[error("Database error: {0}")]
    Database(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// (状态码, type 后缀, title)
    fn problem_kind(&self) -> (u16, &'static str, &'static str) {
        match self {
            Self::NotFound(_) => (404, "not-found", "Resource Not Found"),
            Self::Validation(_) => (400, "validation", "Validation Error"),
            Self::Database(_) => (500, "database", "Database Error"),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.problem_kind().0
    }

    pub fn to_problem_details(&self) -> ProblemDetails {
        let (status, slug, title) = self.problem_kind();
        ProblemDetails {
            r#type: format!("{}/{}", PROBLEM_TYPE_BASE, slug),
            title: title.to_string(),
            status,
            detail: self.to_string(),
            instance: None,
        }
    }
}

/// RFC 7807 错误体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn is_validation(&self) -> bool {
        self.r#type.ends_with("/validation")
    }
}
