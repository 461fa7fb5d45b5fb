//! 客户端错误分类
//!
//! 区分本地校验、网络故障、请求被拒和服务端故障，界面据此决定是否提供重试

use inventory_errors::{AppError, ProblemDetails};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// 本地校验失败，请求未发送
    #[error("{0}")]
    Validation(String),

    /// 连接失败或超时
    #[error("Network error: {0}")]
    Network(String),

    /// 4xx
    #[error("Request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// 5xx
    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// 响应体无法解析
    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Rejected,
    Server,
    Decode,
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Network(_) => ErrorKind::Network,
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::Server { .. } => ErrorKind::Server,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// 网络故障和服务端故障可以原样重试
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Network | ErrorKind::Server)
    }

    /// 根据非 2xx 响应构造错误，优先使用 Problem Details 的 detail
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = match serde_json::from_str::<ProblemDetails>(body) {
            Ok(problem) => problem.detail,
            Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
            Err(_) => body.trim().to_string(),
        };

        if (400..500).contains(&status) {
            Self::Rejected { status, detail }
        } else {
            Self::Server { status, detail }
        }
    }
}

/// 按服务端同样的状态码归类
impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        let status = err.status_code();
        match err {
            AppError::Validation(msg) => Self::Validation(msg),
            other @ AppError::NotFound(_) => Self::Rejected {
                status,
                detail: other.to_string(),
            },
            other @ AppError::Database(_) => Self::Server {
                status,
                detail: other.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
