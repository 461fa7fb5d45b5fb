//! 请求与响应 DTO
//!
//! 字段全部为 Option，缺失参数由 handler 转为 400 而不是反序列化失败

use serde::{Deserialize, Serialize};

/// `POST /inventory/add`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddItemRequest {
    pub name: Option<String>,
    pub quantity: Option<i64>,
}

/// `DELETE /inventory/delete`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteItemRequest {
    pub id: Option<i64>,
}

/// `GET /search?name=`
#[derive(Debug, Clone, Deserialize)]
pub struct NameSearchParams {
    pub name: Option<String>,
}

/// `GET /search/quantity?quantity=`
///
/// 以字符串接收，解析失败时返回统一的校验错误
#[derive(Debug, Clone, Deserialize)]
pub struct QuantitySearchParams {
    pub quantity: Option<String>,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}
