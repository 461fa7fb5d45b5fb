//! inventory-service - 库存 CRUD HTTP 服务
//!
//! 每个请求对应一条参数化 SQL，结果以 JSON 返回，失败统一为 Problem Details

pub mod api;
mod state;

pub use api::http::build_router;
pub use state::AppState;
