//! inventory-bootstrap - 统一服务启动骨架
//!
//! 加载配置、初始化遥测、建立数据库连接池并启动 HTTP 服务

mod infrastructure;
mod runtime;
mod starter;

pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;
