//! inventory-client - 库存服务客户端
//!
//! `InventoryApi` 封装 HTTP 调用，`InventoryView` 持有界面状态

pub mod api;
pub mod config;
pub mod error;
pub mod render;
pub mod view;

pub use api::{HttpInventoryClient, InventoryApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorKind};
pub use view::{InventoryView, SearchMode, SearchState, ViewError, ViewState};
