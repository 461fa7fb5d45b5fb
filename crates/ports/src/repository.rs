//! Repository trait 定义

use async_trait::async_trait;
use inventory_domain_core::{
    DeleteOutcome, InsertOutcome, InventoryItem, ItemId, NewInventoryItem, Quantity,
};
use inventory_errors::AppResult;

/// 库存仓储
///
/// 每个方法对应一条参数化 SQL 语句，不做任何业务编排
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// 查询全部条目
    async fn list_all(&self) -> AppResult<Vec<InventoryItem>>;

    /// 按名称子串查询
    async fn search_by_name(&self, term: &str) -> AppResult<Vec<InventoryItem>>;

    /// 按数量精确查询
    async fn search_by_quantity(&self, quantity: Quantity) -> AppResult<Vec<InventoryItem>>;

    /// 插入条目，ID 由存储分配
    async fn insert(&self, item: &NewInventoryItem) -> AppResult<InsertOutcome>;

    /// 按 ID 删除
    async fn delete(&self, id: ItemId) -> AppResult<DeleteOutcome>;

    /// 检查存储是否可达
    async fn ping(&self) -> AppResult<()>;
}
