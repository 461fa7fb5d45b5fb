//! 内存仓储实现（用于测试和本地演示）

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use inventory_domain_core::{
    DeleteOutcome, InsertOutcome, InventoryItem, ItemId, NewInventoryItem, Quantity,
};
use inventory_errors::{AppError, AppResult};
use tokio::sync::RwLock;

use crate::InventoryRepository;

#[derive(Default)]
struct Table {
    rows: BTreeMap<ItemId, InventoryItem>,
    next_id: i64,
}

/// 内存库存仓储
///
/// 与 PostgreSQL 实现保持相同语义：ID 自增且不复用，名称按子串匹配
#[derive(Clone, Default)]
pub struct InMemoryInventoryRepository {
    table: Arc<RwLock<Table>>,
    case_insensitive: bool,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 名称搜索忽略大小写
    pub fn with_case_insensitive_search(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// 模拟数据库不可用，之后所有操作返回 `AppError::Database`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 当前行数
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::database("connection refused"));
        }
        Ok(())
    }

    async fn select<P>(&self, predicate: P) -> AppResult<Vec<InventoryItem>>
    where
        P: Fn(&InventoryItem) -> bool + Send,
    {
        self.check_available()?;
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|item| predicate(item))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn list_all(&self) -> AppResult<Vec<InventoryItem>> {
        self.select(|_| true).await
    }

    async fn search_by_name(&self, term: &str) -> AppResult<Vec<InventoryItem>> {
        let case_insensitive = self.case_insensitive;
        self.select(|item| item.name_contains(term, case_insensitive))
            .await
    }

    async fn search_by_quantity(&self, quantity: Quantity) -> AppResult<Vec<InventoryItem>> {
        self.select(|item| item.quantity == quantity).await
    }

    async fn insert(&self, item: &NewInventoryItem) -> AppResult<InsertOutcome> {
        self.check_available()?;
        let mut table = self.table.write().await;
        table.next_id += 1;
        let id = ItemId(table.next_id);
        table.rows.insert(id, item.clone().into_item(id));
        Ok(InsertOutcome::inserted(id))
    }

    async fn delete(&self, id: ItemId) -> AppResult<DeleteOutcome> {
        self.check_available()?;
        let removed = self.table.write().await.rows.remove(&id);
        Ok(DeleteOutcome {
            affected_rows: u64::from(removed.is_some()),
        })
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(name: &str, quantity: i64) -> NewInventoryItem {
        NewInventoryItem::new(name, Quantity::new(quantity).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_ids() {
        let repo = InMemoryInventoryRepository::new();

        let first = repo.insert(&new_item("Bolt", 10)).await.unwrap();
        let second = repo.insert(&new_item("Bolt", 10)).await.unwrap();

        assert_eq!(first.insert_id, ItemId(1));
        assert_eq!(second.insert_id, ItemId(2));
        assert_eq!(first.affected_rows, 1);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryInventoryRepository::new();
        let first = repo.insert(&new_item("Nut", 1)).await.unwrap();
        repo.delete(first.insert_id).await.unwrap();

        let second = repo.insert(&new_item("Nut", 1)).await.unwrap();
        assert_ne!(first.insert_id, second.insert_id);
    }

    #[tokio::test]
    async fn test_delete_missing_id_affects_nothing() {
        let repo = InMemoryInventoryRepository::new();
        repo.insert(&new_item("Gear", 2)).await.unwrap();

        let outcome = repo.delete(ItemId(42)).await.unwrap();
        assert_eq!(outcome.affected_rows, 0);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_search_by_name_substring() {
        let repo = InMemoryInventoryRepository::new();
        repo.insert(&new_item("Blue Widget", 5)).await.unwrap();
        repo.insert(&new_item("widget small", 5)).await.unwrap();
        repo.insert(&new_item("Sprocket", 5)).await.unwrap();

        let hits = repo.search_by_name("Widget").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Blue Widget");

        let repo = repo.with_case_insensitive_search(true);
        let hits = repo.search_by_name("Widget").await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_by_quantity_exact() {
        let repo = InMemoryInventoryRepository::new();
        repo.insert(&new_item("A", 5)).await.unwrap();
        repo.insert(&new_item("B", 50)).await.unwrap();
        repo.insert(&new_item("C", 5)).await.unwrap();

        let hits = repo
            .search_by_quantity(Quantity::new(5).unwrap())
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|item| item.quantity.value() == 5));
    }

    #[tokio::test]
    async fn test_unavailable_surfaces_database_error() {
        let repo = InMemoryInventoryRepository::new();
        repo.set_unavailable(true);

        assert!(matches!(repo.list_all().await, Err(AppError::Database(_))));
        assert!(matches!(repo.ping().await, Err(AppError::Database(_))));

        repo.set_unavailable(false);
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
