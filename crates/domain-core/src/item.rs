//! 库存条目实体

use derive_more::{Display, From};
use inventory_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::Quantity;

/// 条目 ID，由数据库分配
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct ItemId(pub i64);

impl ItemId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 库存条目
///
/// 创建后名称和数量不可修改，只能删除后重新添加
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub quantity: Quantity,
}

impl InventoryItem {
    pub fn new(id: ItemId, name: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
        }
    }

    /// 名称是否包含给定子串
    pub fn name_contains(&self, term: &str, case_insensitive: bool) -> bool {
        if case_insensitive {
            self.name.to_lowercase().contains(&term.to_lowercase())
        } else {
            self.name.contains(term)
        }
    }
}

/// 待创建的条目（已校验）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewInventoryItem {
    name: String,
    quantity: Quantity,
}

impl NewInventoryItem {
    /// 校验名称非空白
    pub fn new(name: impl Into<String>, quantity: Quantity) -> AppResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Item name is required"));
        }
        Ok(Self { name, quantity })
    }

    /// 从表单输入解析，名称和数量均为原始字符串
    pub fn parse(name: &str, quantity: &str) -> AppResult<Self> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Item name is required"));
        }
        let quantity = Quantity::parse(quantity)?;
        Self::new(name, quantity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// 分配 ID 后转为实体
    pub fn into_item(self, id: ItemId) -> InventoryItem {
        InventoryItem::new(id, self.name, self.quantity)
    }
}
