//! 数量值对象

use derive_more::Display;
use inventory_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 数量校验失败时的提示
pub const QUANTITY_RULE: &str = "Quantity must be a non-negative integer";

/// 库存数量，取值范围 `0..=i32::MAX`
///
/// 反序列化同样经过校验，非法数量无法构造
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "i64", into = "i64")]
#[display("{_0}")]
pub struct Quantity(i32);

impl Quantity {
    pub const ZERO: Self = Self(0);

    /// 从任意整数创建，拒绝负数和超出 `i32` 的值
    pub fn new(value: i64) -> AppResult<Self> {
        if value < 0 {
            return Err(AppError::validation(QUANTITY_RULE));
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| AppError::validation(format!("Quantity must not exceed {}", i32::MAX)))
    }

    /// 解析用户输入（表单、查询参数）
    pub fn parse(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Quantity is required"));
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| AppError::validation(QUANTITY_RULE))?;
        Self::new(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = AppError;

    fn try_from(value: i64) -> AppResult<Self> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        quantity.0.into()
    }
}
