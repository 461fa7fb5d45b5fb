//! 写操作的返回结果

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// 插入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub affected_rows: u64,
    pub insert_id: ItemId,
}

impl InsertOutcome {
    pub fn inserted(id: ItemId) -> Self {
        Self {
            affected_rows: 1,
            insert_id: id,
        }
    }
}

/// 删除结果；ID 不存在时 `affected_rows` 为 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub affected_rows: u64,
}

impl DeleteOutcome {
    pub fn deleted_any(&self) -> bool {
        self.affected_rows > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_format() {
        let json = serde_json::to_value(InsertOutcome::inserted(ItemId(4))).unwrap();
        assert_eq!(json, serde_json::json!({"affectedRows": 1, "insertId": 4}));

        let json = serde_json::to_value(DeleteOutcome { affected_rows: 0 }).unwrap();
        assert_eq!(json, serde_json::json!({"affectedRows": 0}));
    }
}
