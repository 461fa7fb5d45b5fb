//! 终端渲染

use inventory_domain_core::InventoryItem;

use crate::view::ViewError;

/// 渲染条目表格；列宽随内容变化
pub fn items_table(items: &[InventoryItem]) -> String {
    if items.is_empty() {
        return "No inventory items.\n".to_string();
    }

    let id_width = column_width("ID", items.iter().map(|i| i.id.to_string().len()));
    let name_width = column_width("Name", items.iter().map(|i| i.name.chars().count()));

    let mut out = format!(
        "{:<id_width$}  {:<name_width$}  {}\n",
        "ID", "Name", "Quantity"
    );
    for item in items {
        out.push_str(&format!(
            "{:<id_width$}  {:<name_width$}  {}\n",
            item.id.to_string(),
            item.name,
            item.quantity
        ));
    }
    out
}

/// 错误横幅，可重试时附带提示
pub fn error_banner(error: &ViewError) -> String {
    if error.retryable {
        format!("error: {} (retry with `inventory list`)", error.message)
    } else {
        format!("error: {}", error.message)
    }
}

fn column_width(header: &str, widths: impl Iterator<Item = usize>) -> usize {
    widths.max().unwrap_or(0).max(header.len())
}
