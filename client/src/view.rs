//! 库存界面状态
//!
//! 每个操作开始时清除错误并置 `loading`，结束时无论成败都复位 `loading`。
//! 失败时保留上一次成功获取的列表。每次状态变化都会推送给 `subscribe` 的接收端。

use inventory_domain_core::{InventoryItem, ItemId, NewInventoryItem, Quantity};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::InventoryApi;
use crate::error::{ClientError, ClientResult, ErrorKind};

const FETCH_FAILED: &str = "Failed to fetch inventory items";
const SEARCH_FAILED: &str = "Search failed";
const ADD_FAILED: &str = "Failed to add item";
const DELETE_FAILED: &str = "Failed to delete item";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    Name,
    Quantity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub mode: SearchMode,
    pub name_term: String,
    pub quantity_term: String,
}

/// 界面上展示的错误横幅
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ViewError {
    fn new(context: &str, error: &ClientError) -> Self {
        let message = match error {
            ClientError::Validation(msg) => msg.clone(),
            other => format!("{}: {}", context, other),
        };
        Self {
            kind: error.kind(),
            message,
            retryable: error.is_retryable(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub items: Vec<InventoryItem>,
    pub loading: bool,
    pub error: Option<ViewError>,
    pub search: SearchState,
}

pub struct InventoryView<A> {
    api: A,
    state: ViewState,
    updates: watch::Sender<ViewState>,
}

impl<A: InventoryApi> InventoryView<A> {
    pub fn new(api: A) -> Self {
        let (updates, _) = watch::channel(ViewState::default());
        Self {
            api,
            state: ViewState::default(),
            updates,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// 订阅状态变化，请求进行中也能观察到 `loading`
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.updates.subscribe()
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.state.search.mode = mode;
    }

    pub fn set_name_term(&mut self, term: impl Into<String>) {
        self.state.search.name_term = term.into();
    }

    pub fn set_quantity_term(&mut self, term: impl Into<String>) {
        self.state.search.quantity_term = term.into();
    }

    /// 重新获取全部条目
    pub async fn fetch_all(&mut self) {
        self.begin();
        let result = self.api.list_items().await;
        self.apply_items(FETCH_FAILED, result);
    }

    /// 按当前模式搜索；搜索词为空白时退化为获取全部
    pub async fn search(&mut self) {
        let search = self.state.search.clone();
        match search.mode {
            SearchMode::Name if !search.name_term.trim().is_empty() => {
                self.begin();
                let result = self.api.search_by_name(&search.name_term).await;
                self.apply_items(SEARCH_FAILED, result);
            }
            SearchMode::Quantity if !search.quantity_term.trim().is_empty() => {
                self.begin();
                let quantity = match Quantity::parse(&search.quantity_term) {
                    Ok(quantity) => quantity,
                    Err(e) => return self.fail(SEARCH_FAILED, e.into()),
                };
                let result = self.api.search_by_quantity(quantity).await;
                self.apply_items(SEARCH_FAILED, result);
            }
            _ => self.fetch_all().await,
        }
    }

    /// 本地校验通过后提交，成功后重新获取列表
    pub async fn add(&mut self, name: &str, quantity: &str) {
        self.begin();
        let item = match NewInventoryItem::parse(name, quantity) {
            Ok(item) => item,
            Err(e) => return self.fail(ADD_FAILED, e.into()),
        };

        match self.api.add_item(&item).await {
            Ok(outcome) => {
                info!(id = %outcome.insert_id, name = item.name(), "Item added");
                self.fetch_all().await;
            }
            Err(e) => self.fail(ADD_FAILED, e),
        }
    }

    /// 删除后重新获取列表
    pub async fn delete(&mut self, id: ItemId) {
        self.begin();
        match self.api.delete_item(id).await {
            Ok(outcome) => {
                info!(%id, affected_rows = outcome.affected_rows, "Item deleted");
                self.fetch_all().await;
            }
            Err(e) => self.fail(DELETE_FAILED, e),
        }
    }

    /// 错误横幅上的重试
    pub async fn retry(&mut self) {
        self.fetch_all().await;
    }

    pub fn dismiss_error(&mut self) {
        self.state.error = None;
        self.publish();
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.clone());
    }

    fn apply_items(&mut self, context: &str, result: ClientResult<Vec<InventoryItem>>) {
        match result {
            Ok(items) => {
                self.state.items = items;
                self.state.loading = false;
                self.publish();
            }
            Err(e) => self.fail(context, e),
        }
    }

    fn fail(&mut self, context: &str, error: ClientError) {
        warn!(error = %error, kind = ?error.kind(), "{}", context);
        self.state.error = Some(ViewError::new(context, &error));
        self.state.loading = false;
        self.publish();
    }
}
