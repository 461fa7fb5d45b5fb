//! 库存服务 HTTP 接口

use async_trait::async_trait;
use inventory_domain_core::{
    DeleteOutcome, InsertOutcome, InventoryItem, ItemId, NewInventoryItem, Quantity,
};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// 服务端接口抽象，界面状态只依赖这个 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn list_items(&self) -> ClientResult<Vec<InventoryItem>>;

    async fn search_by_name(&self, name: &str) -> ClientResult<Vec<InventoryItem>>;

    async fn search_by_quantity(&self, quantity: Quantity) -> ClientResult<Vec<InventoryItem>>;

    async fn add_item(&self, item: &NewInventoryItem) -> ClientResult<InsertOutcome>;

    async fn delete_item(&self, id: ItemId) -> ClientResult<DeleteOutcome>;
}

#[derive(Serialize)]
struct DeleteBody {
    id: ItemId,
}

/// 基于 reqwest 的实现
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    http: Client,
    config: ClientConfig,
}

impl HttpInventoryClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Inventory API responded");

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_response(status.as_u16(), &body))
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    async fn list_items(&self) -> ClientResult<Vec<InventoryItem>> {
        self.send(self.http.get(self.config.endpoint("/inventory")))
            .await
    }

    async fn search_by_name(&self, name: &str) -> ClientResult<Vec<InventoryItem>> {
        let request = self
            .http
            .get(self.config.endpoint("/search"))
            .query(&[("name", name)]);
        self.send(request).await
    }

    async fn search_by_quantity(&self, quantity: Quantity) -> ClientResult<Vec<InventoryItem>> {
        let request = self
            .http
            .get(self.config.endpoint("/search/quantity"))
            .query(&[("quantity", quantity.value())]);
        self.send(request).await
    }

    async fn add_item(&self, item: &NewInventoryItem) -> ClientResult<InsertOutcome> {
        let request = self
            .http
            .post(self.config.endpoint("/inventory/add"))
            .json(item);
        self.send(request).await
    }

    async fn delete_item(&self, id: ItemId) -> ClientResult<DeleteOutcome> {
        let request = self
            .http
            .delete(self.config.endpoint("/inventory/delete"))
            .json(&DeleteBody { id });
        self.send(request).await
    }
}
