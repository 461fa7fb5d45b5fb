//! 请求处理共享状态

use std::sync::Arc;

use inventory_ports::InventoryRepository;
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler 共享状态，只持有注入的仓储句柄
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn InventoryRepository>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(repository: impl InventoryRepository + 'static) -> Self {
        Self {
            repository: Arc::new(repository),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
