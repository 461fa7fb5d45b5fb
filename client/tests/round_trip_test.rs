//! 客户端与服务端的完整 HTTP 往返测试
//!
//! 服务端使用内存仓储，绑定 127.0.0.1 的随机端口

use std::time::Duration;

use inventory_client::{
    ClientConfig, ClientError, ErrorKind, HttpInventoryClient, InventoryApi, InventoryView,
    SearchMode,
};
use inventory_domain_core::{ItemId, NewInventoryItem, Quantity};
use inventory_ports::InMemoryInventoryRepository;
use inventory_service::{AppState, build_router};
use tokio::net::TcpListener;

async fn spawn_server(repo: InMemoryInventoryRepository) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(AppState::new(repo), &[]);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(base_url: &str) -> HttpInventoryClient {
    HttpInventoryClient::new(ClientConfig::new(base_url).with_timeout(Duration::from_secs(5)))
        .unwrap()
}

#[tokio::test]
async fn test_bolt_scenario_through_view() {
    let base_url = spawn_server(InMemoryInventoryRepository::new()).await;
    let mut view = InventoryView::new(client(&base_url));

    view.add("Bolt", "10").await;
    let state = view.state();
    assert!(state.error.is_none(), "{:?}", state.error);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, ItemId(1));
    assert_eq!(state.items[0].name, "Bolt");
    assert_eq!(state.items[0].quantity.value(), 10);

    view.delete(ItemId(1)).await;
    assert!(view.state().error.is_none());
    assert!(view.state().items.is_empty());
}

#[tokio::test]
async fn test_search_round_trip() {
    let base_url = spawn_server(InMemoryInventoryRepository::new()).await;
    let api = client(&base_url);

    for (name, quantity) in [("Blue Widget", 5), ("Widget & Co", 55), ("Sprocket", 5)] {
        let item = NewInventoryItem::new(name, Quantity::new(quantity).unwrap()).unwrap();
        api.add_item(&item).await.unwrap();
    }

    let by_name = api.search_by_name("Widget & Co").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Widget & Co");

    let mut view = InventoryView::new(api);
    view.set_search_mode(SearchMode::Quantity);
    view.set_quantity_term("5");
    view.search().await;

    let names: Vec<_> = view.state().items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Blue Widget", "Sprocket"]);
}

#[tokio::test]
async fn test_delete_unknown_id() {
    let base_url = spawn_server(InMemoryInventoryRepository::new()).await;
    let outcome = client(&base_url).delete_item(ItemId(404)).await.unwrap();

    assert_eq!(outcome.affected_rows, 0);
    assert!(!outcome.deleted_any());
}

#[tokio::test]
async fn test_server_failure_is_retryable() {
    let repo = InMemoryInventoryRepository::new();
    let base_url = spawn_server(repo.clone()).await;
    let api = client(&base_url);

    let item = NewInventoryItem::new("Bolt", Quantity::new(1).unwrap()).unwrap();
    api.add_item(&item).await.unwrap();

    let mut view = InventoryView::new(api);
    view.fetch_all().await;
    assert_eq!(view.state().items.len(), 1);

    repo.set_unavailable(true);
    view.fetch_all().await;

    let error = view.state().error.clone().unwrap();
    assert_eq!(error.kind, ErrorKind::Server);
    assert!(error.retryable);
    assert!(error.message.contains("Database error"));
    assert_eq!(view.state().items.len(), 1);

    repo.set_unavailable(false);
    view.retry().await;
    assert!(view.state().error.is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .list_items()
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
    assert!(err.is_retryable());
}
