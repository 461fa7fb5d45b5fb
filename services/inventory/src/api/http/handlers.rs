//! 库存 CRUD handler

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::Json;
use inventory_domain_core::{
    DeleteOutcome, InsertOutcome, InventoryItem, ItemId, NewInventoryItem, Quantity,
};
use inventory_errors::{AppError, AppResult};
use tracing::{info, instrument};

use super::dto::{AddItemRequest, DeleteItemRequest, NameSearchParams, QuantitySearchParams};
use crate::state::AppState;

fn bad_request(rejection: impl std::fmt::Display) -> AppError {
    AppError::validation(rejection.to_string())
}

fn required(field: &str) -> AppError {
    AppError::validation(format!("`{}` is required", field))
}

/// `GET /inventory`
#[instrument(skip_all)]
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = state.repository.list_all().await?;
    Ok(Json(items))
}

/// `GET /search?name=`
#[instrument(skip_all)]
pub async fn search_by_name(
    State(state): State<AppState>,
    params: Result<Query<NameSearchParams>, QueryRejection>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let Query(params) = params.map_err(bad_request)?;
    let name = params.name.ok_or_else(|| required("name"))?;

    let items = state.repository.search_by_name(&name).await?;
    info!(term = %name, hits = items.len(), "Searched inventory by name");
    Ok(Json(items))
}

/// `GET /search/quantity?quantity=`
#[instrument(skip_all)]
pub async fn search_by_quantity(
    State(state): State<AppState>,
    params: Result<Query<QuantitySearchParams>, QueryRejection>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let Query(params) = params.map_err(bad_request)?;
    let raw = params.quantity.ok_or_else(|| required("quantity"))?;
    let quantity = Quantity::parse(&raw)?;

    let items = state.repository.search_by_quantity(quantity).await?;
    info!(%quantity, hits = items.len(), "Searched inventory by quantity");
    Ok(Json(items))
}

/// `POST /inventory/add`
#[instrument(skip_all)]
pub async fn add_item(
    State(state): State<AppState>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<InsertOutcome>)> {
    let Json(request) = payload.map_err(bad_request)?;
    let name = request.name.ok_or_else(|| required("name"))?;
    let quantity = Quantity::new(request.quantity.ok_or_else(|| required("quantity"))?)?;
    let item = NewInventoryItem::new(name, quantity)?;

    let outcome = state.repository.insert(&item).await?;
    info!(
        id = %outcome.insert_id,
        name = item.name(),
        %quantity,
        "Inventory item added"
    );
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// `DELETE /inventory/delete`
#[instrument(skip_all)]
pub async fn delete_item(
    State(state): State<AppState>,
    payload: Result<Json<DeleteItemRequest>, JsonRejection>,
) -> AppResult<Json<DeleteOutcome>> {
    let Json(request) = payload.map_err(bad_request)?;
    let id = ItemId(request.id.ok_or_else(|| required("id"))?);

    let outcome = state.repository.delete(id).await?;
    info!(%id, affected_rows = outcome.affected_rows, "Inventory item deleted");
    Ok(Json(outcome))
}

/// 未匹配的路径
pub async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}
