//! Order routes — creation, listing, retrieval, and status updates.
//!
//! All handlers require a valid bearer token; creation and retrieval are
//! scoped to the authenticated user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::routes::{ApiJson, error_body};
use crate::services::order::{self, NewOrderItem, OrderDetail, OrderError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderBody {
    pub items: Vec<NewOrderItem>,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

pub(crate) fn order_error_to_response(err: &OrderError) -> Response {
    match err {
        OrderError::ComponentNotFound(_)
        | OrderError::InvalidQuantity
        | OrderError::EmptyOrder
        | OrderError::InvalidStatus(_)
        | OrderError::InvalidTransition { .. } => error_body(StatusCode::BAD_REQUEST, &err.to_string()),
        OrderError::NotFound(_) => error_body(StatusCode::NOT_FOUND, "order not found"),
        OrderError::Database(_) => {
            tracing::error!(error = %err, "order storage failure");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// `POST /api/orders` — price and persist an order for the caller.
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<CreateOrderBody>,
) -> Result<(StatusCode, Json<OrderDetail>), Response> {
    let created = order::create_order(
        &state.pool,
        auth.user_id,
        body.delivery_address,
        body.payment_method,
        &body.items,
    )
    .await
    .map_err(|e| order_error_to_response(&e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/orders` — the caller's orders, newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<OrderDetail>>, Response> {
    let orders = order::list_orders(&state.pool, auth.user_id)
        .await
        .map_err(|e| order_error_to_response(&e))?;
    Ok(Json(orders))
}

/// `GET /api/orders/:id` — one of the caller's orders, or 404.
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetail>, Response> {
    let found = order::get_order(&state.pool, auth.user_id, order_id)
        .await
        .map_err(|e| order_error_to_response(&e))?;
    Ok(Json(found))
}

/// `PATCH /api/orders/:id/status` — move an order along the status workflow.
pub async fn update_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(order_id): Path<Uuid>,
    ApiJson(body): ApiJson<UpdateStatusBody>,
) -> Result<Json<serde_json::Value>, Response> {
    order::update_status(&state.pool, order_id, &body.status)
        .await
        .map_err(|e| order_error_to_response(&e))?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "orders_test.rs"]
mod tests;
