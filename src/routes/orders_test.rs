use super::*;
use crate::services::order::OrderStatus;

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn component_not_found_maps_to_400() {
    let resp = order_error_to_response(&OrderError::ComponentNotFound(Uuid::new_v4()));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn invalid_quantity_maps_to_400() {
    let resp = order_error_to_response(&OrderError::InvalidQuantity);
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn invalid_status_and_transition_map_to_400() {
    let unknown = order_error_to_response(&OrderError::InvalidStatus("Shipped".into()));
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let forbidden = order_error_to_response(&OrderError::InvalidTransition {
        from: OrderStatus::Delivered,
        to: OrderStatus::Pending,
    });
    assert_eq!(forbidden.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn not_found_maps_to_404() {
    let resp = order_error_to_response(&OrderError::NotFound(Uuid::new_v4()));
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn not_found_body_does_not_echo_the_order_id() {
    // The 404 body must be identical for missing and foreign-owned orders,
    // so it must not include the probed id.
    let id = Uuid::new_v4();
    let resp = order_error_to_response(&OrderError::NotFound(id));
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "order not found");
    assert!(!body["message"].as_str().unwrap().contains(&id.to_string()));
}

#[test]
fn database_failure_maps_to_500() {
    let resp = order_error_to_response(&OrderError::Database(sqlx::Error::PoolClosed));
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// request body shapes
// =============================================================================

#[test]
fn create_order_body_deserializes_with_optional_fields() {
    let json = serde_json::json!({
        "items": [
            { "dough_id": Uuid::new_v4(), "frosting_id": Uuid::new_v4(), "quantity": 2 }
        ]
    });
    let body: CreateOrderBody = serde_json::from_value(json).unwrap();
    assert_eq!(body.items.len(), 1);
    assert!(body.items[0].filling_id.is_none());
    assert!(body.delivery_address.is_none());
    assert!(body.payment_method.is_none());
}

#[test]
fn create_order_body_deserializes_full_item() {
    let dough = Uuid::new_v4();
    let filling = Uuid::new_v4();
    let json = serde_json::json!({
        "items": [
            { "dough_id": dough, "frosting_id": Uuid::new_v4(), "filling_id": filling, "quantity": 3 }
        ],
        "delivery_address": "1 Bakery Lane",
        "payment_method": "card"
    });
    let body: CreateOrderBody = serde_json::from_value(json).unwrap();
    assert_eq!(body.items[0].dough_id, dough);
    assert_eq!(body.items[0].filling_id, Some(filling));
    assert_eq!(body.delivery_address.as_deref(), Some("1 Bakery Lane"));
}

#[test]
fn update_status_body_is_a_plain_label() {
    let body: UpdateStatusBody = serde_json::from_value(serde_json::json!({ "status": "Confirmed" })).unwrap();
    assert_eq!(body.status, "Confirmed");
}
