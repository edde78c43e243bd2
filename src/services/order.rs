//! Order service — pricing, composition, retrieval, and status workflow.
//!
//! DESIGN
//! ======
//! Unit prices are frozen at creation time: an order item stores the sum of
//! its component prices as of the moment the order was placed, and the order
//! stores the sum of its item subtotals. Later catalog price changes never
//! touch persisted orders. The order row and its item rows are written in a
//! single transaction, so a failed creation leaves nothing behind.
//!
//! ERROR HANDLING
//! ==============
//! Any unresolved component reference fails the whole order. Retrieval is
//! identity-scoped and reports the same `NotFound` for a missing order and
//! for another user's order, so existence never leaks across accounts.

use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::catalog;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("component not found: {0}")]
    ComponentNotFound(Uuid),
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("order must contain at least one item")]
    EmptyOrder,
    #[error("unknown order status: {0}")]
    InvalidStatus(String),
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("order not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Closed order-status workflow. Stored as the label text; every stored
/// label round-trips through [`OrderStatus::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::OutForDelivery => "OutForDelivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(Self::Pending),
            "Confirmed" => Some(Self::Confirmed),
            "Preparing" => Some(Self::Preparing),
            "OutForDelivery" => Some(Self::OutForDelivery),
            "Delivered" => Some(Self::Delivered),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Allowed workflow transitions. Delivered and Cancelled are terminal.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Preparing | Self::Cancelled)
                | (Self::Preparing, Self::OutForDelivery | Self::Cancelled)
                | (Self::OutForDelivery, Self::Delivered)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested cupcake configuration in a create-order call.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewOrderItem {
    pub dough_id: Uuid,
    pub frosting_id: Uuid,
    pub filling_id: Option<Uuid>,
    pub quantity: i32,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DoughSummary {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FrostingSummary {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FillingSummary {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
}

/// Persisted order item with its snapshot prices and resolved components.
/// Component summaries carry the components' current catalog prices; the
/// snapshot lives in `unit_price` and `subtotal`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub dough: DoughSummary,
    pub frosting: FrostingSummary,
    pub filling: Option<FillingSummary>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub total_amount: Decimal,
    pub status: String,
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub items: Vec<OrderItemDetail>,
}

// =============================================================================
// PRICING
// =============================================================================

/// Per-unit price of one configuration: dough + frosting + optional filling.
#[must_use]
pub fn unit_price(dough: Decimal, frosting: Decimal, filling: Option<Decimal>) -> Decimal {
    dough + frosting + filling.unwrap_or(Decimal::ZERO)
}

/// Line subtotal: unit price times quantity.
#[must_use]
pub fn line_subtotal(unit: Decimal, quantity: i32) -> Decimal {
    unit * Decimal::from(quantity)
}

/// Aggregate order total: exact sum of line subtotals.
#[must_use]
pub fn order_total<I: IntoIterator<Item = Decimal>>(subtotals: I) -> Decimal {
    subtotals.into_iter().sum()
}

// =============================================================================
// CREATE
// =============================================================================

struct PricedLine {
    request: NewOrderItem,
    dough: DoughSummary,
    frosting: FrostingSummary,
    filling: Option<FillingSummary>,
    unit_price: Decimal,
    subtotal: Decimal,
}

/// Create an order for `user_id` from the requested item configurations.
///
/// Components are resolved by id without an availability check, so a
/// configuration may reference a soft-deleted component. Any reference that
/// fails to resolve — dough, frosting, or filling — rejects the whole order.
///
/// # Errors
///
/// `InvalidQuantity`, `EmptyOrder`, `ComponentNotFound`, or `Database`.
/// On any error nothing is persisted: the order row and item rows commit
/// together or not at all.
pub async fn create_order(
    pool: &PgPool,
    user_id: Uuid,
    delivery_address: Option<String>,
    payment_method: Option<String>,
    items: &[NewOrderItem],
) -> Result<OrderDetail, OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyOrder);
    }
    if items.iter().any(|item| item.quantity < 1) {
        return Err(OrderError::InvalidQuantity);
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let dough = catalog::find_dough(pool, item.dough_id)
            .await?
            .ok_or(OrderError::ComponentNotFound(item.dough_id))?;
        let frosting = catalog::find_frosting(pool, item.frosting_id)
            .await?
            .ok_or(OrderError::ComponentNotFound(item.frosting_id))?;
        let filling = match item.filling_id {
            Some(filling_id) => Some(
                catalog::find_filling(pool, filling_id)
                    .await?
                    .ok_or(OrderError::ComponentNotFound(filling_id))?,
            ),
            None => None,
        };

        let unit = unit_price(dough.price, frosting.price, filling.as_ref().map(|f| f.price));
        let subtotal = line_subtotal(unit, item.quantity);
        lines.push(PricedLine {
            request: item.clone(),
            dough: DoughSummary { id: dough.id, name: dough.name, price: dough.price },
            frosting: FrostingSummary {
                id: frosting.id,
                name: frosting.name,
                color: frosting.color,
                description: frosting.description,
                price: frosting.price,
            },
            filling: filling.map(|f| FillingSummary { id: f.id, name: f.name, price: f.price }),
            unit_price: unit,
            subtotal,
        });
    }

    let total = order_total(lines.iter().map(|line| line.subtotal));

    let mut tx = pool.begin().await?;

    let order_row = sqlx::query(
        "INSERT INTO orders (user_id, total_amount, status, delivery_address, payment_method)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, created_at",
    )
    .bind(user_id)
    .bind(total)
    .bind(OrderStatus::Pending.as_str())
    .bind(&delivery_address)
    .bind(&payment_method)
    .fetch_one(&mut *tx)
    .await?;
    let order_id: Uuid = order_row.get("id");
    let created_at: OffsetDateTime = order_row.get("created_at");

    let mut details = Vec::with_capacity(lines.len());
    for line in lines {
        let item_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO order_items (order_id, dough_id, frosting_id, filling_id, quantity, unit_price, subtotal)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(order_id)
        .bind(line.request.dough_id)
        .bind(line.request.frosting_id)
        .bind(line.request.filling_id)
        .bind(line.request.quantity)
        .bind(line.unit_price)
        .bind(line.subtotal)
        .fetch_one(&mut *tx)
        .await?;

        details.push(OrderItemDetail {
            id: item_id,
            quantity: line.request.quantity,
            unit_price: line.unit_price,
            subtotal: line.subtotal,
            dough: line.dough,
            frosting: line.frosting,
            filling: line.filling,
        });
    }

    tx.commit().await?;

    Ok(OrderDetail {
        id: order_id,
        user_id,
        created_at,
        total_amount: total,
        status: OrderStatus::Pending.as_str().to_owned(),
        delivery_address,
        payment_method,
        updated_at: None,
        items: details,
    })
}

// =============================================================================
// READ
// =============================================================================

/// List a user's orders, newest first, with nested items and resolved
/// component summaries. Items for all orders are loaded by one joined query
/// rather than per-order traversal.
///
/// # Errors
///
/// Returns a database error if a query fails.
pub async fn list_orders(pool: &PgPool, user_id: Uuid) -> Result<Vec<OrderDetail>, OrderError> {
    let rows = sqlx::query(
        "SELECT id, user_id, created_at, total_amount, status, delivery_address, payment_method, updated_at
         FROM orders
         WHERE user_id = $1
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut orders: Vec<OrderDetail> = rows.iter().map(order_from_row).collect();
    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

    for (order_id, item) in load_items(pool, &order_ids).await? {
        if let Some(order) = orders.iter_mut().find(|o| o.id == order_id) {
            order.items.push(item);
        }
    }

    Ok(orders)
}

/// Fetch one order scoped to its owner.
///
/// # Errors
///
/// `NotFound` when the order does not exist OR belongs to a different user —
/// deliberately the same error in both cases.
pub async fn get_order(pool: &PgPool, user_id: Uuid, order_id: Uuid) -> Result<OrderDetail, OrderError> {
    let row = sqlx::query(
        "SELECT id, user_id, created_at, total_amount, status, delivery_address, payment_method, updated_at
         FROM orders
         WHERE id = $1 AND user_id = $2",
    )
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(OrderError::NotFound(order_id))?;

    let mut order = order_from_row(&row);
    for (_, item) in load_items(pool, &[order.id]).await? {
        order.items.push(item);
    }

    Ok(order)
}

fn order_from_row(row: &sqlx::postgres::PgRow) -> OrderDetail {
    OrderDetail {
        id: row.get("id"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        total_amount: row.get("total_amount"),
        status: row.get("status"),
        delivery_address: row.get("delivery_address"),
        payment_method: row.get("payment_method"),
        updated_at: row.get("updated_at"),
        items: Vec::new(),
    }
}

/// Load items for a set of orders in one joined query, component summaries
/// included. Returned pairs carry the parent order id.
async fn load_items(pool: &PgPool, order_ids: &[Uuid]) -> Result<Vec<(Uuid, OrderItemDetail)>, OrderError> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query(
        "SELECT
             oi.id, oi.order_id, oi.quantity, oi.unit_price, oi.subtotal,
             d.id AS dough_id, d.name AS dough_name, d.price AS dough_price,
             fr.id AS frosting_id, fr.name AS frosting_name, fr.color AS frosting_color,
             fr.description AS frosting_description, fr.price AS frosting_price,
             fi.id AS filling_id, fi.name AS filling_name, fi.price AS filling_price
         FROM order_items oi
         JOIN dough_types d ON d.id = oi.dough_id
         JOIN frostings fr ON fr.id = oi.frosting_id
         LEFT JOIN fillings fi ON fi.id = oi.filling_id
         WHERE oi.order_id = ANY($1)
         ORDER BY oi.id",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let filling = row
                .get::<Option<Uuid>, _>("filling_id")
                .map(|id| FillingSummary {
                    id,
                    name: row.get("filling_name"),
                    price: row.get("filling_price"),
                });
            (
                row.get::<Uuid, _>("order_id"),
                OrderItemDetail {
                    id: row.get("id"),
                    quantity: row.get("quantity"),
                    unit_price: row.get("unit_price"),
                    subtotal: row.get("subtotal"),
                    dough: DoughSummary {
                        id: row.get("dough_id"),
                        name: row.get("dough_name"),
                        price: row.get("dough_price"),
                    },
                    frosting: FrostingSummary {
                        id: row.get("frosting_id"),
                        name: row.get("frosting_name"),
                        color: row.get("frosting_color"),
                        description: row.get("frosting_description"),
                        price: row.get("frosting_price"),
                    },
                    filling,
                },
            )
        })
        .collect())
}

// =============================================================================
// STATUS
// =============================================================================

/// Move an order to a new workflow status, stamping `updated_at`.
///
/// The read-modify-write runs in one transaction with the row locked, so
/// concurrent updates serialize on the store.
///
/// # Errors
///
/// `InvalidStatus` for an unknown label, `InvalidTransition` when the
/// workflow forbids the move, `NotFound` when the order does not exist.
pub async fn update_status(pool: &PgPool, order_id: Uuid, new_status: &str) -> Result<(), OrderError> {
    let next = OrderStatus::parse(new_status).ok_or_else(|| OrderError::InvalidStatus(new_status.to_owned()))?;

    let mut tx = pool.begin().await?;

    let current_label = sqlx::query_scalar::<_, String>("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::NotFound(order_id))?;

    let current =
        OrderStatus::parse(&current_label).ok_or_else(|| OrderError::InvalidStatus(current_label.clone()))?;
    if !current.can_transition_to(next) {
        return Err(OrderError::InvalidTransition { from: current, to: next });
    }

    sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
        .bind(order_id)
        .bind(next.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
