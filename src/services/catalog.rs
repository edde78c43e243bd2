//! Catalog service — dough, frosting, and filling offerings.
//!
//! DESIGN
//! ======
//! `is_available` is a soft-delete flag: listings filter on it, but by-id
//! resolution does not, so components referenced by historical orders keep
//! resolving after they are withdrawn from sale.

use rust_decimal::Decimal;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct DoughRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub is_available: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct FrostingRow {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub is_available: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct FillingRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub is_available: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// List doughs currently offered to new orders.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_doughs(pool: &PgPool) -> Result<Vec<DoughRow>, sqlx::Error> {
    sqlx::query_as::<_, DoughRow>(
        "SELECT id, name, description, price, is_available, created_at
         FROM dough_types
         WHERE is_available
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// List frostings currently offered to new orders.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_frostings(pool: &PgPool) -> Result<Vec<FrostingRow>, sqlx::Error> {
    sqlx::query_as::<_, FrostingRow>(
        "SELECT id, name, color, description, price, is_available, created_at
         FROM frostings
         WHERE is_available
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// List fillings currently offered to new orders.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_fillings(pool: &PgPool) -> Result<Vec<FillingRow>, sqlx::Error> {
    sqlx::query_as::<_, FillingRow>(
        "SELECT id, name, description, price, is_available, created_at
         FROM fillings
         WHERE is_available
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Resolve a dough by id regardless of availability.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_dough(pool: &PgPool, id: Uuid) -> Result<Option<DoughRow>, sqlx::Error> {
    sqlx::query_as::<_, DoughRow>(
        "SELECT id, name, description, price, is_available, created_at
         FROM dough_types
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Resolve a frosting by id regardless of availability.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_frosting(pool: &PgPool, id: Uuid) -> Result<Option<FrostingRow>, sqlx::Error> {
    sqlx::query_as::<_, FrostingRow>(
        "SELECT id, name, color, description, price, is_available, created_at
         FROM frostings
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Resolve a filling by id regardless of availability.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_filling(pool: &PgPool, id: Uuid) -> Result<Option<FillingRow>, sqlx::Error> {
    sqlx::query_as::<_, FillingRow>(
        "SELECT id, name, description, price, is_available, created_at
         FROM fillings
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
