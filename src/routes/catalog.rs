//! Catalog routes — public listings of available components.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Json, Response};

use crate::routes::error_body;
use crate::services::catalog::{self, DoughRow, FillingRow, FrostingRow};
use crate::state::AppState;

fn db_failure(err: &sqlx::Error) -> Response {
    tracing::error!(error = %err, "catalog query failed");
    error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

/// `GET /api/catalog/doughs` — available doughs. No identity required.
pub async fn list_doughs(State(state): State<AppState>) -> Result<Json<Vec<DoughRow>>, Response> {
    let rows = catalog::list_doughs(&state.pool).await.map_err(|e| db_failure(&e))?;
    Ok(Json(rows))
}

/// `GET /api/catalog/frostings` — available frostings. No identity required.
pub async fn list_frostings(State(state): State<AppState>) -> Result<Json<Vec<FrostingRow>>, Response> {
    let rows = catalog::list_frostings(&state.pool).await.map_err(|e| db_failure(&e))?;
    Ok(Json(rows))
}

/// `GET /api/catalog/fillings` — available fillings. No identity required.
pub async fn list_fillings(State(state): State<AppState>) -> Result<Json<Vec<FillingRow>>, Response> {
    let rows = catalog::list_fillings(&state.pool).await.map_err(|e| db_failure(&e))?;
    Ok(Json(rows))
}
