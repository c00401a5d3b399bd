//! Customer route handlers.
//!
//! Handlers are thin: payload maps go in, the reconciliation service does
//! the work inside one transaction, and the assembled read-model (or a
//! typed error) comes back out.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use solsage_core::CustomerId;

use crate::error::{ApiError, Result};
use crate::models::{CustomerReadModel, CustomerSummary};
use crate::payload::Body;
use crate::services;
use crate::state::AppState;

/// `POST /customers` - Create a customer with an optional nested address.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Body>,
) -> Result<Json<CustomerReadModel>> {
    let model = services::customers::create_customer(state.pool(), &body).await?;
    Ok(Json(model))
}

/// `GET /customers` - List all customers, without embedded addresses.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CustomerSummary>>> {
    let customers = services::customers::list_customers(state.pool()).await?;
    Ok(Json(customers))
}

/// `GET /customers/{id}` - Read one customer with its address embedded.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerReadModel>> {
    let customer_id = parse_customer_id(&id)?;
    let model = services::customers::get_customer(state.pool(), customer_id).await?;
    Ok(Json(model))
}

/// `PATCH /customers/{id}` - Partially update a customer and/or its address.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Body>,
) -> Result<Json<CustomerReadModel>> {
    let customer_id = parse_customer_id(&id)?;
    let model = services::customers::patch_customer(state.pool(), customer_id, &body).await?;
    Ok(Json(model))
}

/// An id that is not even a well-formed UUID cannot name a customer, so it
/// maps to the same 404 as an unknown one.
fn parse_customer_id(raw: &str) -> Result<CustomerId> {
    raw.parse().map_err(|_| ApiError::CustomerNotFound)
}
