//! HTTP route handlers for the customer API.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health            - Liveness check
//! GET   /health/ready      - Readiness check (pings the database)
//!
//! # Customers
//! POST  /customers         - Create a customer (optional nested address)
//! GET   /customers         - List customers (no embedded addresses)
//! GET   /customers/{id}    - Read one customer with its address
//! PATCH /customers/{id}    - Partially update a customer and/or its address
//! ```

pub mod customers;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(customers::create).get(customers::index))
        .route("/{id}", get(customers::show).patch(customers::update))
}

/// Create all routes for the customer API.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/customers", customer_routes())
}
