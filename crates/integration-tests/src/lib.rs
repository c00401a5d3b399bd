//! Integration tests for the Solsage customer API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and the API server
//! cargo run -p solsage-api
//!
//! # Run integration tests (ignored by default)
//! cargo test -p solsage-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `customers_api` - End-to-end customer CRUD and validation tests
//!
//! Tests live in `tests/` and talk to a running server over HTTP; they are
//! marked `#[ignore]` so plain `cargo test` stays self-contained.
