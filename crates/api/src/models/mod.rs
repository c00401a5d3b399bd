//! Domain models for the customer API.
//!
//! Row types derive `sqlx::FromRow` and are loaded by the `db` modules;
//! the read-model types are the client-facing response shapes.

pub mod customer;
pub mod property_address;

pub use customer::{Customer, CustomerReadModel, CustomerSummary};
pub use property_address::{PropertyAddress, PropertyAddressView};
