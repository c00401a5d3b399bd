//! Core types for the Solsage customer API.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod postal_code;

pub use email::{Email, EmailError};
pub use id::*;
pub use postal_code::{PostalCode, PostalCodeError};
