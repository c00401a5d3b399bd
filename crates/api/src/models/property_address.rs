//! Property address domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use solsage_core::{CustomerId, PostalCode, PropertyAddressId};

/// A physical address tied to exactly one customer (row type).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PropertyAddress {
    /// Unique address ID, generated when the address is first created.
    pub id: PropertyAddressId,
    /// Owning customer. Set once at creation, never reassigned.
    pub customer_id: CustomerId,
    /// Street line.
    pub street: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// Five-digit postal code.
    pub postal_code: Option<PostalCode>,
    /// Short state code (e.g., "MA").
    pub state_code: Option<String>,
    /// When the address was created.
    pub created_at: DateTime<Utc>,
    /// When the address was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The nested address shape embedded in a customer read-model.
///
/// Exposes every address field except the id and the customer backlink.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyAddressView {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<PostalCode>,
    pub state_code: Option<String>,
}

impl From<PropertyAddress> for PropertyAddressView {
    fn from(address: PropertyAddress) -> Self {
        Self {
            street: address.street,
            city: address.city,
            postal_code: address.postal_code,
            state_code: address.state_code,
        }
    }
}
