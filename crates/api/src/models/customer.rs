//! Customer domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use solsage_core::{CustomerId, Email};

use super::property_address::{PropertyAddress, PropertyAddressView};

/// A customer evaluated for solar suitability (row type).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    /// Unique customer ID, generated at creation.
    pub id: CustomerId,
    /// Customer's first name.
    pub first_name: String,
    /// Customer's last name.
    pub last_name: String,
    /// Customer's email address (unique across all customers).
    pub email: Email,
    /// Annual electricity usage in kilowatt-hours, if known.
    pub electricity_usage_kwh: Option<i64>,
    /// Whether the roof is considered old, if known.
    pub old_roof: Option<bool>,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The assembled, client-facing representation of a customer joined with
/// its optional property address.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerReadModel {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub electricity_usage_kwh: Option<i64>,
    pub old_roof: Option<bool>,
    /// Nested address, or `null` if the customer has none yet.
    pub property_address: Option<PropertyAddressView>,
}

impl CustomerReadModel {
    /// Join a customer row with its (possibly absent) address row.
    #[must_use]
    pub fn assemble(customer: Customer, address: Option<PropertyAddress>) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            electricity_usage_kwh: customer.electricity_usage_kwh,
            old_roof: customer.old_roof,
            property_address: address.map(PropertyAddressView::from),
        }
    }
}

/// List-endpoint representation of a customer, without the embedded address.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub electricity_usage_kwh: Option<i64>,
    pub old_roof: Option<bool>,
}

impl From<Customer> for CustomerSummary {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            electricity_usage_kwh: customer.electricity_usage_kwh,
            old_roof: customer.old_roof,
        }
    }
}
