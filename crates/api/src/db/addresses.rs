//! Property address repository.

use sqlx::{PgConnection, Postgres, QueryBuilder};

use solsage_core::{CustomerId, PostalCode, PropertyAddressId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::PropertyAddress;

/// Message used when the one-address-per-customer constraint rejects a write.
const ADDRESS_EXISTS: &str = "customer already has a property address";

/// Columns selected for [`PropertyAddress`] rows.
const ADDRESS_COLUMNS: &str =
    "id, customer_id, street, city, postal_code, state_code, created_at, updated_at";

/// Validated address fields supplied by a create or patch payload.
///
/// Each field is optional: `None` means the field was not supplied and must
/// not be touched. This is the enumerated allow-list of patchable address
/// fields - `customer_id` is deliberately absent, so the owning customer can
/// never be reassigned through a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<PostalCode>,
    pub state_code: Option<String>,
}

impl AddressFields {
    /// Whether no field would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.city.is_none()
            && self.postal_code.is_none()
            && self.state_code.is_none()
    }
}

/// Get the address owned by a customer, if any.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_customer(
    conn: &mut PgConnection,
    customer_id: CustomerId,
) -> Result<Option<PropertyAddress>, RepositoryError> {
    let query = format!("SELECT {ADDRESS_COLUMNS} FROM property_address WHERE customer_id = $1");

    let row = sqlx::query_as::<_, PropertyAddress>(&query)
        .bind(customer_id)
        .fetch_optional(conn)
        .await?;

    Ok(row)
}

/// Insert a new address row owned by `customer_id`.
///
/// Fields not supplied stay NULL - there is no implicit defaulting.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the customer already has an
/// address (unique `customer_id` constraint).
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert(
    conn: &mut PgConnection,
    id: PropertyAddressId,
    customer_id: CustomerId,
    fields: &AddressFields,
) -> Result<PropertyAddress, RepositoryError> {
    let query = format!(
        "INSERT INTO property_address (id, customer_id, street, city, postal_code, state_code) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {ADDRESS_COLUMNS}"
    );

    sqlx::query_as::<_, PropertyAddress>(&query)
        .bind(id)
        .bind(customer_id)
        .bind(&fields.street)
        .bind(&fields.city)
        .bind(&fields.postal_code)
        .bind(&fields.state_code)
        .fetch_one(conn)
        .await
        .map_err(|e| conflict_on_unique(e, ADDRESS_EXISTS))
}

/// Merge supplied fields into an existing address row.
///
/// Builds an `UPDATE` covering only the supplied fields; untouched columns
/// retain their prior values. A no-op field set writes nothing.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the address does not exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update_fields(
    conn: &mut PgConnection,
    id: PropertyAddressId,
    fields: &AddressFields,
) -> Result<(), RepositoryError> {
    if fields.is_empty() {
        return Ok(());
    }

    let mut query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("UPDATE property_address SET updated_at = now()");

    if let Some(street) = &fields.street {
        query.push(", street = ").push_bind(street);
    }
    if let Some(city) = &fields.city {
        query.push(", city = ").push_bind(city);
    }
    if let Some(postal_code) = &fields.postal_code {
        query.push(", postal_code = ").push_bind(postal_code);
    }
    if let Some(state_code) = &fields.state_code {
        query.push(", state_code = ").push_bind(state_code);
    }

    query.push(" WHERE id = ").push_bind(id);

    let result = query.build().execute(conn).await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
