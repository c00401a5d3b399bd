//! Customer repository.

use sqlx::{PgConnection, Postgres, QueryBuilder};

use solsage_core::{CustomerId, Email};

use super::{RepositoryError, conflict_on_unique};
use crate::models::Customer;

/// Message used when the email uniqueness constraint rejects a write.
const EMAIL_TAKEN: &str = "email already taken";

/// Columns selected for [`Customer`] rows.
const CUSTOMER_COLUMNS: &str =
    "id, first_name, last_name, email, electricity_usage_kwh, old_roof, created_at, updated_at";

/// Parameters for inserting a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    /// Freshly generated customer ID.
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub electricity_usage_kwh: Option<i64>,
    pub old_roof: Option<bool>,
}

/// Scalar field changes to apply to an existing customer.
///
/// Each field is optional: `None` leaves the stored value untouched. This is
/// the enumerated allow-list of patchable customer fields - notably there is
/// no `id` here, so a client-supplied `id` can never reassign identity.
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub electricity_usage_kwh: Option<i64>,
    pub old_roof: Option<bool>,
}

impl CustomerChanges {
    /// Whether no field would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.electricity_usage_kwh.is_none()
            && self.old_roof.is_none()
    }
}

/// Insert a new customer row.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email is already taken.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert(
    conn: &mut PgConnection,
    customer: &NewCustomer,
) -> Result<Customer, RepositoryError> {
    let query = format!(
        "INSERT INTO customer (id, first_name, last_name, email, electricity_usage_kwh, old_roof) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {CUSTOMER_COLUMNS}"
    );

    sqlx::query_as::<_, Customer>(&query)
        .bind(customer.id)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(customer.electricity_usage_kwh)
        .bind(customer.old_roof)
        .fetch_one(conn)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))
}

/// Get a customer by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(
    conn: &mut PgConnection,
    id: CustomerId,
) -> Result<Option<Customer>, RepositoryError> {
    let query = format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = $1");

    let row = sqlx::query_as::<_, Customer>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(row)
}

/// List all customers.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(conn: &mut PgConnection) -> Result<Vec<Customer>, RepositoryError> {
    let query = format!("SELECT {CUSTOMER_COLUMNS} FROM customer ORDER BY created_at ASC");

    let rows = sqlx::query_as::<_, Customer>(&query)
        .fetch_all(conn)
        .await?;

    Ok(rows)
}

/// Whether a customer row other than `exclude` already holds this email.
///
/// Runs against the caller's transaction, so uncommitted writes staged
/// earlier in the same request are visible.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn email_taken(
    conn: &mut PgConnection,
    email: &Email,
    exclude: Option<CustomerId>,
) -> Result<bool, RepositoryError> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM customer WHERE email = $1 AND ($2 IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(exclude)
    .fetch_one(conn)
    .await?;

    Ok(taken)
}

/// Apply scalar field changes to an existing customer.
///
/// Builds an `UPDATE` covering only the supplied fields; untouched columns
/// retain their prior values. A no-op change set writes nothing.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if an email change collides with
/// another customer.
/// Returns `RepositoryError::NotFound` if the customer does not exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update(
    conn: &mut PgConnection,
    id: CustomerId,
    changes: &CustomerChanges,
) -> Result<(), RepositoryError> {
    if changes.is_empty() {
        return Ok(());
    }

    let mut query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("UPDATE customer SET updated_at = now()");

    if let Some(first_name) = &changes.first_name {
        query.push(", first_name = ").push_bind(first_name);
    }
    if let Some(last_name) = &changes.last_name {
        query.push(", last_name = ").push_bind(last_name);
    }
    if let Some(email) = &changes.email {
        query.push(", email = ").push_bind(email);
    }
    if let Some(usage) = changes.electricity_usage_kwh {
        query.push(", electricity_usage_kwh = ").push_bind(usage);
    }
    if let Some(old_roof) = changes.old_roof {
        query.push(", old_roof = ").push_bind(old_roof);
    }

    query.push(" WHERE id = ").push_bind(id);

    let result = query
        .build()
        .execute(conn)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
