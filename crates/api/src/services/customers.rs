//! Customer reconciliation: create, patch, read and list.
//!
//! Every create or patch runs inside a single transaction: all validation
//! happens before the commit, and any failure drops the transaction, so a
//! rejected request never leaves partial writes behind.
//!
//! Validation order is fixed (and observable through the returned error):
//! missing fields, then email shape, then email uniqueness, then the strict
//! type checks, then the nested postal code - only then are writes staged.

use sqlx::{PgConnection, PgPool};

use solsage_core::{CustomerId, PropertyAddressId};

use crate::db::addresses::AddressFields;
use crate::db::customers::{CustomerChanges, NewCustomer};
use crate::db::{self, RepositoryError};
use crate::error::{ApiError, Result, ValidationError};
use crate::models::{CustomerReadModel, CustomerSummary};
use crate::payload::{self, Body};

/// Create a new customer, with an optional nested property address.
///
/// # Errors
///
/// - `MissingFields` / `InvalidEmail` / `BadUsageType` / `BadRoofType` /
///   `InvalidPostalCode` for a payload that fails validation (400).
/// - `EmailTaken` if another customer already holds the email (409).
/// - `Database` if the store fails (500).
pub async fn create_customer(pool: &PgPool, body: &Body) -> Result<CustomerReadModel> {
    let (first_name, last_name, email) = payload::required_fields(body)?;

    let mut tx = pool.begin().await?;

    if db::customers::email_taken(&mut tx, &email, None).await? {
        return Err(ValidationError::EmailTaken.into());
    }

    let electricity_usage_kwh = payload::electricity_usage(body)?;
    let old_roof = payload::old_roof(body)?;
    let address = payload::address_fields(body)?;

    let customer = db::customers::insert(
        &mut tx,
        &NewCustomer {
            id: CustomerId::new(),
            first_name,
            last_name,
            email,
            electricity_usage_kwh,
            old_roof,
        },
    )
    .await?;

    if let Some(fields) = address {
        reconcile_address(&mut tx, customer.id, &fields).await?;
    }

    let model = assemble(&mut tx, customer.id)
        .await?
        .ok_or(ApiError::CustomerNotFound)?;

    tx.commit().await?;

    tracing::info!(customer_id = %model.id, "customer created");
    Ok(model)
}

/// Partially update a customer, and reconcile a nested address sub-payload
/// if one is present.
///
/// Only keys present in the payload are touched; a client-supplied `id` is
/// ignored. The nested postal code is validated before any scalar field is
/// written, so a bad address aborts the whole patch with the customer row
/// untouched.
///
/// # Errors
///
/// - `CustomerNotFound` if the id is unknown (404).
/// - `InvalidEmail` / `BadUsageType` / `BadRoofType` / `InvalidPostalCode`
///   for a payload that fails validation (400).
/// - `EmailTaken` if another customer already holds the new email (409);
///   patching a customer's email to its current value is not a conflict.
/// - `Database` if the store fails (500).
pub async fn patch_customer(
    pool: &PgPool,
    customer_id: CustomerId,
    body: &Body,
) -> Result<CustomerReadModel> {
    let mut tx = pool.begin().await?;

    if db::customers::get(&mut tx, customer_id).await?.is_none() {
        return Err(ApiError::CustomerNotFound);
    }

    let email = payload::patch_email(body)?;
    if let Some(email) = &email
        && db::customers::email_taken(&mut tx, email, Some(customer_id)).await?
    {
        return Err(ValidationError::EmailTaken.into());
    }

    let electricity_usage_kwh = payload::electricity_usage(body)?;
    let old_roof = payload::old_roof(body)?;
    let address = payload::address_fields(body)?;

    let changes = CustomerChanges {
        first_name: payload::patch_name(body, "first_name"),
        last_name: payload::patch_name(body, "last_name"),
        email,
        electricity_usage_kwh,
        old_roof,
    };
    db::customers::update(&mut tx, customer_id, &changes).await?;

    if let Some(fields) = address {
        reconcile_address(&mut tx, customer_id, &fields).await?;
    }

    let model = assemble(&mut tx, customer_id)
        .await?
        .ok_or(ApiError::CustomerNotFound)?;

    tx.commit().await?;

    tracing::info!(customer_id = %model.id, "customer patched");
    Ok(model)
}

/// Get the assembled read-model for one customer.
///
/// # Errors
///
/// Returns `CustomerNotFound` if the id is unknown, `Database` if the store
/// fails.
pub async fn get_customer(pool: &PgPool, customer_id: CustomerId) -> Result<CustomerReadModel> {
    let mut conn = pool.acquire().await?;

    assemble(&mut conn, customer_id)
        .await?
        .ok_or(ApiError::CustomerNotFound)
}

/// List all customers, without embedded addresses.
///
/// # Errors
///
/// Returns `Database` if the store fails.
pub async fn list_customers(pool: &PgPool) -> Result<Vec<CustomerSummary>> {
    let mut conn = pool.acquire().await?;

    let customers = db::customers::list(&mut conn).await?;
    Ok(customers.into_iter().map(CustomerSummary::from).collect())
}

/// Create-if-absent-else-merge for the address sub-resource.
///
/// Looks up the address by owning customer: if none exists a fresh row is
/// inserted with a new id, otherwise only the supplied fields are merged
/// into the existing row. The `UNIQUE (customer_id)` constraint backs this
/// lookup-then-act against concurrent patches for the same customer.
async fn reconcile_address(
    conn: &mut PgConnection,
    customer_id: CustomerId,
    fields: &AddressFields,
) -> Result<()> {
    match db::addresses::get_by_customer(conn, customer_id).await? {
        None => {
            db::addresses::insert(conn, PropertyAddressId::new(), customer_id, fields).await?;
        }
        Some(existing) => {
            db::addresses::update_fields(conn, existing.id, fields).await?;
        }
    }

    Ok(())
}

/// Join a customer row with its (possibly absent) address row.
async fn assemble(
    conn: &mut PgConnection,
    customer_id: CustomerId,
) -> std::result::Result<Option<CustomerReadModel>, RepositoryError> {
    let Some(customer) = db::customers::get(conn, customer_id).await? else {
        return Ok(None);
    };

    let address = db::addresses::get_by_customer(conn, customer_id).await?;

    Ok(Some(CustomerReadModel::assemble(customer, address)))
}
