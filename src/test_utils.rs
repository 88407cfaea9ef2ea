//! Shared test utilities.
//!
//! Common helpers for setting up in-memory test databases and creating test
//! entities with sensible defaults. Dates are expressed relative to today's
//! UTC midnight via [`day`], so same-day edit-lock behavior is deterministic
//! within a test run.

use crate::{
    core::{partner, payment, transaction},
    entities::{self, Direction, PartnerKind},
    errors::Result,
};
use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use sea_orm::prelude::DateTimeUtc;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Today's UTC midnight shifted by `offset` days. `day(0)` is always in the
/// past relative to `Utc::now()`, so it is safe for current-balance queries.
#[must_use]
pub fn day(offset: i64) -> DateTimeUtc {
    let midnight = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();
    midnight + Duration::days(offset)
}

/// Creates a test partner with sensible defaults (a client, no phone or note).
pub async fn create_test_partner(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::partner::Model> {
    create_custom_partner(db, name, PartnerKind::Client).await
}

/// Creates a test partner of a specific kind.
pub async fn create_custom_partner(
    db: &DatabaseConnection,
    name: &str,
    kind: PartnerKind,
) -> Result<entities::partner::Model> {
    partner::create_partner(
        db,
        partner::NewPartner {
            name: name.to_string(),
            kind,
            phone: None,
            note: None,
        },
    )
    .await
}

/// Creates a transaction on a given business date, with no receipt lines.
pub async fn create_dated_transaction(
    db: &DatabaseConnection,
    partner_id: i64,
    direction: Direction,
    total: f64,
    paid: f64,
    date: DateTimeUtc,
) -> Result<entities::transaction::Model> {
    let (model, _snapshot) = transaction::create_transaction(
        db,
        transaction::NewTransaction {
            partner_id,
            date,
            direction,
            total,
            paid,
            items: None,
            image_url: None,
            ocr_text: None,
            note: None,
        },
    )
    .await?;
    Ok(model)
}

/// Creates a standalone settlement (no transaction attachment).
pub async fn create_standalone_payment(
    db: &DatabaseConnection,
    partner_id: i64,
    amount: f64,
    date: DateTimeUtc,
) -> Result<entities::payment::Model> {
    payment::create_payment(
        db,
        payment::NewPayment {
            partner_id,
            transaction_id: None,
            date,
            amount,
            note: None,
        },
    )
    .await
}

/// Creates a payment attached to a transaction (display-grouping mirror of
/// the initial paid amount).
pub async fn create_attached_payment(
    db: &DatabaseConnection,
    partner_id: i64,
    transaction_id: i64,
    amount: f64,
    date: DateTimeUtc,
) -> Result<entities::payment::Model> {
    payment::create_payment(
        db,
        payment::NewPayment {
            partner_id,
            transaction_id: Some(transaction_id),
            date,
            amount,
            note: None,
        },
    )
    .await
}

/// Sets up a complete test environment with one client partner.
/// Returns (db, partner) for common test scenarios.
pub async fn setup_with_partner() -> Result<(DatabaseConnection, entities::partner::Model)> {
    let db = setup_test_db().await?;
    let partner = create_test_partner(&db, "Test Partner").await?;
    Ok((db, partner))
}
