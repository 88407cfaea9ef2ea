//! Payment business logic - record, amend, and remove settlements.
//!
//! Unlike transactions, payments carry no edit-window lock: a settlement can
//! be amended or removed at any time, and removal has no downstream guards.
//! A payment attached to a transaction only mirrors that transaction's
//! initial paid amount for history views; the attachment is fixed at
//! creation and never changes afterwards.

use crate::{
    entities::{Partner, Payment, Transaction, payment},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder, Set, prelude::*};

/// Input for recording a new payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// The partner the settlement is with
    pub partner_id: i64,
    /// Transaction whose initial paid amount this mirrors, None for standalone
    pub transaction_id: Option<i64>,
    /// Business date of the settlement
    pub date: DateTimeUtc,
    /// Settled amount, strictly positive
    pub amount: f64,
    /// Optional note
    pub note: Option<String>,
}

/// The mutable fields of a payment; `None` leaves a field unchanged.
/// The transaction attachment is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    /// New business date
    pub date: Option<DateTimeUtc>,
    /// New settled amount
    pub amount: Option<f64>,
    /// Replacement note
    pub note: Option<String>,
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Records a settlement for a partner.
///
/// When `transaction_id` is present the transaction must exist and belong to
/// the same partner; the balance engine will then skip this payment, since
/// its amount already lives in the transaction's `paid` field.
pub async fn create_payment(
    db: &DatabaseConnection,
    input: NewPayment,
) -> Result<payment::Model> {
    validate_amount(input.amount)?;

    Partner::find_by_id(input.partner_id)
        .one(db)
        .await?
        .ok_or(Error::PartnerNotFound {
            id: input.partner_id,
        })?;

    if let Some(transaction_id) = input.transaction_id {
        let transaction = Transaction::find_by_id(transaction_id)
            .one(db)
            .await?
            .ok_or(Error::TransactionNotFound { id: transaction_id })?;
        if transaction.partner_id != input.partner_id {
            return Err(Error::PartnerMismatch {
                transaction_id,
                expected: transaction.partner_id,
                actual: input.partner_id,
            });
        }
    }

    let model = payment::ActiveModel {
        partner_id: Set(input.partner_id),
        transaction_id: Set(input.transaction_id),
        date: Set(input.date),
        amount: Set(input.amount),
        note: Set(input.note),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Applies a patch to a payment. No edit window applies.
pub async fn update_payment(
    db: &DatabaseConnection,
    payment_id: i64,
    patch: PaymentPatch,
) -> Result<payment::Model> {
    let existing = Payment::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or(Error::PaymentNotFound { id: payment_id })?;

    if let Some(amount) = patch.amount {
        validate_amount(amount)?;
    }

    let mut active: payment::ActiveModel = existing.into();
    if let Some(date) = patch.date {
        active.date = Set(date);
    }
    if let Some(amount) = patch.amount {
        active.amount = Set(amount);
    }
    if let Some(note) = patch.note {
        active.note = Set(Some(note));
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a payment unconditionally; nothing references payments downstream.
pub async fn delete_payment(db: &DatabaseConnection, payment_id: i64) -> Result<()> {
    let existing = Payment::find_by_id(payment_id)
        .one(db)
        .await?
        .ok_or(Error::PaymentNotFound { id: payment_id })?;

    existing.delete(db).await?;
    Ok(())
}

/// Retrieves a specific payment by its unique ID.
pub async fn get_payment_by_id(
    db: &impl ConnectionTrait,
    payment_id: i64,
) -> Result<Option<payment::Model>> {
    Payment::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All payments for a partner, newest first.
pub async fn get_payments_for_partner(
    db: &impl ConnectionTrait,
    partner_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::PartnerId.eq(partner_id))
        .order_by_desc(payment::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Payments attached to one transaction, oldest first. Used by history views
/// to group a deal's initial paid amount with the deal itself.
pub async fn get_payments_for_transaction(
    db: &impl ConnectionTrait,
    transaction_id: i64,
) -> Result<Vec<payment::Model>> {
    Payment::find()
        .filter(payment::Column::TransactionId.eq(transaction_id))
        .order_by_asc(payment::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::{Direction, partner};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_payment_validation() -> crate::errors::Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let result = create_payment(
                &db,
                NewPayment {
                    partner_id: 1,
                    transaction_id: None,
                    date: Utc::now(),
                    amount,
                    note: None,
                },
            )
            .await;
            assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_partner_not_found() -> crate::errors::Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<partner::Model>::new()])
            .into_connection();

        let result = create_payment(
            &db,
            NewPayment {
                partner_id: 999,
                transaction_id: None,
                date: Utc::now(),
                amount: 50.0,
                note: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::PartnerNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_transaction_not_found() -> crate::errors::Result<()> {
        let (db, partner) = setup_with_partner().await?;

        let result = create_payment(
            &db,
            NewPayment {
                partner_id: partner.id,
                transaction_id: Some(999),
                date: Utc::now(),
                amount: 50.0,
                note: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::TransactionNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_payment_partner_mismatch() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_partner(&db, "Boutique A").await?;
        let other = create_test_partner(&db, "Boutique B").await?;

        let tx = create_dated_transaction(&db, owner.id, Direction::Sale, 1_000.0, 200.0, day(0))
            .await?;

        let result = create_payment(
            &db,
            NewPayment {
                partner_id: other.id,
                transaction_id: Some(tx.id),
                date: day(0),
                amount: 200.0,
                note: None,
            },
        )
        .await;
        assert!(
            matches!(result.unwrap_err(), Error::PartnerMismatch { expected, actual, .. }
                if expected == owner.id && actual == other.id)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_standalone_payment() -> crate::errors::Result<()> {
        let (db, partner) = setup_with_partner().await?;

        let payment = create_payment(
            &db,
            NewPayment {
                partner_id: partner.id,
                transaction_id: None,
                date: day(0),
                amount: 2_000.0,
                note: Some("cash".to_string()),
            },
        )
        .await?;

        assert_eq!(payment.partner_id, partner.id);
        assert_eq!(payment.transaction_id, None);
        assert_eq!(payment.amount, 2_000.0);
        assert_eq!(payment.note.as_deref(), Some("cash"));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_payment_amount() -> crate::errors::Result<()> {
        let (db, partner) = setup_with_partner().await?;

        let payment = create_standalone_payment(&db, partner.id, 500.0, day(0)).await?;

        let updated = update_payment(
            &db,
            payment.id,
            PaymentPatch {
                amount: Some(750.0),
                note: Some("corrected".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(updated.amount, 750.0);
        assert_eq!(updated.note.as_deref(), Some("corrected"));
        // The attachment never changes through updates.
        assert_eq!(updated.transaction_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_payment_rejects_bad_amount() -> crate::errors::Result<()> {
        let (db, partner) = setup_with_partner().await?;

        let payment = create_standalone_payment(&db, partner.id, 500.0, day(0)).await?;

        let result = update_payment(
            &db,
            payment.id,
            PaymentPatch {
                amount: Some(0.0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 0.0 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_payment_not_found() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;

        let result = update_payment(&db, 999, PaymentPatch::default()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::PaymentNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_payment_is_unconditional() -> crate::errors::Result<()> {
        let (db, partner) = setup_with_partner().await?;

        // Even a payment attached to a transaction deletes without guards.
        let tx = create_dated_transaction(&db, partner.id, Direction::Sale, 1_000.0, 300.0, day(0))
            .await?;
        let attached = create_attached_payment(&db, partner.id, tx.id, 300.0, day(0)).await?;

        delete_payment(&db, attached.id).await?;
        assert!(get_payment_by_id(&db, attached.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_payment_not_found() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;

        let result = delete_payment(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::PaymentNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_payments_for_partner_newest_first() -> crate::errors::Result<()> {
        let (db, partner) = setup_with_partner().await?;

        let older = create_standalone_payment(&db, partner.id, 100.0, day(-2)).await?;
        let newer = create_standalone_payment(&db, partner.id, 200.0, day(-1)).await?;

        let all = get_payments_for_partner(&db, partner.id).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[1].id, older.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_payments_for_transaction_grouping() -> crate::errors::Result<()> {
        let (db, partner) = setup_with_partner().await?;

        let tx = create_dated_transaction(&db, partner.id, Direction::Sale, 1_000.0, 300.0, day(0))
            .await?;
        let attached = create_attached_payment(&db, partner.id, tx.id, 300.0, day(0)).await?;
        create_standalone_payment(&db, partner.id, 100.0, day(0)).await?;

        let grouped = get_payments_for_transaction(&db, tx.id).await?;
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].id, attached.id);

        Ok(())
    }
}
