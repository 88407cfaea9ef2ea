//! Transaction business logic - create, update, and delete ledger deals.
//!
//! Transactions are editable only on the calendar day they are dated; from
//! the next day on they are locked and can neither be changed nor deleted.
//! The lock is never stored: `is_editable` derives it from the wall clock,
//! and the lock-sensitive operations take `now` explicitly so tests can pin
//! the clock. Creation returns a balance snapshot so the UI can confirm the
//! partner's new position without a second round trip.

use crate::{
    core::{balance::balance_as_of, position::position},
    entities::{
        Direction, LineItems, Partner, Payment, Transaction, payment, transaction,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryOrder, Set, TransactionTrait,
    prelude::*,
};

/// Absolute tolerance when comparing a stated total against the receipt-line sum.
const ITEMS_TOTAL_EPSILON: f64 = 1e-6;

/// Input for recording a new transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// The partner the deal was made with
    pub partner_id: i64,
    /// Business date of the deal
    pub date: DateTimeUtc,
    /// Sale or purchase
    pub direction: Direction,
    /// Full value of the deal, strictly positive
    pub total: f64,
    /// Amount settled at the counter, non-negative
    pub paid: f64,
    /// Optional receipt lines; when non-empty, their sum must equal `total`
    pub items: Option<LineItems>,
    /// Opaque receipt photo reference
    pub image_url: Option<String>,
    /// Raw OCR text
    pub ocr_text: Option<String>,
    /// Optional note
    pub note: Option<String>,
}

/// The mutable fields of a transaction; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    /// New business date
    pub date: Option<DateTimeUtc>,
    /// New direction
    pub direction: Option<Direction>,
    /// New total
    pub total: Option<f64>,
    /// New paid amount
    pub paid: Option<f64>,
    /// Replacement receipt lines
    pub items: Option<LineItems>,
    /// Replacement photo reference
    pub image_url: Option<String>,
    /// Replacement OCR text
    pub ocr_text: Option<String>,
    /// Replacement note
    pub note: Option<String>,
}

/// Balance confirmation returned from transaction creation.
/// Derived on the fly, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSnapshot {
    /// The partner the deal was made with
    pub partner_id: i64,
    /// Partner name, for display
    pub partner_name: String,
    /// Balance from all events dated strictly before the new deal
    pub prior_balance: f64,
    /// Signed contribution of the new deal
    pub position: f64,
    /// `prior_balance` plus `position`
    pub new_balance: f64,
    /// Direction of the new deal
    pub direction: Direction,
}

/// True while the transaction may still be modified: its business date falls
/// on the same UTC calendar day as `now`. One-way by construction; once the
/// clock rolls past midnight the transaction is locked for good.
#[must_use]
pub fn is_editable(date: DateTimeUtc, now: DateTimeUtc) -> bool {
    date.date_naive() == now.date_naive()
}

fn validate_amounts(total: f64, paid: f64) -> Result<()> {
    if !total.is_finite() || total <= 0.0 {
        return Err(Error::InvalidAmount { amount: total });
    }
    if !paid.is_finite() || paid < 0.0 {
        return Err(Error::InvalidAmount { amount: paid });
    }
    Ok(())
}

/// Receipt lines must be individually well-formed and sum to the total.
/// The balance engine never re-derives totals, so consistency is enforced
/// here, at the only write path.
fn validate_items(items: &LineItems, total: f64) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    for item in &items.0 {
        if !item.quantity.is_finite()
            || item.quantity < 1.0
            || !item.unit_price.is_finite()
            || item.unit_price < 0.0
        {
            return Err(Error::InvalidLineItem {
                name: item.name.clone(),
            });
        }
    }
    let computed = items.total();
    if (computed - total).abs() > ITEMS_TOTAL_EPSILON {
        return Err(Error::ItemsTotalMismatch { total, computed });
    }
    Ok(())
}

/// Records a new transaction and returns it with a balance snapshot.
///
/// `paid` greater than `total` is accepted here (an advance at the counter);
/// updates are stricter. Runs inside a database transaction so the snapshot
/// is computed against the same view the insert lands in.
pub async fn create_transaction(
    db: &DatabaseConnection,
    input: NewTransaction,
) -> Result<(transaction::Model, BalanceSnapshot)> {
    validate_amounts(input.total, input.paid)?;
    if let Some(items) = &input.items {
        validate_items(items, input.total)?;
    }

    let txn = db.begin().await?;

    let partner = Partner::find_by_id(input.partner_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartnerNotFound {
            id: input.partner_id,
        })?;

    let prior_balance = balance_as_of(&txn, input.partner_id, input.date).await?;
    let position = position(input.direction, input.total, input.paid);

    let model = transaction::ActiveModel {
        partner_id: Set(input.partner_id),
        date: Set(input.date),
        direction: Set(input.direction),
        total: Set(input.total),
        paid: Set(input.paid),
        items: Set(input.items),
        image_url: Set(input.image_url),
        ocr_text: Set(input.ocr_text),
        note: Set(input.note),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };
    let created = model.insert(&txn).await?;

    txn.commit().await?;

    let snapshot = BalanceSnapshot {
        partner_id: partner.id,
        partner_name: partner.name,
        prior_balance,
        position,
        new_balance: prior_balance + position,
        direction: created.direction,
    };
    Ok((created, snapshot))
}

/// Applies a patch to a same-day transaction.
///
/// Stricter than creation: after merging, `paid` must not exceed `total`.
pub async fn update_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    patch: TransactionPatch,
    now: DateTimeUtc,
) -> Result<transaction::Model> {
    let existing = Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    if !is_editable(existing.date, now) {
        return Err(Error::TransactionLocked { id: transaction_id });
    }

    let total = patch.total.unwrap_or(existing.total);
    let paid = patch.paid.unwrap_or(existing.paid);
    validate_amounts(total, paid)?;
    if paid > total {
        return Err(Error::PaidExceedsTotal { paid, total });
    }
    let items = patch.items.or(existing.items.clone());
    if let Some(items) = &items {
        validate_items(items, total)?;
    }

    let mut active: transaction::ActiveModel = existing.into();
    if let Some(date) = patch.date {
        active.date = Set(date);
    }
    if let Some(direction) = patch.direction {
        active.direction = Set(direction);
    }
    active.total = Set(total);
    active.paid = Set(paid);
    active.items = Set(items);
    if let Some(image_url) = patch.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(ocr_text) = patch.ocr_text {
        active.ocr_text = Set(Some(ocr_text));
    }
    if let Some(note) = patch.note {
        active.note = Set(Some(note));
    }
    active.updated_at = Set(Some(now));

    active.update(db).await.map_err(Into::into)
}

/// Deletes a same-day transaction with no attached payments.
pub async fn delete_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
    now: DateTimeUtc,
) -> Result<()> {
    let existing = Transaction::find_by_id(transaction_id)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    if !is_editable(existing.date, now) {
        return Err(Error::TransactionLocked { id: transaction_id });
    }

    let attached = Payment::find()
        .filter(payment::Column::TransactionId.eq(transaction_id))
        .count(db)
        .await?;
    if attached > 0 {
        return Err(Error::TransactionHasPayments {
            id: transaction_id,
            count: attached,
        });
    }

    existing.delete(db).await?;
    Ok(())
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id(
    db: &impl ConnectionTrait,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All transactions for a partner, newest first.
pub async fn get_transactions_for_partner(
    db: &impl ConnectionTrait,
    partner_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::PartnerId.eq(partner_id))
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
