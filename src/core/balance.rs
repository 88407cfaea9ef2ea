//! Balance engine - derives the net amount owed between shop and partner.
//!
//! The balance is recomputed from scratch on every call by folding two event
//! streams in date order: transaction positions (unpaid remainders, signed by
//! direction) and standalone payments. Payments attached to a transaction are
//! skipped because their effect already lives in that transaction's `paid`
//! field. Recomputing instead of caching trades a little work per read for
//! freedom from cache-invalidation bugs; every computation is idempotent.
//!
//! Payments are applied toward zero rather than blindly subtracted: when the
//! shop owes the partner (negative balance), a settlement moves the balance
//! up toward zero, not further down. An over-payment crosses zero and flips
//! the sign of the debt.

use crate::{
    core::position::position,
    entities::{Direction, Partner, Payment, Transaction, partner, payment, transaction},
    errors::Result,
};
use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder, prelude::*};

/// A partner's balance together with the context a list view needs.
#[derive(Debug, Clone)]
pub struct PartnerBalanceDetail {
    /// The partner being summarized
    pub partner: partner::Model,
    /// Net amount owed; positive means the partner owes the shop
    pub balance: f64,
    /// Most recent transaction, None if the partner has none
    pub last_transaction: Option<transaction::Model>,
    /// Total number of transactions for this partner
    pub transaction_count: u64,
}

/// Applies a settlement toward zero.
///
/// The economic meaning of a payment depends on which party currently owes:
/// it always shrinks the magnitude of the debt, whichever side holds it, and
/// may cross zero when the payment exceeds what is outstanding.
#[must_use]
pub fn apply_payment_toward_zero(balance: f64, amount: f64) -> f64 {
    if balance >= 0.0 {
        balance - amount
    } else {
        balance + amount
    }
}

/// Pure preview of the balance after committing a new transaction.
/// Used for live UI confirmation before any write happens.
#[must_use]
pub fn preview_after_transaction(current: f64, direction: Direction, total: f64, paid: f64) -> f64 {
    current + position(direction, total, paid)
}

/// Pure preview of the balance after recording a standalone payment.
#[must_use]
pub fn preview_after_payment(current: f64, amount: f64) -> f64 {
    apply_payment_toward_zero(current, amount)
}

/// Computes a partner's balance from all events strictly before `as_of`.
///
/// Generic over the connection so it can run inside a database transaction
/// (transaction creation computes its prior-balance snapshot this way).
pub async fn balance_as_of(
    db: &impl ConnectionTrait,
    partner_id: i64,
    as_of: DateTimeUtc,
) -> Result<f64> {
    let transactions = Transaction::find()
        .filter(transaction::Column::PartnerId.eq(partner_id))
        .filter(transaction::Column::Date.lt(as_of))
        .order_by_asc(transaction::Column::Date)
        .all(db)
        .await?;

    let running_balance: f64 = transactions
        .iter()
        .map(|t| position(t.direction, t.total, t.paid))
        .sum();

    // Standalone settlements only; attached payments are already folded into
    // their transaction's `paid` field and must not be counted twice.
    let payments = Payment::find()
        .filter(payment::Column::PartnerId.eq(partner_id))
        .filter(payment::Column::Date.lt(as_of))
        .filter(payment::Column::TransactionId.is_null())
        .all(db)
        .await?;

    let total_payments: f64 = payments.iter().map(|p| p.amount).sum();

    Ok(apply_payment_toward_zero(running_balance, total_payments))
}

/// The partner's balance as of now.
///
/// The upper bound is exclusive, so nudge it just past the current instant to
/// include records stamped at this exact moment.
pub async fn current_balance(db: &impl ConnectionTrait, partner_id: i64) -> Result<f64> {
    balance_as_of(db, partner_id, Utc::now() + Duration::milliseconds(1)).await
}

/// Balance plus list-view context for one partner.
///
/// Returns `Ok(None)` when the partner does not exist: balance queries are
/// read paths and degrade gracefully instead of raising.
pub async fn partner_balance_detail(
    db: &impl ConnectionTrait,
    partner_id: i64,
) -> Result<Option<PartnerBalanceDetail>> {
    let Some(partner) = Partner::find_by_id(partner_id).one(db).await? else {
        return Ok(None);
    };

    let balance = current_balance(db, partner_id).await?;

    let last_transaction = Transaction::find()
        .filter(transaction::Column::PartnerId.eq(partner_id))
        .order_by_desc(transaction::Column::Date)
        .one(db)
        .await?;

    let transaction_count = Transaction::find()
        .filter(transaction::Column::PartnerId.eq(partner_id))
        .count(db)
        .await?;

    Ok(Some(PartnerBalanceDetail {
        partner,
        balance,
        last_transaction,
        transaction_count,
    }))
}
