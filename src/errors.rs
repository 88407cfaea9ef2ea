//! Unified error types and result handling.
//!
//! Every ledger operation fails fast with one of these kinds before touching
//! the store; balance queries never raise business errors (a missing partner
//! yields an absent result instead).

use crate::entities::PartnerKind;
use thiserror::Error;

/// All failure kinds surfaced by the ledger operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The partner a mutation or FK refers to does not exist.
    #[error("Partner {id} not found")]
    PartnerNotFound {
        /// The unresolved partner id
        id: i64,
    },

    /// A transaction id did not resolve.
    #[error("Transaction {id} not found")]
    TransactionNotFound {
        /// The unresolved transaction id
        id: i64,
    },

    /// A payment id did not resolve.
    #[error("Payment {id} not found")]
    PaymentNotFound {
        /// The unresolved payment id
        id: i64,
    },

    /// Edit or delete attempted on a transaction dated before today.
    #[error("Transaction {id} is locked: only same-day transactions can be modified")]
    TransactionLocked {
        /// The locked transaction id
        id: i64,
    },

    /// A monetary amount failed validation (non-positive, negative, or not finite).
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// The paid amount would exceed the transaction total after an update.
    #[error("Paid amount {paid} exceeds total {total}")]
    PaidExceedsTotal {
        /// The rejected paid amount
        paid: f64,
        /// The transaction total
        total: f64,
    },

    /// A receipt line has a quantity below one or a negative unit price.
    #[error("Invalid receipt line: {name}")]
    InvalidLineItem {
        /// Name of the offending line
        name: String,
    },

    /// Receipt lines are present but their sum disagrees with the total.
    #[error("Receipt lines sum to {computed}, but total is {total}")]
    ItemsTotalMismatch {
        /// The stated transaction total
        total: f64,
        /// The sum of quantity x unit price over the lines
        computed: f64,
    },

    /// Partner name was empty after trimming.
    #[error("Partner name must not be empty")]
    EmptyPartnerName,

    /// A partner with the same name and kind already exists.
    #[error("A {kind} named \"{name}\" already exists")]
    DuplicatePartner {
        /// The duplicate name
        name: String,
        /// The duplicate kind
        kind: PartnerKind,
    },

    /// A payment references a transaction belonging to a different partner.
    #[error("Transaction {transaction_id} belongs to partner {expected}, not {actual}")]
    PartnerMismatch {
        /// The referenced transaction
        transaction_id: i64,
        /// Partner the transaction belongs to
        expected: i64,
        /// Partner the payment named
        actual: i64,
    },

    /// Partner deletion blocked by transactions that still reference it.
    #[error("Partner {id} still has {count} transaction(s)")]
    PartnerHasTransactions {
        /// The partner id
        id: i64,
        /// Number of referencing transactions
        count: u64,
    },

    /// Partner deletion blocked by payments that still reference it.
    #[error("Partner {id} still has {count} payment(s)")]
    PartnerHasPayments {
        /// The partner id
        id: i64,
        /// Number of referencing payments
        count: u64,
    },

    /// Transaction deletion blocked by attached payments.
    #[error("Transaction {id} still has {count} attached payment(s)")]
    TransactionHasPayments {
        /// The transaction id
        id: i64,
        /// Number of attached payments
        count: u64,
    },

    /// Any error bubbling up from the store.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
