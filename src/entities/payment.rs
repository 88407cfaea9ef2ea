//! Payment entity - A settlement event against a partner's balance.
//!
//! A payment with a `transaction_id` mirrors the initial paid-at-sale amount
//! already embedded in that transaction's `paid` field and exists only for
//! display grouping; the balance engine skips it. A payment without a
//! `transaction_id` is a standalone settlement and is applied to the balance.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the partner this payment belongs to
    pub partner_id: i64,
    /// Attached transaction, None for a standalone settlement
    pub transaction_id: Option<i64>,
    /// Business date of the settlement
    pub date: DateTimeUtc,
    /// Settled amount, strictly positive
    pub amount: f64,
    /// Optional free-form note
    pub note: Option<String>,
    /// When the payment was recorded
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Payment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each payment belongs to one partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
    /// A payment may be attached to one transaction
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionId",
        to = "super::transaction::Column::Id"
    )]
    Transaction,
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
