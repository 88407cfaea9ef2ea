//! Partner entity - Represents a trading partner of the shop.
//!
//! A partner is either a client (owes the shop), a supplier (the shop owes
//! them), or both. The (`name`, `kind`) pair is unique across all partners;
//! the check lives in the partner operations, not in a database constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which side of the counter a partner sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PartnerKind {
    /// Buys from the shop; a positive balance means they owe the shop.
    #[sea_orm(string_value = "client")]
    Client,
    /// Sells to the shop; a negative balance means the shop owes them.
    #[sea_orm(string_value = "supplier")]
    Supplier,
    /// Trades in both directions.
    #[sea_orm(string_value = "both")]
    Both,
}

impl std::fmt::Display for PartnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Client => "client",
            Self::Supplier => "supplier",
            Self::Both => "both",
        };
        f.write_str(s)
    }
}

/// Partner database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    /// Unique identifier for the partner
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, stored trimmed and non-empty
    pub name: String,
    /// Client, supplier, or both
    pub kind: PartnerKind,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional free-form note
    pub note: Option<String>,
    /// When the partner was created
    pub created_at: DateTimeUtc,
    /// When the partner was last modified, None if never
    pub updated_at: Option<DateTimeUtc>,
}

/// Defines relationships between Partner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One partner has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One partner has many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
