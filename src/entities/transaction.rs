//! Transaction entity - A sale to a client or a purchase from a supplier.
//!
//! `total` is the full value of the deal and `paid` the amount settled at the
//! counter; the unpaid remainder is what the transaction contributes to the
//! partner's balance. Optional `items` hold the OCR-extracted receipt lines as
//! a JSON column; `image_url` and `ocr_text` are opaque to the core.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether the shop sold or bought.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Shop sold to the partner; the unpaid remainder is owed to the shop.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Shop bought from the partner; the unpaid remainder is owed by the shop.
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
        };
        f.write_str(s)
    }
}

/// A single receipt line: quantity of a named article at a unit price.
///
/// Quantities are fractional on purpose: bulk goods are sold by weight or
/// volume (1.5 kg of rice at a per-kilo price), so anything from 1 upward is
/// a valid quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Article name as read from the receipt
    pub name: String,
    /// Units, weight, or volume; at least 1
    pub quantity: f64,
    /// Price per unit, non-negative
    pub unit_price: f64,
}

/// Ordered receipt lines, stored as a JSON column on the transaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct LineItems(pub Vec<LineItem>);

impl LineItems {
    /// Sum of quantity x unit price over all lines.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().map(|i| i.quantity * i.unit_price).sum()
    }

    /// True when there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the partner this transaction belongs to
    pub partner_id: i64,
    /// Business date of the deal (day granularity drives the edit lock)
    pub date: DateTimeUtc,
    /// Sale or purchase
    pub direction: Direction,
    /// Full value of the deal, strictly positive
    pub total: f64,
    /// Amount settled at the time of the deal
    pub paid: f64,
    /// Optional receipt lines extracted upstream
    #[sea_orm(column_type = "Json", nullable)]
    pub items: Option<LineItems>,
    /// Opaque reference to the receipt photo, if any
    pub image_url: Option<String>,
    /// Raw OCR text, not interpreted by the core
    pub ocr_text: Option<String>,
    /// Optional free-form note
    pub note: Option<String>,
    /// When the transaction was recorded
    pub created_at: DateTimeUtc,
    /// When the transaction was last modified, None if never
    pub updated_at: Option<DateTimeUtc>,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
    /// Payments attached to this transaction's initial paid amount
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
