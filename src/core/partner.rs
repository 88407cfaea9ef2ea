//! Partner business logic - create, update, and delete trading partners.
//!
//! The (name, kind) pair is unique across all partners: a client "Acme" and a
//! supplier "Acme" may coexist, two client "Acme"s may not. Deletion is
//! guarded, never cascading; a partner with any transaction or payment left
//! cannot be removed.

use crate::{
    entities::{Partner, PartnerKind, Payment, Transaction, partner, payment, transaction},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, PaginatorTrait, QueryOrder, Set, prelude::*,
};

/// Input for registering a new partner.
#[derive(Debug, Clone)]
pub struct NewPartner {
    /// Display name; trimmed before storage, must be non-empty
    pub name: String,
    /// Client, supplier, or both
    pub kind: PartnerKind,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional note
    pub note: Option<String>,
}

/// The mutable fields of a partner; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PartnerPatch {
    /// New display name
    pub name: Option<String>,
    /// New kind
    pub kind: Option<PartnerKind>,
    /// Replacement phone number
    pub phone: Option<String>,
    /// Replacement note
    pub note: Option<String>,
}

/// True when another partner already uses this (name, kind) pair.
async fn partner_exists(
    db: &impl ConnectionTrait,
    name: &str,
    kind: PartnerKind,
    exclude_id: Option<i64>,
) -> Result<bool> {
    let mut query = Partner::find()
        .filter(partner::Column::Name.eq(name))
        .filter(partner::Column::Kind.eq(kind));
    if let Some(id) = exclude_id {
        query = query.filter(partner::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Registers a new partner after the uniqueness check.
pub async fn create_partner(
    db: &DatabaseConnection,
    input: NewPartner,
) -> Result<partner::Model> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::EmptyPartnerName);
    }

    if partner_exists(db, &name, input.kind, None).await? {
        return Err(Error::DuplicatePartner {
            name,
            kind: input.kind,
        });
    }

    let model = partner::ActiveModel {
        name: Set(name),
        kind: Set(input.kind),
        phone: Set(input.phone),
        note: Set(input.note),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Applies a patch to a partner, re-running the uniqueness check when the
/// name or kind changes (excluding the partner itself).
pub async fn update_partner(
    db: &DatabaseConnection,
    partner_id: i64,
    patch: PartnerPatch,
) -> Result<partner::Model> {
    let existing = Partner::find_by_id(partner_id)
        .one(db)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;

    let name = match &patch.name {
        Some(name) => {
            let trimmed = name.trim().to_string();
            if trimmed.is_empty() {
                return Err(Error::EmptyPartnerName);
            }
            trimmed
        }
        None => existing.name.clone(),
    };
    let kind = patch.kind.unwrap_or(existing.kind);

    if (name != existing.name || kind != existing.kind)
        && partner_exists(db, &name, kind, Some(partner_id)).await?
    {
        return Err(Error::DuplicatePartner { name, kind });
    }

    let mut active: partner::ActiveModel = existing.into();
    active.name = Set(name);
    active.kind = Set(kind);
    if let Some(phone) = patch.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(note) = patch.note {
        active.note = Set(Some(note));
    }
    active.updated_at = Set(Some(Utc::now()));

    active.update(db).await.map_err(Into::into)
}

/// Deletes a partner with no remaining transactions or payments.
pub async fn delete_partner(db: &DatabaseConnection, partner_id: i64) -> Result<()> {
    let existing = Partner::find_by_id(partner_id)
        .one(db)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;

    let transactions = Transaction::find()
        .filter(transaction::Column::PartnerId.eq(partner_id))
        .count(db)
        .await?;
    if transactions > 0 {
        return Err(Error::PartnerHasTransactions {
            id: partner_id,
            count: transactions,
        });
    }

    let payments = Payment::find()
        .filter(payment::Column::PartnerId.eq(partner_id))
        .count(db)
        .await?;
    if payments > 0 {
        return Err(Error::PartnerHasPayments {
            id: partner_id,
            count: payments,
        });
    }

    existing.delete(db).await?;
    Ok(())
}

/// Retrieves a specific partner by its unique ID.
pub async fn get_partner_by_id(
    db: &impl ConnectionTrait,
    partner_id: i64,
) -> Result<Option<partner::Model>> {
    Partner::find_by_id(partner_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All partners ordered alphabetically, optionally restricted to one kind.
pub async fn list_partners(
    db: &impl ConnectionTrait,
    kind: Option<PartnerKind>,
) -> Result<Vec<partner::Model>> {
    let mut query = Partner::find().order_by_asc(partner::Column::Name);
    if let Some(kind) = kind {
        query = query.filter(partner::Column::Kind.eq(kind));
    }
    query.all(db).await.map_err(Into::into)
}
