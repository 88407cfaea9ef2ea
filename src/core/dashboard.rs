//! Portfolio rollups for the dashboard.
//!
//! Builds portfolio-wide aggregates by invoking the balance engine once per
//! partner. Each partner's balance is computed independently with no shared
//! state, so callers are free to parallelize; the sequential fold here is
//! plenty at single-shop scale.

use crate::{
    core::balance::{PartnerBalanceDetail, partner_balance_detail},
    entities::{Partner, PartnerKind, partner},
    errors::Result,
};
use sea_orm::{ConnectionTrait, QueryOrder, prelude::*};

/// Shop-wide totals across every partner.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSummary {
    /// Sum of all positive balances (what clients owe the shop)
    pub total_receivable: f64,
    /// Sum of the magnitudes of all negative balances (what the shop owes)
    pub total_payable: f64,
    /// Receivable minus payable
    pub net: f64,
    /// Total number of transactions across all partners
    pub transaction_count: u64,
    /// Number of partners included
    pub partner_count: u64,
}

/// Balance detail for every partner, optionally restricted to one kind.
///
/// The kind filter is exact: a `both` partner is returned only by the `both`
/// filter or by no filter at all.
pub async fn portfolio_balances(
    db: &impl ConnectionTrait,
    kind: Option<PartnerKind>,
) -> Result<Vec<PartnerBalanceDetail>> {
    let mut query = Partner::find().order_by_asc(partner::Column::Name);
    if let Some(kind) = kind {
        query = query.filter(partner::Column::Kind.eq(kind));
    }
    let partners = query.all(db).await?;

    let mut details = Vec::with_capacity(partners.len());
    for p in partners {
        // The partner was just fetched, so the detail is always present.
        if let Some(detail) = partner_balance_detail(db, p.id).await? {
            details.push(detail);
        }
    }
    Ok(details)
}

/// Partners owing the shop the most, largest debt first. Partners with a
/// zero or negative balance are not debtors and are left out.
pub async fn top_debtors(
    db: &impl ConnectionTrait,
    limit: usize,
) -> Result<Vec<PartnerBalanceDetail>> {
    let mut details: Vec<_> = portfolio_balances(db, None)
        .await?
        .into_iter()
        .filter(|d| d.balance > 0.0)
        .collect();
    details.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    details.truncate(limit);
    Ok(details)
}

/// Partners the shop owes the most, largest debt first (most negative
/// balance leads). Partners the shop owes nothing are left out.
pub async fn top_creditors(
    db: &impl ConnectionTrait,
    limit: usize,
) -> Result<Vec<PartnerBalanceDetail>> {
    let mut details: Vec<_> = portfolio_balances(db, None)
        .await?
        .into_iter()
        .filter(|d| d.balance < 0.0)
        .collect();
    details.sort_by(|a, b| a.balance.total_cmp(&b.balance));
    details.truncate(limit);
    Ok(details)
}

/// Shop-wide receivable/payable totals, derived from the full portfolio.
pub async fn global_summary(db: &impl ConnectionTrait) -> Result<GlobalSummary> {
    let details = portfolio_balances(db, None).await?;

    let mut summary = GlobalSummary {
        total_receivable: 0.0,
        total_payable: 0.0,
        net: 0.0,
        transaction_count: 0,
        partner_count: details.len() as u64,
    };

    for detail in &details {
        if detail.balance >= 0.0 {
            summary.total_receivable += detail.balance;
        } else {
            summary.total_payable += -detail.balance;
        }
        summary.transaction_count += detail.transaction_count;
    }
    summary.net = summary.total_receivable - summary.total_payable;

    Ok(summary)
}
