//! Core business logic - framework-agnostic ledger operations.
//!
//! `position` and `balance` form the read side (pure arithmetic plus
//! recompute-from-events queries); `partner`, `transaction`, and `payment`
//! are the only mutators; `dashboard` builds portfolio-wide rollups on top
//! of the balance engine.

/// Balance engine: recompute-from-events balance queries and pure previews
pub mod balance;
/// Portfolio rollups for the dashboard
pub mod dashboard;
/// Partner lifecycle with (name, kind) uniqueness and delete guards
pub mod partner;
/// Payment lifecycle (no edit window, unconditional delete)
pub mod payment;
/// Signed contribution of a single transaction
pub mod position;
/// Transaction lifecycle with the same-day edit lock
pub mod transaction;
