//! Position calculation - the signed contribution of one transaction.
//!
//! The unpaid remainder of a sale is owed to the shop (positive); the unpaid
//! remainder of a purchase is owed by the shop (negative). Pure arithmetic,
//! no store access; inputs are assumed validated by the ledger operations.

use crate::entities::Direction;

/// Signed amount a single transaction contributes to a partner's balance.
#[must_use]
pub fn position(direction: Direction, total: f64, paid: f64) -> f64 {
    let unpaid = total - paid;
    match direction {
        Direction::Sale => unpaid,
        Direction::Purchase => -unpaid,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_sale_position_is_unpaid_remainder() {
        assert_eq!(position(Direction::Sale, 10_000.0, 3_000.0), 7_000.0);
        assert_eq!(position(Direction::Sale, 500.0, 0.0), 500.0);
    }

    #[test]
    fn test_purchase_position_is_negated() {
        assert_eq!(position(Direction::Purchase, 8_000.0, 0.0), -8_000.0);
        assert_eq!(position(Direction::Purchase, 1_000.0, 400.0), -600.0);
    }

    #[test]
    fn test_fully_paid_transaction_contributes_nothing() {
        assert_eq!(position(Direction::Sale, 2_500.0, 2_500.0), 0.0);
        assert_eq!(position(Direction::Purchase, 2_500.0, 2_500.0), 0.0);
    }

    #[test]
    fn test_position_sign_matches_direction() {
        // paid <= total: a sale never decreases the balance, a purchase never
        // increases it.
        for (total, paid) in [(100.0, 0.0), (100.0, 50.0), (100.0, 100.0)] {
            assert!(position(Direction::Sale, total, paid) >= 0.0);
            assert!(position(Direction::Purchase, total, paid) <= 0.0);
        }
    }
}
