//! # Totals Calculator
//!
//! Derives every monetary figure a transaction shows from the ledger, the
//! customer balance, and the redemption flag. Pure, stateless, recomputed on
//! every mutation.
//!
//! ## Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      TransactionTotals                                  │
//! │                                                                         │
//! │  sale_subtotal      = Σ line_total over Sale items                      │
//! │  loyalty_subtotal   = Σ line_total over LoyaltyAction items (info only) │
//! │                                                                         │
//! │  redemption_applied = requested ? min(balance, sale_subtotal) : 0       │
//! │                       NEVER applies to loyalty_subtotal                 │
//! │                                                                         │
//! │  amount_due         = max(0, sale_subtotal - redemption_applied)        │
//! │  projected_balance  = balance - redemption_applied                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loyalty items are deliberately never discountable: redeeming points
//! against a stamp action would double-count the reward.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::LineItem;

/// Fully derived transaction figures. No independent storage anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTotals {
    /// Sum over `Sale` items only.
    pub sale_subtotal: Money,

    /// Sum over `LoyaltyAction` items only (informational).
    pub loyalty_subtotal: Money,

    /// Points applied as a discount against the sale subtotal.
    pub redemption_applied: Money,

    /// What the customer actually pays.
    pub amount_due: Money,

    /// Balance after the redemption is committed.
    pub projected_balance: Money,
}

impl TransactionTotals {
    /// Computes totals from the ledger items and customer state.
    ///
    /// Pure function: identical inputs always yield identical output.
    ///
    /// ## Edge Cases
    /// - Empty `items` ⇒ everything zero except `projected_balance = balance`.
    /// - `balance` zero ⇒ redemption is zero regardless of the flag.
    /// - `redemption_requested = false` ⇒ redemption is zero.
    pub fn compute(items: &[LineItem], balance: Money, redemption_requested: bool) -> Self {
        let mut sale_subtotal = Money::zero();
        let mut loyalty_subtotal = Money::zero();

        for item in items {
            if item.kind.is_sale() {
                sale_subtotal += item.line_total();
            } else {
                loyalty_subtotal += item.line_total();
            }
        }

        let redemption_applied = if redemption_requested {
            balance.min(sale_subtotal)
        } else {
            Money::zero()
        };

        TransactionTotals {
            sale_subtotal,
            loyalty_subtotal,
            redemption_applied,
            amount_due: sale_subtotal.saturating_sub(redemption_applied),
            projected_balance: balance - redemption_applied,
        }
    }

    /// Combined monetary figure for the receipt header: sale subtotal plus
    /// the loyalty items' informational amounts.
    #[inline]
    pub fn combined_total(&self) -> Money {
        self.sale_subtotal + self.loyalty_subtotal
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Quantity;
    use crate::types::{LineItemKind, LoyaltyActionKind};
    use chrono::Utc;

    fn sale_item(label: &str, cents: i64, qty: i64) -> LineItem {
        LineItem {
            id: label.to_string(),
            label: label.to_string(),
            note: None,
            unit_amount: Money::from_cents(cents),
            quantity: Quantity::from_units(qty),
            kind: LineItemKind::Sale,
            added_at: Utc::now(),
        }
    }

    fn loyalty_item(label: &str, cents: i64, action: LoyaltyActionKind) -> LineItem {
        LineItem {
            id: label.to_string(),
            label: label.to_string(),
            note: None,
            unit_amount: Money::from_cents(cents),
            quantity: Quantity::one(),
            kind: LineItemKind::LoyaltyAction {
                offer_id: format!("offer-{}", label),
                action,
            },
            added_at: Utc::now(),
        }
    }

    /// [Sale $50.00 × 2], balance $30, redemption requested.
    #[test]
    fn test_sale_with_partial_redemption() {
        let items = vec![sale_item("Coffee", 5000, 2)];
        let totals = TransactionTotals::compute(&items, Money::from_cents(3000), true);

        assert_eq!(totals.sale_subtotal.cents(), 10_000);
        assert_eq!(totals.redemption_applied.cents(), 3000);
        assert_eq!(totals.amount_due.cents(), 7000);
        assert_eq!(totals.projected_balance.cents(), 0);
    }

    #[test]
    fn test_partition_excludes_other_kind() {
        let items = vec![
            sale_item("Coffee", 4000, 1),
            loyalty_item("Stamp", 1500, LoyaltyActionKind::Accumulate),
        ];
        let totals = TransactionTotals::compute(&items, Money::zero(), false);

        assert_eq!(totals.sale_subtotal.cents(), 4000);
        assert_eq!(totals.loyalty_subtotal.cents(), 1500);
        assert_eq!(totals.combined_total().cents(), 5500);
    }

    #[test]
    fn test_redemption_never_touches_loyalty_subtotal() {
        // Only loyalty items in the cart: nothing to redeem against.
        let items = vec![loyalty_item("Stamp", 2000, LoyaltyActionKind::Redeem)];
        let totals = TransactionTotals::compute(&items, Money::from_cents(3000), true);

        assert_eq!(totals.sale_subtotal.cents(), 0);
        assert_eq!(totals.redemption_applied.cents(), 0);
        assert_eq!(totals.amount_due.cents(), 0);
        assert_eq!(totals.projected_balance.cents(), 3000);
    }

    #[test]
    fn test_redemption_capped_by_sale_subtotal() {
        // Balance exceeds subtotal: cap at the subtotal, due drops to zero.
        let items = vec![sale_item("Snack", 500, 1)];
        let totals = TransactionTotals::compute(&items, Money::from_cents(3000), true);

        assert_eq!(totals.redemption_applied.cents(), 500);
        assert_eq!(totals.amount_due.cents(), 0);
        assert_eq!(totals.projected_balance.cents(), 2500);
    }

    #[test]
    fn test_no_redemption_when_not_requested() {
        let items = vec![sale_item("Coffee", 5000, 1)];
        let totals = TransactionTotals::compute(&items, Money::from_cents(3000), false);

        assert_eq!(totals.redemption_applied.cents(), 0);
        assert_eq!(totals.amount_due.cents(), 5000);
        assert_eq!(totals.projected_balance.cents(), 3000);
    }

    #[test]
    fn test_zero_balance_never_redeems() {
        let items = vec![sale_item("Coffee", 5000, 1)];
        let totals = TransactionTotals::compute(&items, Money::zero(), true);

        assert_eq!(totals.redemption_applied.cents(), 0);
        assert_eq!(totals.amount_due.cents(), 5000);
    }

    #[test]
    fn test_empty_ledger_all_zero() {
        let totals = TransactionTotals::compute(&[], Money::from_cents(3000), true);

        assert!(totals.sale_subtotal.is_zero());
        assert!(totals.loyalty_subtotal.is_zero());
        assert!(totals.redemption_applied.is_zero());
        assert!(totals.amount_due.is_zero());
        assert_eq!(totals.projected_balance.cents(), 3000);
    }

    #[test]
    fn test_idempotent() {
        let items = vec![
            sale_item("Coffee", 5000, 2),
            loyalty_item("Stamp", 0, LoyaltyActionKind::Accumulate),
        ];
        let balance = Money::from_cents(3000);

        let a = TransactionTotals::compute(&items, balance, true);
        let b = TransactionTotals::compute(&items, balance, true);
        assert_eq!(a, b);
    }
}
