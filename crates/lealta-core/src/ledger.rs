//! # Cart Ledger
//!
//! The ordered collection of line items behind a transaction in progress.
//!
//! ## Ledger Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Ledger Operations                               │
//! │                                                                         │
//! │  User Action              Ledger Call             State Change          │
//! │  ───────────              ───────────             ────────────          │
//! │                                                                         │
//! │  Add article/offer ─────► add(draft) ───────────► items.push(item)      │
//! │                           (validated)                                   │
//! │                                                                         │
//! │  Tap remove ────────────► remove(id) ───────────► items.retain(...)     │
//! │                                                                         │
//! │  Finish/abandon tx ─────► clear() ──────────────► items.clear()         │
//! │                                                                         │
//! │  Recompute totals ──────► items() ──────────────► (read only)           │
//! │                                                                         │
//! │  Insertion order IS display order IS receipt order.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger is the single source of truth for all downstream totals. It is
//! mutated only in response to discrete user actions, never concurrently.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CustomerValidity, LineItem, LineItemDraft, LineItemKind};
use crate::MAX_CART_ITEMS;

/// Ordered, validated collection of cart line items.
///
/// ## Invariants
/// - Items appear in insertion order; ids are unique.
/// - Every `Sale` item has a strictly positive unit amount.
/// - Every item has a non-empty label.
/// - Mutations are rejected unless the customer lookup is `Valid`.
#[derive(Debug, Clone, Default)]
pub struct CartLedger {
    items: Vec<LineItem>,
}

impl CartLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        CartLedger { items: Vec::new() }
    }

    /// Validates a draft and appends it to the end of the ledger.
    ///
    /// ## Validation
    /// - customer validity must be `Valid`
    /// - label must be non-empty after trimming (and is stored trimmed)
    /// - `Sale` items need `unit_amount > 0`; loyalty items may be zero
    /// - quantity must be strictly positive
    /// - the ledger caps at `MAX_CART_ITEMS` entries
    ///
    /// Returns a reference to the stored item so callers can read the
    /// assigned id.
    pub fn add(
        &mut self,
        draft: LineItemDraft,
        validity: CustomerValidity,
    ) -> CoreResult<&LineItem> {
        if validity != CustomerValidity::Valid {
            return Err(ValidationError::CustomerNotValid.into());
        }

        let label = draft.label.trim().to_string();
        if label.is_empty() {
            return Err(ValidationError::Required {
                field: "label".to_string(),
            }
            .into());
        }
        if label.len() > 200 {
            return Err(ValidationError::TooLong {
                field: "label".to_string(),
                max: 200,
            }
            .into());
        }

        if !draft.quantity.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        match draft.kind {
            LineItemKind::Sale => {
                if !draft.unit_amount.is_positive() {
                    return Err(ValidationError::MustBePositive {
                        field: "amount".to_string(),
                    }
                    .into());
                }
            }
            LineItemKind::LoyaltyAction { .. } => {
                // Zero-amount stamp actions are fine; negatives are not.
                if draft.unit_amount.is_negative() {
                    return Err(ValidationError::MustBePositive {
                        field: "amount".to_string(),
                    }
                    .into());
                }
            }
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartFull {
                max: MAX_CART_ITEMS,
            });
        }

        let item = LineItem {
            id: Uuid::new_v4().to_string(),
            label,
            note: draft.note,
            unit_amount: draft.unit_amount,
            quantity: draft.quantity,
            kind: draft.kind,
            added_at: Utc::now(),
        };

        self.items.push(item);
        Ok(self.items.last().expect("just pushed"))
    }

    /// Removes the item with the given id. No-op if absent.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    /// Empties the ledger.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Current ordered sequence, read-only.
    #[inline]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Owned snapshot of the current sequence.
    ///
    /// Submission works on a snapshot so in-flight requests never observe
    /// later ledger edits.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Checks if the ledger is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of line items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Money, Quantity};
    use crate::types::LoyaltyActionKind;

    #[test]
    fn test_add_sale_item() {
        let mut ledger = CartLedger::new();
        let draft = LineItemDraft::sale("Coffee", Money::from_cents(5000))
            .with_quantity(Quantity::from_units(2));

        let item = ledger.add(draft, CustomerValidity::Valid).unwrap();
        assert_eq!(item.label, "Coffee");
        assert_eq!(item.line_total().cents(), 10_000);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_add_rejected_when_customer_not_valid() {
        let mut ledger = CartLedger::new();
        let draft = LineItemDraft::sale("Coffee", Money::from_cents(5000));

        let err = ledger.add(draft.clone(), CustomerValidity::Unknown);
        assert!(matches!(
            err,
            Err(CoreError::Validation(ValidationError::CustomerNotValid))
        ));

        let err = ledger.add(draft, CustomerValidity::Invalid);
        assert!(matches!(
            err,
            Err(CoreError::Validation(ValidationError::CustomerNotValid))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_sale_with_zero_amount_rejected() {
        let mut ledger = CartLedger::new();
        let draft = LineItemDraft::sale("Freebie", Money::zero());

        let err = ledger.add(draft, CustomerValidity::Valid);
        assert!(matches!(
            err,
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(ledger.is_empty()); // ledger unchanged
    }

    #[test]
    fn test_add_loyalty_with_zero_amount_allowed() {
        let mut ledger = CartLedger::new();
        let draft = LineItemDraft::loyalty(
            "Stamp card",
            Money::zero(),
            "offer-1",
            LoyaltyActionKind::Accumulate,
        );

        assert!(ledger.add(draft, CustomerValidity::Valid).is_ok());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_add_empty_label_rejected() {
        let mut ledger = CartLedger::new();
        let draft = LineItemDraft::sale("   ", Money::from_cents(100));

        let err = ledger.add(draft, CustomerValidity::Valid);
        assert!(matches!(
            err,
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_label_stored_trimmed() {
        let mut ledger = CartLedger::new();
        let draft = LineItemDraft::sale("  Coffee  ", Money::from_cents(100));
        let item = ledger.add(draft, CustomerValidity::Valid).unwrap();
        assert_eq!(item.label, "Coffee");
    }

    #[test]
    fn test_remove_and_noop() {
        let mut ledger = CartLedger::new();
        let id = ledger
            .add(
                LineItemDraft::sale("Coffee", Money::from_cents(100)),
                CustomerValidity::Valid,
            )
            .unwrap()
            .id
            .clone();

        ledger.remove("no-such-id"); // no-op
        assert_eq!(ledger.len(), 1);

        ledger.remove(&id);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut ledger = CartLedger::new();
        for label in ["A", "B", "C"] {
            ledger
                .add(
                    LineItemDraft::sale(label, Money::from_cents(100)),
                    CustomerValidity::Valid,
                )
                .unwrap();
        }

        let labels: Vec<&str> = ledger.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut ledger = CartLedger::new();
        ledger
            .add(
                LineItemDraft::sale("Coffee", Money::from_cents(100)),
                CustomerValidity::Valid,
            )
            .unwrap();

        let snapshot = ledger.snapshot();
        ledger.clear();

        assert_eq!(snapshot.len(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_cart_full() {
        let mut ledger = CartLedger::new();
        for i in 0..MAX_CART_ITEMS {
            ledger
                .add(
                    LineItemDraft::sale(format!("Item {}", i), Money::from_cents(100)),
                    CustomerValidity::Valid,
                )
                .unwrap();
        }

        let err = ledger.add(
            LineItemDraft::sale("One too many", Money::from_cents(100)),
            CustomerValidity::Valid,
        );
        assert!(matches!(err, Err(CoreError::CartFull { .. })));
    }
}
