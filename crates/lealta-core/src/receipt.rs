//! # Receipt Composer
//!
//! Pure formatting of a completed transaction into the message sent to the
//! customer's messaging app.
//!
//! ## Message Shape
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Cafe Central - Receipt                      │
//! │ Customer: Ana (1155550199)                  │
//! │                                             │
//! │ 2 x Coffee - $100.00                        │
//! │ 1 x Stamp card [accumulate] - $0.00         │
//! │                                             │
//! │ Subtotal: $100.00                           │
//! │ Points redeemed: -$30.00                    │
//! │ Total charged: $70.00                       │
//! │ Points balance: $30.00 -> $0.00             │
//! │                                             │
//! │ Loyalty:                                    │
//! │ - Stamp card: accumulate (3/10, 30%)        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The composer has no side effects; the engine hands the finished string to
//! the messaging dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use ts_rs::TS;

use crate::money::{Money, Quantity};
use crate::types::{LoyaltyActionKind, LoyaltyProgress};

// =============================================================================
// Receipt Data
// =============================================================================

/// How a receipt line came to be, for display annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineAnnotation {
    Sale,
    Accumulate,
    Redeem,
}

impl LineAnnotation {
    fn label(&self) -> &'static str {
        match self {
            LineAnnotation::Sale => "sale",
            LineAnnotation::Accumulate => "accumulate",
            LineAnnotation::Redeem => "redeem",
        }
    }
}

impl From<LoyaltyActionKind> for LineAnnotation {
    fn from(action: LoyaltyActionKind) -> Self {
        match action {
            LoyaltyActionKind::Accumulate => LineAnnotation::Accumulate,
            LoyaltyActionKind::Redeem => LineAnnotation::Redeem,
        }
    }
}

/// One line of the receipt, in original cart insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub label: String,
    pub quantity: Quantity,
    pub unit_amount: Money,
    pub line_total: Money,
    pub annotation: LineAnnotation,
}

/// Per-offer summary appended when the cart carried loyalty actions.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySection {
    pub offer_name: String,
    pub action: LoyaltyActionKind,
    /// Refetched after submission; `None` renders as "no data".
    pub progress: Option<LoyaltyProgress>,
}

/// The structured summary of a committed transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub business_name: String,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,

    /// Full ordered line list (cart insertion order).
    pub lines: Vec<ReceiptLine>,

    pub sale_subtotal: Money,
    pub loyalty_subtotal: Money,
    pub redemption_applied: Money,
    pub amount_due: Money,

    pub balance_before: Money,
    pub balance_after: Money,

    /// Present only when the cart carried loyalty actions.
    pub loyalty_sections: Vec<LoyaltySection>,
}

impl TransactionReceipt {
    /// Combined monetary total shown in the header line.
    #[inline]
    pub fn combined_total(&self) -> Money {
        self.sale_subtotal + self.loyalty_subtotal
    }
}

// =============================================================================
// Message Composition
// =============================================================================

/// Renders the receipt into the line-oriented customer message.
pub fn compose_message(receipt: &TransactionReceipt) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} - Receipt", receipt.business_name);
    match &receipt.customer_name {
        Some(name) => {
            let _ = writeln!(out, "Customer: {} ({})", name, receipt.customer_phone);
        }
        None => {
            let _ = writeln!(out, "Customer: {}", receipt.customer_phone);
        }
    }
    out.push('\n');

    for line in &receipt.lines {
        match line.annotation {
            LineAnnotation::Sale => {
                let _ = writeln!(
                    out,
                    "{} x {} - {}",
                    line.quantity, line.label, line.line_total
                );
            }
            annotation => {
                let _ = writeln!(
                    out,
                    "{} x {} [{}] - {}",
                    line.quantity,
                    line.label,
                    annotation.label(),
                    line.line_total
                );
            }
        }
    }
    out.push('\n');

    let _ = writeln!(out, "Subtotal: {}", receipt.combined_total());
    if receipt.redemption_applied.is_positive() {
        let _ = writeln!(out, "Points redeemed: -{}", receipt.redemption_applied);
    }
    let _ = writeln!(out, "Total charged: {}", receipt.amount_due);
    let _ = writeln!(
        out,
        "Points balance: {} -> {}",
        receipt.balance_before, receipt.balance_after
    );

    if !receipt.loyalty_sections.is_empty() {
        out.push('\n');
        out.push_str("Loyalty:\n");
        for section in &receipt.loyalty_sections {
            let action = LineAnnotation::from(section.action).label();
            match &section.progress {
                Some(p) => {
                    let _ = writeln!(
                        out,
                        "- {}: {} ({}/{}, {}%)",
                        section.offer_name, action, p.accumulated, p.target, p.percent
                    );
                }
                None => {
                    let _ = writeln!(out, "- {}: {} (no data)", section.offer_name, action);
                }
            }
        }
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base_receipt() -> TransactionReceipt {
        TransactionReceipt {
            business_name: "Cafe Central".to_string(),
            customer_phone: "1155550199".to_string(),
            customer_name: Some("Ana".to_string()),
            completed_at: Utc::now(),
            lines: vec![
                ReceiptLine {
                    label: "Coffee".to_string(),
                    quantity: Quantity::from_units(2),
                    unit_amount: Money::from_cents(5000),
                    line_total: Money::from_cents(10_000),
                    annotation: LineAnnotation::Sale,
                },
                ReceiptLine {
                    label: "Stamp card".to_string(),
                    quantity: Quantity::one(),
                    unit_amount: Money::zero(),
                    line_total: Money::zero(),
                    annotation: LineAnnotation::Accumulate,
                },
            ],
            sale_subtotal: Money::from_cents(10_000),
            loyalty_subtotal: Money::zero(),
            redemption_applied: Money::from_cents(3000),
            amount_due: Money::from_cents(7000),
            balance_before: Money::from_cents(3000),
            balance_after: Money::zero(),
            loyalty_sections: vec![LoyaltySection {
                offer_name: "Stamp card".to_string(),
                action: LoyaltyActionKind::Accumulate,
                progress: Some(LoyaltyProgress {
                    accumulated: 3,
                    target: 10,
                    percent: 30,
                    status: "in progress".to_string(),
                }),
            }],
        }
    }

    #[test]
    fn test_message_lines_in_cart_order() {
        let message = compose_message(&base_receipt());
        let coffee = message.find("2 x Coffee - $100.00").unwrap();
        let stamp = message.find("1 x Stamp card [accumulate] - $0.00").unwrap();
        assert!(coffee < stamp);
    }

    #[test]
    fn test_message_totals_and_balances() {
        let message = compose_message(&base_receipt());
        assert!(message.contains("Subtotal: $100.00"));
        assert!(message.contains("Points redeemed: -$30.00"));
        assert!(message.contains("Total charged: $70.00"));
        assert!(message.contains("Points balance: $30.00 -> $0.00"));
    }

    #[test]
    fn test_message_loyalty_section_with_progress() {
        let message = compose_message(&base_receipt());
        assert!(message.contains("Loyalty:"));
        assert!(message.contains("- Stamp card: accumulate (3/10, 30%)"));
    }

    #[test]
    fn test_message_loyalty_section_without_progress() {
        let mut receipt = base_receipt();
        receipt.loyalty_sections[0].progress = None;
        let message = compose_message(&receipt);
        assert!(message.contains("- Stamp card: accumulate (no data)"));
    }

    #[test]
    fn test_no_redemption_line_when_zero() {
        let mut receipt = base_receipt();
        receipt.redemption_applied = Money::zero();
        receipt.amount_due = Money::from_cents(10_000);
        let message = compose_message(&receipt);
        assert!(!message.contains("Points redeemed"));
    }

    #[test]
    fn test_no_loyalty_section_for_pure_sale() {
        let mut receipt = base_receipt();
        receipt.lines.truncate(1);
        receipt.loyalty_sections.clear();
        let message = compose_message(&receipt);
        assert!(!message.contains("Loyalty:"));
    }

    #[test]
    fn test_customer_without_name() {
        let mut receipt = base_receipt();
        receipt.customer_name = None;
        let message = compose_message(&receipt);
        assert!(message.contains("Customer: 1155550199"));
    }
}
