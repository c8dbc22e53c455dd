//! # Domain Types
//!
//! Core domain types used throughout Lealta POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    LineItem     │   │ CustomerContext  │   │  LoyaltyOffer   │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id (UUID)      │   │  phone           │   │  id             │      │
//! │  │  label / note   │   │  name (opt)      │   │  name / reward  │      │
//! │  │  unit_amount    │   │  balance         │   │  accrual        │      │
//! │  │  quantity       │   │  validity        │   │  target         │      │
//! │  │  kind           │   └──────────────────┘   │  active         │      │
//! │  └─────────────────┘                          └─────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │  LineItemKind   │   │ CustomerValidity │   │ LoyaltyProgress │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  Sale           │   │  Unknown         │   │  accumulated    │      │
//! │  │  LoyaltyAction  │   │  Valid           │   │  target         │      │
//! │  │   {offer,action}│   │  Invalid         │   │  percent/status │      │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - A `Sale` item always has `unit_amount > 0` (enforced by the ledger).
//! - A `LoyaltyAction` item may have `unit_amount == 0` (pure stamp action).
//! - `CustomerContext.validity` resets to `Unknown` whenever the phone changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Quantity};

// =============================================================================
// Loyalty Action Kind
// =============================================================================

/// Which side of a loyalty program a cart line drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyActionKind {
    /// Add progress toward the offer's target.
    Accumulate,
    /// Spend accumulated progress on the offer's reward.
    Redeem,
}

// =============================================================================
// Line Item
// =============================================================================

/// What a cart line represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum LineItemKind {
    /// A plain monetary sale.
    Sale,
    /// A stamp/progress event against a business loyalty offer.
    LoyaltyAction {
        offer_id: String,
        action: LoyaltyActionKind,
    },
}

impl LineItemKind {
    /// True for plain monetary sales.
    #[inline]
    pub fn is_sale(&self) -> bool {
        matches!(self, LineItemKind::Sale)
    }
}

/// A validated entry in the cart ledger.
///
/// Constructed only by `CartLedger::add`; the id is assigned there so
/// insertion order and identity stay consistent.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique identifier (UUID v4), stable for the life of the cart.
    pub id: String,

    /// Display name of the article or loyalty offer.
    pub label: String,

    /// Optional free-text description.
    pub note: Option<String>,

    /// Price per unit. Zero is legal only for loyalty actions.
    pub unit_amount: Money,

    /// Quantity, possibly fractional (milli-units).
    pub quantity: Quantity,

    /// Sale vs. loyalty action.
    pub kind: LineItemKind,

    /// When this line was added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Line total: unit amount × quantity, rounded to cents.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_amount.multiply_quantity(self.quantity)
    }
}

/// Unvalidated line-item input, as collected from the UI.
///
/// `CartLedger::add` validates a draft and promotes it to a [`LineItem`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
    pub label: String,
    pub note: Option<String>,
    pub unit_amount: Money,
    pub quantity: Quantity,
    pub kind: LineItemKind,
}

impl LineItemDraft {
    /// A plain sale draft with quantity 1.
    pub fn sale(label: impl Into<String>, unit_amount: Money) -> Self {
        LineItemDraft {
            label: label.into(),
            note: None,
            unit_amount,
            quantity: Quantity::one(),
            kind: LineItemKind::Sale,
        }
    }

    /// A loyalty-action draft with quantity 1.
    pub fn loyalty(
        label: impl Into<String>,
        unit_amount: Money,
        offer_id: impl Into<String>,
        action: LoyaltyActionKind,
    ) -> Self {
        LineItemDraft {
            label: label.into(),
            note: None,
            unit_amount,
            quantity: Quantity::one(),
            kind: LineItemKind::LoyaltyAction {
                offer_id: offer_id.into(),
                action,
            },
        }
    }

    /// Sets the quantity (builder style).
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets the note (builder style).
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

// =============================================================================
// Customer Context
// =============================================================================

/// Tri-state result of the phone lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerValidity {
    /// No lookup performed for the current phone yet.
    Unknown,
    /// Lookup succeeded; name and balance are populated.
    Valid,
    /// Lookup came back with a business rejection (unknown customer).
    Invalid,
}

impl Default for CustomerValidity {
    fn default() -> Self {
        CustomerValidity::Unknown
    }
}

/// The customer a transaction is being rung up for.
///
/// ## Lifecycle
/// ```text
/// screen entry ──► empty (Unknown)
/// phone edited ──► reset_for(phone)      validity = Unknown
/// lookup ok    ──► mark_valid(name, bal) validity = Valid
/// lookup miss  ──► mark_invalid()        validity = Invalid, defaults restored
/// tx done      ──► reset_for("")         back to empty
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerContext {
    /// Normalized phone (digits only).
    pub phone: String,

    /// Resolved display name, absent until lookup succeeds.
    pub name: Option<String>,

    /// Current redeemable points balance, in currency units.
    pub balance: Money,

    /// Tri-state lookup result for the current phone.
    pub validity: CustomerValidity,
}

impl CustomerContext {
    /// Resets the context for a (possibly new) phone.
    ///
    /// Stale name/balance must never be shown mid-flight, so everything but
    /// the phone itself is cleared.
    pub fn reset_for(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
        self.name = None;
        self.balance = Money::zero();
        self.validity = CustomerValidity::Unknown;
    }

    /// Records a successful lookup.
    pub fn mark_valid(&mut self, name: impl Into<String>, balance: Money) {
        self.name = Some(name.into());
        self.balance = balance;
        self.validity = CustomerValidity::Valid;
    }

    /// Records a business-rule rejection (phone kept, data cleared).
    pub fn mark_invalid(&mut self) {
        self.name = None;
        self.balance = Money::zero();
        self.validity = CustomerValidity::Invalid;
    }

    /// True once the lookup succeeded for the current phone.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validity == CustomerValidity::Valid
    }
}

// =============================================================================
// Loyalty Offer & Progress
// =============================================================================

/// How an offer accrues progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AccrualKind {
    /// One stamp per visit/purchase.
    PerPurchase,
    /// Progress proportional to amount spent.
    ByAmount,
    /// Progress by unit count.
    ByCount,
}

/// A business-defined reward program definition.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyOffer {
    pub id: String,
    pub name: String,
    pub accrual: AccrualKind,
    /// Goal quantity (stamps, units, or currency depending on accrual).
    pub target: i64,
    /// For `PerPurchase` offers: percent credited per purchase.
    pub per_purchase_percent: Option<i64>,
    /// Human description of the reward.
    pub reward: String,
    /// Only active offers are selectable.
    pub active: bool,
}

/// A customer's progress against one offer.
///
/// Derived server-side; the client treats it as read-only display state and
/// refetches it whenever the selected offer or customer validity changes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyProgress {
    pub accumulated: i64,
    pub target: i64,
    pub percent: i64,
    /// Server-provided status label ("in progress", "reward ready", ...).
    pub status: String,
}

// =============================================================================
// Operator Identity
// =============================================================================

/// The staff member recording the transaction.
///
/// Passed explicitly into the orchestrator at call time instead of being
/// read from ambient session state, so tests can inject any operator.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OperatorIdentity {
    pub phone: String,
    pub name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
