//! # lealta-core: Pure Business Logic for Lealta POS
//!
//! This crate is the **heart** of the Lealta point-of-sale transaction
//! engine. It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Lealta POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile Shell (out of scope)                  │   │
//! │  │    Lookup UI ──► Cart UI ──► Submit UI ──► Receipt share       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 lealta-engine (async layer)                     │   │
//! │  │    customer lookup, loyalty catalog, submission orchestrator   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lealta-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌─────────────────┐  │   │
//! │  │   │  money   │ │  ledger  │ │  totals  │ │ receipt/sanitize│  │   │
//! │  │   │  Money   │ │CartLedger│ │  derive  │ │  compose, phone │  │   │
//! │  │   │ Quantity │ │ LineItem │ │  figures │ │  links, amounts │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └─────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, CustomerContext, LoyaltyOffer, ...)
//! - [`money`] - Money and Quantity with integer arithmetic (no floats!)
//! - [`sanitize`] - Phone/amount normalization and messaging deep links
//! - [`ledger`] - The cart ledger and its validation rules
//! - [`totals`] - Pure totals derivation (redemption math)
//! - [`receipt`] - Receipt data and message composition
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system, and messaging access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use lealta_core::ledger::CartLedger;
//! use lealta_core::money::Money;
//! use lealta_core::totals::TransactionTotals;
//! use lealta_core::types::{CustomerValidity, LineItemDraft};
//!
//! let mut ledger = CartLedger::new();
//! ledger
//!     .add(
//!         LineItemDraft::sale("Coffee", Money::from_cents(5000)),
//!         CustomerValidity::Valid,
//!     )
//!     .unwrap();
//!
//! let totals = TransactionTotals::compute(ledger.items(), Money::from_cents(3000), true);
//! assert_eq!(totals.amount_due.cents(), 2000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod receipt;
pub mod sanitize;
pub mod totals;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use lealta_core::Money` instead of
// `use lealta_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::CartLedger;
pub use money::{Money, Quantity};
pub use receipt::{compose_message, TransactionReceipt};
pub use totals::TransactionTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Digits expected in a normalized customer phone number.
///
/// ## Why a constant?
/// The backend keys customers by a 10-digit national number. The lookup and
/// the submission preconditions must agree on this, so it lives in one place.
pub const PHONE_DIGITS: usize = 10;

/// Maximum line items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_ITEMS: usize = 100;
