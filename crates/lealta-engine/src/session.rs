//! # POS Session State
//!
//! One staff-facing transaction screen = one `PosSession`. It owns the
//! customer context and the cart ledger, and hands the orchestrator the
//! means to detect that a session moved on underneath an in-flight request.
//!
//! ## Thread Safety
//! The state is wrapped in `Arc<tokio::sync::Mutex<T>>` because engine
//! operations suspend at network boundaries while UI events keep arriving.
//! Locks are never held across an `.await`.
//!
//! ## Session Epoch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Epoch Guard                                      │
//! │                                                                         │
//! │  submit() captures epoch=4 ──► network I/O ... ──► response arrives     │
//! │                                                                         │
//! │        meanwhile: user navigates away ──► reset() ──► epoch=5           │
//! │                                                                         │
//! │  response applies its state update ONLY IF epoch is still 4.            │
//! │  Otherwise the update is dropped (the server-side effect stands;        │
//! │  the new session's state stays untouched).                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Double-Tap Guard
//! At most one submission per session may be in flight. `try_begin_submit`
//! hands out an RAII guard; while it lives, further submits are rejected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use lealta_core::ledger::CartLedger;
use lealta_core::totals::TransactionTotals;
use lealta_core::types::{CustomerContext, LineItem, LineItemDraft, LoyaltyOffer};
use lealta_core::{sanitize, CoreResult};

// =============================================================================
// Session State
// =============================================================================

/// Everything one transaction screen owns.
#[derive(Debug, Default)]
pub struct SessionState {
    /// The customer being rung up.
    pub customer: CustomerContext,

    /// The cart ledger (single source of truth for totals).
    pub ledger: CartLedger,

    /// The loyalty offer the staff member is currently considering,
    /// used to key the advisory progress fetch.
    pub selected_offer: Option<LoyaltyOffer>,

    /// Whether the customer asked to redeem points against this sale.
    pub redemption_requested: bool,

    /// Bumped on every reset; guards stale async results.
    epoch: u64,
}

impl SessionState {
    /// Current epoch value.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Fully resets the session (completed or abandoned transaction) and
    /// bumps the epoch so stale in-flight results get dropped.
    pub fn reset(&mut self) {
        self.customer.reset_for("");
        self.ledger.clear();
        self.selected_offer = None;
        self.redemption_requested = false;
        self.epoch += 1;
    }

    /// Derived totals for the current ledger + customer + flag.
    pub fn totals(&self) -> TransactionTotals {
        TransactionTotals::compute(
            self.ledger.items(),
            self.customer.balance,
            self.redemption_requested,
        )
    }
}

// =============================================================================
// POS Session Handle
// =============================================================================

/// Shared handle to a session. Cheap to clone; all clones see one state.
#[derive(Debug, Clone, Default)]
pub struct PosSession {
    state: Arc<Mutex<SessionState>>,
    submitting: Arc<AtomicBool>,
}

impl PosSession {
    /// Creates a fresh, empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a closure with read access to the state.
    pub async fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionState) -> R,
    {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Executes a closure with write access to the state.
    pub async fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Normalizes a phone input and resets the customer context for it.
    ///
    /// Returns the normalized digits. Any previous name/balance/validity is
    /// gone after this: stale data must never be shown mid-flight.
    pub async fn begin_phone(&self, raw_phone: &str) -> String {
        let phone = sanitize::normalize_phone(raw_phone);
        let mut state = self.state.lock().await;
        state.customer.reset_for(phone.clone());
        phone
    }

    /// Validates a draft against the current customer and appends it.
    pub async fn add_item(&self, draft: LineItemDraft) -> CoreResult<LineItem> {
        let mut state = self.state.lock().await;
        let validity = state.customer.validity;
        state.ledger.add(draft, validity).map(|item| item.clone())
    }

    /// Removes a line item by id (no-op if absent).
    pub async fn remove_item(&self, id: &str) {
        self.state.lock().await.ledger.remove(id);
    }

    /// Flips the redemption request flag.
    pub async fn set_redemption_requested(&self, requested: bool) {
        self.state.lock().await.redemption_requested = requested;
    }

    /// Current derived totals.
    pub async fn totals(&self) -> TransactionTotals {
        self.state.lock().await.totals()
    }

    /// Current epoch, for guarding async result application.
    pub async fn epoch(&self) -> u64 {
        self.state.lock().await.epoch()
    }

    /// Applies a state update only if the session is still in the epoch the
    /// caller captured. Returns whether the update ran.
    pub async fn apply_if_current<F>(&self, captured_epoch: u64, f: F) -> bool
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.state.lock().await;
        if state.epoch() != captured_epoch {
            return false;
        }
        f(&mut state);
        true
    }

    /// Claims the single submission slot. Returns `None` while another
    /// submission is in flight; the returned guard releases the slot on drop.
    pub fn try_begin_submit(&self) -> Option<SubmitGuard> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(SubmitGuard {
                flag: Arc::clone(&self.submitting),
            })
        } else {
            None
        }
    }
}

/// RAII token for the in-flight submission slot.
#[derive(Debug)]
pub struct SubmitGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
