//! # Submission Orchestrator
//!
//! Turns a session's cart into backend effects: one atomic sale batch, a
//! concurrent fan-out of independent loyalty actions, and a receipt.
//!
//! ## Submission Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Submission Pipeline                                │
//! │                                                                         │
//! │  0. claim submit slot (double-tap guard)                                │
//! │  1. preconditions: 10-digit phone, Valid customer, non-empty cart       │
//! │         │ fail ──► PreconditionError, ZERO network calls                │
//! │  2. partition ledger snapshot: [Sale...] / [LoyaltyAction...]           │
//! │  3. sale batch (if any):  ONE atomic request                            │
//! │         │ reject ──► SaleBatchFailed(server message), ABORT ALL,        │
//! │         │           ledger left intact for retry                        │
//! │  4. loyalty batch (if any): N independent requests, CONCURRENT,         │
//! │     all-settled join; per-item failures logged + reported, never        │
//! │     aborting siblings or the committed sale                             │
//! │  5. receipt (insertion-ordered lines, balances before/after)            │
//! │  6. epoch-guarded session reset, then fire-and-forget messaging link    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use lealta_core::receipt::{LineAnnotation, LoyaltySection, ReceiptLine, TransactionReceipt};
use lealta_core::sanitize::{self, messaging_links};
use lealta_core::totals::TransactionTotals;
use lealta_core::types::{LineItem, LineItemKind, LoyaltyActionKind, OperatorIdentity};
use lealta_core::{compose_message, Money};

use crate::error::{EngineError, EngineResult, PreconditionFailure};
use crate::gateway::{
    BusinessProfile, LoyaltyActionRequest, LoyaltyGateway, MessagingDispatcher, SaleBatchRequest,
    SaleGateway, SaleLine, SaleOutcome, WireStatus,
};
use crate::session::PosSession;

// =============================================================================
// Submission Report
// =============================================================================

/// Result of one loyalty action dispatch, kept per item so callers and
/// tests can assert on partial-failure sets instead of log output.
#[derive(Debug, Clone)]
pub struct LoyaltyDispatch {
    pub item_id: String,
    pub offer_id: String,
    pub action: LoyaltyActionKind,
    /// `Err` carries the server or transport message.
    pub outcome: Result<(), String>,
}

/// What a successful submission hands back to the caller.
///
/// "Successful" means the sale batch (if any) committed. Individual loyalty
/// failures do not flip the overall result; they are listed here.
#[derive(Debug)]
pub struct SubmissionReport {
    pub receipt: TransactionReceipt,
    pub loyalty_dispatches: Vec<LoyaltyDispatch>,
}

impl SubmissionReport {
    /// The loyalty dispatches that failed, if any.
    pub fn loyalty_failures(&self) -> Vec<&LoyaltyDispatch> {
        self.loyalty_dispatches
            .iter()
            .filter(|d| d.outcome.is_err())
            .collect()
    }

    /// True when every backend effect landed.
    pub fn is_complete(&self) -> bool {
        self.loyalty_dispatches.iter().all(|d| d.outcome.is_ok())
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Executes the two-protocol submission split for one business.
#[derive(Debug)]
pub struct SubmissionOrchestrator<S, L, M> {
    sale: S,
    loyalty: L,
    messenger: M,
    business: BusinessProfile,
}

impl<S, L, M> SubmissionOrchestrator<S, L, M>
where
    S: SaleGateway,
    L: LoyaltyGateway,
    M: MessagingDispatcher,
{
    /// Creates an orchestrator bound to one business.
    pub fn new(sale: S, loyalty: L, messenger: M, business: BusinessProfile) -> Self {
        SubmissionOrchestrator {
            sale,
            loyalty,
            messenger,
            business,
        }
    }

    /// Submits the session's cart.
    ///
    /// On success the session is reset (epoch-guarded) and the receipt
    /// message is dispatched to the customer's messaging app. On sale-batch
    /// failure the ledger is left intact so the user can retry.
    pub async fn submit(
        &self,
        session: &PosSession,
        operator: &OperatorIdentity,
    ) -> EngineResult<SubmissionReport> {
        // At most one submission per session may be in flight.
        let _slot = session
            .try_begin_submit()
            .ok_or(EngineError::SubmissionInFlight)?;

        let (customer, items, redemption_requested, epoch) = session
            .with(|s| {
                (
                    s.customer.clone(),
                    s.ledger.snapshot(),
                    s.redemption_requested,
                    s.epoch(),
                )
            })
            .await;

        // Preconditions: all local, checked before any I/O.
        if !sanitize::is_valid_phone(&customer.phone) {
            return Err(PreconditionFailure::PhoneNotTenDigits.into());
        }
        if !customer.is_valid() {
            return Err(PreconditionFailure::CustomerNotValid.into());
        }
        if items.is_empty() {
            return Err(PreconditionFailure::EmptyCart.into());
        }

        debug!(
            business = %self.business.id,
            customer = %customer.phone,
            items = items.len(),
            "submitting transaction"
        );

        let totals = TransactionTotals::compute(&items, customer.balance, redemption_requested);
        let (sale_items, loyalty_items) = partition(&items);

        // ---------------------------------------------------------------------
        // Sale batch: one atomic request, any failure aborts everything.
        // ---------------------------------------------------------------------
        let mut server_balance: Option<Money> = None;

        if !sale_items.is_empty() {
            // Guards an all-zero-amount batch slipping through rounding.
            if !totals.sale_subtotal.is_positive() {
                return Err(lealta_core::ValidationError::MustBePositive {
                    field: "sale total".to_string(),
                }
                .into());
            }

            let request = SaleBatchRequest {
                customer_phone: customer.phone.clone(),
                business_id: self.business.id.clone(),
                operator: operator.clone(),
                lines: sale_items
                    .iter()
                    .map(|item| SaleLine {
                        label: item.label.clone(),
                        note: item.note.clone(),
                        unit_amount: item.unit_amount,
                        quantity: item.quantity,
                        line_total: item.line_total(),
                    })
                    .collect(),
                redemption_requested,
                balance_before: customer.balance,
            };

            let response = self
                .sale
                .submit_sale_batch(request)
                .await
                .map_err(|e| EngineError::Transport(e.to_string()))?;

            match response.into_outcome() {
                SaleOutcome::Committed { new_balance } => {
                    info!(
                        subtotal = %totals.sale_subtotal,
                        redeemed = %totals.redemption_applied,
                        "sale batch committed"
                    );
                    server_balance = new_balance;
                }
                SaleOutcome::Rejected { message } => {
                    // Ledger stays intact; the user can retry.
                    return Err(EngineError::SaleBatchFailed(message));
                }
            }
        }

        // ---------------------------------------------------------------------
        // Loyalty batch: independent concurrent requests, all-settled join.
        // Runs only after the sale batch succeeded or was skipped.
        // ---------------------------------------------------------------------
        let loyalty_dispatches = self
            .dispatch_loyalty_actions(&loyalty_items, &customer.phone, operator)
            .await;

        for dispatch in &loyalty_dispatches {
            if let Err(message) = &dispatch.outcome {
                warn!(
                    item = %dispatch.item_id,
                    offer = %dispatch.offer_id,
                    action = ?dispatch.action,
                    error = %message,
                    "loyalty action failed (sale unaffected)"
                );
            }
        }

        // ---------------------------------------------------------------------
        // Receipt: insertion-ordered lines, balances, loyalty sections.
        // ---------------------------------------------------------------------
        let balance_after = server_balance.unwrap_or(totals.projected_balance);
        let loyalty_sections = self
            .collect_loyalty_sections(&loyalty_items, &customer.phone)
            .await;

        let receipt = TransactionReceipt {
            business_name: self.business.name.clone(),
            customer_phone: customer.phone.clone(),
            customer_name: customer.name.clone(),
            completed_at: chrono::Utc::now(),
            lines: items
                .iter()
                .map(|item| ReceiptLine {
                    label: item.label.clone(),
                    quantity: item.quantity,
                    unit_amount: item.unit_amount,
                    line_total: item.line_total(),
                    annotation: annotation_for(item),
                })
                .collect(),
            sale_subtotal: totals.sale_subtotal,
            loyalty_subtotal: totals.loyalty_subtotal,
            redemption_applied: totals.redemption_applied,
            amount_due: totals.amount_due,
            balance_before: customer.balance,
            balance_after,
            loyalty_sections,
        };

        // The transaction is committed server-side. Reset the session for
        // the next customer, unless it was already reset underneath us.
        let still_current = session.apply_if_current(epoch, |s| s.reset()).await;
        if !still_current {
            debug!("session moved on mid-submission, skipping reset");
        }

        // Fire-and-forget receipt share; failure cannot affect the
        // committed transaction.
        let message = compose_message(&receipt);
        self.messenger
            .open_messaging_link(&messaging_links(&customer.phone, &message));

        info!(
            total = %receipt.amount_due,
            loyalty_failures = loyalty_dispatches.iter().filter(|d| d.outcome.is_err()).count(),
            "transaction complete"
        );

        Ok(SubmissionReport {
            receipt,
            loyalty_dispatches,
        })
    }

    /// Issues one request per loyalty item, all concurrently, and waits for
    /// every one to settle. Output order matches item order, not completion
    /// order.
    async fn dispatch_loyalty_actions(
        &self,
        loyalty_items: &[&LineItem],
        customer_phone: &str,
        operator: &OperatorIdentity,
    ) -> Vec<LoyaltyDispatch> {
        let futures = loyalty_items.iter().filter_map(|item| {
            let (offer_id, action) = match &item.kind {
                LineItemKind::LoyaltyAction { offer_id, action } => (offer_id.clone(), *action),
                // Partition already excluded sales; defensive arm is unreachable.
                LineItemKind::Sale => return None,
            };

            let request = LoyaltyActionRequest {
                operator: operator.clone(),
                customer_phone: customer_phone.to_string(),
                offer_id: offer_id.clone(),
                business_id: self.business.id.clone(),
                quantity: Some(item.quantity),
                amount: item.line_total().is_positive().then(|| item.line_total()),
                description: item.note.clone(),
            };
            let item_id = item.id.clone();

            Some(async move {
                let result = match action {
                    LoyaltyActionKind::Accumulate => self.loyalty.accumulate(request).await,
                    LoyaltyActionKind::Redeem => self.loyalty.redeem(request).await,
                };

                let outcome = match result {
                    Ok(response) => response.into_outcome(),
                    Err(transport) => Err(transport.to_string()),
                };

                LoyaltyDispatch {
                    item_id,
                    offer_id,
                    action,
                    outcome,
                }
            })
        });

        // All-settled barrier: every request finishes before we move on,
        // whatever its individual outcome.
        join_all(futures).await
    }

    /// Refetches advisory progress for each loyalty line. Failures render
    /// as "no data" in the receipt instead of blocking it.
    async fn collect_loyalty_sections(
        &self,
        loyalty_items: &[&LineItem],
        customer_phone: &str,
    ) -> Vec<LoyaltySection> {
        let futures = loyalty_items.iter().filter_map(|item| {
            let (offer_id, action) = match &item.kind {
                LineItemKind::LoyaltyAction { offer_id, action } => (offer_id.clone(), *action),
                LineItemKind::Sale => return None,
            };
            let offer_name = item.label.clone();

            Some(async move {
                let progress = match self
                    .loyalty
                    .offer_progress(&self.business.id, customer_phone, &offer_id)
                    .await
                {
                    Ok(response) if response.status == WireStatus::Success => response.progress,
                    _ => None,
                };

                LoyaltySection {
                    offer_name,
                    action,
                    progress,
                }
            })
        });

        join_all(futures).await
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Splits the snapshot into sale and loyalty partitions, preserving the
/// original relative order within each.
fn partition(items: &[LineItem]) -> (Vec<&LineItem>, Vec<&LineItem>) {
    items.iter().partition(|item| item.kind.is_sale())
}

fn annotation_for(item: &LineItem) -> LineAnnotation {
    match &item.kind {
        LineItemKind::Sale => LineAnnotation::Sale,
        LineItemKind::LoyaltyAction { action, .. } => (*action).into(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
