//! # Engine Error Types
//!
//! Error types for the transaction engine.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Local (no I/O) │  │  Sale Batch     │  │     Transport           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  SaleBatchFailed│  │  Transport              │ │
//! │  │  Precondition   │  │  (verbatim msg) │  │  (network/unexpected)   │ │
//! │  │  InFlight guard │  │  aborts ALL     │  │  always surfaced        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Loyalty-batch failures are NOT errors at this level: they are          │
//! │  isolated per item, logged, and returned as explicit per-item           │
//! │  results in the submission report.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation Policy
//! - Validation and precondition failures are raised before any I/O.
//! - A sale-batch rejection aborts the whole submission; the server's
//!   message travels verbatim to the user.
//! - Transport errors are never silently swallowed on the sale path.

use thiserror::Error;

use lealta_core::ValidationError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine invariant not satisfied before submission. Checked locally;
/// no network call is attempted when one of these fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionFailure {
    /// Phone is not a normalized 10-digit number.
    #[error("customer phone must be 10 digits")]
    PhoneNotTenDigits,

    /// Customer lookup has not succeeded for the current phone.
    #[error("customer must be looked up and valid")]
    CustomerNotValid,

    /// Nothing in the cart to submit.
    #[error("cart is empty")]
    EmptyCart,
}

/// Terminal failures surfaced to the caller of an engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed local input; never reaches the network.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Submission invariant not satisfied; no I/O attempted.
    #[error("Cannot submit: {0}")]
    Precondition(#[from] PreconditionFailure),

    /// The aggregate sale request was rejected. Carries the server's
    /// message verbatim; the whole submission is aborted.
    #[error("Sale submission failed: {0}")]
    SaleBatchFailed(String),

    /// Network or unexpected backend failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A submission is already in flight for this session
    /// (double-tap guard).
    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

// =============================================================================
// Unit Tests
// =============================================================================
