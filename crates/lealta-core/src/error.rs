//! # Error Types
//!
//! Domain-specific error types for lealta-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lealta-core errors (this file)                                         │
//! │  ├── CoreError        - Cart/domain rule violations                     │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  lealta-engine errors (separate crate)                                  │
//! │  └── EngineError      - Preconditions, sale-batch, transport            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → UI notification      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, limits)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and domain rule errors.
///
/// These errors represent business rule violations raised before any I/O.
/// They should be caught and translated to user-facing notifications.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cart has exceeded maximum allowed entries.
    #[error("Cart cannot have more than {max} items")]
    CartFull { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., non-numeric amount, malformed phone).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Cart mutations require a looked-up, valid customer.
    ///
    /// ## When This Occurs
    /// - Adding a line item before the phone lookup has succeeded
    /// - Adding a line item after the lookup marked the customer Invalid
    #[error("Customer must be looked up and valid before editing the cart")]
    CustomerNotValid,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
