//! # lealta-engine: Async Transaction Engine for Lealta POS
//!
//! The I/O layer of the Lealta point-of-sale transaction engine. It owns the
//! session state, talks to the loyalty backend through gateway traits, and
//! runs the submission pipeline on top of the pure logic in `lealta-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   ★ lealta-engine (THIS CRATE) ★                        │
//! │                                                                         │
//! │  ┌───────────┐   ┌───────────┐   ┌──────────────────────────────────┐  │
//! │  │  lookup   │   │  catalog  │   │          orchestrator            │  │
//! │  │ customer  │   │  offers + │   │  preconditions ─► sale batch     │  │
//! │  │ directory │   │  progress │   │  ─► loyalty fan-out ─► receipt   │  │
//! │  └─────┬─────┘   └─────┬─────┘   └────────────────┬─────────────────┘  │
//! │        │               │                          │                    │
//! │  ┌─────▼───────────────▼──────────────────────────▼─────────────────┐  │
//! │  │                     gateway traits                               │  │
//! │  │   DirectoryGateway │ SaleGateway │ LoyaltyGateway │ Messaging    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │        session: Arc<Mutex<SessionState>> + submit guard          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Design Decisions
//!
//! 1. **Gateway traits at the seam**: every network effect goes through a
//!    trait, so tests run against in-process mocks with controlled timing.
//! 2. **Session epoch**: async results landing after a session reset are
//!    discarded instead of corrupting the next customer's state.
//! 3. **Two-protocol submission**: the sale batch is atomic; loyalty actions
//!    are independent and a loyalty failure never rolls back a committed sale.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod lookup;
pub mod orchestrator;
pub mod session;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::LoyaltyCatalog;
pub use error::{EngineError, EngineResult, PreconditionFailure};
pub use gateway::{
    BusinessProfile, DirectoryGateway, GatewayError, GatewayResult, LookupOutcome, LoyaltyGateway,
    MessagingDispatcher, SaleGateway, SaleOutcome,
};
pub use lookup::CustomerLookup;
pub use orchestrator::{LoyaltyDispatch, SubmissionOrchestrator, SubmissionReport};
pub use session::{PosSession, SessionState};
