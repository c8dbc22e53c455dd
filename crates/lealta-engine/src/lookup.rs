//! # Customer Lookup
//!
//! Resolves a phone number to a named customer with a points balance.
//!
//! ## Tri-State Outcome
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lookup(phone)                                                          │
//! │       │                                                                 │
//! │       ├── not 10 digits ──► Err(Validation)        no I/O, no reset     │
//! │       │                        of validity beyond the phone edit        │
//! │       │                                                                 │
//! │       ├── backend found ──► validity = Valid, name/balance overwritten  │
//! │       │                                                                 │
//! │       ├── backend miss ───► validity = Invalid, defaults restored,      │
//! │       │                     returns Ok (caller checks validity)         │
//! │       │                                                                 │
//! │       └── transport err ──► Err(Transport), validity stays Unknown      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The context is reset for the new phone BEFORE the request goes out, so
//! stale name/balance is never visible while the lookup is in flight.

use tracing::{debug, info};

use lealta_core::sanitize;
use lealta_core::types::CustomerValidity;
use lealta_core::ValidationError;

use crate::error::{EngineError, EngineResult};
use crate::gateway::{DirectoryGateway, LookupOutcome};
use crate::session::PosSession;

/// Phone-to-customer resolution service.
#[derive(Debug)]
pub struct CustomerLookup<D> {
    directory: D,
    business_id: String,
}

impl<D: DirectoryGateway> CustomerLookup<D> {
    /// Creates a lookup service bound to one business.
    pub fn new(directory: D, business_id: impl Into<String>) -> Self {
        CustomerLookup {
            directory,
            business_id: business_id.into(),
        }
    }

    /// Looks up the customer for `raw_phone` and updates the session.
    ///
    /// Returns the resulting validity; `Invalid` is a normal outcome, not
    /// an error. Only transport/unexpected failures are raised.
    pub async fn lookup(
        &self,
        session: &PosSession,
        raw_phone: &str,
    ) -> EngineResult<CustomerValidity> {
        // Reset first: the old customer's data must not survive a phone edit.
        let phone = session.begin_phone(raw_phone).await;

        if !sanitize::is_valid_phone(&phone) {
            return Err(ValidationError::InvalidFormat {
                field: "phone".to_string(),
                reason: "must be exactly 10 digits".to_string(),
            }
            .into());
        }

        let epoch = session.epoch().await;
        debug!(phone = %phone, "customer lookup");

        let response = self
            .directory
            .customer_points(&phone, &self.business_id)
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let validity = match response.into_outcome() {
            LookupOutcome::Found { name, balance } => {
                info!(phone = %phone, balance = %balance, "customer found");
                session
                    .apply_if_current(epoch, |s| s.customer.mark_valid(name, balance))
                    .await;
                CustomerValidity::Valid
            }
            LookupOutcome::Unknown => {
                info!(phone = %phone, "customer unknown");
                session
                    .apply_if_current(epoch, |s| s.customer.mark_invalid())
                    .await;
                CustomerValidity::Invalid
            }
        };

        Ok(validity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        BusinessConfigResponse, CustomerPointsResponse, CustomerRecord, GatewayError,
        GatewayResult, WireStatus,
    };
    use lealta_core::Money;

    /// Directory stub returning a fixed points reply (or transport error).
    struct StubDirectory {
        reply: GatewayResult<CustomerPointsResponse>,
    }

    impl DirectoryGateway for StubDirectory {
        async fn business_config(&self, _phone: &str) -> GatewayResult<BusinessConfigResponse> {
            unimplemented!("not used by lookup tests")
        }

        async fn customer_points(
            &self,
            _phone: &str,
            _business_id: &str,
        ) -> GatewayResult<CustomerPointsResponse> {
            self.reply.clone()
        }
    }

    fn found_reply(name: &str, cents: i64) -> GatewayResult<CustomerPointsResponse> {
        Ok(CustomerPointsResponse {
            status: WireStatus::Success,
            message: None,
            customer: Some(CustomerRecord {
                name: name.to_string(),
                balance: Money::from_cents(cents),
            }),
        })
    }

    fn unknown_reply() -> GatewayResult<CustomerPointsResponse> {
        Ok(CustomerPointsResponse {
            status: WireStatus::Error,
            message: Some("Cliente no registrado".to_string()),
            customer: None,
        })
    }

    #[tokio::test]
    async fn test_short_phone_fails_fast() {
        let lookup = CustomerLookup::new(
            StubDirectory {
                reply: found_reply("Ana", 3000),
            },
            "biz-1",
        );
        let session = PosSession::new();

        let err = lookup.lookup(&session, "12345").await;
        assert!(matches!(err, Err(EngineError::Validation(_))));
        // No mutation beyond the phone reset
        session
            .with(|s| assert_eq!(s.customer.validity, CustomerValidity::Unknown))
            .await;
    }

    #[tokio::test]
    async fn test_found_marks_valid() {
        let lookup = CustomerLookup::new(
            StubDirectory {
                reply: found_reply("Ana", 3000),
            },
            "biz-1",
        );
        let session = PosSession::new();

        let validity = lookup.lookup(&session, "(11) 5555-0199").await.unwrap();
        assert_eq!(validity, CustomerValidity::Valid);

        session
            .with(|s| {
                assert_eq!(s.customer.phone, "1155550199");
                assert_eq!(s.customer.name.as_deref(), Some("Ana"));
                assert_eq!(s.customer.balance.cents(), 3000);
            })
            .await;
    }

    #[tokio::test]
    async fn test_unknown_marks_invalid_without_error() {
        let lookup = CustomerLookup::new(
            StubDirectory {
                reply: unknown_reply(),
            },
            "biz-1",
        );
        let session = PosSession::new();

        let validity = lookup.lookup(&session, "1155550199").await.unwrap();
        assert_eq!(validity, CustomerValidity::Invalid);

        session
            .with(|s| {
                assert_eq!(s.customer.validity, CustomerValidity::Invalid);
                assert!(s.customer.name.is_none());
                assert!(s.customer.balance.is_zero());
            })
            .await;
    }

    #[tokio::test]
    async fn test_transport_error_is_raised() {
        let lookup = CustomerLookup::new(
            StubDirectory {
                reply: Err(GatewayError::new("connection refused")),
            },
            "biz-1",
        );
        let session = PosSession::new();

        let err = lookup.lookup(&session, "1155550199").await;
        assert!(matches!(err, Err(EngineError::Transport(_))));
        session
            .with(|s| assert_eq!(s.customer.validity, CustomerValidity::Unknown))
            .await;
    }

    #[tokio::test]
    async fn test_lookup_overwrites_previous_customer() {
        let lookup = CustomerLookup::new(
            StubDirectory {
                reply: found_reply("Bruno", 500),
            },
            "biz-1",
        );
        let session = PosSession::new();
        session
            .with_mut(|s| {
                s.customer.reset_for("1155550111");
                s.customer.mark_valid("Ana", Money::from_cents(3000));
            })
            .await;

        lookup.lookup(&session, "1155550222").await.unwrap();
        session
            .with(|s| {
                assert_eq!(s.customer.phone, "1155550222");
                assert_eq!(s.customer.name.as_deref(), Some("Bruno"));
                assert_eq!(s.customer.balance.cents(), 500);
            })
            .await;
    }
}
