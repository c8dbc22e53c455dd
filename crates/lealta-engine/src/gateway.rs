//! # Gateway Traits & Wire Types
//!
//! The engine's only window to the backend. Every capability is an injected
//! collaborator trait, so the engine is fully testable with in-memory mocks
//! and the transport (HTTP, retries, timeouts) stays someone else's problem.
//!
//! ## Boundary Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Response Normalization                              │
//! │                                                                         │
//! │  Backend wire shape            Mapper              Engine outcome       │
//! │  ──────────────────            ──────              ──────────────       │
//! │                                                                         │
//! │  {status, message,      ──► into_outcome() ──►  LookupOutcome::         │
//! │   customer?}                                     Found | Unknown        │
//! │                                                                         │
//! │  {success, message,     ──► into_outcome() ──►  SaleOutcome::           │
//! │   newBalance?}                                   Committed | Rejected   │
//! │                                                                         │
//! │  The engine never matches on loose field presence: by the time data     │
//! │  crosses into lookup/orchestrator code it is a discriminated enum.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lealta_core::sanitize::MessagingLinks;
use lealta_core::{LoyaltyOffer, LoyaltyProgress, Money, OperatorIdentity, Quantity};

// =============================================================================
// Gateway Error
// =============================================================================

/// Network or unexpected failure inside a collaborator.
///
/// Business-level rejections are NOT errors: they come back as data inside
/// the wire response and are normalized by the mappers below.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct GatewayError(pub String);

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        GatewayError(message.into())
    }
}

/// Result alias for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

// =============================================================================
// Wire Status
// =============================================================================

/// Discriminator shared by the status-style backend responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireStatus {
    Success,
    Error,
}

// =============================================================================
// Directory: Business Config + Customer Points
// =============================================================================

/// Loyalty-relevant slice of a business's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    /// Identifier used by all subsequent calls.
    pub id: String,
    pub name: String,
    /// Whether the custom loyalty program feature is enabled.
    pub loyalty_enabled: bool,
}

/// Wire response of the business config lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessConfigResponse {
    pub status: WireStatus,
    pub message: Option<String>,
    pub business: Option<BusinessProfile>,
}

/// Wire response of the customer points lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPointsResponse {
    pub status: WireStatus,
    pub message: Option<String>,
    pub customer: Option<CustomerRecord>,
}

/// Customer payload inside a successful points lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub name: String,
    pub balance: Money,
}

/// Normalized lookup result the engine works with.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Customer exists; name and balance are authoritative.
    Found { name: String, balance: Money },
    /// Business-level rejection (unknown customer). Non-fatal.
    Unknown,
}

impl CustomerPointsResponse {
    /// Normalizes the wire shape into a discriminated outcome.
    pub fn into_outcome(self) -> LookupOutcome {
        match (self.status, self.customer) {
            (WireStatus::Success, Some(customer)) => LookupOutcome::Found {
                name: customer.name,
                balance: customer.balance,
            },
            // Success without a payload is treated as unknown too: a
            // malformed happy-path reply must not validate a customer.
            _ => LookupOutcome::Unknown,
        }
    }
}

/// Business config + customer balance lookups.
#[allow(async_fn_in_trait)]
pub trait DirectoryGateway {
    /// Resolves the operating business for a staff phone.
    async fn business_config(&self, phone: &str) -> GatewayResult<BusinessConfigResponse>;

    /// Resolves a customer's name and points balance within a business.
    async fn customer_points(
        &self,
        phone: &str,
        business_id: &str,
    ) -> GatewayResult<CustomerPointsResponse>;
}

// =============================================================================
// Sale Submission
// =============================================================================

/// One sale line inside the aggregate request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub label: String,
    pub note: Option<String>,
    pub unit_amount: Money,
    pub quantity: Quantity,
    pub line_total: Money,
}

/// The single atomic request carrying every sale line of the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleBatchRequest {
    pub customer_phone: String,
    pub business_id: String,
    pub operator: OperatorIdentity,
    pub lines: Vec<SaleLine>,
    /// Whether the customer asked to redeem points against this sale.
    pub redemption_requested: bool,
    /// Pre-transaction balance, for server-side cross-checking.
    pub balance_before: Money,
}

/// Wire response of the sale submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleBatchResponse {
    pub success: bool,
    pub message: String,
    /// Server-computed balance after redemption, when provided.
    pub new_balance: Option<Money>,
}

/// Normalized sale submission result.
#[derive(Debug, Clone, PartialEq)]
pub enum SaleOutcome {
    Committed { new_balance: Option<Money> },
    /// Server rejection; the message travels to the user verbatim.
    Rejected { message: String },
}

impl SaleBatchResponse {
    /// Normalizes the wire shape into a discriminated outcome.
    pub fn into_outcome(self) -> SaleOutcome {
        if self.success {
            SaleOutcome::Committed {
                new_balance: self.new_balance,
            }
        } else {
            SaleOutcome::Rejected {
                message: self.message,
            }
        }
    }
}

/// Aggregate monetary sale submission.
#[allow(async_fn_in_trait)]
pub trait SaleGateway {
    /// Submits the whole sale batch as one atomic call.
    async fn submit_sale_batch(&self, request: SaleBatchRequest)
        -> GatewayResult<SaleBatchResponse>;
}

// =============================================================================
// Loyalty Actions & Catalog
// =============================================================================

/// One independent loyalty action request (accumulate or redeem is chosen
/// by which trait method receives it).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyActionRequest {
    pub operator: OperatorIdentity,
    pub customer_phone: String,
    pub offer_id: String,
    pub business_id: String,
    pub quantity: Option<Quantity>,
    pub amount: Option<Money>,
    pub description: Option<String>,
}

/// Wire response of an accumulate/redeem call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyActionResponse {
    pub status: WireStatus,
    pub message: Option<String>,
}

impl LoyaltyActionResponse {
    /// Collapses the wire shape into one applied/rejected result.
    pub fn into_outcome(self) -> Result<(), String> {
        match self.status {
            WireStatus::Success => Ok(()),
            WireStatus::Error => Err(self
                .message
                .unwrap_or_else(|| "loyalty action rejected".to_string())),
        }
    }
}

/// Wire response of the offers listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersResponse {
    pub status: WireStatus,
    pub offers: Vec<LoyaltyOffer>,
}

/// Wire response of the per-offer progress lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub status: WireStatus,
    pub progress: Option<LoyaltyProgress>,
}

/// Custom loyalty program operations.
#[allow(async_fn_in_trait)]
pub trait LoyaltyGateway {
    /// Records progress toward an offer.
    async fn accumulate(&self, request: LoyaltyActionRequest)
        -> GatewayResult<LoyaltyActionResponse>;

    /// Spends accumulated progress on an offer's reward.
    async fn redeem(&self, request: LoyaltyActionRequest) -> GatewayResult<LoyaltyActionResponse>;

    /// Lists a business's loyalty offers (active and inactive; the catalog
    /// filters).
    async fn list_offers(&self, business_id: &str) -> GatewayResult<OffersResponse>;

    /// Fetches a customer's progress against one offer.
    async fn offer_progress(
        &self,
        business_id: &str,
        customer_phone: &str,
        offer_id: &str,
    ) -> GatewayResult<ProgressResponse>;
}

// =============================================================================
// Messaging Dispatch
// =============================================================================

/// Best-effort deep-link dispatch into the customer's messaging app.
///
/// Fire-and-forget: the engine consumes no return value, and dispatch
/// failure never affects the already-committed transaction. The dispatcher
/// tries `links.native` first and falls back to `links.web`.
pub trait MessagingDispatcher {
    fn open_messaging_link(&self, links: &MessagingLinks);
}

// =============================================================================
// Business Profile Resolution
// =============================================================================

/// Resolves the operating business for a staff phone, normalizing the
/// status/message wire shape into a hard result: an engine cannot run
/// without its business.
pub async fn resolve_business_profile<D: DirectoryGateway>(
    directory: &D,
    operator_phone: &str,
) -> GatewayResult<BusinessProfile> {
    let response = directory.business_config(operator_phone).await?;
    match (response.status, response.business) {
        (WireStatus::Success, Some(profile)) => Ok(profile),
        (_, _) => Err(GatewayError::new(
            response
                .message
                .unwrap_or_else(|| "business configuration unavailable".to_string()),
        )),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_response_found() {
        let response = CustomerPointsResponse {
            status: WireStatus::Success,
            message: None,
            customer: Some(CustomerRecord {
                name: "Ana".to_string(),
                balance: Money::from_cents(3000),
            }),
        };
        assert_eq!(
            response.into_outcome(),
            LookupOutcome::Found {
                name: "Ana".to_string(),
                balance: Money::from_cents(3000),
            }
        );
    }

    #[test]
    fn test_points_response_rejection_is_unknown() {
        let response = CustomerPointsResponse {
            status: WireStatus::Error,
            message: Some("Cliente no registrado".to_string()),
            customer: None,
        };
        assert_eq!(response.into_outcome(), LookupOutcome::Unknown);
    }

    #[test]
    fn test_points_response_success_without_payload_is_unknown() {
        let response = CustomerPointsResponse {
            status: WireStatus::Success,
            message: None,
            customer: None,
        };
        assert_eq!(response.into_outcome(), LookupOutcome::Unknown);
    }

    #[test]
    fn test_sale_response_outcomes() {
        let committed = SaleBatchResponse {
            success: true,
            message: "ok".to_string(),
            new_balance: Some(Money::zero()),
        };
        assert_eq!(
            committed.into_outcome(),
            SaleOutcome::Committed {
                new_balance: Some(Money::zero())
            }
        );

        let rejected = SaleBatchResponse {
            success: false,
            message: "Saldo insuficiente".to_string(),
            new_balance: None,
        };
        assert_eq!(
            rejected.into_outcome(),
            SaleOutcome::Rejected {
                message: "Saldo insuficiente".to_string()
            }
        );
    }

    struct StubDirectory {
        reply: GatewayResult<BusinessConfigResponse>,
    }

    impl DirectoryGateway for StubDirectory {
        async fn business_config(&self, _phone: &str) -> GatewayResult<BusinessConfigResponse> {
            self.reply.clone()
        }

        async fn customer_points(
            &self,
            _phone: &str,
            _business_id: &str,
        ) -> GatewayResult<CustomerPointsResponse> {
            unimplemented!("not used by business-config tests")
        }
    }

    #[tokio::test]
    async fn test_resolve_business_profile_success() {
        let directory = StubDirectory {
            reply: Ok(BusinessConfigResponse {
                status: WireStatus::Success,
                message: None,
                business: Some(BusinessProfile {
                    id: "biz-1".to_string(),
                    name: "Cafe Central".to_string(),
                    loyalty_enabled: true,
                }),
            }),
        };

        let profile = resolve_business_profile(&directory, "1155550100")
            .await
            .unwrap();
        assert_eq!(profile.id, "biz-1");
        assert!(profile.loyalty_enabled);
    }

    #[tokio::test]
    async fn test_resolve_business_profile_rejection_carries_server_message() {
        let directory = StubDirectory {
            reply: Ok(BusinessConfigResponse {
                status: WireStatus::Error,
                message: Some("Comercio no habilitado".to_string()),
                business: None,
            }),
        };

        let err = resolve_business_profile(&directory, "1155550100")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Comercio no habilitado");
    }

    #[tokio::test]
    async fn test_resolve_business_profile_success_without_payload_is_error() {
        let directory = StubDirectory {
            reply: Ok(BusinessConfigResponse {
                status: WireStatus::Success,
                message: None,
                business: None,
            }),
        };

        let err = resolve_business_profile(&directory, "1155550100")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "business configuration unavailable");
    }

    #[test]
    fn test_wire_shapes_deserialize_from_backend_json() {
        let points: CustomerPointsResponse = serde_json::from_str(
            r#"{"status":"success","message":null,"customer":{"name":"Ana","balance":3000}}"#,
        )
        .unwrap();
        assert_eq!(
            points.into_outcome(),
            LookupOutcome::Found {
                name: "Ana".to_string(),
                balance: Money::from_cents(3000),
            }
        );

        let sale: SaleBatchResponse =
            serde_json::from_str(r#"{"success":true,"message":"ok","newBalance":0}"#).unwrap();
        assert_eq!(
            sale.into_outcome(),
            SaleOutcome::Committed {
                new_balance: Some(Money::zero())
            }
        );
    }

    #[test]
    fn test_sale_request_serializes_camel_case() {
        let request = SaleBatchRequest {
            customer_phone: "1155550199".to_string(),
            business_id: "biz-1".to_string(),
            operator: OperatorIdentity {
                phone: "1155550100".to_string(),
                name: "Marta".to_string(),
            },
            lines: vec![],
            redemption_requested: true,
            balance_before: Money::from_cents(3000),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["customerPhone"], "1155550199");
        assert_eq!(json["redemptionRequested"], true);
        assert_eq!(json["balanceBefore"], 3000);
    }

    #[test]
    fn test_loyalty_response_outcomes() {
        let ok = LoyaltyActionResponse {
            status: WireStatus::Success,
            message: None,
        };
        assert!(ok.into_outcome().is_ok());

        let rejected = LoyaltyActionResponse {
            status: WireStatus::Error,
            message: Some("offer expired".to_string()),
        };
        assert_eq!(rejected.into_outcome(), Err("offer expired".to_string()));

        let rejected_no_message = LoyaltyActionResponse {
            status: WireStatus::Error,
            message: None,
        };
        assert!(rejected_no_message.into_outcome().is_err());
    }
}
