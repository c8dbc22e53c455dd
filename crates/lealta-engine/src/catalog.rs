//! # Loyalty Catalog
//!
//! Loads a business's custom loyalty offers and, once a customer is known,
//! the advisory progress record for the offer under consideration.
//!
//! ## Two Independent Reads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_offers(business)   ──► active offers, backend-curated order       │
//! │                              (failures are real errors: the screen      │
//! │                               cannot function without the catalog)      │
//! │                                                                         │
//! │  progress(phone, offer)  ──► Option<LoyaltyProgress>                    │
//! │                              (ADVISORY: any failure degrades to None,   │
//! │                               displayed as "no data", never blocks      │
//! │                               submission)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use lealta_core::types::{LoyaltyOffer, LoyaltyProgress};

use crate::error::{EngineError, EngineResult};
use crate::gateway::{BusinessProfile, LoyaltyGateway, WireStatus};

/// Offer catalog + progress reads for one business.
#[derive(Debug)]
pub struct LoyaltyCatalog<L> {
    loyalty: L,
    business: BusinessProfile,
}

impl<L: LoyaltyGateway> LoyaltyCatalog<L> {
    /// Creates a catalog bound to one resolved business.
    pub fn new(loyalty: L, business: BusinessProfile) -> Self {
        LoyaltyCatalog { loyalty, business }
    }

    /// Lists the business's offers, filtered to `active == true`.
    ///
    /// A business without the loyalty feature has no catalog; no request is
    /// issued for it. Source order is preserved otherwise: the catalog order
    /// is backend-curated and must not be re-sorted client-side.
    pub async fn list_offers(&self) -> EngineResult<Vec<LoyaltyOffer>> {
        if !self.business.loyalty_enabled {
            debug!(business = %self.business.id, "loyalty disabled, empty catalog");
            return Ok(Vec::new());
        }

        let response = self
            .loyalty
            .list_offers(&self.business.id)
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        if response.status != WireStatus::Success {
            return Err(EngineError::Transport(
                "offer catalog unavailable".to_string(),
            ));
        }

        Ok(response
            .offers
            .into_iter()
            .filter(|offer| offer.active)
            .collect())
    }

    /// Fetches the customer's progress against one offer.
    ///
    /// Progress is advisory display state: any failure (transport, backend
    /// rejection, missing payload) degrades to `None` instead of blocking
    /// the flow. Call only with a valid customer and a selected offer.
    pub async fn progress(
        &self,
        customer_phone: &str,
        offer_id: &str,
    ) -> Option<LoyaltyProgress> {
        match self
            .loyalty
            .offer_progress(&self.business.id, customer_phone, offer_id)
            .await
        {
            Ok(response) if response.status == WireStatus::Success => response.progress,
            Ok(_) => {
                debug!(offer_id = %offer_id, "progress lookup rejected, showing no data");
                None
            }
            Err(e) => {
                debug!(offer_id = %offer_id, error = %e, "progress lookup failed, showing no data");
                None
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
