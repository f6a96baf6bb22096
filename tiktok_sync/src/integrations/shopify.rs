//! Connects the engine's [`LookupClient`] to a real Shopify store.
use log::*;
use shopify_tools::{OrderCreatePayload, OrderFulfillments, OrderSummary, ShopifyApi, ShopifyApiError, ShopifyConfig};
use tiktok_sync_engine::{
    traits::{OrderCreateResult, PlatformFulfillment, PlatformFulfillmentLine, PlatformOrder, PlatformTrackingInfo},
    LookupClient,
    LookupError,
    OrderCreateRequest,
};

use crate::errors::SyncError;

#[derive(Clone)]
pub struct ShopifyLookup {
    api: ShopifyApi,
}

impl ShopifyLookup {
    pub fn new(api: ShopifyApi) -> Self {
        Self { api }
    }

    /// Builds a client from the `TTS_SHOPIFY_*` environment variables. A missing access token fails straight away,
    /// rather than once per order.
    pub fn from_env() -> Result<Self, SyncError> {
        let config = ShopifyConfig::new_from_env_or_default();
        if config.admin_access_token.is_empty() {
            let msg = "TTS_SHOPIFY_ACCESS_TOKEN is not set".to_string();
            return Err(ShopifyApiError::Initialization(msg).into());
        }
        let api = ShopifyApi::new(config)?;
        info!("🛍️ Shopify client ready");
        Ok(Self::new(api))
    }
}

impl LookupClient for ShopifyLookup {
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<String>, LookupError> {
        let variant = self.api.find_variant_by_sku(sku).await.map_err(lookup_error)?;
        Ok(variant.map(|v| v.id))
    }

    async fn find_order_by_tag(&self, tag: &str) -> Result<Option<PlatformOrder>, LookupError> {
        let order = self.api.find_order_by_tag(tag).await.map_err(lookup_error)?;
        Ok(order.map(platform_order))
    }

    async fn create_order(&self, order: &OrderCreateRequest) -> Result<OrderCreateResult, LookupError> {
        let payload = self.api.create_order(order).await.map_err(lookup_error)?;
        Ok(create_result(payload))
    }

    async fn fetch_order_fulfillments(&self, order_id: &str) -> Result<Option<Vec<PlatformFulfillment>>, LookupError> {
        let order = self.api.fetch_order_fulfillments(order_id).await.map_err(lookup_error)?;
        Ok(order.map(platform_fulfillments))
    }
}

/// Timeouts are reported by reqwest without the configured limit, so they pass through as transport errors.
pub fn lookup_error(e: ShopifyApiError) -> LookupError {
    LookupError::Transport(e.to_string())
}

pub fn platform_order(order: OrderSummary) -> PlatformOrder {
    PlatformOrder { id: order.id, name: order.name }
}

/// Shopify leaves `order` empty whenever it reports user errors, but a payload with neither is still possible.
pub fn create_result(payload: OrderCreatePayload) -> OrderCreateResult {
    OrderCreateResult {
        order_id: payload.order.map(|o| o.id),
        user_errors: payload.user_errors.into_iter().map(|e| e.message).collect(),
    }
}

pub fn platform_fulfillments(order: OrderFulfillments) -> Vec<PlatformFulfillment> {
    order
        .fulfillments
        .into_iter()
        .map(|f| PlatformFulfillment {
            tracking_info: f
                .tracking_info
                .into_iter()
                .map(|t| PlatformTrackingInfo { number: t.number, url: t.url, company: t.company })
                .collect(),
            line_items: f
                .fulfillment_line_items
                .into_nodes()
                .map(|item| PlatformFulfillmentLine { sku: item.line_item.sku, quantity: item.quantity })
                .collect(),
        })
        .collect()
}
