use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    order_input::OrderCreateRequest,
    traits::{OrderCreateResult, PlatformFulfillment, PlatformOrder},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{0}")]
    Transport(String),
    #[error("The request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

/// Read and write access to the store that TikTok orders are synced into.
#[allow(async_fn_in_trait)]
pub trait LookupClient {
    /// Resolves a seller SKU to the id of the product variant carrying exactly that SKU.
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<String>, LookupError>;

    /// Returns the first order carrying `tag`, if there is one.
    async fn find_order_by_tag(&self, tag: &str) -> Result<Option<PlatformOrder>, LookupError>;

    /// Submits a new order. Validation failures come back as user errors in the result, not as an `Err`.
    async fn create_order(&self, order: &OrderCreateRequest) -> Result<OrderCreateResult, LookupError>;

    /// Fetches the fulfillments of an order. `None` if the order does not exist.
    async fn fetch_order_fulfillments(&self, order_id: &str) -> Result<Option<Vec<PlatformFulfillment>>, LookupError>;
}

impl<T: LookupClient> LookupClient for Arc<T> {
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<String>, LookupError> {
        self.as_ref().find_variant_by_sku(sku).await
    }

    async fn find_order_by_tag(&self, tag: &str) -> Result<Option<PlatformOrder>, LookupError> {
        self.as_ref().find_order_by_tag(tag).await
    }

    async fn create_order(&self, order: &OrderCreateRequest) -> Result<OrderCreateResult, LookupError> {
        self.as_ref().create_order(order).await
    }

    async fn fetch_order_fulfillments(&self, order_id: &str) -> Result<Option<Vec<PlatformFulfillment>>, LookupError> {
        self.as_ref().fetch_order_fulfillments(order_id).await
    }
}
