//! An in-memory stand-in for a Shopify store.
//!
//! Created orders are stored along with their tags, so a later existence check finds them, just like the real thing.
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    order_input::OrderCreateRequest,
    traits::{LookupClient, LookupError, OrderCreateResult, PlatformFulfillment, PlatformOrder},
};

/// How often each [`LookupClient`] method was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub find_variant_by_sku: usize,
    pub find_order_by_tag: usize,
    pub create_order: usize,
    pub fetch_order_fulfillments: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.find_variant_by_sku + self.find_order_by_tag + self.create_order + self.fetch_order_fulfillments
    }
}

#[derive(Debug, Clone)]
struct StoredOrder {
    id: String,
    name: String,
    tags: Vec<String>,
}

#[derive(Debug, Default)]
struct PlatformState {
    variants: HashMap<String, String>,
    orders: Vec<StoredOrder>,
    created: Vec<OrderCreateRequest>,
    fulfillments: HashMap<String, Vec<PlatformFulfillment>>,
    rejection: Option<Vec<String>>,
    failure: Option<String>,
    delay: Option<Duration>,
    sku_delays: HashMap<String, Duration>,
    calls: CallCounts,
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    state: Mutex<PlatformState>,
}

impl MockPlatform {
    fn state(&self) -> MutexGuard<'_, PlatformState> {
        // only poisoned when a test has already failed
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_variant(&self, sku: &str, variant_id: &str) {
        self.state().variants.insert(sku.to_string(), variant_id.to_string());
    }

    /// Registers an order that was synced in an earlier run.
    pub fn add_order(&self, tiktok_order_id: &str, platform_order_id: &str) {
        let mut state = self.state();
        let name = format!("#{}", state.orders.len() + 1001);
        let tags = vec![crate::sync_types::order_tag(tiktok_order_id)];
        state.orders.push(StoredOrder { id: platform_order_id.to_string(), name, tags });
    }

    pub fn add_fulfillments(&self, platform_order_id: &str, fulfillments: Vec<PlatformFulfillment>) {
        let mut state = self.state();
        state.fulfillments.insert(platform_order_id.to_string(), fulfillments);
        if !state.orders.iter().any(|o| o.id == platform_order_id) {
            let name = format!("#{}", state.orders.len() + 1001);
            state.orders.push(StoredOrder { id: platform_order_id.to_string(), name, tags: vec![] });
        }
    }

    /// From now on, order creation answers with these user errors and creates nothing.
    pub fn reject_orders_with<S: AsRef<str>>(&self, errors: &[S]) {
        self.state().rejection = Some(errors.iter().map(|e| e.as_ref().to_string()).collect());
    }

    /// From now on, every call fails with a transport error.
    pub fn fail_with(&self, message: &str) {
        self.state().failure = Some(message.to_string());
    }

    /// Every call waits this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.state().delay = Some(delay);
    }

    /// Variant lookups for `sku` wait this long before answering.
    pub fn set_sku_delay(&self, sku: &str, delay: Duration) {
        self.state().sku_delays.insert(sku.to_string(), delay);
    }

    pub fn calls(&self) -> CallCounts {
        self.state().calls
    }

    /// Every successfully created order, in creation order.
    pub fn created_orders(&self) -> Vec<OrderCreateRequest> {
        self.state().created.clone()
    }

    pub fn order_count(&self) -> usize {
        self.state().orders.len()
    }

    /// Counts the call and returns the delay to apply, or the configured failure.
    fn enter<F>(&self, count: F, extra_delay: Option<Duration>) -> Result<Option<Duration>, LookupError>
    where F: FnOnce(&mut CallCounts) {
        let mut state = self.state();
        count(&mut state.calls);
        if let Some(message) = &state.failure {
            return Err(LookupError::Transport(message.clone()));
        }
        Ok(extra_delay.or(state.delay))
    }

    async fn pause(delay: Option<Duration>) {
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
    }
}

impl LookupClient for MockPlatform {
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<String>, LookupError> {
        let sku_delay = self.state().sku_delays.get(sku).copied();
        let delay = self.enter(|c| c.find_variant_by_sku += 1, sku_delay)?;
        Self::pause(delay).await;
        Ok(self.state().variants.get(sku).cloned())
    }

    async fn find_order_by_tag(&self, tag: &str) -> Result<Option<PlatformOrder>, LookupError> {
        let delay = self.enter(|c| c.find_order_by_tag += 1, None)?;
        Self::pause(delay).await;
        let state = self.state();
        let found = state.orders.iter().find(|o| o.tags.iter().any(|t| t == tag));
        Ok(found.map(|o| PlatformOrder { id: o.id.clone(), name: o.name.clone() }))
    }

    async fn create_order(&self, order: &OrderCreateRequest) -> Result<OrderCreateResult, LookupError> {
        let delay = self.enter(|c| c.create_order += 1, None)?;
        Self::pause(delay).await;
        let mut state = self.state();
        if let Some(errors) = &state.rejection {
            return Ok(OrderCreateResult::rejected(errors.clone()));
        }
        let number = state.orders.len() + 1001;
        let id = format!("gid://shopify/Order/{}", 5_883_123_400_000u64 + number as u64);
        state.orders.push(StoredOrder { id: id.clone(), name: format!("#{number}"), tags: order.tags.clone() });
        state.created.push(order.clone());
        Ok(OrderCreateResult::created(id))
    }

    async fn fetch_order_fulfillments(&self, order_id: &str) -> Result<Option<Vec<PlatformFulfillment>>, LookupError> {
        let delay = self.enter(|c| c.fetch_order_fulfillments += 1, None)?;
        Self::pause(delay).await;
        let state = self.state();
        if !state.orders.iter().any(|o| o.id == order_id) {
            return Ok(None);
        }
        Ok(Some(state.fulfillments.get(order_id).cloned().unwrap_or_default()))
    }
}
