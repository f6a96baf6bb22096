//! Creates Shopify orders for aggregated TikTok orders.
//!
//! Each order goes through the same steps: defect check, existence check, amount computation, SKU resolution,
//! payload assembly and submission. Whatever goes wrong along the way is contained to that order: it ends up as a
//! `Failed` outcome and the run carries on with the next order.
use std::{collections::HashMap, fmt::Debug, sync::Mutex, time::Duration};

use futures_util::{future::try_join_all, stream, StreamExt};
use indexmap::IndexMap;
use log::*;

use crate::{
    calculator::{display_rate, OrderAmounts},
    events::EventProducers,
    order_input::build_order_request,
    sync_api::{with_timeout, ReconcileError},
    sync_types::{order_tag, AggregatedOrder, OutcomeSummary, ReconciliationOutcome, SyncConfig},
    traits::{LookupClient, LookupError},
};

enum Reconciled {
    Created(String),
    Skipped(String),
}

pub struct OrderReconciler<L> {
    client: L,
    config: SyncConfig,
    producers: EventProducers,
}

impl<L> Debug for OrderReconciler<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderReconciler")
    }
}

impl<L> OrderReconciler<L> {
    pub fn new(client: L, config: SyncConfig, producers: EventProducers) -> Self {
        Self { client, config, producers }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn client(&self) -> &L {
        &self.client
    }
}

impl<L> OrderReconciler<L>
where L: LookupClient
{
    /// Reconciles every order and returns one outcome per order, in the same order as `orders`.
    ///
    /// Up to [`SyncConfig::max_concurrent_orders`] orders are in flight at once. SKU lookups are shared across the
    /// run when [`SyncConfig::cache_sku_lookups`] is set.
    pub async fn reconcile_all(&self, orders: &IndexMap<String, AggregatedOrder>) -> Vec<ReconciliationOutcome> {
        let total = orders.len();
        self.producers.emit(Level::Info, format!("Reconciling {total} order(s) with Shopify")).await;
        let resolver = SkuResolver::new(self.config.cache_sku_lookups);
        let concurrency = self.config.max_concurrent_orders.max(1);
        let outcomes = stream::iter(orders.values())
            .map(|order| self.reconcile_with(order, &resolver))
            .buffered(concurrency)
            .collect::<Vec<ReconciliationOutcome>>()
            .await;
        let summary = OutcomeSummary::from_outcomes(&outcomes);
        self.producers.emit(Level::Info, summary.to_string()).await;
        outcomes
    }

    /// Reconciles a single order. Never fails: errors are reported in the outcome.
    pub async fn reconcile_order(&self, order: &AggregatedOrder) -> ReconciliationOutcome {
        self.reconcile_with(order, &SkuResolver::new(false)).await
    }

    async fn reconcile_with(&self, order: &AggregatedOrder, resolver: &SkuResolver) -> ReconciliationOutcome {
        let order_id = order.order_id.as_str();
        let sku_map = order.sku_map();
        let outcome = match self.try_reconcile(order, resolver).await {
            Ok(Reconciled::Created(id)) => {
                self.producers.emit_for_order(Level::Info, order_id, format!("Order created successfully: {id}")).await;
                ReconciliationOutcome::created(order_id, id, sku_map)
            },
            Ok(Reconciled::Skipped(id)) => {
                self.producers.emit_for_order(Level::Info, order_id, format!("Order already exists as {id}")).await;
                ReconciliationOutcome::skipped(order_id, id, sku_map)
            },
            Err(e) => {
                self.producers.emit_for_order(Level::Error, order_id, format!("Order failed. {e}")).await;
                ReconciliationOutcome::failed(order_id, e.to_string(), sku_map)
            },
        };
        self.producers.publish_outcome(&outcome).await;
        outcome
    }

    async fn try_reconcile(
        &self,
        order: &AggregatedOrder,
        resolver: &SkuResolver,
    ) -> Result<Reconciled, ReconcileError> {
        let order_id = order.order_id.as_str();
        if let Some(defect) = order.defects.first() {
            return Err(ReconcileError::Defective(defect.clone()));
        }
        if order.line_items.is_empty() {
            return Err(ReconcileError::NoLineItems);
        }
        let timeout = self.config.call_timeout;
        self.producers.emit_for_order(Level::Debug, order_id, "Checking for an existing Shopify order").await;
        let tag = order_tag(order_id);
        if let Some(existing) = with_timeout(timeout, self.client.find_order_by_tag(&tag)).await? {
            return Ok(Reconciled::Skipped(existing.id));
        }

        let amounts = OrderAmounts::from_order(order);
        trace!("🔄️ [{order_id}] Amounts: {amounts:?}");
        self.producers
            .emit_for_order(
                Level::Debug,
                order_id,
                format!(
                    "Items {:.2}, shipping {:.2}, delivery fees {:.2}, tax {:.2} ({}%)",
                    amounts.items_total,
                    amounts.shipping_total,
                    amounts.delivery_fee_total,
                    amounts.tax_total,
                    display_rate(amounts.tax_rate) * 100.0
                ),
            )
            .await;

        let lookups = order.line_items.iter().map(|line| async move {
            let sku = line.sku.trim();
            if sku.is_empty() {
                return Err(ReconcileError::EmptySku(line.title.clone()));
            }
            resolver
                .resolve(&self.client, sku, timeout)
                .await?
                .ok_or_else(|| ReconcileError::VariantNotFound(sku.to_string()))
        });
        let variant_ids = try_join_all(lookups).await?;

        let request = build_order_request(order, &variant_ids, &amounts, &self.config);
        self.producers
            .emit_for_order(
                Level::Info,
                order_id,
                format!("Creating Shopify order with {} line item(s)", request.line_item_count()),
            )
            .await;
        let result = with_timeout(timeout, self.client.create_order(&request)).await?;
        if let Some(e) = result.user_errors.into_iter().next() {
            return Err(ReconcileError::Rejected(e));
        }
        result.order_id.map(Reconciled::Created).ok_or_else(|| ReconcileError::Rejected("Unknown error".to_string()))
    }
}

/// Resolves SKUs to variant ids, optionally remembering answers (including "not found") for the rest of the run.
struct SkuResolver {
    cache: Option<Mutex<HashMap<String, Option<String>>>>,
}

impl SkuResolver {
    fn new(enabled: bool) -> Self {
        Self { cache: enabled.then(|| Mutex::new(HashMap::new())) }
    }

    fn cached(&self, sku: &str) -> Option<Option<String>> {
        let cache = self.cache.as_ref()?;
        cache.lock().ok()?.get(sku).cloned()
    }

    fn remember(&self, sku: &str, variant_id: &Option<String>) {
        if let Some(mut cache) = self.cache.as_ref().and_then(|c| c.lock().ok()) {
            cache.insert(sku.to_string(), variant_id.clone());
        }
    }

    async fn resolve<L: LookupClient>(
        &self,
        client: &L,
        sku: &str,
        timeout: Duration,
    ) -> Result<Option<String>, LookupError> {
        if let Some(hit) = self.cached(sku) {
            trace!("🔄️ SKU {sku} resolved from cache");
            return Ok(hit);
        }
        let variant_id = with_timeout(timeout, client.find_variant_by_sku(sku)).await?;
        self.remember(sku, &variant_id);
        Ok(variant_id)
    }
}
