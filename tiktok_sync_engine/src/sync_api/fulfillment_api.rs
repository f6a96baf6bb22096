//! Reads tracking information for synced orders back out of Shopify, in the shape TikTok's shipping upload expects.
//!
//! The input is the outcome file of an order sync: each row names a TikTok order, the Shopify order it was synced to,
//! and the SKU map that translates Shopify SKUs back into TikTok SKU ids. Rows that cannot be matched are skipped;
//! nothing in here fails a run.
use std::fmt::Debug;

use futures_util::{stream, StreamExt};
use log::*;
use sync_common::non_blank;

use crate::{
    events::EventProducers,
    sync_api::with_timeout,
    sync_types::{ExportRow, SkuMap, SyncConfig, TrackingRecord, NOT_AVAILABLE},
    traits::{LookupClient, PlatformFulfillment},
};

/// A fulfilled line, flattened together with its fulfillment's tracking details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingCandidate {
    pub sku: String,
    pub quantity: i64,
    pub tracking_number: String,
    pub tracking_url: String,
    pub carrier: String,
}

/// Flattens every line of every fulfillment into a candidate. Tracking details come from the fulfillment's first
/// tracking entry; each missing field becomes "N/A" on its own.
pub fn tracking_candidates(fulfillments: &[PlatformFulfillment]) -> Vec<TrackingCandidate> {
    fulfillments
        .iter()
        .flat_map(|f| {
            let info = f.tracking_info.first();
            let field = |v: Option<&Option<String>>| {
                v.and_then(|s| s.as_deref()).and_then(non_blank).unwrap_or(NOT_AVAILABLE).to_string()
            };
            let tracking_number = field(info.map(|i| &i.number));
            let tracking_url = field(info.map(|i| &i.url));
            let carrier = field(info.map(|i| &i.company));
            f.line_items.iter().map(move |line| TrackingCandidate {
                sku: line.sku.clone().unwrap_or_default(),
                quantity: line.quantity,
                tracking_number: tracking_number.clone(),
                tracking_url: tracking_url.clone(),
                carrier: carrier.clone(),
            })
        })
        .collect()
}

/// Keeps the candidates whose SKU appears in `sku_map` and converts them into TikTok tracking records.
pub fn match_tracking_records(
    order_id: &str,
    candidates: Vec<TrackingCandidate>,
    sku_map: &SkuMap,
) -> Vec<TrackingRecord> {
    candidates
        .into_iter()
        .filter_map(|c| {
            let Some(sku_id) = sku_map.marketplace_sku_id(&c.sku) else {
                warn!("🚚️ [{order_id}] Fulfilled SKU '{}' is not in the order's SKU map. Skipping it.", c.sku);
                return None;
            };
            Some(TrackingRecord {
                order_id: order_id.to_string(),
                sku_id: Some(sku_id.to_string()),
                quantity: Some(c.quantity),
                tracking_id: c.tracking_number,
                shipping_provider_name: c.carrier,
                shipping_service: None,
                auto_combine_group_id: NOT_AVAILABLE.to_string(),
            })
        })
        .collect()
}

pub struct FulfillmentExtractor<L> {
    client: L,
    config: SyncConfig,
    producers: EventProducers,
}

impl<L> Debug for FulfillmentExtractor<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FulfillmentExtractor")
    }
}

impl<L> FulfillmentExtractor<L> {
    pub fn new(client: L, config: SyncConfig, producers: EventProducers) -> Self {
        Self { client, config, producers }
    }
}

impl<L> FulfillmentExtractor<L>
where L: LookupClient
{
    /// Collects the tracking records of every row, keeping row order.
    pub async fn extract(&self, rows: &[ExportRow]) -> Vec<TrackingRecord> {
        self.producers.emit(Level::Info, format!("Fetching fulfillments for {} order(s)", rows.len())).await;
        let concurrency = self.config.max_concurrent_orders.max(1);
        let records = stream::iter(rows)
            .map(|row| self.extract_row(row))
            .buffered(concurrency)
            .collect::<Vec<Vec<TrackingRecord>>>()
            .await
            .into_iter()
            .flatten()
            .collect::<Vec<TrackingRecord>>();
        self.producers.emit(Level::Info, format!("{} tracking record(s) extracted", records.len())).await;
        records
    }

    /// The tracking records of a single row. Empty if the row cannot be matched.
    pub async fn extract_row(&self, row: &ExportRow) -> Vec<TrackingRecord> {
        let order_id = row.order_id.trim();
        let Some(platform_order_id) = non_blank(&row.platform_order_id) else {
            debug!("🚚️ [{order_id}] No Shopify order id. Skipping.");
            return vec![];
        };
        let sku_map = match SkuMap::from_json(&row.sku_ids) {
            Ok(map) => map,
            Err(e) => {
                self.producers.emit_for_order(Level::Warn, order_id, format!("Skipping row. {e}")).await;
                return vec![];
            },
        };
        let timeout = self.config.call_timeout;
        let fulfillments = match with_timeout(timeout, self.client.fetch_order_fulfillments(platform_order_id)).await {
            Ok(Some(f)) => f,
            Ok(None) => {
                self.producers
                    .emit_for_order(Level::Warn, order_id, format!("Shopify order {platform_order_id} was not found"))
                    .await;
                return vec![];
            },
            Err(e) => {
                self.producers
                    .emit_for_order(Level::Error, order_id, format!("Could not fetch fulfillments. {e}"))
                    .await;
                return vec![];
            },
        };
        if fulfillments.is_empty() {
            self.producers.emit_for_order(Level::Info, order_id, "Not fulfilled yet").await;
            return vec![];
        }
        let records = match_tracking_records(order_id, tracking_candidates(&fulfillments), &sku_map);
        self.producers
            .emit_for_order(Level::Info, order_id, format!("{} tracking record(s) found", records.len()))
            .await;
        records
    }
}
