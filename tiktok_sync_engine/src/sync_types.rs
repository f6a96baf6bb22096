//! Data types shared by every stage of the sync pipeline.
use std::{fmt::Display, time::Duration};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_SOURCE_NAME: &str = "TikTok";
pub const DEFAULT_SHIPPING_METHOD_TITLE: &str = "Shipped by Seller: Standard Shipping";
pub const DEFAULT_DELIVERY_FEE_LINE_TITLE: &str = "Retail Delivery Fee";
pub const DEFAULT_BUYER_EMAIL_DOMAIN: &str = "scs.tiktokw.us";
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);
/// Prefix of the Shopify tag that records which TikTok order a Shopify order was created from.
pub const ORDER_TAG_PREFIX: &str = "TikTokOrderID:";
/// Placeholder the TikTok shipping upload expects for unknown tracking fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// The shopify tag used as the idempotency key for a TikTok order.
pub fn order_tag(order_id: &str) -> String {
    format!("{ORDER_TAG_PREFIX}{order_id}")
}

//--------------------------------------     SyncConfig      ---------------------------------------------------------
/// Options that shape the orders the pipeline creates. The host application builds this; the engine never reads the
/// environment itself.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// When true, every line, shipping line and transaction is created with a zero amount.
    pub disable_amounts: bool,
    pub currency: String,
    /// The `sourceName` given to created orders.
    pub source_name: String,
    pub shipping_method_title: String,
    pub delivery_fee_line_title: String,
    /// Buyer usernames are turned into `<username>@<buyer_email_domain>`.
    pub buyer_email_domain: String,
    /// How many orders may be reconciled at once. 1 reconciles strictly one after the other.
    pub max_concurrent_orders: usize,
    /// Upper bound for any single call to the platform.
    pub call_timeout: Duration,
    /// Memoize SKU lookups (including misses) for the duration of a run.
    pub cache_sku_lookups: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            disable_amounts: false,
            currency: DEFAULT_CURRENCY.to_string(),
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            shipping_method_title: DEFAULT_SHIPPING_METHOD_TITLE.to_string(),
            delivery_fee_line_title: DEFAULT_DELIVERY_FEE_LINE_TITLE.to_string(),
            buyer_email_domain: DEFAULT_BUYER_EMAIL_DOMAIN.to_string(),
            max_concurrent_orders: 1,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            cache_sku_lookups: true,
        }
    }
}

//--------------------------------------   AggregatedOrder   ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub province_code: String,
    pub zip: String,
    pub country_code: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    /// The seller's own SKU, which is also the Shopify variant SKU.
    pub sku: String,
    /// TikTok's identifier for the same item.
    pub marketplace_sku_id: String,
    pub quantity: u32,
    pub original_price: f64,
    /// Unit price before discounts.
    pub price_before_discount: f64,
    /// Unit price after discounts.
    pub price_after_discount: f64,
    pub retail_delivery_fee: f64,
}

impl LineItem {
    /// The unrounded, discounted total for this line.
    pub fn total(&self) -> f64 {
        self.price_after_discount * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingLine {
    pub title: String,
    pub original_fee: f64,
    pub fee_after_discount: f64,
}

/// All the rows of one TikTok order, folded together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedOrder {
    pub order_id: String,
    pub customer: Customer,
    pub shipping_address: ShippingAddress,
    pub line_items: Vec<LineItem>,
    pub shipping_lines: Vec<ShippingLine>,
    pub taxes: f64,
    pub package_id: String,
    /// Messages for rows of this order that could not be parsed. Any defect fails the whole order.
    pub defects: Vec<String>,
}

impl AggregatedOrder {
    pub fn is_defective(&self) -> bool {
        !self.defects.is_empty()
    }

    pub fn sku_map(&self) -> SkuMap {
        SkuMap::from_line_items(&self.line_items)
    }
}

//--------------------------------------        SkuMap       ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuEntry {
    #[serde(rename = "skuId")]
    pub sku_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Error)]
#[error("Could not parse the SKU id map. {0}")]
pub struct SkuMapError(String);

/// Maps a seller SKU to TikTok's SKU id for the same item. It travels with each outcome so that Shopify fulfillments
/// can later be matched back to TikTok items. It is serialized (as JSON) only when written to an export file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuMap(IndexMap<String, SkuEntry>);

impl SkuMap {
    /// Later lines with a repeated SKU replace earlier ones, but keep the position of the first.
    pub fn from_line_items(lines: &[LineItem]) -> Self {
        let mut map = IndexMap::with_capacity(lines.len());
        for line in lines {
            let entry = SkuEntry { sku_id: line.marketplace_sku_id.trim().to_string(), quantity: line.quantity };
            map.insert(line.sku.clone(), entry);
        }
        Self(map)
    }

    /// Parses the JSON form written by [`SkuMap::to_json`]. A blank string is an empty map.
    pub fn from_json(json: &str) -> Result<Self, SkuMapError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| SkuMapError(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn get(&self, sku: &str) -> Option<&SkuEntry> {
        self.0.get(sku)
    }

    /// TikTok's SKU id for the given seller SKU, if it is known and non-empty.
    pub fn marketplace_sku_id(&self, sku: &str) -> Option<&str> {
        self.get(sku).map(|e| e.sku_id.as_str()).filter(|id| !id.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//--------------------------------------       Outcomes      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    Created,
    Skipped,
    Failed,
}

impl Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Skipped => write!(f, "Skipped"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// The result of reconciling one TikTok order. Exactly one is produced for every order in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub order_id: String,
    /// The Shopify order gid. Empty when the order was neither created nor found.
    pub platform_order_id: Option<String>,
    pub status: OutcomeStatus,
    pub message: String,
    pub sku_map: SkuMap,
}

impl ReconciliationOutcome {
    pub fn created(order_id: &str, platform_order_id: String, sku_map: SkuMap) -> Self {
        Self {
            order_id: order_id.to_string(),
            platform_order_id: Some(platform_order_id),
            status: OutcomeStatus::Created,
            message: "Order created successfully".to_string(),
            sku_map,
        }
    }

    pub fn skipped(order_id: &str, platform_order_id: String, sku_map: SkuMap) -> Self {
        Self {
            order_id: order_id.to_string(),
            platform_order_id: Some(platform_order_id),
            status: OutcomeStatus::Skipped,
            message: "Order already exists in Shopify".to_string(),
            sku_map,
        }
    }

    pub fn failed<S: Into<String>>(order_id: &str, message: S, sku_map: SkuMap) -> Self {
        Self {
            order_id: order_id.to_string(),
            platform_order_id: None,
            status: OutcomeStatus::Failed,
            message: message.into(),
            sku_map,
        }
    }
}

/// Tallies a batch of outcomes by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeSummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl OutcomeSummary {
    pub fn from_outcomes(outcomes: &[ReconciliationOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut acc, o| {
            match o.status {
                OutcomeStatus::Created => acc.created += 1,
                OutcomeStatus::Skipped => acc.skipped += 1,
                OutcomeStatus::Failed => acc.failed += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.created + self.skipped + self.failed
    }
}

impl Display for OutcomeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} order(s) processed: {} created, {} skipped, {} failed",
            self.total(),
            self.created,
            self.skipped,
            self.failed
        )
    }
}

//--------------------------------------     Fulfillments    ---------------------------------------------------------
/// One row of a previous run's outcome file, as consumed by the fulfillment export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub order_id: String,
    pub platform_order_id: String,
    /// The JSON-encoded [`SkuMap`].
    pub sku_ids: String,
}

/// A line of the TikTok shipping-information upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub order_id: String,
    pub sku_id: Option<String>,
    pub quantity: Option<i64>,
    pub tracking_id: String,
    pub shipping_provider_name: String,
    pub shipping_service: Option<String>,
    pub auto_combine_group_id: String,
}

#[cfg(test)]
mod test {
    use super::*;

    fn line(sku: &str, tt_sku: &str, quantity: u32) -> LineItem {
        LineItem { sku: sku.into(), marketplace_sku_id: tt_sku.into(), quantity, ..Default::default() }
    }

    #[test]
    fn sku_map_keeps_first_position_and_last_value() {
        let map = SkuMap::from_line_items(&[line("A", " 1729 ", 2), line("B", "1730", 1), line("A", "1731", 5)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.to_json(), r#"{"A":{"skuId":"1731","quantity":5},"B":{"skuId":"1730","quantity":1}}"#);
    }

    #[test]
    fn sku_map_json() {
        let map = SkuMap::from_json(r#"{"POMADE-4OZ":{"skuId":"1729384756","quantity":2}}"#).unwrap();
        assert_eq!(map.marketplace_sku_id("POMADE-4OZ"), Some("1729384756"));
        assert_eq!(map.marketplace_sku_id("COMB"), None);
        assert!(SkuMap::from_json("  ").unwrap().is_empty());
        assert!(SkuMap::from_json("{not json").is_err());
    }

    #[test]
    fn blank_marketplace_ids_do_not_match() {
        let map = SkuMap::from_line_items(&[line("A", "  ", 1)]);
        assert_eq!(map.marketplace_sku_id("A"), None);
    }

    #[test]
    fn summary_counts() {
        let outcomes = vec![
            ReconciliationOutcome::created("1", "gid://shopify/Order/1".into(), SkuMap::default()),
            ReconciliationOutcome::failed("2", "Variant not found for SKU: X", SkuMap::default()),
            ReconciliationOutcome::failed("3", "Unknown error", SkuMap::default()),
        ];
        let summary = OutcomeSummary::from_outcomes(&outcomes);
        assert_eq!(summary, OutcomeSummary { created: 1, skipped: 0, failed: 2 });
        assert_eq!(summary.to_string(), "3 order(s) processed: 1 created, 0 skipped, 2 failed");
    }
}
