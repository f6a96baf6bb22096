//! TikTok Sync Engine
//!
//! The engine turns TikTok Shop order exports into Shopify orders, and later reads Shopify fulfillments back out as
//! TikTok shipping records. It contains the core logic only: it does not read files, and it does not talk to Shopify
//! directly. Both of those are the host's job.
//!
//! A sync run has three stages:
//! 1. Aggregation ([`mod@aggregator`]). Export rows, one per product line, are grouped into one [`AggregatedOrder`]
//!    per TikTok order id, in the order the ids first appear.
//! 2. Calculation ([`mod@calculator`]). TikTok reports a single tax figure per order. It is turned into an effective
//!    rate and spread over the product and shipping lines as Shopify tax lines.
//! 3. Reconciliation ([`OrderReconciler`]). Each order is checked against the store, its SKUs are resolved to
//!    variants, and the order is created. Every order gets exactly one [`ReconciliationOutcome`], whatever happens.
//!
//! The [`FulfillmentExtractor`] works from the outcome file of an earlier run, pairing Shopify tracking numbers with
//! TikTok SKU ids.
//!
//! All store access goes through the [`LookupClient`] trait. Progress is reported through the [`events`] module, so a
//! host can show a live feed of what the engine is doing.
pub mod aggregator;
pub mod calculator;
pub mod events;
pub mod helpers;
pub mod order_input;
pub mod order_row;
pub mod sync_types;
pub mod traits;

mod sync_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use aggregator::{aggregate_records, OrderAggregator};
pub use order_input::OrderCreateRequest;
pub use order_row::{validate_headers, HeaderError, RawOrderRow, Record, RowError};
pub use sync_api::{
    match_tracking_records,
    tracking_candidates,
    FulfillmentExtractor,
    OrderReconciler,
    ReconcileError,
    TrackingCandidate,
};
pub use sync_types::{
    AggregatedOrder,
    ExportRow,
    OutcomeStatus,
    OutcomeSummary,
    ReconciliationOutcome,
    SkuMap,
    SyncConfig,
    TrackingRecord,
};
pub use traits::{LookupClient, LookupError};
