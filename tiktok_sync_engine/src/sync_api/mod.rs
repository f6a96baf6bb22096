//! # Sync engine public API
//!
//! * [`OrderReconciler`] turns aggregated TikTok orders into Shopify orders, one [`ReconciliationOutcome`] per order.
//! * [`FulfillmentExtractor`] reads the fulfillments of previously synced orders back out of Shopify and turns them
//!   into TikTok shipping records.
//!
//! Both are generic over a [`LookupClient`], and every call they make through it is bounded by
//! [`SyncConfig::call_timeout`].
//!
//! [`ReconciliationOutcome`]: crate::sync_types::ReconciliationOutcome
//! [`LookupClient`]: crate::traits::LookupClient
//! [`SyncConfig::call_timeout`]: crate::sync_types::SyncConfig::call_timeout
use std::{future::Future, time::Duration};

use crate::traits::LookupError;

pub mod errors;
pub mod fulfillment_api;
pub mod reconciler;

pub use errors::ReconcileError;
pub use fulfillment_api::{match_tracking_records, tracking_candidates, FulfillmentExtractor, TrackingCandidate};
pub use reconciler::OrderReconciler;

/// Awaits a lookup call, turning an overrun into [`LookupError::Timeout`].
pub(crate) async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, LookupError>
where F: Future<Output = Result<T, LookupError>> {
    tokio::time::timeout(timeout, call).await.map_err(|_| LookupError::Timeout(timeout))?
}
