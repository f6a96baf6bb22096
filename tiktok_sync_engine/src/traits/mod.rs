//! # The network boundary of the sync engine.
//!
//! The engine never talks to Shopify directly. Everything it needs from the store goes through the [`LookupClient`]
//! trait, which the host implements on top of a real API client. Tests use an in-memory implementation instead.
//!
//! "Not found" is never an error at this boundary: lookups return `Ok(None)`. A [`LookupError`] always means the call
//! itself failed.
mod data_objects;
mod lookup_client;

pub use data_objects::{
    OrderCreateResult,
    PlatformFulfillment,
    PlatformFulfillmentLine,
    PlatformOrder,
    PlatformTrackingInfo,
};
pub use lookup_client::{LookupClient, LookupError};
