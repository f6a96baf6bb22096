//! A thin client for the parts of the Shopify Admin GraphQL API that the order sync needs: variant lookup by SKU,
//! order lookup by tag, order creation and fulfillment queries.
mod api;
mod config;
mod error;
mod queries;

mod data_objects;
pub mod helpers;

pub use api::ShopifyApi;
pub use config::ShopifyConfig;
pub use data_objects::{
    Connection,
    CreatedOrder,
    Edge,
    FulfilledLineItem,
    Fulfillment,
    FulfillmentLineItem,
    OrderCreatePayload,
    OrderFulfillments,
    OrderSummary,
    ProductVariant,
    TrackingInfo,
    UserError,
};
pub use error::ShopifyApiError;
