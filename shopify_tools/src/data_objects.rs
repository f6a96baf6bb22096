use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Relay-style connection, as returned by every paginated field in the Admin API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: vec![] }
    }
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|e| e.node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductVariant {
    pub id: String,
    pub sku: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductVariants {
    #[serde(rename = "productVariants")]
    pub product_variants: Connection<ProductVariant>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderSummaries {
    pub orders: Connection<OrderSummary>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatedOrder {
    pub id: String,
    pub name: Option<String>,
}

/// The `orderCreate` mutation payload. Shopify reports validation problems in `user_errors` rather than as GraphQL
/// errors, and leaves `order` null when it refused to create the order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderCreatePayload {
    pub order: Option<CreatedOrder>,
    #[serde(rename = "userErrors", default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderCreateResponse {
    #[serde(rename = "orderCreate")]
    pub order_create: Option<OrderCreatePayload>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackingInfo {
    pub number: Option<String>,
    pub url: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FulfilledLineItem {
    pub id: String,
    pub sku: Option<String>,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FulfillmentLineItem {
    pub id: String,
    /// The quantity shipped in this fulfillment, which can be less than the line item's quantity.
    pub quantity: i64,
    #[serde(rename = "lineItem")]
    pub line_item: FulfilledLineItem,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Fulfillment {
    pub id: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "trackingInfo", default)]
    pub tracking_info: Vec<TrackingInfo>,
    #[serde(rename = "fulfillmentLineItems", default)]
    pub fulfillment_line_items: Connection<FulfillmentLineItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderFulfillments {
    pub id: String,
    #[serde(default)]
    pub fulfillments: Vec<Fulfillment>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderFulfillmentsResponse {
    pub order: Option<OrderFulfillments>,
}
