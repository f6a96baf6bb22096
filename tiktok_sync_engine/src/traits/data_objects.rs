use serde::{Deserialize, Serialize};

/// An order that already exists on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformOrder {
    pub id: String,
    pub name: String,
}

/// What the platform said when asked to create an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreateResult {
    /// The new order's id. `None` when the platform did not create anything.
    pub order_id: Option<String>,
    pub user_errors: Vec<String>,
}

impl OrderCreateResult {
    pub fn created<S: Into<String>>(order_id: S) -> Self {
        Self { order_id: Some(order_id.into()), user_errors: vec![] }
    }

    pub fn rejected<S: Into<String>>(errors: impl IntoIterator<Item = S>) -> Self {
        Self { order_id: None, user_errors: errors.into_iter().map(Into::into).collect() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTrackingInfo {
    pub number: Option<String>,
    pub url: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFulfillmentLine {
    pub sku: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFulfillment {
    pub tracking_info: Vec<PlatformTrackingInfo>,
    pub line_items: Vec<PlatformFulfillmentLine>,
}
