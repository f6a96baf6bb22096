use std::sync::Arc;

use graphql_parser::parse_query;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::ShopifyConfig,
    data_objects::{
        OrderCreatePayload,
        OrderCreateResponse,
        OrderFulfillments,
        OrderFulfillmentsResponse,
        OrderSummaries,
        OrderSummary,
        ProductVariant,
        ProductVariants,
    },
    helpers::{order_gid, search_value},
    queries::{ORDER_BY_TAG, ORDER_CREATE, ORDER_FULFILLMENTS, VARIANT_BY_SKU},
    ShopifyApiError,
};

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.admin_access_token.reveal().as_str())
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        headers.insert("X-Shopify-Access-Token", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", self.config.shop, self.config.api_version)
    }

    pub async fn graphql_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Value>,
    ) -> Result<T, ShopifyApiError> {
        let query = parse_query::<String>(query).map_err(|e| ShopifyApiError::InvalidGraphQL(e.to_string()))?;
        let mut body = serde_json::json!({
            "query": query.to_string(),
        });
        if let Some(vars) = variables {
            body["variables"] = vars;
        }
        let url = self.url("/graphql.json");
        trace!("Sending GraphQL query to {url}: {body}");
        let response = self.client.post(url).json(&body).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await?;
            return Err(ShopifyApiError::QueryError { status, message });
        }
        let result = response.json::<Value>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
        if let Some(errors) = result["errors"].as_array() {
            let e = errors.iter().map(|e| e.to_string()).collect::<Vec<String>>().join(", ");
            return Err(ShopifyApiError::GraphQLError(e));
        }
        let data = result["data"].clone();
        let costs = result["extensions"]["cost"].clone();
        trace!("GraphQL response: {data}");
        trace!("GraphQL costs: {costs}");
        if data.is_null() {
            return Err(ShopifyApiError::EmptyResponse);
        }
        let result = serde_json::from_value(data).map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
        Ok(result)
    }

    /// Finds the variant whose SKU matches `sku` exactly. Shopify's search is fuzzy ("POMADE" also matches
    /// "POMADE-XL"), so the candidates are filtered locally.
    pub async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<ProductVariant>, ShopifyApiError> {
        let variables = serde_json::json!({ "query": format!("sku:{}", search_value(sku)) });
        debug!("Looking up variant for SKU {sku}");
        let result = self.graphql_query::<ProductVariants>(VARIANT_BY_SKU, Some(variables)).await?;
        let variant = result.product_variants.into_nodes().find(|v| v.sku.as_deref() == Some(sku));
        match &variant {
            Some(v) => debug!("SKU {sku} resolved to variant {} ({})", v.id, v.title),
            None => info!("No variant with SKU {sku} exists"),
        }
        Ok(variant)
    }

    /// Returns the first order carrying the given tag, if any.
    pub async fn find_order_by_tag(&self, tag: &str) -> Result<Option<OrderSummary>, ShopifyApiError> {
        let variables = serde_json::json!({ "query": format!("tag:{}", search_value(tag)) });
        debug!("Searching for orders tagged {tag}");
        let result = self.graphql_query::<OrderSummaries>(ORDER_BY_TAG, Some(variables)).await?;
        Ok(result.orders.into_nodes().next())
    }

    /// Submits an `orderCreate` mutation. `order` must serialize to an `OrderCreateOrderInput`.
    ///
    /// User errors are not converted into an `Err`; callers decide what a rejected order means to them.
    pub async fn create_order<T: Serialize>(&self, order: &T) -> Result<OrderCreatePayload, ShopifyApiError> {
        let order = serde_json::to_value(order).map_err(|e| ShopifyApiError::JsonError(e.to_string()))?;
        let variables = serde_json::json!({ "order": order });
        let result = self.graphql_query::<OrderCreateResponse>(ORDER_CREATE, Some(variables)).await?;
        let payload = result.order_create.ok_or(ShopifyApiError::EmptyResponse)?;
        match &payload.order {
            Some(o) if payload.user_errors.is_empty() => info!("Created order {}", o.id),
            _ => warn!("Shopify did not create the order. {} user error(s)", payload.user_errors.len()),
        }
        Ok(payload)
    }

    /// Fetches the fulfillments of an order. Returns `None` if the order does not exist.
    pub async fn fetch_order_fulfillments(&self, order_id: &str) -> Result<Option<OrderFulfillments>, ShopifyApiError> {
        let variables = serde_json::json!({ "id": order_gid(order_id) });
        debug!("Fetching fulfillments for order {order_id}");
        let result = self.graphql_query::<OrderFulfillmentsResponse>(ORDER_FULFILLMENTS, Some(variables)).await?;
        if let Some(order) = &result.order {
            debug!("Order {order_id} has {} fulfillment(s)", order.fulfillments.len());
        }
        Ok(result.order)
    }
}
