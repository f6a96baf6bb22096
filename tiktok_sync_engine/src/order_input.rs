//! The shape of an `orderCreate` request. Field names follow Shopify's `OrderCreateOrderInput`, so the request can be
//! serialized straight into the mutation's `order` variable.
use serde::Serialize;
use sync_common::non_blank;

use crate::{
    calculator::{delivery_fee_line, line_item_with_tax, round2, shipping_line_with_tax, OrderAmounts},
    sync_types::{order_tag, AggregatedOrder, Customer, ShippingAddress, SyncConfig},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: f64,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyBag {
    pub shop_money: Money,
}

impl MoneyBag {
    pub fn new(amount: f64, currency: &str) -> Self {
        Self { shop_money: Money { amount, currency_code: currency.to_string() } }
    }

    pub fn amount(&self) -> f64 {
        self.shop_money.amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLineInput {
    pub title: String,
    pub rate: f64,
    pub price_set: MoneyBag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub quantity: u32,
    pub price_set: MoneyBag,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tax_lines: Vec<TaxLineInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_shipping: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLineInput {
    pub title: String,
    pub price_set: MoneyBag,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tax_lines: Vec<TaxLineInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub kind: String,
    pub status: String,
    pub amount_set: MoneyBag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
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

impl From<&ShippingAddress> for AddressInput {
    fn from(a: &ShippingAddress) -> Self {
        Self {
            address1: a.address1.clone(),
            address2: a.address2.clone(),
            city: a.city.clone(),
            province_code: a.province_code.clone(),
            zip: a.zip.clone(),
            country_code: a.country_code.clone(),
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
            phone: a.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpsert {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Shopify rejects blank phone numbers, so the key is left out instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<&Customer> for CustomerUpsert {
    fn from(c: &Customer) -> Self {
        Self {
            email: c.email.clone(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            phone: c.phone.as_deref().and_then(non_blank).map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub to_upsert: CustomerUpsert,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub source_name: String,
    pub currency: String,
    pub line_items: Vec<LineItemInput>,
    pub shipping_address: AddressInput,
    pub tags: Vec<String>,
    pub customer: CustomerInput,
    pub financial_status: String,
    pub note: String,
    pub custom_attributes: Vec<Attribute>,
    pub shipping_lines: Vec<ShippingLineInput>,
    pub transactions: Vec<TransactionInput>,
}

impl OrderCreateRequest {
    pub fn line_item_count(&self) -> usize {
        self.line_items.len()
    }
}

/// Assembles the create-order request for `order`.
///
/// `variant_ids` holds the resolved Shopify variant of each line item, in line-item order.
pub fn build_order_request(
    order: &AggregatedOrder,
    variant_ids: &[String],
    amounts: &OrderAmounts,
    config: &SyncConfig,
) -> OrderCreateRequest {
    let currency = config.currency.as_str();
    let disable_amounts = config.disable_amounts;
    let mut line_items = order
        .line_items
        .iter()
        .zip(variant_ids)
        .map(|(line, variant_id)| line_item_with_tax(line, variant_id, amounts.tax_rate, currency, disable_amounts))
        .collect::<Vec<LineItemInput>>();
    if amounts.delivery_fee_total > 0.0 {
        let fee = if disable_amounts { 0.0 } else { amounts.delivery_fee_total };
        line_items.push(delivery_fee_line(&config.delivery_fee_line_title, fee, currency));
    }
    let shipping_lines = order
        .shipping_lines
        .iter()
        .map(|line| shipping_line_with_tax(line, amounts.tax_rate, currency, disable_amounts))
        .collect();
    let total = round2(amounts.order_total());
    let transactions = if disable_amounts || total == 0.0 {
        vec![]
    } else {
        vec![TransactionInput {
            kind: "SALE".to_string(),
            status: "SUCCESS".to_string(),
            amount_set: MoneyBag::new(total, currency),
        }]
    };
    let order_id = order.order_id.as_str();
    OrderCreateRequest {
        source_name: config.source_name.clone(),
        currency: currency.to_string(),
        line_items,
        shipping_address: AddressInput::from(&order.shipping_address),
        tags: vec!["Shipped by Seller".to_string(), order_tag(order_id)],
        customer: CustomerInput { to_upsert: CustomerUpsert::from(&order.customer) },
        financial_status: "PAID".to_string(),
        note: format!("TikTok Order ID: {order_id}"),
        custom_attributes: vec![
            Attribute { key: "TikTokOrderID".to_string(), value: order_id.to_string() },
            Attribute { key: "PackageID".to_string(), value: order.package_id.clone() },
        ],
        shipping_lines,
        transactions,
    }
}
