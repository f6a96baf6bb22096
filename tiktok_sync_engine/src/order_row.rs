//! Typed access to the rows of a TikTok Shop order export.
use std::collections::HashMap;

use thiserror::Error;

/// A CSV row as handed over by the ingestion layer: header name → cell value.
pub type Record = HashMap<String, String>;

/// Column names of the TikTok Shop "To Ship" order export.
pub mod columns {
    pub const ORDER_ID: &str = "Order ID";
    pub const BUYER_USERNAME: &str = "Buyer Username";
    pub const RECIPIENT: &str = "Recipient";
    pub const ADDRESS_LINE_1: &str = "Address Line 1";
    pub const ADDRESS_LINE_2: &str = "Address Line 2";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const ZIPCODE: &str = "Zipcode";
    pub const COUNTRY: &str = "Country";
    pub const PHONE: &str = "Phone #";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const SELLER_SKU: &str = "Seller SKU";
    pub const SKU_ID: &str = "SKU ID";
    pub const QUANTITY: &str = "Quantity";
    pub const UNIT_ORIGINAL_PRICE: &str = "SKU Unit Original Price";
    pub const SUBTOTAL_BEFORE_DISCOUNT: &str = "SKU Subtotal Before Discount";
    pub const SUBTOTAL_AFTER_DISCOUNT: &str = "SKU Subtotal After Discount";
    pub const RETAIL_DELIVERY_FEE: &str = "Retail Delivery Fee";
    pub const ORIGINAL_SHIPPING_FEE: &str = "Original Shipping Fee";
    pub const SHIPPING_FEE_AFTER_DISCOUNT: &str = "Shipping Fee After Discount";
    pub const TAXES: &str = "Taxes";
    pub const PACKAGE_ID: &str = "Package ID";

    // Columns of the outcome file, which is the input of the fulfillment export.
    pub const SHOPIFY_ORDER_ID: &str = "Shopify Order ID";
    pub const STATUS: &str = "Status";
    pub const MESSAGE: &str = "Message";
    pub const SKU_IDS: &str = "SKU IDs";
}

use columns::*;

pub const REQUIRED_ORDER_HEADERS: [&str; 20] = [
    ORDER_ID,
    BUYER_USERNAME,
    RECIPIENT,
    ADDRESS_LINE_1,
    CITY,
    STATE,
    ZIPCODE,
    COUNTRY,
    PHONE,
    PRODUCT_NAME,
    SELLER_SKU,
    SKU_ID,
    QUANTITY,
    UNIT_ORIGINAL_PRICE,
    SUBTOTAL_BEFORE_DISCOUNT,
    SUBTOTAL_AFTER_DISCOUNT,
    RETAIL_DELIVERY_FEE,
    ORIGINAL_SHIPPING_FEE,
    SHIPPING_FEE_AFTER_DISCOUNT,
    TAXES,
];

pub const REQUIRED_EXPORT_HEADERS: [&str; 3] = [ORDER_ID, SHOPIFY_ORDER_ID, SKU_IDS];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required headers: {}", .0.join(", "))]
pub struct HeaderError(pub Vec<String>);

/// Checks that every `required` header is present.
pub fn validate_headers<S: AsRef<str>>(headers: &[S], required: &[&str]) -> Result<(), HeaderError> {
    let missing = required
        .iter()
        .filter(|r| !headers.iter().any(|h| h.as_ref().trim() == **r))
        .map(|r| r.to_string())
        .collect::<Vec<String>>();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(HeaderError(missing))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("Row has no Order ID")]
    MissingOrderId,
    #[error("Invalid quantity '{value}' for SKU '{sku}'. Quantity must be a positive whole number")]
    InvalidQuantity { sku: String, value: String },
    #[error("Invalid amount '{value}' in column '{column}' for SKU '{sku}'")]
    InvalidAmount { column: &'static str, sku: String, value: String },
}

/// One line of a TikTok order export, with its numbers parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOrderRow {
    pub order_id: String,
    pub buyer_username: String,
    pub recipient: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
    pub phone: String,
    pub product_name: String,
    pub seller_sku: String,
    pub sku_id: String,
    pub quantity: u32,
    pub unit_original_price: f64,
    pub subtotal_before_discount: f64,
    pub subtotal_after_discount: f64,
    pub retail_delivery_fee: f64,
    pub original_shipping_fee: f64,
    pub shipping_fee_after_discount: f64,
    pub taxes: f64,
    pub package_id: String,
}

/// Returns the trimmed order id of a record, if it has one.
pub fn record_order_id(record: &Record) -> Option<&str> {
    record.get(ORDER_ID).map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn text(record: &Record, column: &str) -> String {
    record.get(column).map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Blank cells count as zero; anything else must be a finite number.
fn amount(record: &Record, column: &'static str, sku: &str) -> Result<f64, RowError> {
    let value = record.get(column).map(|s| s.trim()).unwrap_or_default();
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| RowError::InvalidAmount {
        column,
        sku: sku.to_string(),
        value: value.to_string(),
    })
}

fn quantity(record: &Record, sku: &str) -> Result<u32, RowError> {
    let value = text(record, QUANTITY);
    match value.parse::<u32>() {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(RowError::InvalidQuantity { sku: sku.to_string(), value }),
    }
}

impl TryFrom<&Record> for RawOrderRow {
    type Error = RowError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        let order_id = record_order_id(record).ok_or(RowError::MissingOrderId)?.to_string();
        let seller_sku = text(record, SELLER_SKU);
        Ok(Self {
            order_id,
            buyer_username: text(record, BUYER_USERNAME),
            recipient: text(record, RECIPIENT),
            address_line_1: text(record, ADDRESS_LINE_1),
            address_line_2: text(record, ADDRESS_LINE_2),
            city: text(record, CITY),
            state: text(record, STATE),
            zipcode: text(record, ZIPCODE),
            country: text(record, COUNTRY),
            phone: text(record, PHONE),
            product_name: text(record, PRODUCT_NAME),
            sku_id: text(record, SKU_ID),
            quantity: quantity(record, &seller_sku)?,
            unit_original_price: amount(record, UNIT_ORIGINAL_PRICE, &seller_sku)?,
            subtotal_before_discount: amount(record, SUBTOTAL_BEFORE_DISCOUNT, &seller_sku)?,
            subtotal_after_discount: amount(record, SUBTOTAL_AFTER_DISCOUNT, &seller_sku)?,
            retail_delivery_fee: amount(record, RETAIL_DELIVERY_FEE, &seller_sku)?,
            original_shipping_fee: amount(record, ORIGINAL_SHIPPING_FEE, &seller_sku)?,
            shipping_fee_after_discount: amount(record, SHIPPING_FEE_AFTER_DISCOUNT, &seller_sku)?,
            taxes: amount(record, TAXES, &seller_sku)?,
            package_id: text(record, PACKAGE_ID),
            seller_sku,
        })
    }
}
