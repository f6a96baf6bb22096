//! Tax and total calculations for created orders.
//!
//! TikTok reports a single tax amount per order. Shopify wants tax lines per line item and per shipping line, so the
//! order's effective tax rate is derived from its totals and applied to each line. Amounts are rounded to cents; the
//! rate shown on each tax line is rounded to two decimal places of a percent, independently of the amounts. The two
//! roundings do not always multiply back to the same figure, and that is expected.
use crate::{
    order_input::{LineItemInput, MoneyBag, ShippingLineInput, TaxLineInput},
    sync_types::{AggregatedOrder, LineItem, ShippingLine},
};

/// Rounds to cents, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The rate as shown on a tax line: 0.082518 → 0.0825 (8.25%).
pub fn display_rate(rate: f64) -> f64 {
    round2(rate * 100.0) / 100.0
}

/// The order's effective tax rate. Zero when there is no tax, or nothing to tax.
///
/// The items total is rounded first, since it is the sum of per-unit prices multiplied back up by quantity and
/// carries floating point noise.
pub fn tax_rate(items_total: f64, shipping_total: f64, tax_total: f64) -> f64 {
    let base = round2(items_total) + shipping_total;
    if tax_total == 0.0 || items_total + shipping_total == 0.0 || base == 0.0 {
        return 0.0;
    }
    tax_total / base
}

/// The sums a created order is built from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderAmounts {
    pub items_total: f64,
    pub shipping_total: f64,
    pub delivery_fee_total: f64,
    pub tax_total: f64,
    pub tax_rate: f64,
}

impl OrderAmounts {
    pub fn from_order(order: &AggregatedOrder) -> Self {
        let items_total = order.line_items.iter().map(LineItem::total).sum::<f64>();
        let delivery_fee_total = order.line_items.iter().map(|l| l.retail_delivery_fee).sum::<f64>();
        let shipping_total = order.shipping_lines.iter().map(|l| l.fee_after_discount).sum::<f64>();
        let tax_total = order.taxes;
        let tax_rate = tax_rate(items_total, shipping_total, tax_total);
        Self { items_total, shipping_total, delivery_fee_total, tax_total, tax_rate }
    }

    /// Unrounded; round it where it leaves the engine.
    pub fn order_total(&self) -> f64 {
        self.items_total + self.shipping_total + self.delivery_fee_total + self.tax_total
    }
}

fn tax_line(title: String, rate: f64, amount: f64, currency: &str) -> TaxLineInput {
    TaxLineInput { title, rate: display_rate(rate), price_set: MoneyBag::new(amount, currency) }
}

/// Builds the Shopify line for a product. The price set carries the discounted unit price as is (Shopify multiplies
/// by quantity); the tax is computed on the rounded line total.
pub fn line_item_with_tax(
    line: &LineItem,
    variant_id: &str,
    tax_rate: f64,
    currency: &str,
    disable_amounts: bool,
) -> LineItemInput {
    let (price, tax_lines) = if disable_amounts || line.price_after_discount == 0.0 {
        (0.0, vec![])
    } else {
        let tax = round2(round2(line.total()) * tax_rate);
        let title = format!("Product Sales tax: {}", line.title);
        (line.price_after_discount, vec![tax_line(title, tax_rate, tax, currency)])
    };
    LineItemInput {
        variant_id: Some(variant_id.to_string()),
        title: None,
        quantity: line.quantity,
        price_set: MoneyBag::new(price, currency),
        tax_lines,
        requires_shipping: Some(true),
    }
}

pub fn shipping_line_with_tax(
    line: &ShippingLine,
    tax_rate: f64,
    currency: &str,
    disable_amounts: bool,
) -> ShippingLineInput {
    let (price, tax_lines) = if disable_amounts || line.fee_after_discount == 0.0 {
        (0.0, vec![])
    } else {
        let tax = round2(line.fee_after_discount * tax_rate);
        (line.fee_after_discount, vec![tax_line("Shipping fee tax".to_string(), tax_rate, tax, currency)])
    };
    ShippingLineInput { title: line.title.clone(), price_set: MoneyBag::new(price, currency), tax_lines }
}

/// A custom line for retail delivery fees (e.g. Colorado's). It has no variant and is not taxed.
pub fn delivery_fee_line(title: &str, fee: f64, currency: &str) -> LineItemInput {
    LineItemInput {
        variant_id: None,
        title: Some(title.to_string()),
        quantity: 1,
        price_set: MoneyBag::new(round2(fee), currency),
        tax_lines: vec![],
        requires_shipping: None,
    }
}
