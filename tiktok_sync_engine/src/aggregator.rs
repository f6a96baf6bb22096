//! Folds the line-rows of a TikTok export into one [`AggregatedOrder`] per TikTok order id.
//!
//! Orders come out in the order their ids were first seen, no matter how the rows are interleaved. A row that cannot
//! be parsed does not stop the aggregation; it is recorded as a defect against its order, which then fails during
//! reconciliation.
use indexmap::IndexMap;
use log::*;

use crate::{
    helpers::{country_code, state_code},
    order_row::{record_order_id, RawOrderRow, Record},
    sync_types::{AggregatedOrder, Customer, LineItem, ShippingAddress, ShippingLine, SyncConfig},
};

const FALLBACK_FIRST_NAME: &str = "TikTok";
const FALLBACK_LAST_NAME: &str = "Customer";

pub struct OrderAggregator<'a> {
    config: &'a SyncConfig,
    orders: IndexMap<String, AggregatedOrder>,
    skipped_rows: usize,
}

impl<'a> OrderAggregator<'a> {
    pub fn new(config: &'a SyncConfig) -> Self {
        Self { config, orders: IndexMap::new(), skipped_rows: 0 }
    }

    /// Parses and adds a raw CSV record.
    pub fn push_record(&mut self, record: &Record) {
        let Some(order_id) = record_order_id(record) else {
            self.skipped_rows += 1;
            info!("📋️ Skipping row without an Order ID: {record:?}");
            return;
        };
        match RawOrderRow::try_from(record) {
            Ok(row) => self.push_row(row),
            Err(e) => {
                warn!("📋️ Row for order {order_id} is malformed and will fail the order. {e}");
                // later rows of this order only add line items; its customer, address and shipping stay empty
                self.orders
                    .entry(order_id.to_string())
                    .or_insert_with(|| AggregatedOrder { order_id: order_id.to_string(), ..Default::default() })
                    .defects
                    .push(e.to_string());
            },
        }
    }

    /// Adds a parsed row. The first row of an order determines its customer, address, shipping and tax; later rows
    /// only contribute line items.
    pub fn push_row(&mut self, row: RawOrderRow) {
        let line = line_item(&row);
        match self.orders.get_mut(&row.order_id) {
            Some(order) => order.line_items.push(line),
            None => {
                let mut order = new_order(&row, self.config);
                order.line_items.push(line);
                self.orders.insert(row.order_id, order);
            },
        }
    }

    /// The number of rows ignored because they had no order id.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn finish(self) -> IndexMap<String, AggregatedOrder> {
        debug!("📋️ {} unique order(s) aggregated, {} row(s) skipped", self.orders.len(), self.skipped_rows);
        self.orders
    }
}

/// Convenience wrapper that aggregates a whole file's worth of records.
pub fn aggregate_records<'r, I>(records: I, config: &SyncConfig) -> IndexMap<String, AggregatedOrder>
where I: IntoIterator<Item = &'r Record> {
    let mut aggregator = OrderAggregator::new(config);
    records.into_iter().for_each(|r| aggregator.push_record(r));
    aggregator.finish()
}

/// Splits a recipient name on its first space. Either half falls back to a placeholder when blank.
pub fn split_name(recipient: &str) -> (String, String) {
    let recipient = recipient.trim();
    let (first, last) = recipient.split_once(' ').unwrap_or((recipient, ""));
    let first = first.trim();
    let last = last.trim();
    let first = if first.is_empty() { FALLBACK_FIRST_NAME } else { first };
    let last = if last.is_empty() { FALLBACK_LAST_NAME } else { last };
    (first.to_string(), last.to_string())
}

fn new_order(row: &RawOrderRow, config: &SyncConfig) -> AggregatedOrder {
    let (first_name, last_name) = split_name(&row.recipient);
    let customer = Customer {
        email: format!("{}@{}", row.buyer_username, config.buyer_email_domain),
        first_name: first_name.clone(),
        last_name: last_name.clone(),
        phone: None,
    };
    let shipping_address = ShippingAddress {
        address1: row.address_line_1.clone(),
        address2: row.address_line_2.clone(),
        city: row.city.clone(),
        province_code: state_code(&row.state).to_string(),
        zip: row.zipcode.clone(),
        country_code: country_code(&row.country).to_string(),
        first_name,
        last_name,
        phone: row.phone.clone(),
    };
    let shipping_line = ShippingLine {
        title: config.shipping_method_title.clone(),
        original_fee: row.original_shipping_fee,
        fee_after_discount: row.shipping_fee_after_discount,
    };
    AggregatedOrder {
        order_id: row.order_id.clone(),
        customer,
        shipping_address,
        line_items: Vec::new(),
        shipping_lines: vec![shipping_line],
        taxes: row.taxes,
        package_id: row.package_id.clone(),
        defects: Vec::new(),
    }
}

fn line_item(row: &RawOrderRow) -> LineItem {
    let quantity = f64::from(row.quantity);
    LineItem {
        title: row.product_name.clone(),
        sku: row.seller_sku.clone(),
        marketplace_sku_id: row.sku_id.clone(),
        quantity: row.quantity,
        original_price: row.unit_original_price,
        price_before_discount: row.subtotal_before_discount / quantity,
        price_after_discount: row.subtotal_after_discount / quantity,
        retail_delivery_fee: row.retail_delivery_fee,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::order_row::columns::*;

    fn record(order_id: &str, sku: &str, quantity: &str, subtotal: &str) -> Record {
        [
            (ORDER_ID, order_id),
            (BUYER_USERNAME, "sleekbarber"),
            (RECIPIENT, "Ana Maria Lopez"),
            (ADDRESS_LINE_1, "12 Elm St"),
            (CITY, "Austin"),
            (STATE, "Texas"),
            (ZIPCODE, "73301"),
            (COUNTRY, "United States"),
            (PHONE, "(+1)512*****21"),
            (PRODUCT_NAME, "Pomade"),
            (SELLER_SKU, sku),
            (SKU_ID, "1729"),
            (QUANTITY, quantity),
            (SUBTOTAL_BEFORE_DISCOUNT, subtotal),
            (SUBTOTAL_AFTER_DISCOUNT, subtotal),
            (ORIGINAL_SHIPPING_FEE, "5.99"),
            (SHIPPING_FEE_AFTER_DISCOUNT, "0"),
            (TAXES, "2.06"),
            (PACKAGE_ID, "PKG-9"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn later_rows_do_not_supply_the_customer_of_a_malformed_order() {
        let config = SyncConfig::default();
        let records = vec![record("1003", "A", "two", "20.00"), record("1003", "B", "1", "5.00")];
        let orders = aggregate_records(&records, &config);
        let order = &orders["1003"];
        assert!(order.is_defective());
        assert_eq!(order.defects.len(), 1);
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].sku, "B");
        assert_eq!(order.customer.email, "");
        assert_eq!(order.customer.first_name, "");
        assert!(order.shipping_lines.is_empty());
    }

    #[test]
    fn rows_of_one_order_are_folded_in_arrival_order() {
        let config = SyncConfig::default();
        let records = vec![record("1001", "A", "2", "20.00"), record("1001", "B", "1", "5.00")];
        let orders = aggregate_records(&records, &config);
        assert_eq!(orders.len(), 1);
        let order = &orders["1001"];
        let skus = order.line_items.iter().map(|l| l.sku.as_str()).collect::<Vec<_>>();
        assert_eq!(skus, vec!["A", "B"]);
        assert_eq!(order.line_items[0].price_after_discount, 10.0);
        assert_eq!(order.line_items[1].price_after_discount, 5.0);
        assert_eq!(order.shipping_lines.len(), 1);
        assert_eq!(order.shipping_lines[0].title, "Shipped by Seller: Standard Shipping");
        assert_eq!(order.taxes, 2.06);
    }

    #[test]
    fn first_seen_order_is_preserved_across_interleaving() {
        let config = SyncConfig::default();
        let records = vec![
            record("30", "A", "1", "1"),
            record("10", "A", "1", "1"),
            record("30", "B", "1", "1"),
            record("20", "A", "1", "1"),
            record("10", "C", "1", "1"),
        ];
        let orders = aggregate_records(&records, &config);
        assert_eq!(orders.keys().collect::<Vec<_>>(), vec!["30", "10", "20"]);
        assert_eq!(orders["30"].line_items.len(), 2);
        assert_eq!(orders["10"].line_items.len(), 2);
    }

    #[test]
    fn customer_and_address_are_derived_from_the_first_row() {
        let config = SyncConfig::default();
        let orders = aggregate_records(&[record("7", "A", "1", "3")], &config);
        let order = &orders["7"];
        assert_eq!(order.customer.email, "sleekbarber@scs.tiktokw.us");
        assert_eq!(order.customer.first_name, "Ana");
        assert_eq!(order.customer.last_name, "Maria Lopez");
        assert_eq!(order.customer.phone, None);
        assert_eq!(order.shipping_address.province_code, "TX");
        assert_eq!(order.shipping_address.country_code, "US");
        assert_eq!(order.shipping_address.phone, "(+1)512*****21");
        assert_eq!(order.package_id, "PKG-9");
    }

    #[test]
    fn unknown_regions_degrade_to_blank_codes() {
        let config = SyncConfig::default();
        let mut rec = record("7", "A", "1", "3");
        rec.insert(STATE.into(), "Puerto Rico".into());
        rec.insert(COUNTRY.into(), "USA".into());
        let orders = aggregate_records(&[rec], &config);
        assert_eq!(orders["7"].shipping_address.province_code, "");
        assert_eq!(orders["7"].shipping_address.country_code, "");
    }

    #[test]
    fn name_fallbacks() {
        assert_eq!(split_name("Cher"), ("Cher".to_string(), "Customer".to_string()));
        assert_eq!(split_name("  "), ("TikTok".to_string(), "Customer".to_string()));
        assert_eq!(split_name("Jo Ann Smith"), ("Jo".to_string(), "Ann Smith".to_string()));
    }

    #[test]
    fn rows_without_an_order_id_are_skipped() {
        let config = SyncConfig::default();
        let mut aggregator = OrderAggregator::new(&config);
        aggregator.push_record(&record("", "A", "1", "1"));
        aggregator.push_record(&record("5", "A", "1", "1"));
        assert_eq!(aggregator.skipped_rows(), 1);
        assert_eq!(aggregator.finish().len(), 1);
    }

    #[test]
    fn malformed_rows_mark_their_order_as_defective() {
        let config = SyncConfig::default();
        let records = vec![record("9", "A", "1", "4"), record("9", "B", "zero", "4"), record("10", "A", "1", "4")];
        let orders = aggregate_records(&records, &config);
        assert_eq!(orders.len(), 2);
        assert!(orders["9"].is_defective());
        assert_eq!(orders["9"].line_items.len(), 1);
        assert!(orders["9"].defects[0].contains("Invalid quantity 'zero'"));
        assert!(!orders["10"].is_defective());
    }

    #[test]
    fn a_malformed_first_row_still_yields_an_order() {
        let config = SyncConfig::default();
        let orders = aggregate_records(&[record("11", "A", "-2", "4")], &config);
        assert!(orders["11"].is_defective());
        assert!(orders["11"].line_items.is_empty());
    }
}
