use std::sync::Arc;

use cucumber::{gherkin::Step, World};
use indexmap::IndexMap;
use tiktok_sync_engine::{
    order_row::columns::*,
    test_utils::MockPlatform,
    traits::PlatformFulfillment,
    AggregatedOrder,
    ExportRow,
    OrderCreateRequest,
    Record,
    ReconciliationOutcome,
    SyncConfig,
    TrackingRecord,
};

#[derive(Default, Debug, World)]
pub struct SyncWorld {
    pub platform: Arc<MockPlatform>,
    pub config: SyncConfig,
    pub records: Vec<Record>,
    pub orders: IndexMap<String, AggregatedOrder>,
    pub outcomes: Vec<ReconciliationOutcome>,
    /// Fulfillments to register with the store, in step order. `None` marks an order with no fulfillments.
    pub shipments: Vec<(String, Option<PlatformFulfillment>)>,
    pub export_rows: Vec<ExportRow>,
    pub tracking: Vec<TrackingRecord>,
}

impl SyncWorld {
    pub fn outcome(&self, order_id: &str) -> &ReconciliationOutcome {
        self.outcomes
            .iter()
            .find(|o| o.order_id == order_id)
            .unwrap_or_else(|| panic!("No outcome for order {order_id}. Outcomes: {:?}", self.outcomes))
    }

    /// The create request that was sent for a TikTok order.
    pub fn created_order(&self, order_id: &str) -> OrderCreateRequest {
        let tag = format!("TikTokOrderID:{order_id}");
        self.platform
            .created_orders()
            .into_iter()
            .find(|o| o.tags.contains(&tag))
            .unwrap_or_else(|| panic!("No Shopify order was created for {order_id}"))
    }
}

/// A complete, valid export row. Table cells override these values.
fn base_record() -> Record {
    [
        (ORDER_ID, "1"),
        (BUYER_USERNAME, "sleekbarber"),
        (RECIPIENT, "Ana Lopez"),
        (ADDRESS_LINE_1, "12 Elm St"),
        (ADDRESS_LINE_2, ""),
        (CITY, "Austin"),
        (STATE, "Texas"),
        (ZIPCODE, "73301"),
        (COUNTRY, "United States"),
        (PHONE, "(+1)512*****21"),
        (PRODUCT_NAME, "Pomade"),
        (SELLER_SKU, "POMADE-4OZ"),
        (SKU_ID, "1729"),
        (QUANTITY, "1"),
        (UNIT_ORIGINAL_PRICE, "10.00"),
        (SUBTOTAL_BEFORE_DISCOUNT, "10.00"),
        (SUBTOTAL_AFTER_DISCOUNT, "10.00"),
        (RETAIL_DELIVERY_FEE, ""),
        (ORIGINAL_SHIPPING_FEE, "0"),
        (SHIPPING_FEE_AFTER_DISCOUNT, "0"),
        (TAXES, "0"),
        (PACKAGE_ID, "PKG-1"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Turns a data table into records, keyed by the header row.
pub fn table_records(step: &Step, with_defaults: bool) -> Vec<Record> {
    let table = step.table.as_ref().expect("Step has no data table");
    let (headers, rows) = table.rows.split_first().expect("Data table has no header row");
    rows.iter()
        .map(|row| {
            let mut record = if with_defaults { base_record() } else { Record::new() };
            headers.iter().zip(row).for_each(|(h, v)| {
                record.insert(h.clone(), v.clone());
            });
            record
        })
        .collect()
}
