use std::sync::Arc;

use cucumber::{gherkin::Step, given, then, when};
use indexmap::IndexMap;
use tiktok_sync_engine::{
    events::EventProducers,
    order_row::columns::{ORDER_ID, SHOPIFY_ORDER_ID, SKU_IDS},
    traits::{PlatformFulfillment, PlatformFulfillmentLine, PlatformTrackingInfo},
    ExportRow,
    FulfillmentExtractor,
};

use crate::cucumber::{sync_world::table_records, SyncWorld};

#[given(expr = "Shopify order {word} was shipped with {word} tracking number {word}")]
async fn tracked_shipment(world: &mut SyncWorld, platform_order_id: String, carrier: String, number: String) {
    let fulfillment = PlatformFulfillment {
        tracking_info: vec![PlatformTrackingInfo { number: Some(number), url: None, company: Some(carrier) }],
        line_items: vec![],
    };
    world.shipments.push((platform_order_id, Some(fulfillment)));
}

#[given(expr = "Shopify order {word} was shipped without tracking")]
async fn untracked_shipment(world: &mut SyncWorld, platform_order_id: String) {
    world.shipments.push((platform_order_id, Some(PlatformFulfillment::default())));
}

#[given(expr = "Shopify order {word} has not been fulfilled")]
async fn unfulfilled(world: &mut SyncWorld, platform_order_id: String) {
    world.shipments.push((platform_order_id, None));
}

#[given("the shipment contains")]
async fn shipment_lines(world: &mut SyncWorld, step: &Step) {
    let lines = table_records(step, false).into_iter().map(|r| PlatformFulfillmentLine {
        sku: Some(r["sku"].clone()),
        quantity: r["quantity"].parse().expect("quantity must be a number"),
    });
    let fulfillment = world
        .shipments
        .last_mut()
        .and_then(|(_, f)| f.as_mut())
        .expect("A shipment step must come before its contents");
    fulfillment.line_items.extend(lines);
}

#[given("an outcome file with these rows")]
async fn outcome_file(world: &mut SyncWorld, step: &Step) {
    world.export_rows = table_records(step, false)
        .into_iter()
        .map(|r| ExportRow {
            order_id: r[ORDER_ID].clone(),
            platform_order_id: r[SHOPIFY_ORDER_ID].clone(),
            sku_ids: r[SKU_IDS].clone(),
        })
        .collect();
}

#[when("I export the fulfillments")]
async fn export_fulfillments(world: &mut SyncWorld) {
    let mut by_order = IndexMap::<String, Vec<PlatformFulfillment>>::new();
    for (id, fulfillment) in world.shipments.drain(..) {
        by_order.entry(id).or_default().extend(fulfillment);
    }
    by_order.into_iter().for_each(|(id, fulfillments)| world.platform.add_fulfillments(&id, fulfillments));
    let extractor =
        FulfillmentExtractor::new(Arc::clone(&world.platform), world.config.clone(), EventProducers::default());
    world.tracking = extractor.extract(&world.export_rows).await;
}

#[then(expr = "{int} tracking record(s) is/are exported")]
async fn tracking_count(world: &mut SyncWorld, n: usize) {
    assert_eq!(world.tracking.len(), n, "Records: {:?}", world.tracking);
}

#[then(expr = "tracking record {int} ships {int} of SKU {word} for order {word} with {word} tracking number {word}")]
async fn tracking_record(
    world: &mut SyncWorld,
    index: usize,
    quantity: i64,
    sku_id: String,
    order_id: String,
    carrier: String,
    number: String,
) {
    let record = &world.tracking[index - 1];
    assert_eq!(record.order_id, order_id);
    assert_eq!(record.sku_id.as_deref(), Some(sku_id.as_str()));
    assert_eq!(record.quantity, Some(quantity));
    assert_eq!(record.shipping_provider_name, carrier);
    assert_eq!(record.tracking_id, number);
    assert_eq!(record.shipping_service, None);
    assert_eq!(record.auto_combine_group_id, "N/A");
}
