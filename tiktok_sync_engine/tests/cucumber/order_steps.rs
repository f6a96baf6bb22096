use std::sync::Arc;

use cucumber::{gherkin::Step, given, then, when};
use tiktok_sync_engine::{aggregate_records, events::EventProducers, OrderReconciler};

use crate::cucumber::{sync_world::table_records, SyncWorld};

#[given("a Shopify store with these variants")]
async fn store_variants(world: &mut SyncWorld, step: &Step) {
    for row in table_records(step, false) {
        world.platform.add_variant(&row["sku"], &row["variant"]);
    }
}

#[given(expr = "Shopify already has order {word} for TikTok order {word}")]
async fn existing_order(world: &mut SyncWorld, platform_order_id: String, order_id: String) {
    world.platform.add_order(&order_id, &platform_order_id);
}

#[given("amounts are disabled")]
async fn disable_amounts(world: &mut SyncWorld) {
    world.config.disable_amounts = true;
}

#[given(expr = "up to {int} orders are reconciled at a time")]
async fn concurrency(world: &mut SyncWorld, n: usize) {
    world.config.max_concurrent_orders = n;
}

#[given("a TikTok export with these rows")]
async fn export_rows(world: &mut SyncWorld, step: &Step) {
    world.records = table_records(step, true);
}

#[when(regex = r"^I sync the orders(?: again)?$")]
async fn sync_orders(world: &mut SyncWorld) {
    let orders = aggregate_records(&world.records, &world.config);
    let reconciler = OrderReconciler::new(Arc::clone(&world.platform), world.config.clone(), EventProducers::default());
    world.outcomes = reconciler.reconcile_all(&orders).await;
    world.orders = orders;
}

#[then(expr = "there is/are {int} outcome(s)")]
async fn outcome_count(world: &mut SyncWorld, n: usize) {
    assert_eq!(world.outcomes.len(), n, "Outcomes: {:?}", world.outcomes);
}

#[then(expr = "the outcomes are in the order {string}")]
async fn outcome_order(world: &mut SyncWorld, expected: String) {
    let ids = world.outcomes.iter().map(|o| o.order_id.as_str()).collect::<Vec<_>>().join(", ");
    assert_eq!(ids, expected);
}

#[then(expr = "order {word} is {word}")]
async fn outcome_status(world: &mut SyncWorld, order_id: String, status: String) {
    let outcome = world.outcome(&order_id);
    assert_eq!(outcome.status.to_string(), status, "Message: {}", outcome.message);
}

#[then(expr = "order {word} failed with {string}")]
async fn outcome_failure(world: &mut SyncWorld, order_id: String, message: String) {
    let outcome = world.outcome(&order_id);
    assert_eq!(outcome.status.to_string(), "Failed");
    assert_eq!(outcome.message, message);
}

#[then(expr = "order {word} points at Shopify order {word}")]
async fn outcome_platform_id(world: &mut SyncWorld, order_id: String, platform_order_id: String) {
    assert_eq!(world.outcome(&order_id).platform_order_id.as_deref(), Some(platform_order_id.as_str()));
}

#[then(expr = "the SKU map of order {word} is {string}")]
async fn outcome_sku_map(world: &mut SyncWorld, order_id: String, json: String) {
    assert_eq!(world.outcome(&order_id).sku_map.to_json(), json);
}

#[then(expr = "Shopify received {int} new order(s)")]
async fn created_count(world: &mut SyncWorld, n: usize) {
    assert_eq!(world.platform.created_orders().len(), n);
}

#[then(expr = "the Shopify order for {word} has {int} line item(s)")]
async fn line_count(world: &mut SyncWorld, order_id: String, n: usize) {
    assert_eq!(world.created_order(&order_id).line_items.len(), n);
}

#[then(expr = "line {int} of the Shopify order for {word} costs {float} with {int} tax line(s)")]
async fn line_price(world: &mut SyncWorld, line: usize, order_id: String, price: f64, tax_lines: usize) {
    let order = world.created_order(&order_id);
    let item = &order.line_items[line - 1];
    assert_eq!(item.price_set.amount(), price);
    assert_eq!(item.tax_lines.len(), tax_lines);
}

#[then(expr = "line {int} of the Shopify order for {word} is taxed {float} at rate {float}")]
async fn line_tax(world: &mut SyncWorld, line: usize, order_id: String, tax: f64, rate: f64) {
    let order = world.created_order(&order_id);
    let tax_line = &order.line_items[line - 1].tax_lines[0];
    assert_eq!(tax_line.price_set.amount(), tax);
    assert_eq!(tax_line.rate, rate);
}

#[then(expr = "the Shopify order for {word} has no transactions")]
async fn no_transactions(world: &mut SyncWorld, order_id: String) {
    assert!(world.created_order(&order_id).transactions.is_empty());
}

#[then(expr = "the Shopify order for {word} was paid {float}")]
async fn transaction_total(world: &mut SyncWorld, order_id: String, total: f64) {
    let order = world.created_order(&order_id);
    assert_eq!(order.transactions.len(), 1);
    assert_eq!(order.transactions[0].amount_set.amount(), total);
}
