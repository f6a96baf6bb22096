use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::*;
use tiktok_sync_engine::{
    aggregate_records,
    events::{EventHandlers, EventProducers},
    FulfillmentExtractor,
    OrderReconciler,
    OutcomeSummary,
};
use tokio::task::JoinHandle;

mod config;
mod csv_io;
mod errors;
mod integrations;

use crate::{
    config::sync_config_from_env,
    csv_io::{create_output, default_output_path, read_export_file, read_order_records},
    integrations::{live::create_live_event_handlers, shopify::ShopifyLookup},
};

#[derive(Parser, Debug)]
#[command(version, about = "Syncs TikTok Shop orders into Shopify, and Shopify tracking numbers back to TikTok")]
pub struct Arguments {
    /// Print the sync's progress as it happens
    #[arg(long, global = true)]
    live: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[clap(name = "orders", about = "Create Shopify orders from a TikTok Shop order export")]
    Orders {
        /// The TikTok Shop order export (CSV)
        input: PathBuf,
        /// Where to write the outcome file. Defaults to <INPUT>-output.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    #[clap(name = "fulfillments", about = "Build a TikTok shipping upload from the outcome file of an order sync")]
    Fulfillments {
        /// The outcome file written by the orders command (CSV)
        input: PathBuf,
        /// Where to write the shipping upload. Defaults to <INPUT>-fulfillments.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    match cli.command {
        Command::Orders { input, output } => {
            let output = output.unwrap_or_else(|| default_output_path(&input, "output"));
            sync_orders(&input, &output, cli.live).await
        },
        Command::Fulfillments { input, output } => {
            let output = output.unwrap_or_else(|| default_output_path(&input, "fulfillments"));
            export_fulfillments(&input, &output, cli.live).await
        },
    }
}

async fn sync_orders(input: &Path, output: &Path, live: bool) -> anyhow::Result<()> {
    let config = sync_config_from_env();
    let records = read_order_records(input).with_context(|| format!("Could not load {}", input.display()))?;
    let orders = aggregate_records(&records, &config);
    info!("📋️ {} row(s) read, {} order(s) to sync", records.len(), orders.len());
    let client = ShopifyLookup::from_env()?;
    let (producers, handles) = start_live_feed(live);
    let reconciler = OrderReconciler::new(client, config, producers);
    let outcomes = reconciler.reconcile_all(&orders).await;
    drop(reconciler);
    flush_live_feed(handles).await;
    csv_io::write_outcomes(create_output(output)?, &outcomes)?;
    println!("{}", OutcomeSummary::from_outcomes(&outcomes));
    println!("Outcomes written to {}", output.display());
    Ok(())
}

async fn export_fulfillments(input: &Path, output: &Path, live: bool) -> anyhow::Result<()> {
    let config = sync_config_from_env();
    let rows = read_export_file(input).with_context(|| format!("Could not load {}", input.display()))?;
    let client = ShopifyLookup::from_env()?;
    let (producers, handles) = start_live_feed(live);
    let extractor = FulfillmentExtractor::new(client, config, producers);
    let records = extractor.extract(&rows).await;
    drop(extractor);
    flush_live_feed(handles).await;
    csv_io::write_tracking_records(create_output(output)?, &records)?;
    println!("{} tracking record(s) for {} order(s)", records.len(), rows.len());
    println!("Shipping upload written to {}", output.display());
    Ok(())
}

fn start_live_feed(live: bool) -> (EventProducers, Vec<JoinHandle<()>>) {
    if !live {
        return (EventProducers::default(), vec![]);
    }
    let handlers: EventHandlers = create_live_event_handlers(Level::Info);
    let producers = handlers.producers();
    (producers, handlers.start_handlers())
}

/// Waits for the handlers to print everything that was queued. Only returns once every producer has been dropped.
async fn flush_live_feed(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            warn!("📬️ Live feed handler stopped unexpectedly. {e}");
        }
    }
}
