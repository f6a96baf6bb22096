//! Reading TikTok exports and outcome files, and writing the files the sync produces.
//!
//! Cells are handed to the engine as text keyed by header name; the engine does all of the parsing.
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim, Writer};
use log::*;
use tiktok_sync_engine::{
    order_row::{columns, REQUIRED_EXPORT_HEADERS, REQUIRED_ORDER_HEADERS},
    validate_headers,
    ExportRow,
    ReconciliationOutcome,
    Record,
    TrackingRecord,
};

use crate::errors::SyncError;

pub const OUTCOME_HEADERS: [&str; 5] =
    [columns::ORDER_ID, columns::SHOPIFY_ORDER_ID, columns::STATUS, columns::MESSAGE, columns::SKU_IDS];

pub const TRACKING_HEADERS: [&str; 7] = [
    "Order ID",
    "SKU ID(optional)",
    "Quantity(optional)",
    "Tracking ID",
    "Shipping Provider Name",
    "Shipping Service(optional)",
    "Auto Combine Group ID",
];

/// Reads every record of a CSV file, after checking that the `required` headers are present.
pub fn read_records<R: Read>(reader: R, required: &[&str]) -> Result<Vec<Record>, SyncError> {
    let mut reader = ReaderBuilder::new().flexible(true).trim(Trim::Headers).from_reader(reader);
    let headers = reader.headers()?.iter().map(|h| h.to_string()).collect::<Vec<String>>();
    validate_headers(&headers, required)?;
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, cell)| (h.clone(), cell.to_string()))
            .collect::<Record>();
        records.push(record);
    }
    debug!("📋️ Read {} record(s) with {} column(s)", records.len(), headers.len());
    Ok(records)
}

pub fn read_order_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, SyncError> {
    read_records(open(&path)?, &REQUIRED_ORDER_HEADERS)
}

/// Reads the outcome file of an earlier order sync.
pub fn read_export_rows<R: Read>(reader: R) -> Result<Vec<ExportRow>, SyncError> {
    let cell = |record: &Record, column: &str| record.get(column).map(|s| s.trim().to_string()).unwrap_or_default();
    let rows = read_records(reader, &REQUIRED_EXPORT_HEADERS)?
        .iter()
        .map(|r| ExportRow {
            order_id: cell(r, columns::ORDER_ID),
            platform_order_id: cell(r, columns::SHOPIFY_ORDER_ID),
            sku_ids: cell(r, columns::SKU_IDS),
        })
        .collect();
    Ok(rows)
}

pub fn read_export_file<P: AsRef<Path>>(path: P) -> Result<Vec<ExportRow>, SyncError> {
    read_export_rows(open(&path)?)
}

pub fn write_outcomes<W: Write>(writer: W, outcomes: &[ReconciliationOutcome]) -> Result<(), SyncError> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(OUTCOME_HEADERS)?;
    for outcome in outcomes {
        let status = outcome.status.to_string();
        let sku_ids = outcome.sku_map.to_json();
        writer.write_record([
            outcome.order_id.as_str(),
            outcome.platform_order_id.as_deref().unwrap_or_default(),
            status.as_str(),
            outcome.message.as_str(),
            sku_ids.as_str(),
        ])?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_tracking_records<W: Write>(writer: W, records: &[TrackingRecord]) -> Result<(), SyncError> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(TRACKING_HEADERS)?;
    for record in records {
        let quantity = record.quantity.map(|q| q.to_string()).unwrap_or_default();
        writer.write_record([
            record.order_id.as_str(),
            record.sku_id.as_deref().unwrap_or_default(),
            quantity.as_str(),
            record.tracking_id.as_str(),
            record.shipping_provider_name.as_str(),
            record.shipping_service.as_deref().unwrap_or_default(),
            record.auto_combine_group_id.as_str(),
        ])?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn create_output<P: AsRef<Path>>(path: P) -> Result<File, SyncError> {
    File::create(&path).map_err(|e| SyncError::io(path, e))
}

/// `orders.csv` with suffix `output` becomes `orders-output.csv`, next to the input.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| "tiktok".to_string());
    input.with_file_name(format!("{stem}-{suffix}.csv"))
}

fn open<P: AsRef<Path>>(path: P) -> Result<File, SyncError> {
    File::open(&path).map_err(|e| SyncError::io(path, e))
}
