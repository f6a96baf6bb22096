use shopify_tools::ShopifyApiError;
use thiserror::Error;
use tiktok_sync_engine::HeaderError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Could not access {path}. {source}")]
    Io { path: String, source: std::io::Error },
    #[error("Could not read or write CSV data. {0}")]
    Csv(#[from] csv::Error),
    #[error("The input file is not usable. {0}")]
    Header(#[from] HeaderError),
    #[error("Could not connect to Shopify. {0}")]
    Shopify(#[from] ShopifyApiError),
}

impl SyncError {
    pub fn io<P: AsRef<std::path::Path>>(path: P, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().display().to_string(), source }
    }
}
