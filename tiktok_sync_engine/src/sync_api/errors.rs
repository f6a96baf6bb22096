use thiserror::Error;

use crate::traits::LookupError;

/// Why a single order could not be reconciled. The display text becomes the outcome message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("{0}")]
    Defective(String),
    #[error("Order has no line items")]
    NoLineItems,
    #[error("SKU is empty for line item: {0}")]
    EmptySku(String),
    #[error("Variant not found for SKU: {0}")]
    VariantNotFound(String),
    #[error("{0}")]
    Lookup(#[from] LookupError),
    #[error("{0}")]
    Rejected(String),
}
