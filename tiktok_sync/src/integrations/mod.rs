pub mod live;
pub mod shopify;
