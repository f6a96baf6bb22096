use std::time::Duration;

use log::*;
use sync_common::{env_parse_or, Secret};

pub const DEFAULT_API_VERSION: &str = "2025-07";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    /// The shop's admin domain, e.g. "my-shop.myshopify.com"
    pub shop: String,
    pub admin_access_token: Secret<String>,
    pub api_version: String,
    /// Upper bound on a single HTTP round trip to the Admin API.
    pub request_timeout: Duration,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            shop: "example.myshopify.com".to_string(),
            admin_access_token: Secret::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ShopifyConfig {
    pub fn new_from_env_or_default() -> Self {
        let shop = std::env::var("TTS_SHOPIFY_SHOP").unwrap_or_else(|_| {
            warn!("TTS_SHOPIFY_SHOP not set, using (probably useless) default");
            "example.myshopify.com".to_string()
        });
        let shop = normalize_shop(&shop);
        let api_version = std::env::var("TTS_SHOPIFY_API_VERSION").unwrap_or_else(|_| {
            warn!("TTS_SHOPIFY_API_VERSION not set, using {DEFAULT_API_VERSION} as default");
            DEFAULT_API_VERSION.to_string()
        });
        let admin_access_token = Secret::new(std::env::var("TTS_SHOPIFY_ACCESS_TOKEN").unwrap_or_else(|_| {
            warn!("TTS_SHOPIFY_ACCESS_TOKEN not set, every request to Shopify is going to be rejected");
            String::default()
        }));
        let timeout_secs = env_parse_or("TTS_SHOPIFY_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT.as_secs());
        Self { shop, admin_access_token, api_version, request_timeout: Duration::from_secs(timeout_secs) }
    }
}

/// Accepts either a bare store handle ("my-shop") or the full admin domain, with or without a scheme.
fn normalize_shop(shop: &str) -> String {
    let shop = shop.trim().trim_start_matches("https://").trim_start_matches("http://").trim_end_matches('/');
    if shop.contains('.') {
        shop.to_string()
    } else {
        format!("{shop}.myshopify.com")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shop_names() {
        assert_eq!(normalize_shop("suavecito"), "suavecito.myshopify.com");
        assert_eq!(normalize_shop("https://suavecito.myshopify.com/"), "suavecito.myshopify.com");
        assert_eq!(normalize_shop(" shop.example.com "), "shop.example.com");
    }
}
