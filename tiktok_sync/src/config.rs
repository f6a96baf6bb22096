//! Reads the sync options from the environment. Every option has a default, so an empty environment gives a working
//! configuration.
use std::time::Duration;

use log::*;
use sync_common::{non_blank, parse_boolean_flag, parse_or};
use tiktok_sync_engine::{sync_types::DEFAULT_CALL_TIMEOUT, SyncConfig};

pub const DISABLE_AMOUNTS: &str = "TTS_DISABLE_AMOUNTS";
pub const CURRENCY: &str = "TTS_CURRENCY";
pub const SOURCE_NAME: &str = "TTS_SOURCE_NAME";
pub const SHIPPING_METHOD_TITLE: &str = "TTS_SHIPPING_METHOD_TITLE";
pub const DELIVERY_FEE_TITLE: &str = "TTS_DELIVERY_FEE_TITLE";
pub const BUYER_EMAIL_DOMAIN: &str = "TTS_BUYER_EMAIL_DOMAIN";
pub const MAX_CONCURRENT_ORDERS: &str = "TTS_MAX_CONCURRENT_ORDERS";
pub const CALL_TIMEOUT_SECS: &str = "TTS_CALL_TIMEOUT_SECS";
pub const CACHE_SKU_LOOKUPS: &str = "TTS_CACHE_SKU_LOOKUPS";

pub fn sync_config_from_env() -> SyncConfig {
    sync_config_from(|name| std::env::var(name).ok())
}

/// Builds the configuration from an arbitrary variable source.
pub fn sync_config_from<F>(var: F) -> SyncConfig
where F: Fn(&str) -> Option<String> {
    let defaults = SyncConfig::default();
    let text = |name: &str, default: String| match var(name).as_deref().and_then(non_blank) {
        Some(v) => v.to_string(),
        None => default,
    };
    let disable_amounts = parse_boolean_flag(var(DISABLE_AMOUNTS), defaults.disable_amounts);
    if disable_amounts {
        warn!("🪛️ {DISABLE_AMOUNTS} is set. Orders will be created with zero prices and without taxes or payments.");
    }
    let max_concurrent_orders =
        match parse_or(MAX_CONCURRENT_ORDERS, var(MAX_CONCURRENT_ORDERS), defaults.max_concurrent_orders) {
            0 => {
                warn!("🪛️ {MAX_CONCURRENT_ORDERS} must be at least 1. Using 1.");
                1
            },
            n => n,
        };
    let timeout_secs = parse_or(CALL_TIMEOUT_SECS, var(CALL_TIMEOUT_SECS), defaults.call_timeout.as_secs_f64());
    let call_timeout = if timeout_secs.is_finite() && timeout_secs > 0.0 {
        Duration::from_secs_f64(timeout_secs)
    } else {
        warn!("🪛️ {CALL_TIMEOUT_SECS} must be a positive number of seconds. Using the default.");
        DEFAULT_CALL_TIMEOUT
    };
    let config = SyncConfig {
        disable_amounts,
        currency: text(CURRENCY, defaults.currency).to_ascii_uppercase(),
        source_name: text(SOURCE_NAME, defaults.source_name),
        shipping_method_title: text(SHIPPING_METHOD_TITLE, defaults.shipping_method_title),
        delivery_fee_line_title: text(DELIVERY_FEE_TITLE, defaults.delivery_fee_line_title),
        buyer_email_domain: text(BUYER_EMAIL_DOMAIN, defaults.buyer_email_domain),
        max_concurrent_orders,
        call_timeout,
        cache_sku_lookups: parse_boolean_flag(var(CACHE_SKU_LOOKUPS), defaults.cache_sku_lookups),
    };
    debug!("🪛️ Sync configuration: {config:?}");
    config
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> SyncConfig {
        let vars = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<String, String>>();
        sync_config_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = config_from(&[]);
        let defaults = SyncConfig::default();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.shipping_method_title, defaults.shipping_method_title);
        assert_eq!(config.max_concurrent_orders, 1);
        assert_eq!(config.call_timeout, DEFAULT_CALL_TIMEOUT);
        assert!(!config.disable_amounts);
        assert!(config.cache_sku_lookups);
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = config_from(&[
            (DISABLE_AMOUNTS, "yes"),
            (CURRENCY, " cad "),
            (DELIVERY_FEE_TITLE, "Colorado Delivery Fee"),
            (MAX_CONCURRENT_ORDERS, "4"),
            (CALL_TIMEOUT_SECS, "2.5"),
            (CACHE_SKU_LOOKUPS, "off"),
        ]);
        assert!(config.disable_amounts);
        assert_eq!(config.currency, "CAD");
        assert_eq!(config.delivery_fee_line_title, "Colorado Delivery Fee");
        assert_eq!(config.max_concurrent_orders, 4);
        assert_eq!(config.call_timeout, Duration::from_millis(2500));
        assert!(!config.cache_sku_lookups);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[
            (MAX_CONCURRENT_ORDERS, "0"),
            (CALL_TIMEOUT_SECS, "-3"),
            (SOURCE_NAME, "   "),
            (DISABLE_AMOUNTS, "perhaps"),
        ]);
        assert_eq!(config.max_concurrent_orders, 1);
        assert_eq!(config.call_timeout, DEFAULT_CALL_TIMEOUT);
        assert_eq!(config.source_name, "TikTok");
        assert!(!config.disable_amounts);
        let config = config_from(&[(MAX_CONCURRENT_ORDERS, "lots"), (CALL_TIMEOUT_SECS, "soon")]);
        assert_eq!(config.max_concurrent_orders, 1);
        assert_eq!(config.call_timeout, DEFAULT_CALL_TIMEOUT);
    }
}
