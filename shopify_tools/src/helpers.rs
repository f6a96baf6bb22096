/// Quotes a value for use in Shopify's search syntax, e.g. `tag:"TikTokOrderID:1001"`.
pub fn search_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Shopify GraphQL ids are global ids. Bare numeric ids (as shown in the Shopify admin) are promoted to order gids;
/// anything else is passed through untouched.
pub fn order_gid(id: &str) -> String {
    let id = id.trim();
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        format!("gid://shopify/Order/{id}")
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn quoting_search_values() {
        assert_eq!(search_value("TikTokOrderID:1001"), "\"TikTokOrderID:1001\"");
        assert_eq!(search_value("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn order_gids() {
        assert_eq!(order_gid("5883123400001"), "gid://shopify/Order/5883123400001");
        assert_eq!(order_gid("gid://shopify/Order/5883123400001"), "gid://shopify/Order/5883123400001");
        assert_eq!(order_gid(""), "");
    }
}
